//! Shared data model for the inventory intake pipeline.
//!
//! A [`Part`] is built from one scanner line by [`scan::classify`], enriched by the
//! distributor catalog and finally reconciled against the inventory.

pub mod part;
pub mod scan;

pub use part::Part;
pub use scan::{InputFormatError, ScanLine, classify};
