//! Barcode-scanner intake: TME labels in, PartKeepr stock out.

pub mod config;
pub mod cue;
pub mod intake;

pub use config::Config;
pub use cue::{CommandCue, Cue, Silent};
pub use intake::{Intake, IntakeError};
