//! Client for the TME distributor API.
//!
//! Every call is a form-encoded POST signed with the account's application secret,
//! see [`signer`]. [`Catalog::enrich`] turns a scanned part into one carrying its
//! description, footprint and datasheet links.

pub mod catalog;
pub mod client;
pub mod signer;
pub mod types;

pub use catalog::Catalog;
pub use client::{TmeClient, TmeConfig};
pub use signer::{SignedRequest, sign};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum LookupError {
    #[error("part {symbol} not found in the TME catalog")]
    NotFound { symbol: String },

    #[error("TME {action} failed ({status}): {body}")]
    Status {
        action: String,
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("TME {action} returned status {status}")]
    Api { action: String, status: String },

    #[error("TME {action} response has no Data")]
    MissingData { action: String },

    #[error("TME {action} request failed")]
    Transport {
        action: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("failed to parse TME {action} response")]
    Decode {
        action: String,
        #[source]
        source: serde_json::Error,
    },
}
