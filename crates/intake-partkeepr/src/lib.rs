//! PartKeepr side of the intake: look a part up by name, then either add stock to
//! the existing record or create a new one from a JSON template.

pub mod client;
pub mod inventory;
pub mod reconcile;
pub mod template;

pub use client::{PartKeeprClient, PartKeeprConfig};
pub use inventory::{Filter, Inventory, Reference};
pub use reconcile::{Reconciler, Reconciliation};
pub use template::{PartTemplate, TemplateError};

use reqwest::{Method, StatusCode};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum InventoryApiError {
    #[error("PartKeepr {method} {url} failed ({status}): {body}")]
    Status {
        method: Method,
        url: String,
        status: StatusCode,
        body: String,
    },

    #[error("PartKeepr {method} {url} request failed")]
    Transport {
        method: Method,
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("unexpected PartKeepr response from {endpoint}: {reason}")]
    Malformed { endpoint: String, reason: String },
}
