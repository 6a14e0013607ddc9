use std::path::PathBuf;
use std::time::Duration;

use reqwest::Method;
use reqwest::blocking::{Client, RequestBuilder};
use serde::Deserialize;
use serde_json::Value;

use crate::InventoryApiError;
use crate::inventory::{Filter, Inventory, Reference};

pub(crate) const PARTS: &str = "/api/parts";
pub(crate) const FOOTPRINTS: &str = "/api/footprints";
pub(crate) const TEMP_UPLOAD: &str = "/api/temp_uploaded_files/upload";

const COLLECTION_MEMBERS: &str = "hydra:member";
const UPLOAD_RESPONSE: &str = "response";

/// Location and credentials of the PartKeepr instance (`[partkeepr]` in the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct PartKeeprConfig {
    /// Base URL of the instance, e.g. `https://partkeepr.example.com`.
    pub url: String,
    pub user: String,
    pub password: String,
    /// JSON document used for new parts; the built-in template when unset.
    #[serde(default)]
    pub template: Option<PathBuf>,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Blocking client for the PartKeepr REST API, authenticating with HTTP basic auth.
pub struct PartKeeprClient {
    client: Client,
    config: PartKeeprConfig,
}

impl PartKeeprClient {
    pub fn new(config: PartKeeprConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.url.trim_end_matches('/'), path)
    }

    fn send(
        &self,
        method: Method,
        path: &str,
        configure: impl FnOnce(RequestBuilder) -> RequestBuilder,
    ) -> Result<Value, InventoryApiError> {
        let url = self.endpoint(path);
        log::debug!("{method} {url}");

        let request = self
            .client
            .request(method.clone(), &url)
            .basic_auth(&self.config.user, Some(&self.config.password));

        let transport = |source| InventoryApiError::Transport {
            method: method.clone(),
            url: url.clone(),
            source,
        };

        let response = configure(request).send().map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(InventoryApiError::Status {
                method,
                url,
                status,
                body,
            });
        }

        let body = response.text().map_err(transport)?;
        if body.trim().is_empty() {
            return Ok(Value::Null);
        }
        serde_json::from_str(&body).map_err(|e| InventoryApiError::Malformed {
            endpoint: path.to_string(),
            reason: e.to_string(),
        })
    }

    fn find_by_name(&self, path: &str, name: &str) -> Result<Vec<Reference>, InventoryApiError> {
        let filter = Filter::name_equals(name).to_query();
        let collection = self.send(Method::GET, path, |req| {
            req.query(&[("filter", filter.as_str())])
        })?;

        match collection.get(COLLECTION_MEMBERS).and_then(Value::as_array) {
            Some(members) => Ok(members.iter().cloned().map(Reference).collect()),
            None => Err(InventoryApiError::Malformed {
                endpoint: path.to_string(),
                reason: format!("missing \"{COLLECTION_MEMBERS}\""),
            }),
        }
    }
}

impl Inventory for PartKeeprClient {
    fn find_parts(&self, name: &str) -> Result<Vec<Reference>, InventoryApiError> {
        self.find_by_name(PARTS, name)
    }

    fn add_stock(
        &self,
        iri: &str,
        quantity: u32,
        comment: &str,
    ) -> Result<(), InventoryApiError> {
        let path = format!("{iri}/addStock");
        let quantity = quantity.to_string();
        self.send(Method::PUT, &path, |req| {
            req.form(&[("quantity", quantity.as_str()), ("comment", comment)])
        })?;
        Ok(())
    }

    fn find_footprints(&self, name: &str) -> Result<Vec<Reference>, InventoryApiError> {
        self.find_by_name(FOOTPRINTS, name)
    }

    fn upload_temp_file(&self, url: &str) -> Result<Reference, InventoryApiError> {
        let mut body = self.send(Method::POST, TEMP_UPLOAD, |req| req.form(&[("url", url)]))?;
        match body.get_mut(UPLOAD_RESPONSE).map(Value::take) {
            Some(upload) if !upload.is_null() => Ok(Reference(upload)),
            _ => Err(InventoryApiError::Malformed {
                endpoint: TEMP_UPLOAD.to_string(),
                reason: format!("missing \"{UPLOAD_RESPONSE}\""),
            }),
        }
    }

    fn create_part(&self, document: &Value) -> Result<Reference, InventoryApiError> {
        let created = self.send(Method::POST, PARTS, |req| req.json(document))?;
        Ok(Reference(created))
    }
}
