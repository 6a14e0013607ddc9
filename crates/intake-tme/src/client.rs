use std::collections::BTreeMap;
use std::time::Duration;

use reqwest::blocking::Client;
use serde::Deserialize;
use serde::de::DeserializeOwned;

use crate::LookupError;
use crate::catalog::Catalog;
use crate::signer::SignedRequest;
use crate::types::{Envelope, Product, ProductFiles, ProductList, ProductParameters, STATUS_OK};

pub const DEFAULT_API_URL: &str = "https://api.tme.eu";

const GET_PRODUCTS: &str = "Products/GetProducts";
const GET_PARAMETERS: &str = "Products/GetParameters";
const GET_PRODUCTS_FILES: &str = "Products/GetProductsFiles";

/// Credentials and locale for the TME API (`[tme]` in the config file).
#[derive(Debug, Clone, Deserialize)]
pub struct TmeConfig {
    pub token: String,
    pub secret: String,
    #[serde(default = "default_country")]
    pub country: String,
    #[serde(default = "default_language")]
    pub language: String,
    #[serde(default = "default_api_url")]
    pub api_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_country() -> String {
    "ES".to_string()
}

fn default_language() -> String {
    "EN".to_string()
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

pub struct TmeClient {
    client: Client,
    config: TmeConfig,
}

impl TmeClient {
    pub fn new(config: TmeConfig) -> reqwest::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self { client, config })
    }

    pub fn action_url(&self, action: &str) -> String {
        let base = self.config.api_url.trim_end_matches('/');
        format!("{base}/{action}.json")
    }

    fn symbol_params(&self, symbol: &str) -> BTreeMap<String, String> {
        BTreeMap::from([
            ("SymbolList[0]".to_string(), symbol.to_string()),
            ("Country".to_string(), self.config.country.clone()),
            ("Language".to_string(), self.config.language.clone()),
        ])
    }

    /// Sign and post `params` to `action`, returning the `Data` of the response.
    pub fn call<T: DeserializeOwned>(
        &self,
        action: &str,
        params: BTreeMap<String, String>,
    ) -> Result<T, LookupError> {
        let request = SignedRequest::new(
            self.action_url(action),
            params,
            &self.config.token,
            &self.config.secret,
        );
        log::debug!("{} {}", request.method(), request.url);

        let transport = |source| LookupError::Transport {
            action: action.to_string(),
            source,
        };

        let response = self
            .client
            .post(&request.url)
            .form(&request.params)
            .send()
            .map_err(transport)?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().unwrap_or_default();
            return Err(LookupError::Status {
                action: action.to_string(),
                status,
                body,
            });
        }

        let decode = |source| LookupError::Decode {
            action: action.to_string(),
            source,
        };

        let body = response.text().map_err(transport)?;
        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(decode)?;

        if envelope.status != STATUS_OK {
            return Err(LookupError::Api {
                action: action.to_string(),
                status: envelope.status,
            });
        }
        envelope.data.ok_or_else(|| LookupError::MissingData {
            action: action.to_string(),
        })
    }

    fn product_list<P: DeserializeOwned>(
        &self,
        action: &str,
        symbol: &str,
    ) -> Result<Vec<P>, LookupError> {
        let data: ProductList<P> = self.call(action, self.symbol_params(symbol))?;
        Ok(data.product_list)
    }
}

impl Catalog for TmeClient {
    fn products(&self, symbol: &str) -> Result<Vec<Product>, LookupError> {
        self.product_list(GET_PRODUCTS, symbol)
    }

    fn parameters(&self, symbol: &str) -> Result<Vec<ProductParameters>, LookupError> {
        self.product_list(GET_PARAMETERS, symbol)
    }

    fn files(&self, symbol: &str) -> Result<Vec<ProductFiles>, LookupError> {
        self.product_list(GET_PRODUCTS_FILES, symbol)
    }
}
