//! Response payloads of the TME product endpoints.

use serde::{Deserialize, Deserializer};

pub const STATUS_OK: &str = "OK";

/// Common wrapper of every TME response.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Envelope<T> {
    pub status: String,
    pub data: Option<T>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductList<P> {
    #[serde(default = "Vec::new")]
    pub product_list: Vec<P>,
}

/// Entry of `Products/GetProducts`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Product {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub description: String,
}

/// Entry of `Products/GetParameters`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductParameters {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub parameter_list: Vec<Parameter>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Parameter {
    #[serde(deserialize_with = "string_or_number")]
    pub parameter_id: String,
    #[serde(default)]
    pub parameter_name: String,
    #[serde(default)]
    pub parameter_value: String,
}

/// Entry of `Products/GetProductsFiles`.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct ProductFiles {
    #[serde(default)]
    pub symbol: String,
    #[serde(default)]
    pub files: Files,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Files {
    #[serde(default)]
    pub document_list: Vec<Document>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct Document {
    pub document_url: String,
    #[serde(default)]
    pub document_type: String,
}

// Parameter ids show up both as numbers and as strings.
fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Number(u64),
        Text(String),
    }

    Ok(match Id::deserialize(deserializer)? {
        Id::Number(n) => n.to_string(),
        Id::Text(s) => s,
    })
}
