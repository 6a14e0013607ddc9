use std::fs;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use intake_core::Part;
use serde_json::{Map, Value};
use thiserror::Error;

use crate::inventory::Reference;

/// Template shipped with the tool, used when no template file is configured.
pub const DEFAULT_TEMPLATE: &str = include_str!("../templates/part.json");

const STOCK_LEVELS: &str = "stockLevels";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("failed to read part template {}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("part template is not valid JSON")]
    Json(#[from] serde_json::Error),

    #[error("part template needs a \"stockLevels\" list of objects")]
    Shape,
}

/// JSON document a new part is created from.
#[derive(Debug, Clone)]
pub struct PartTemplate {
    document: Map<String, Value>,
}

impl PartTemplate {
    pub fn builtin() -> Result<Self, TemplateError> {
        Self::from_json(DEFAULT_TEMPLATE)
    }

    pub fn load(path: &Path) -> Result<Self, TemplateError> {
        let contents = fs::read_to_string(path).map_err(|source| TemplateError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&contents)
    }

    pub fn from_json(json: &str) -> Result<Self, TemplateError> {
        match serde_json::from_str(json)? {
            Value::Object(document) if has_stock_level(&document) => Ok(Self { document }),
            _ => Err(TemplateError::Shape),
        }
    }

    /// The create request for `part`.
    pub fn render(
        &self,
        part: &Part,
        footprint: Option<Reference>,
        attachments: Vec<Reference>,
        created: DateTime<Utc>,
    ) -> Value {
        let mut document = self.document.clone();

        document.insert("name".into(), part.pn.clone().into());
        document.insert("description".into(), part.description.clone().into());
        document.insert("createDate".into(), format_create_date(created).into());
        let footprint = footprint.map_or(Value::Null, |fp| fp.0);
        let attachments: Vec<Value> = attachments.into_iter().map(|a| a.0).collect();
        document.insert("footprint".into(), footprint);
        document.insert("attachments".into(), Value::Array(attachments));

        if let Some(level) = document
            .get_mut(STOCK_LEVELS)
            .and_then(|levels| levels.get_mut(0))
            .and_then(Value::as_object_mut)
        {
            level.insert("stockLevel".into(), part.quantity.into());
        }

        Value::Object(document)
    }
}

fn has_stock_level(document: &Map<String, Value>) -> bool {
    document
        .get(STOCK_LEVELS)
        .and_then(Value::as_array)
        .and_then(|levels| levels.first())
        .is_some_and(Value::is_object)
}

/// UTC, millisecond precision, `Z` suffix.
pub fn format_create_date(created: DateTime<Utc>) -> String {
    created.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string()
}
