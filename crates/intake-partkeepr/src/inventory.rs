use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::InventoryApiError;

/// Endpoints of the inventory API the intake writes through.
pub trait Inventory {
    /// Parts whose name is exactly `name`.
    fn find_parts(&self, name: &str) -> Result<Vec<Reference>, InventoryApiError>;

    /// Add `quantity` units to the part at `iri`, with `comment` on the stock entry.
    fn add_stock(&self, iri: &str, quantity: u32, comment: &str) -> Result<(), InventoryApiError>;

    /// Footprints whose name is exactly `name`.
    fn find_footprints(&self, name: &str) -> Result<Vec<Reference>, InventoryApiError>;

    /// Have the server fetch `url` into a temporary upload, returning the upload token.
    fn upload_temp_file(&self, url: &str) -> Result<Reference, InventoryApiError>;

    fn create_part(&self, document: &Value) -> Result<Reference, InventoryApiError>;
}

/// An entity as returned by the inventory API (JSON-LD object).
///
/// Embedded as-is when a new part points at it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Reference(pub Value);

impl Reference {
    pub fn iri(&self) -> Option<&str> {
        self.0.get("@id").and_then(Value::as_str)
    }
}

/// Exact-match collection filter, sent JSON-encoded in the `filter` query parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Filter<'a> {
    pub property: &'a str,
    pub operator: &'a str,
    pub value: &'a str,
}

impl<'a> Filter<'a> {
    pub fn name_equals(value: &'a str) -> Self {
        Self {
            property: "name",
            operator: "=",
            value,
        }
    }

    /// `{"property":..,"operator":..,"value":..}`, keys in that order.
    pub fn to_query(&self) -> String {
        format!(
            r#"{{"property":{},"operator":{},"value":{}}}"#,
            Value::from(self.property),
            Value::from(self.operator),
            Value::from(self.value)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn name_filter_encoding() {
        insta::assert_snapshot!(
            Filter::name_equals("HA50151V4").to_query(),
            @r#"{"property":"name","operator":"=","value":"HA50151V4"}"#
        );
    }

    #[test]
    fn filter_value_is_escaped() {
        assert_eq!(
            Filter::name_equals(r#"A"B"#).to_query(),
            r#"{"property":"name","operator":"=","value":"A\"B"}"#
        );
    }

    #[test]
    fn filter_query_is_always_valid_json() {
        for value in ["", "back\\slash", "tab\tnew\nline", "\u{1}"] {
            let query = Filter::name_equals(value).to_query();
            let parsed: Value = serde_json::from_str(&query).unwrap();
            assert_eq!(
                parsed,
                json!({ "property": "name", "operator": "=", "value": value })
            );
        }
    }

    #[test]
    fn reference_iri() {
        let part = Reference(json!({ "@id": "/api/parts/42", "name": "BC547" }));
        assert_eq!(part.iri(), Some("/api/parts/42"));
        assert_eq!(Reference(json!({ "name": "BC547" })).iri(), None);
    }
}
