//! Generic field-map row

use std::collections::HashMap;

use super::Value;
use crate::error::RowParseError;

/// A row with no fixed schema.
///
/// Records hold field values as a `HashMap<String, Value>`. They are the row
/// type for grids whose columns come from
/// [`FieldMetadata`](crate::column::FieldMetadata) rather than from the user
/// column registry.
///
/// # Example
///
/// ```
/// use smart_tables::model::Record;
///
/// let record = Record::new("1")
///     .set("name", "Alice")
///     .set("value", 10i64);
///
/// assert_eq!(record.id(), "1");
/// assert_eq!(record.get("name").and_then(|v| v.as_str()), Some("Alice"));
/// ```
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Record {
    id: String,
    fields: HashMap<String, Value>,
}

impl Record {
    /// Creates an empty record with the given id.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            fields: HashMap::new(),
        }
    }

    /// Builds a record from a JSON object.
    ///
    /// The id is taken from `id`, falling back to `walletAddress`. Every
    /// top-level property, including the id, becomes a field.
    pub fn from_json(index: usize, json: serde_json::Value) -> Result<Self, RowParseError> {
        let serde_json::Value::Object(map) = json else {
            return Err(RowParseError::NotAnObject { index });
        };
        let id = ["id", "walletAddress", "wallet_address"]
            .iter()
            .find_map(|key| match map.get(*key) {
                Some(serde_json::Value::String(s)) if !s.is_empty() => Some(s.clone()),
                Some(serde_json::Value::Number(n)) => Some(n.to_string()),
                _ => None,
            })
            .ok_or(RowParseError::MissingIdentity { index })?;
        let fields = map.into_iter().map(|(k, v)| (k, Value::from(v))).collect();
        Ok(Self { id, fields })
    }

    // =========================================================================
    // Field access
    // =========================================================================

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns a reference to the field value, if it exists.
    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// Returns `true` if the field exists and is not null.
    pub fn contains(&self, field: &str) -> bool {
        self.fields.get(field).is_some_and(|v| !v.is_null())
    }

    /// Sets a field, replacing any previous value.
    pub fn set(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.fields.insert(field.into(), value.into());
        self
    }
}
