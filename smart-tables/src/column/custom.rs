//! User-defined columns and their per-row values
//!
//! Values live beside the rows, keyed by row id and then by column id, so
//! they survive row reloads and never touch the user records themselves.

use std::collections::BTreeMap;
use std::sync::Arc;

use log::debug;
use serde::Deserialize;
use serde::Serialize;

use super::ColumnDescriptor;
use super::ColumnKind;
use super::ColumnType;
use super::DataAccessor;
use super::FieldMetadata;
use crate::error::CustomColumnError;
use crate::model::UserRow;
use crate::model::Value;
use crate::query::parse_time;
use crate::shape::ShapeTag;

/// Default and minimum width of a user column.
pub const CUSTOM_COLUMN_SIZE: (u16, u16) = (200, 150);

/// Cell values by row id, then by column id.
pub type CustomData = BTreeMap<String, BTreeMap<String, Value>>;

/// Kind of input a user column accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum CustomColumnType {
    Text,
    Number,
    Date,
}

impl CustomColumnType {
    pub fn column_type(self) -> ColumnType {
        match self {
            CustomColumnType::Text => ColumnType::String,
            CustomColumnType::Number => ColumnType::Number,
            CustomColumnType::Date => ColumnType::Date,
        }
    }

    /// Converts raw input to the column's type. Text that does not parse is
    /// kept as text rather than dropped.
    pub fn coerce(self, value: Value) -> Value {
        let Value::String(text) = value else {
            return value;
        };
        let trimmed = text.trim();
        if trimmed.is_empty() {
            return Value::Null;
        }
        match self {
            CustomColumnType::Text => Value::String(text),
            CustomColumnType::Number => match trimmed.parse::<f64>() {
                Ok(n) if n.is_finite() => Value::Float(n),
                _ => Value::String(text),
            },
            CustomColumnType::Date => parse_time(trimmed).map_or(Value::String(text), Value::DateTime),
        }
    }
}

/// A column added by the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CustomColumn {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: CustomColumnType,
}

impl CustomColumn {
    pub fn new(id: impl Into<String>, name: impl Into<String>, column_type: CustomColumnType) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            column_type,
        }
    }

    fn metadata(&self) -> FieldMetadata {
        FieldMetadata::new(self.id.clone(), self.name.clone(), self.column_type.column_type())
            .with_size(CUSTOM_COLUMN_SIZE.0, CUSTOM_COLUMN_SIZE.1)
    }
}

/// Reads user column values for a row from a snapshot of the store.
#[derive(Debug, Clone)]
pub struct CustomDataAccessor {
    data: Arc<CustomData>,
}

impl DataAccessor<UserRow> for CustomDataAccessor {
    fn value(&self, row: &UserRow, key: &str) -> Value {
        self.data
            .get(row.row_id())
            .and_then(|cells| cells.get(key))
            .cloned()
            .unwrap_or_default()
    }

    fn is_type(&self, row: &UserRow, tag: ShapeTag) -> bool {
        row.shape() == tag
    }
}

/// The user's columns and the values entered into them.
///
/// Descriptors capture a snapshot of the values; rebuild them with
/// [`descriptors`](Self::descriptors) after every edit.
///
/// # Example
///
/// ```
/// use smart_tables::column::CustomColumn;
/// use smart_tables::column::CustomColumnType;
/// use smart_tables::column::CustomColumns;
/// use smart_tables::model::Value;
///
/// let mut custom = CustomColumns::default();
/// custom.add(CustomColumn::new("tier", "Tier", CustomColumnType::Text)).unwrap();
/// custom.set_cell("0xabc", "tier", Value::from("gold")).unwrap();
/// assert_eq!(custom.cell("0xabc", "tier"), Value::from("gold"));
///
/// custom.remove("tier");
/// assert!(custom.cell("0xabc", "tier").is_null());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CustomColumns {
    columns: Vec<CustomColumn>,
    data: Arc<CustomData>,
}

impl CustomColumns {
    pub fn columns(&self) -> &[CustomColumn] {
        &self.columns
    }

    pub fn data(&self) -> &CustomData {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&CustomColumn> {
        self.columns.iter().find(|c| c.id == id)
    }

    /// Appends a column. Ids must be unique and must not shadow a built-in
    /// column key.
    pub fn add(&mut self, mut column: CustomColumn) -> Result<(), CustomColumnError> {
        column.id = column.id.trim().to_string();
        column.name = column.name.trim().to_string();
        if column.id.is_empty() {
            return Err(CustomColumnError::EmptyId);
        }
        if column.name.is_empty() {
            return Err(CustomColumnError::EmptyName);
        }
        if ColumnKind::ALL.iter().any(|kind| kind.key() == column.id) {
            return Err(CustomColumnError::ReservedKey(column.id));
        }
        if self.get(&column.id).is_some() {
            return Err(CustomColumnError::DuplicateColumn(column.id));
        }
        debug!("Adding user column '{}' ({:?})", column.id, column.column_type);
        self.columns.push(column);
        Ok(())
    }

    /// Removes a column along with every value entered into it.
    pub fn remove(&mut self, id: &str) -> Option<CustomColumn> {
        let index = self.columns.iter().position(|c| c.id == id)?;
        let data = Arc::make_mut(&mut self.data);
        for cells in data.values_mut() {
            cells.remove(id);
        }
        data.retain(|_, cells| !cells.is_empty());
        Some(self.columns.remove(index))
    }

    pub fn rename(&mut self, id: &str, name: &str) -> Result<(), CustomColumnError> {
        let name = name.trim();
        if name.is_empty() {
            return Err(CustomColumnError::EmptyName);
        }
        let column = self
            .columns
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| CustomColumnError::UnknownColumn(id.to_string()))?;
        column.name = name.to_string();
        Ok(())
    }

    /// Stores a value, coerced to the column's type. Null clears the cell.
    pub fn set_cell(&mut self, row_id: &str, column_id: &str, value: Value) -> Result<(), CustomColumnError> {
        let column = self
            .get(column_id)
            .ok_or_else(|| CustomColumnError::UnknownColumn(column_id.to_string()))?;
        let value = column.column_type.coerce(value);
        let data = Arc::make_mut(&mut self.data);
        if value.is_null() {
            if let Some(cells) = data.get_mut(row_id) {
                cells.remove(column_id);
                if cells.is_empty() {
                    data.remove(row_id);
                }
            }
        } else {
            data.entry(row_id.to_string())
                .or_default()
                .insert(column_id.to_string(), value);
        }
        Ok(())
    }

    pub fn cell(&self, row_id: &str, column_id: &str) -> Value {
        self.data
            .get(row_id)
            .and_then(|cells| cells.get(column_id))
            .cloned()
            .unwrap_or_default()
    }

    /// One descriptor per column, in insertion order.
    pub fn descriptors(&self) -> Vec<ColumnDescriptor<UserRow>> {
        let accessor = Arc::new(CustomDataAccessor {
            data: Arc::clone(&self.data),
        });
        self.columns
            .iter()
            .map(|column| ColumnDescriptor::from_metadata(&column.metadata(), Arc::clone(&accessor)))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::cell::CellContent;
    use crate::cell::RenderContext;

    fn store() -> CustomColumns {
        let mut custom = CustomColumns::default();
        custom.add(CustomColumn::new("tier", "Tier", CustomColumnType::Text)).unwrap();
        custom.add(CustomColumn::new("score", "Score", CustomColumnType::Number)).unwrap();
        custom
    }

    // =========================================================================
    // Column edits
    // =========================================================================

    #[test]
    fn test_add_rejects_bad_ids() {
        let mut custom = store();
        assert_eq!(
            custom.add(CustomColumn::new("tier", "Again", CustomColumnType::Text)),
            Err(CustomColumnError::DuplicateColumn("tier".to_string()))
        );
        assert_eq!(
            custom.add(CustomColumn::new("email", "Mail", CustomColumnType::Text)),
            Err(CustomColumnError::ReservedKey("email".to_string()))
        );
        assert_eq!(
            custom.add(CustomColumn::new("  ", "Blank", CustomColumnType::Text)),
            Err(CustomColumnError::EmptyId)
        );
        assert_eq!(custom.columns().len(), 2);
    }

    #[test]
    fn test_rename_trims_and_rejects_blank() {
        let mut custom = store();
        custom.rename("tier", "  Level ").unwrap();
        assert_eq!(custom.get("tier").map(|c| c.name.as_str()), Some("Level"));
        assert_eq!(custom.rename("tier", " "), Err(CustomColumnError::EmptyName));
        assert_eq!(
            custom.rename("nope", "X"),
            Err(CustomColumnError::UnknownColumn("nope".to_string()))
        );
    }

    #[test]
    fn test_remove_strips_values() {
        let mut custom = store();
        custom.set_cell("0x1", "tier", Value::from("gold")).unwrap();
        custom.set_cell("0x1", "score", Value::from(3i64)).unwrap();
        custom.set_cell("0x2", "tier", Value::from("silver")).unwrap();

        let removed = custom.remove("tier").unwrap();
        assert_eq!(removed.id, "tier");
        assert!(custom.cell("0x1", "tier").is_null());
        assert_eq!(custom.cell("0x1", "score"), Value::from(3i64));
        assert!(!custom.data().contains_key("0x2"));
        assert!(custom.remove("tier").is_none());
    }

    // =========================================================================
    // Cells
    // =========================================================================

    #[test]
    fn test_set_cell_coerces_input() {
        let mut custom = store();
        custom.add(CustomColumn::new("met", "Met", CustomColumnType::Date)).unwrap();

        custom.set_cell("0x1", "score", Value::from(" 12.5 ")).unwrap();
        assert_eq!(custom.cell("0x1", "score"), Value::Float(12.5));
        custom.set_cell("0x1", "met", Value::from("2024-03-01")).unwrap();
        assert!(custom.cell("0x1", "met").as_datetime().is_some());
        custom.set_cell("0x1", "score", Value::from("lots")).unwrap();
        assert_eq!(custom.cell("0x1", "score"), Value::from("lots"));

        custom.set_cell("0x1", "score", Value::from("")).unwrap();
        assert!(custom.cell("0x1", "score").is_null());
        assert_eq!(
            custom.set_cell("0x1", "missing", Value::from(1i64)),
            Err(CustomColumnError::UnknownColumn("missing".to_string()))
        );
    }

    #[test]
    fn test_descriptors_read_by_row_id() {
        let mut custom = store();
        custom.set_cell("0xabc", "score", Value::from(7i64)).unwrap();
        let columns = custom.descriptors();
        assert_eq!(columns.iter().map(|c| c.key.as_str()).collect::<Vec<_>>(), ["tier", "score"]);
        assert_eq!((columns[1].size, columns[1].min_size), CUSTOM_COLUMN_SIZE);
        assert_eq!(columns[1].column_type, ColumnType::Number);

        let row = UserRow::from_json(0, json!({"walletAddress": "0xabc"})).unwrap();
        let other = UserRow::from_json(1, json!({"walletAddress": "0xdef"})).unwrap();
        assert_eq!(columns[1].value(&row), Value::from(7i64));
        assert!(columns[1].value(&other).is_null());
        assert_eq!(columns[1].render(&row, &RenderContext::new(chrono::Utc::now())), CellContent::Text("7".to_string()));
    }

    #[test]
    fn test_descriptors_are_snapshots() {
        let mut custom = store();
        let before = custom.descriptors();
        custom.set_cell("0xabc", "tier", Value::from("gold")).unwrap();
        let row = UserRow::from_json(0, json!({"walletAddress": "0xabc"})).unwrap();
        assert!(before[0].value(&row).is_null());
        assert_eq!(custom.descriptors()[0].value(&row), Value::from("gold"));
    }
}
