//! Shape-agnostic field access and metadata-driven columns

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use super::ColumnDescriptor;
use super::ColumnType;
use crate::cell::CellContent;
use crate::cell::RenderContext;
use crate::model::Record;
use crate::model::UserRow;
use crate::model::Value;
use crate::shape;
use crate::shape::ShapeTag;

/// Uniform read access to rows whose shape is only known at runtime.
///
/// Accessors must be pure: they read the row and nothing else.
pub trait DataAccessor<R: ?Sized>: Send + Sync {
    /// Reads a property, returning `Value::Null` when absent.
    fn value(&self, row: &R, key: &str) -> Value;

    /// `true` if the property exists and is not null.
    fn has_property(&self, row: &R, key: &str) -> bool {
        !self.value(row, key).is_null()
    }

    /// `true` if the row classifies as `shape`.
    fn is_type(&self, row: &R, shape: ShapeTag) -> bool;
}

/// Accessor over [`Record`] fields.
#[derive(Debug, Clone, Copy, Default)]
pub struct RecordAccessor;

impl DataAccessor<Record> for RecordAccessor {
    fn value(&self, row: &Record, key: &str) -> Value {
        if key == "id" {
            return Value::from(row.id());
        }
        row.get(key).cloned().unwrap_or_default()
    }

    fn is_type(&self, row: &Record, tag: ShapeTag) -> bool {
        shape::classify_record(row) == tag
    }
}

/// Accessor exposing [`UserRow`] fields under their wire names.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserRowAccessor;

impl DataAccessor<UserRow> for UserRowAccessor {
    fn value(&self, row: &UserRow, key: &str) -> Value {
        match key {
            "id" => Value::from(row.row_id()),
            "walletAddress" | "wallet_address" => Value::from(row.wallet_address()),
            "name" => Value::from(row.name()),
            "avatar" => Value::from(row.avatar()),
            "email" => Value::from(row.email()),
            "createdAt" | "created_at" => Value::from(row.created_at()),
            "source" => Value::from(row.source().map(|s| s.label())),
            "extra" => row
                .extra()
                .and_then(|extra| serde_json::to_value(extra).ok())
                .map_or(Value::Null, Value::Json),
            "personaData" => row
                .persona()
                .and_then(|persona| serde_json::to_value(persona).ok())
                .map_or(Value::Null, Value::Json),
            _ => Value::Null,
        }
    }

    fn is_type(&self, row: &UserRow, tag: ShapeTag) -> bool {
        row.shape() == tag
    }
}

/// Declarative description of a column over generic rows.
///
/// Sizes default per type when omitted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldMetadata {
    pub key: String,
    pub label: String,
    #[serde(rename = "type")]
    pub field_type: ColumnType,
    #[serde(default)]
    pub size: Option<u16>,
    #[serde(default)]
    pub min_size: Option<u16>,
    #[serde(default)]
    pub frozen: bool,
    #[serde(default = "default_true")]
    pub sortable: bool,
    #[serde(default = "default_true")]
    pub resizable: bool,
}

fn default_true() -> bool {
    true
}

impl FieldMetadata {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: ColumnType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            field_type,
            size: None,
            min_size: None,
            frozen: false,
            sortable: true,
            resizable: true,
        }
    }

    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn with_size(mut self, size: u16, min_size: u16) -> Self {
        self.size = Some(size);
        self.min_size = Some(min_size);
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }
}

impl<R: 'static> ColumnDescriptor<R> {
    /// Builds a column from metadata, reading values through `accessor`.
    ///
    /// # Example
    ///
    /// ```
    /// use std::sync::Arc;
    ///
    /// use smart_tables::column::ColumnDescriptor;
    /// use smart_tables::column::ColumnType;
    /// use smart_tables::column::FieldMetadata;
    /// use smart_tables::column::RecordAccessor;
    /// use smart_tables::model::Record;
    ///
    /// let meta = FieldMetadata::new("value", "Value", ColumnType::Number);
    /// let column = ColumnDescriptor::<Record>::from_metadata(&meta, Arc::new(RecordAccessor));
    /// assert_eq!((column.size, column.min_size), (120, 80));
    ///
    /// let row = Record::new("1").set("value", 10i64);
    /// assert_eq!(column.value(&row).as_f64(), Some(10.0));
    /// ```
    pub fn from_metadata<A>(meta: &FieldMetadata, accessor: Arc<A>) -> Self
    where
        A: DataAccessor<R> + ?Sized + 'static,
    {
        let (default_size, default_min) = meta.field_type.default_size();
        let size = meta.size.unwrap_or(default_size);
        let min_size = meta.min_size.unwrap_or(default_min).min(size);
        let column_type = meta.field_type;

        let read = Arc::clone(&accessor);
        let read_key = meta.key.clone();
        let cell_key = meta.key.clone();
        let mut column = Self::new(
            meta.key.clone(),
            meta.label.clone(),
            column_type,
            move |row: &R| read.value(row, &read_key),
            move |row: &R, _: &RenderContext<'_>| {
                CellContent::from_value(&accessor.value(row, &cell_key), column_type)
            },
        )
        .with_size(size, min_size)
        .with_sortable(meta.sortable && column_type != ColumnType::Component)
        .with_resizable(meta.resizable);
        column.frozen = meta.frozen;
        column
    }
}
