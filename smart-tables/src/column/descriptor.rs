//! Typed column descriptors

use std::sync::Arc;

use serde::Deserialize;
use serde::Serialize;

use crate::cell::CellContent;
use crate::cell::RenderContext;
use crate::grid::Aggregation;
use crate::model::Value;

/// How a column's values are compared, filtered and aggregated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ColumnType {
    String,
    Number,
    Date,
    Boolean,
    Array,
    Object,
    /// Rendered by a custom component; never filtered.
    Component,
}

impl ColumnType {
    pub fn as_str(&self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Number => "number",
            ColumnType::Date => "date",
            ColumnType::Boolean => "boolean",
            ColumnType::Array => "array",
            ColumnType::Object => "object",
            ColumnType::Component => "component",
        }
    }

    /// Default `(size, min_size)` in pixels for columns built from metadata.
    pub fn default_size(&self) -> (u16, u16) {
        match self {
            ColumnType::String => (150, 100),
            ColumnType::Number => (120, 80),
            ColumnType::Date => (150, 120),
            ColumnType::Boolean => (100, 80),
            ColumnType::Array | ColumnType::Object | ColumnType::Component => (200, 150),
        }
    }
}

impl std::fmt::Display for ColumnType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Pure projection from a row to the value used for sorting, filtering and
/// footers.
pub type AccessorFn<R> = Arc<dyn Fn(&R) -> Value + Send + Sync>;

/// Pure projection from a row to its cell fragment.
pub type CellFn<R> = Arc<dyn Fn(&R, &RenderContext<'_>) -> CellContent + Send + Sync>;

/// Everything the grid needs to know about one column.
///
/// Built either from the user column registry
/// ([`ColumnKind::descriptor`](super::ColumnKind::descriptor)) or from
/// [`FieldMetadata`](super::FieldMetadata) for generic rows.
pub struct ColumnDescriptor<R> {
    pub key: String,
    pub header: String,
    pub column_type: ColumnType,
    /// Default width in pixels.
    pub size: u16,
    pub min_size: u16,
    pub sortable: bool,
    pub resizable: bool,
    /// Frozen columns stay pinned at the leading edge during horizontal scroll.
    pub frozen: bool,
    pub aggregation: Option<Aggregation>,
    accessor: AccessorFn<R>,
    cell: CellFn<R>,
}

impl<R> ColumnDescriptor<R> {
    /// Creates a sortable, resizable column sized for its type.
    pub fn new(
        key: impl Into<String>,
        header: impl Into<String>,
        column_type: ColumnType,
        accessor: impl Fn(&R) -> Value + Send + Sync + 'static,
        cell: impl Fn(&R, &RenderContext<'_>) -> CellContent + Send + Sync + 'static,
    ) -> Self {
        let (size, min_size) = column_type.default_size();
        Self {
            key: key.into(),
            header: header.into(),
            column_type,
            size,
            min_size,
            sortable: !matches!(column_type, ColumnType::Component | ColumnType::Object),
            resizable: true,
            frozen: false,
            aggregation: None,
            accessor: Arc::new(accessor),
            cell: Arc::new(cell),
        }
    }

    /// Creates a column whose cell is the accessor value as plain text.
    pub fn text(
        key: impl Into<String>,
        header: impl Into<String>,
        column_type: ColumnType,
        accessor: impl Fn(&R) -> Value + Send + Sync + 'static,
    ) -> Self
    where
        R: 'static,
    {
        let accessor: AccessorFn<R> = Arc::new(accessor);
        let render = Arc::clone(&accessor);
        Self::new(
            key,
            header,
            column_type,
            move |row: &R| accessor(row),
            move |row: &R, _: &RenderContext<'_>| CellContent::from_value(&render(row), column_type),
        )
    }

    pub fn with_size(mut self, size: u16, min_size: u16) -> Self {
        self.size = size;
        self.min_size = min_size;
        self
    }

    pub fn frozen(mut self) -> Self {
        self.frozen = true;
        self
    }

    pub fn with_sortable(mut self, sortable: bool) -> Self {
        self.sortable = sortable;
        self
    }

    pub fn with_resizable(mut self, resizable: bool) -> Self {
        self.resizable = resizable;
        self
    }

    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Evaluates the accessor.
    pub fn value(&self, row: &R) -> Value {
        (self.accessor)(row)
    }

    /// Renders the cell fragment.
    pub fn render(&self, row: &R, ctx: &RenderContext<'_>) -> CellContent {
        (self.cell)(row, ctx)
    }
}

impl<R> Clone for ColumnDescriptor<R> {
    fn clone(&self) -> Self {
        Self {
            key: self.key.clone(),
            header: self.header.clone(),
            column_type: self.column_type,
            size: self.size,
            min_size: self.min_size,
            sortable: self.sortable,
            resizable: self.resizable,
            frozen: self.frozen,
            aggregation: self.aggregation,
            accessor: Arc::clone(&self.accessor),
            cell: Arc::clone(&self.cell),
        }
    }
}

impl<R> std::fmt::Debug for ColumnDescriptor<R> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColumnDescriptor")
            .field("key", &self.key)
            .field("header", &self.header)
            .field("column_type", &self.column_type)
            .field("size", &self.size)
            .field("min_size", &self.min_size)
            .field("sortable", &self.sortable)
            .field("frozen", &self.frozen)
            .finish_non_exhaustive()
    }
}
