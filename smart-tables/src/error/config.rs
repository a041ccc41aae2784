//! Grid configuration errors

/// Invalid grid configuration, reported by `GridBuilder::build` and by
/// runtime column replacement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    /// The grid was given no columns.
    #[error("Grid requires at least one column")]
    NoColumns,

    /// Two columns share the same key.
    #[error("Duplicate column key '{0}'")]
    DuplicateColumn(String),

    /// A frozen column appears after a scrollable one.
    #[error("Frozen column '{0}' must precede all scrollable columns")]
    FrozenNotLeading(String),

    /// A column's minimum width exceeds its default width.
    #[error("Column '{key}' has min_size {min_size} greater than size {size}")]
    InvalidColumnSize { key: String, size: u16, min_size: u16 },

    /// Row selection was enabled without a row id function.
    #[error("Row selection requires a row id function")]
    MissingRowId,

    /// Page size of zero.
    #[error("Page size must be greater than zero")]
    InvalidPageSize,

    /// The initial sort names a column that is missing or not sortable.
    #[error("Cannot sort by column '{0}'")]
    InvalidSortColumn(String),
}
