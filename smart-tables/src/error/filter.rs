//! Filter validation errors

use crate::column::ColumnType;
use crate::query::FilterOperator;

/// A filter that cannot be applied to the grid's columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FilterError {
    /// The filter names a field that is not a column.
    #[error("Unknown filter field '{0}'")]
    UnknownField(String),

    /// The operator is not valid for the column's type.
    #[error("Operator '{operator}' is not supported for {column_type} column '{field}'")]
    UnsupportedOperator {
        field: String,
        operator: FilterOperator,
        column_type: ColumnType,
    },

    /// A filter expression could not be parsed.
    #[error("Invalid filter expression '{0}', expected FIELD:OP:VALUE")]
    InvalidExpression(String),

    /// Unrecognized operator name.
    #[error("Unknown filter operator '{0}'")]
    UnknownOperator(String),

    /// Filtering is turned off for this grid.
    #[error("Filtering is disabled")]
    Disabled,
}
