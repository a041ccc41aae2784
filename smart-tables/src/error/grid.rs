//! Umbrella grid error

use super::ConfigurationError;
use super::CustomColumnError;
use super::FilterError;
use super::RowParseError;

/// Any error surfaced by the grid's public operations.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),

    #[error(transparent)]
    CustomColumn(#[from] CustomColumnError),

    #[error(transparent)]
    Filter(#[from] FilterError),

    #[error(transparent)]
    Parse(#[from] RowParseError),

    /// An event referred to a column the grid does not have.
    #[error("Unknown column '{0}'")]
    UnknownColumn(String),

    /// An event referred to a row the grid does not have.
    #[error("Unknown row '{0}'")]
    UnknownRow(String),
}
