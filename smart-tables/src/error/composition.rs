//! Column composition diagnostics

use crate::shape::ShapeTag;

/// A diagnostic raised while composing columns for a batch of rows.
///
/// Composition never fails: offending rows keep their identity cell and
/// render placeholders elsewhere. These values are logged and exposed on the
/// [`ColumnSet`](crate::column::ColumnSet) so callers can surface them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CompositionError {
    /// A row did not match any known shape.
    #[error("Row '{row_id}' has an unrecognized shape")]
    UnknownShape { row_id: String },

    /// A row classified as one shape carries data that belongs to another.
    #[error("Row '{row_id}' classified as {tag:?} but {detail}")]
    ShapeMismatch {
        row_id: String,
        tag: ShapeTag,
        detail: String,
    },
}

impl CompositionError {
    /// Creates an unknown-shape diagnostic.
    pub fn unknown_shape(row_id: impl Into<String>) -> Self {
        Self::UnknownShape { row_id: row_id.into() }
    }

    /// Returns the id of the row this diagnostic refers to.
    pub fn row_id(&self) -> &str {
        match self {
            Self::UnknownShape { row_id } | Self::ShapeMismatch { row_id, .. } => row_id,
        }
    }
}
