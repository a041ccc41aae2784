//! Per-cell data errors

/// Failure to produce data for an async-backed cell.
///
/// These never escape the grid: the affected cell degrades to a muted
/// placeholder and the rest of the row renders normally.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RenderableDataError {
    /// The data source has nothing for this key.
    #[error("No data for '{0}'")]
    NotFound(String),

    /// The data source reported a failure.
    #[error("Fetch failed for '{key}': {message}")]
    Fetch { key: String, message: String },

    /// The store was asked to fetch outside a tokio runtime.
    #[error("No async runtime available to fetch '{0}'")]
    NoRuntime(String),
}

impl RenderableDataError {
    /// Creates a fetch failure for the given key.
    pub fn fetch(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Fetch {
            key: key.into(),
            message: message.into(),
        }
    }
}
