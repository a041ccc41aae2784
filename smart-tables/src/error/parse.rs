//! Row conversion errors

/// Failure to convert raw JSON into a typed row.
#[derive(Debug, thiserror::Error)]
pub enum RowParseError {
    /// The value is not a JSON object.
    #[error("Row {index} is not an object")]
    NotAnObject { index: usize },

    /// The row has neither an id nor a wallet address.
    #[error("Row {index} has no id or wallet address")]
    MissingIdentity { index: usize },

    /// The row's fields do not match the shape it was classified as.
    #[error("Row {index} could not be decoded: {source}")]
    Decode {
        index: usize,
        #[source]
        source: serde_json::Error,
    },

    /// The top-level document is not an array of rows.
    #[error("Expected an array of rows")]
    NotAnArray,
}
