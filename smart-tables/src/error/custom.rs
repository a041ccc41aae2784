//! User-defined column errors

/// A rejected edit to the user-defined columns.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CustomColumnError {
    #[error("Column id must not be empty")]
    EmptyId,

    #[error("Column name must not be empty")]
    EmptyName,

    /// The id is already taken by another user column.
    #[error("Column '{0}' already exists")]
    DuplicateColumn(String),

    /// The id collides with a built-in column key.
    #[error("Column id '{0}' is reserved")]
    ReservedKey(String),

    #[error("Unknown user column '{0}'")]
    UnknownColumn(String),
}
