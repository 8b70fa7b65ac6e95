use thiserror::Error;

/// Errors raised by the tables in this crate.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TableError {
    /// The requested key (or key pair component) is not present.
    #[error("key not found: {0:?}")]
    KeyNotFound(String),

    /// An insert probed the entire table and the capacity sequence is
    /// already exhausted.
    #[error("table is full")]
    TableFull,
}
