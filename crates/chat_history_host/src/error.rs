//! Storage error taxonomy for chat-history operations.

use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
/// Failure of a single chat-store operation.
///
/// An absent storage environment is not an error: it is represented by the absence of a store
/// handle. Plain lookups that miss return `Ok(None)`.
pub enum StorageError {
    /// The storage engine rejected or aborted the request.
    #[error("storage request failed: {0}")]
    Request(String),
    /// A record could not be converted to or from its stored representation.
    #[error("record serialization failed: {0}")]
    Serialization(String),
    /// The browser storage bridge was invoked on a target without IndexedDB.
    #[error("browser storage is only available when compiled for wasm32")]
    Unsupported,
    /// A helper required an existing record that is not present.
    #[error("chat not found: {0}")]
    NotFound(String),
    /// A helper argument was rejected before reaching storage.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

impl From<serde_json::Error> for StorageError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
