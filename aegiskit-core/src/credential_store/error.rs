//! Error types for credential store implementations.

use thiserror::Error;

/// Result type for credential store operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Errors raised by credential store implementations.
#[derive(Debug, Error, uniffi::Error)]
pub enum StorageError {
    /// The secure storage backend refused or failed the read.
    #[error("credential read error: {0}")]
    Read(String),

    /// The secure storage backend refused or failed the write.
    #[error("credential write error: {0}")]
    Write(String),

    /// The secure storage backend failed to delete the entry.
    #[error("credential delete error: {0}")]
    Delete(String),

    /// Stored data could not be decoded.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// Unexpected `UniFFI` callback error.
    #[error("unexpected uniffi callback error: {0}")]
    UnexpectedUniFFICallbackError(String),
}

impl From<uniffi::UnexpectedUniFFICallbackError> for StorageError {
    fn from(error: uniffi::UnexpectedUniFFICallbackError) -> Self {
        Self::UnexpectedUniFFICallbackError(error.reason)
    }
}
