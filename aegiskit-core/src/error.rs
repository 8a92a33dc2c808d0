use thiserror::Error;

use crate::{credential_store::StorageError, sdk::SdkError};

/// Error outputs from `AegisKit`
#[derive(Debug, Error, uniffi::Error)]
#[uniffi(flat_error)]
pub enum AegisKitError {
    /// The presented input is not valid for the requested operation
    #[error("invalid_input_{attribute}: {reason}")]
    InvalidInput {
        /// The attribute that is invalid
        attribute: String,
        /// The reason the input is invalid
        reason: String,
    },
    /// The configuration could not be loaded
    #[error("invalid_config_{key}: {reason}")]
    InvalidConfig {
        /// The configuration key that failed to load
        key: String,
        /// The reason the value was rejected
        reason: String,
    },
    /// The operation requires a connected wallet
    #[error("not_connected")]
    NotConnected,
    /// The wallet SDK reported a failure. The SDK message is kept verbatim.
    #[error(transparent)]
    Sdk(#[from] SdkError),
    /// The credential store reported a failure
    #[error(transparent)]
    Storage(#[from] StorageError),
    /// Unexpected error serializing information
    #[error("serialization_error: {0}")]
    SerializationError(String),
}

impl From<serde_json::Error> for AegisKitError {
    fn from(error: serde_json::Error) -> Self {
        Self::SerializationError(error.to_string())
    }
}

impl AegisKitError {
    pub(crate) fn invalid_input(attribute: &str, reason: impl Into<String>) -> Self {
        Self::InvalidInput {
            attribute: attribute.to_string(),
            reason: reason.into(),
        }
    }
}
