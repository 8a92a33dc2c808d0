//! Secure key-value storage for the wallet's private key.
//!
//! The host platform owns persistence. On iOS this is the Keychain, on Android the
//! Keystore-backed encrypted preferences. Both are wired in through the [`CredentialStore`]
//! foreign trait. The session layer only ever reads, writes or deletes a single entry,
//! [`WALLET_PRIVATE_KEY`](crate::defaults::WALLET_PRIVATE_KEY).

mod error;
pub mod memory;

pub use error::{StorageError, StorageResult};
pub use memory::MemoryCredentialStore;

/// Persistent, tamper-resistant key-value storage for secrets.
///
/// Values must survive app restarts. Implementations are expected to be backed by the
/// platform's secure storage.
#[uniffi::export(with_foreign)]
pub trait CredentialStore: Send + Sync {
    /// Reads the secret stored under `key`, if present.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying storage cannot be read.
    fn get(&self, key: String) -> StorageResult<Option<String>>;

    /// Stores `secret` under `key`, replacing any previous value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    fn set(&self, key: String, secret: String) -> StorageResult<()>;

    /// Deletes the secret stored under `key`.
    ///
    /// Deleting a key that does not exist must succeed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    fn delete(&self, key: String) -> StorageResult<()>;
}
