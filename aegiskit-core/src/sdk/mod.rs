//! The wallet SDK collaborator.
//!
//! Deployment, key handling, chain queries and email/password auth are all performed by the
//! Aegis SDK. [`WalletSdk`] captures the slice of it the session layer calls. Hosts adapt
//! their SDK binding to this trait; [`MemoryWalletSdk`] is an in-process stand-in for tests
//! and offline tooling.

use async_trait::async_trait;
use secrecy::SecretString;
use thiserror::Error;

pub mod memory;
mod types;

pub use memory::{MemorySdkSnapshot, MemoryWalletSdk, RegisteredUser};
pub use types::{AuthData, AuthResult, Nft, Organization, WalletInfo};

/// Failures reported by the wallet SDK.
///
/// Every variant displays the SDK's message verbatim so callers can surface it unchanged.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SdkError {
    /// Account deployment failed (network or contract failure).
    #[error("{0}")]
    Deployment(String),
    /// The private key was rejected when connecting the account.
    #[error("{0}")]
    Connection(String),
    /// A balance or NFT query failed.
    #[error("{0}")]
    Query(String),
    /// Sign-up, sign-in or sign-out failed.
    #[error("{0}")]
    Auth(String),
}

impl SdkError {
    /// The SDK's message.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::Deployment(message)
            | Self::Connection(message)
            | Self::Query(message)
            | Self::Auth(message) => message,
        }
    }
}

/// The operations of the Aegis SDK the client relies on.
///
/// Implementations are externally synchronized singletons: the SDK keeps one in-memory
/// account at a time, replaced by [`connect_account`](Self::connect_account) or
/// [`deploy_account`](Self::deploy_account).
#[async_trait]
pub trait WalletSdk: Send + Sync {
    /// Deploys a new account contract and connects it. Returns the account's private key.
    async fn deploy_account(&self) -> Result<SecretString, SdkError>;

    /// Connects the account controlled by `private_key`.
    async fn connect_account(&self, private_key: &SecretString) -> Result<(), SdkError>;

    /// Address of the connected account, if any.
    fn address(&self) -> Option<String>;

    /// Balance of the native fee token of the connected account, as a decimal string.
    async fn get_eth_balance(&self) -> Result<String, SdkError>;

    /// Balance of `token_address` held by the connected account, as a decimal string.
    async fn get_token_balance(
        &self,
        token_address: &str,
        decimals: u8,
    ) -> Result<String, SdkError>;

    /// NFTs owned by `address`.
    async fn get_nfts(&self, address: &str) -> Result<Vec<Nft>, SdkError>;

    /// Registers a new user. The SDK also attempts to deploy the user's wallet.
    async fn sign_up(&self, email: &str, password: &SecretString) -> Result<AuthResult, SdkError>;

    /// Authenticates an existing user.
    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<AuthResult, SdkError>;

    /// Ends the authenticated user session.
    async fn sign_out(&self) -> Result<(), SdkError>;

    /// Drops the in-memory account. Never fails.
    fn disconnect(&self);
}
