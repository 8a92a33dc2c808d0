//! `aegiskit-core` holds the wallet-session logic of an Aegis wallet client on Starknet.
//!
//! The Aegis SDK owns everything that touches the chain: account deployment, key management,
//! gasless relaying and balance queries. This crate decides what the client currently *has*:
//!
//! - a connected wallet, reconnected from a locally stored private key or returned by auth,
//! - an authenticated user whose wallet is not deployed yet, or
//! - nothing at all.
//!
//! The host platform provides secure storage through [`CredentialStore`] and the SDK through
//! [`WalletSdk`]. [`SessionController`] combines the two.
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use aegiskit_core::{SessionController, WalletSession};
//!
//! let controller = SessionController::new(sdk, Arc::new(keychain));
//! match controller.reconcile_on_startup().await {
//!     WalletSession::Connected { address } => println!("welcome back {address}"),
//!     WalletSession::PendingDeployment { email } => println!("{email} has no wallet yet"),
//!     WalletSession::Disconnected => println!("deploy or sign in"),
//! }
//! ```
#![deny(clippy::all, clippy::pedantic, clippy::nursery)]

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

/// Starknet network the SDK is configured against.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    EnumString,
    Display,
    uniffi::Enum,
)]
pub enum Network {
    /// Starknet Sepolia testnet.
    #[default]
    #[strum(serialize = "SN_SEPOLIA")]
    #[serde(rename = "SN_SEPOLIA")]
    Sepolia,
    /// Starknet mainnet.
    #[strum(serialize = "SN_MAINNET")]
    #[serde(rename = "SN_MAINNET")]
    Mainnet,
}

impl Network {
    /// Whether the network settles real value.
    #[must_use]
    pub const fn is_mainnet(self) -> bool {
        matches!(self, Self::Mainnet)
    }
}

pub mod auth;
pub use auth::*;

pub mod config;
pub use config::AegisConfig;

pub mod credential_store;
pub use credential_store::{CredentialStore, MemoryCredentialStore, StorageError, StorageResult};

pub mod defaults;

mod error;
pub use error::*;

pub mod logger;

mod primitives;
pub use primitives::*;

pub mod sdk;
pub use sdk::{
    AuthResult, MemorySdkSnapshot, MemoryWalletSdk, Nft, RegisteredUser, SdkError, WalletSdk,
};

mod session;
pub use session::*;

/// Result alias used across the crate.
pub type AegisKitResult<T, E = AegisKitError> = std::result::Result<T, E>;

uniffi::setup_scaffolding!("aegiskit_core");
