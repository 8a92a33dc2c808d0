//! Payloads returned by the wallet SDK.

use serde::{Deserialize, Serialize};

/// Result of a successful `signUp` / `signIn`.
///
/// `wallet` is `None` while the user's wallet has not been deployed yet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct AuthResult {
    /// The user's wallet, once deployed.
    #[serde(default)]
    pub wallet: Option<WalletInfo>,
    /// Email the user authenticated with.
    pub email: String,
    /// Aegis user identifier.
    pub user_id: String,
    /// Organization the app belongs to.
    pub organization: Organization,
    /// Session tokens.
    #[serde(rename = "authData")]
    pub auth_data: AuthData,
}

/// Wallet sub-object of an [`AuthResult`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct WalletInfo {
    /// On-chain account address. Some SDK versions send `null` before deployment.
    #[serde(default)]
    pub address: Option<String>,
    /// Network identifier reported by the SDK.
    #[serde(default)]
    pub network: Option<String>,
}

/// Organization an Aegis app is registered under.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct Organization {
    /// Numeric organization id.
    pub org_id: u64,
    /// Organization display name.
    pub org_name: String,
}

/// Session tokens issued on authentication.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct AuthData {
    /// Bearer token for the Aegis API.
    pub access_token: String,
    /// Token used to renew `access_token`.
    pub refresh_token: String,
    /// Lifetime of `access_token` in seconds.
    pub expires_in: u64,
}

impl std::fmt::Debug for AuthData {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthData")
            .field("access_token", &"[REDACTED]")
            .field("refresh_token", &"[REDACTED]")
            .field("expires_in", &self.expires_in)
            .finish()
    }
}

impl AuthResult {
    /// Placeholder profile for a user whose registration succeeded while the wallet
    /// deployment did not.
    #[must_use]
    pub fn pending(email: &str) -> Self {
        Self {
            wallet: None,
            email: email.to_string(),
            user_id: "pending_user_id".to_string(),
            organization: Organization {
                org_id: 0,
                org_name: "Pending".to_string(),
            },
            auth_data: AuthData {
                access_token: "pending_token".to_string(),
                refresh_token: "pending_refresh".to_string(),
                expires_in: 0,
            },
        }
    }

    /// The deployed wallet's address, if the payload carries a non-empty one.
    #[must_use]
    pub fn wallet_address(&self) -> Option<&str> {
        self.wallet
            .as_ref()
            .and_then(|wallet| wallet.address.as_deref())
            .filter(|address| !address.is_empty())
    }
}

/// An NFT held by an account.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, uniffi::Record)]
pub struct Nft {
    /// Collection contract address.
    pub contract_address: String,
    /// Token id, as a decimal string.
    pub token_id: String,
    /// Display name, when the indexer knows one.
    #[serde(default)]
    pub name: Option<String>,
    /// Image URL, when the indexer knows one.
    #[serde(default)]
    pub image_url: Option<String>,
}
