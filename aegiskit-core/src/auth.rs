//! Classification of sign-up / sign-in outcomes.
//!
//! The Aegis SDK performs user registration and wallet deployment in one call and throws when
//! the deployment half fails, even though the user now exists. The only signal is the error
//! text. Every auth path routes through [`classify_auth_outcome`] so sign-up and sign-in apply
//! the same policy, and this module is the only place that inspects SDK error messages.

use crate::{
    sdk::{AuthResult, SdkError},
    WalletSession,
};

/// Substrings of SDK error messages meaning "the user is authenticated, the wallet is not
/// deployed yet".
///
/// Matching free-form SDK text is brittle. Switch to structured error codes once the SDK
/// exposes them.
pub const TRANSIENT_DEPLOYMENT_MARKERS: [&str; 5] = [
    "User registered successfully",
    "Missing wallet data",
    "Invalid response structure",
    "Wallet deployment failed",
    "deploymentFailed",
];

/// How an auth error must be treated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum AuthErrorClassification {
    /// Auth succeeded server-side; only the wallet deployment failed.
    TransientDeploymentFailure,
    /// Any other failure. It must reach the caller unchanged.
    RealFailure,
}

/// Classifies an SDK error message.
#[uniffi::export]
#[must_use]
pub fn classify_auth_error(message: &str) -> AuthErrorClassification {
    if TRANSIENT_DEPLOYMENT_MARKERS
        .iter()
        .any(|marker| message.contains(marker))
    {
        AuthErrorClassification::TransientDeploymentFailure
    } else {
        AuthErrorClassification::RealFailure
    }
}

/// Maps the outcome of a sign-up or sign-in onto a [`WalletSession`].
///
/// - A payload carrying a wallet address yields `Connected`.
/// - A payload without one yields `PendingDeployment`.
/// - An error recognised as a transient deployment failure yields `PendingDeployment`.
///
/// # Errors
/// Any other error is returned as-is.
pub fn classify_auth_outcome(
    outcome: Result<AuthResult, SdkError>,
    email: &str,
) -> Result<WalletSession, SdkError> {
    match outcome {
        Ok(result) => Ok(result.wallet_address().map_or_else(
            || WalletSession::PendingDeployment {
                email: email.to_string(),
            },
            |address| WalletSession::Connected {
                address: address.to_string(),
            },
        )),
        Err(error) => match classify_auth_error(error.message()) {
            AuthErrorClassification::TransientDeploymentFailure => {
                log::info!("auth succeeded with wallet deployment pending: {error}");
                Ok(WalletSession::PendingDeployment {
                    email: email.to_string(),
                })
            }
            AuthErrorClassification::RealFailure => Err(error),
        },
    }
}
