//! The wallet session and the controller that owns it.

use std::fmt;
use std::sync::Arc;

use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tokio::sync::{watch, Mutex};

use crate::{
    auth::classify_auth_outcome,
    credential_store::CredentialStore,
    defaults::{KnownToken, WALLET_PRIVATE_KEY},
    primitives::{ContractAddress, ParseFromForeignBinding},
    sdk::{AuthResult, Nft, SdkError, WalletSdk},
    AegisKitError, AegisKitResult,
};

/// What the client currently holds.
///
/// Exactly one variant is active; transitions replace the whole value.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, uniffi::Enum)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum WalletSession {
    /// A deployed wallet is connected.
    Connected {
        /// On-chain account address.
        address: String,
    },
    /// The user is authenticated but has no deployed wallet yet.
    PendingDeployment {
        /// Email the user authenticated with.
        email: String,
    },
    /// No stored credential and no authenticated user.
    #[default]
    Disconnected,
}

impl WalletSession {
    /// The connected address, if any.
    #[must_use]
    pub fn address(&self) -> Option<&str> {
        match self {
            Self::Connected { address } => Some(address),
            Self::PendingDeployment { .. } | Self::Disconnected => None,
        }
    }
}

impl fmt::Display for WalletSession {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected { address } => write!(f, "connected ({address})"),
            Self::PendingDeployment { email } => write!(f, "pending deployment ({email})"),
            Self::Disconnected => f.write_str("disconnected"),
        }
    }
}

/// Which SDK auth operation to run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AuthAction {
    SignUp,
    SignIn,
}

impl AuthAction {
    const fn as_str(self) -> &'static str {
        match self {
            Self::SignUp => "sign up",
            Self::SignIn => "sign in",
        }
    }
}

/// Owns the [`WalletSession`] and drives every transition of it.
///
/// The controller is meant to be shared by handle (`Arc<SessionController>`). UI layers
/// observe the session through [`subscribe`](Self::subscribe). Operations are expected to be
/// issued one at a time; [`reconcile_on_startup`](Self::reconcile_on_startup) must finish before
/// any balance or NFT query, which otherwise fail with [`AegisKitError::NotConnected`].
pub struct SessionController {
    sdk: Arc<dyn WalletSdk>,
    store: Arc<dyn CredentialStore>,
    session: watch::Sender<WalletSession>,
    profile: Mutex<Option<AuthResult>>,
}

impl fmt::Debug for SessionController {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionController")
            .field("session", &*self.session.borrow())
            .finish_non_exhaustive()
    }
}

impl SessionController {
    /// Creates a controller in the `Disconnected` state.
    #[must_use]
    pub fn new(sdk: Arc<dyn WalletSdk>, store: Arc<dyn CredentialStore>) -> Self {
        let (session, _) = watch::channel(WalletSession::Disconnected);
        Self {
            sdk,
            store,
            session,
            profile: Mutex::new(None),
        }
    }

    /// The current session.
    #[must_use]
    pub fn session(&self) -> WalletSession {
        self.session.borrow().clone()
    }

    /// Subscribes to session changes.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<WalletSession> {
        self.session.subscribe()
    }

    /// The profile returned by the last successful sign-up or sign-in.
    ///
    /// After a transient deployment failure this is a placeholder (see [`AuthResult::pending`]).
    pub async fn profile(&self) -> Option<AuthResult> {
        self.profile.lock().await.clone()
    }

    fn replace(&self, next: WalletSession) -> WalletSession {
        log::debug!("wallet session -> {next}");
        self.session.send_replace(next.clone());
        next
    }

    /// Restores the session from the stored private key.
    ///
    /// A missing key, an unreadable store or a key the SDK rejects all end in `Disconnected`.
    /// These are expected on first launch, so they are logged and never surfaced. A rejected
    /// key is left in the store.
    pub async fn reconcile_on_startup(&self) -> WalletSession {
        let next = match self.reconnect().await {
            Ok(Some(address)) => {
                log::info!("reconnected stored wallet {address}");
                WalletSession::Connected { address }
            }
            Ok(None) => {
                log::debug!("no stored wallet credential");
                WalletSession::Disconnected
            }
            Err(error) => {
                log::warn!("could not restore stored wallet: {error}");
                WalletSession::Disconnected
            }
        };
        self.replace(next)
    }

    async fn reconnect(&self) -> AegisKitResult<Option<String>> {
        let Some(secret) = self.store.get(WALLET_PRIVATE_KEY.to_string())? else {
            return Ok(None);
        };
        let private_key = SecretString::from(secret);
        self.sdk.connect_account(&private_key).await?;
        drop(private_key);

        self.sdk
            .address()
            .map(Some)
            .ok_or_else(|| {
                SdkError::Connection("connected account reported no address".to_string()).into()
            })
    }

    /// Deploys a new wallet, persists its private key and connects it.
    ///
    /// The private key is returned so the host can show it to the user once. On failure
    /// nothing is persisted and the session is unchanged.
    ///
    /// If the credential store rejects the key, the account already exists on-chain but its
    /// private key is lost. The SDK is disconnected and the address is logged.
    ///
    /// # Errors
    /// Returns the SDK's deployment error or the credential store's write error.
    pub async fn deploy_wallet(&self) -> AegisKitResult<SecretString> {
        let private_key = self.sdk.deploy_account().await?;
        let address = self.sdk.address().ok_or_else(|| {
            SdkError::Deployment("deployed account reported no address".to_string())
        })?;

        if let Err(error) = self.store.set(
            WALLET_PRIVATE_KEY.to_string(),
            private_key.expose_secret().to_string(),
        ) {
            log::error!("deployed wallet {address} but could not store its key: {error}");
            self.sdk.disconnect();
            return Err(error.into());
        }

        log::info!("deployed wallet {address}");
        self.replace(WalletSession::Connected { address });
        Ok(private_key)
    }

    /// Registers a new user with email and password.
    ///
    /// # Errors
    /// Returns `InvalidInput` for an empty email or password, and the SDK's error for any
    /// failure other than a transient wallet deployment failure.
    pub async fn sign_up(
        &self,
        email: &str,
        password: &SecretString,
    ) -> AegisKitResult<WalletSession> {
        self.authenticate(AuthAction::SignUp, email, password).await
    }

    /// Signs an existing user in.
    ///
    /// # Errors
    /// Same as [`sign_up`](Self::sign_up).
    pub async fn sign_in(
        &self,
        email: &str,
        password: &SecretString,
    ) -> AegisKitResult<WalletSession> {
        self.authenticate(AuthAction::SignIn, email, password).await
    }

    async fn authenticate(
        &self,
        action: AuthAction,
        email: &str,
        password: &SecretString,
    ) -> AegisKitResult<WalletSession> {
        let email = email.trim();
        if email.is_empty() {
            return Err(AegisKitError::invalid_input("email", "Please fill in all fields"));
        }
        if password.expose_secret().is_empty() {
            return Err(AegisKitError::invalid_input("password", "Please fill in all fields"));
        }

        let outcome = match action {
            AuthAction::SignUp => self.sdk.sign_up(email, password).await,
            AuthAction::SignIn => self.sdk.sign_in(email, password).await,
        };
        let returned_profile = outcome.as_ref().ok().cloned();

        let next = classify_auth_outcome(outcome, email).inspect_err(|error| {
            log::error!("{} failed: {error}", action.as_str());
        })?;

        let profile = returned_profile.unwrap_or_else(|| AuthResult::pending(email));
        *self.profile.lock().await = Some(profile);

        log::info!("{} completed: {next}", action.as_str());
        Ok(self.replace(next))
    }

    /// Ends the authenticated user session. The stored private key is kept.
    ///
    /// # Errors
    /// Returns the SDK's error if sign-out fails; the session is then unchanged.
    pub async fn sign_out(&self) -> AegisKitResult<WalletSession> {
        self.sdk.sign_out().await?;
        *self.profile.lock().await = None;
        Ok(self.replace(WalletSession::Disconnected))
    }

    /// Deletes the stored private key and disconnects the SDK account.
    ///
    /// Calling it while already disconnected is a no-op.
    ///
    /// # Errors
    /// Returns the credential store's error if the key cannot be deleted.
    pub async fn logout(&self) -> AegisKitResult<WalletSession> {
        self.store.delete(WALLET_PRIVATE_KEY.to_string())?;
        self.sdk.disconnect();
        *self.profile.lock().await = None;
        Ok(self.replace(WalletSession::Disconnected))
    }

    /// The connected address.
    ///
    /// # Errors
    /// Returns `NotConnected` unless the session is `Connected`.
    pub fn connected_address(&self) -> AegisKitResult<String> {
        self.session
            .borrow()
            .address()
            .map(ToString::to_string)
            .ok_or(AegisKitError::NotConnected)
    }

    /// Native fee token balance of the connected wallet.
    ///
    /// # Errors
    /// Returns `NotConnected` or the SDK's query error.
    pub async fn eth_balance(&self) -> AegisKitResult<String> {
        self.connected_address()?;
        Ok(self.sdk.get_eth_balance().await?)
    }

    /// Balance of a well-known token held by the connected wallet.
    ///
    /// # Errors
    /// Returns `NotConnected` or the SDK's query error.
    pub async fn known_token_balance(&self, token: KnownToken) -> AegisKitResult<String> {
        self.token_balance(token.address, token.decimals).await
    }

    /// Balance of `token_address` held by the connected wallet.
    ///
    /// # Errors
    /// Returns `InvalidInput` for a malformed token address, `NotConnected`, or the SDK's
    /// query error.
    pub async fn token_balance(&self, token_address: &str, decimals: u8) -> AegisKitResult<String> {
        let token = ContractAddress::parse_from_ffi(token_address, "token_address")?;
        self.connected_address()?;
        Ok(self.sdk.get_token_balance(token.as_str(), decimals).await?)
    }

    /// NFTs held by the connected wallet.
    ///
    /// # Errors
    /// Returns `NotConnected` or the SDK's query error.
    pub async fn nfts(&self) -> AegisKitResult<Vec<Nft>> {
        let address = self.connected_address()?;
        Ok(self.sdk.get_nfts(&address).await?)
    }
}
