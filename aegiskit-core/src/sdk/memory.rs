//! In-process implementation of [`WalletSdk`].
//!
//! **NOT a wallet.** Keys are random bytes, addresses are hashes of the key, and balances are
//! whatever the host seeds. It exists so the session layer can be exercised without a chain,
//! and so failure modes of the real SDK (including the "registered but not deployed" error)
//! can be reproduced on demand.
//!
//! The user table can be exported with [`MemoryWalletSdk::snapshot`] and loaded back with
//! [`MemoryWalletSdk::restore`], so a host that persists the snapshot keeps its accounts
//! across processes.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;
use rand::{rngs::OsRng, RngCore};
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use super::{AuthData, AuthResult, Nft, Organization, SdkError, WalletInfo, WalletSdk};
use crate::{
    defaults::ETH,
    primitives::{ContractAddress, ParseFromForeignBinding},
};

#[derive(Debug, Clone)]
struct User {
    password_sha256: String,
    user_id: String,
    wallet_address: Option<String>,
}

/// A registered user, as exported by [`MemoryWalletSdk::snapshot`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    /// Login email.
    pub email: String,
    /// Backend user id.
    pub user_id: String,
    /// Hex SHA-256 of the password. The password itself is never kept.
    pub password_sha256: String,
    /// Address of the wallet deployed for the user, if any.
    pub wallet_address: Option<String>,
}

/// The accounts of a [`MemoryWalletSdk`] and who is signed in.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MemorySdkSnapshot {
    /// Registered users, ordered by email.
    #[serde(default)]
    pub users: Vec<RegisteredUser>,
    /// Email of the signed-in user.
    #[serde(default)]
    pub signed_in: Option<String>,
}

#[derive(Debug, Default)]
struct Failures {
    deployment: Option<String>,
    auth: Option<String>,
    after_registration: Option<String>,
    queries: Option<String>,
}

#[derive(Debug, Default)]
struct State {
    address: Option<String>,
    signed_in: Option<String>,
    users: HashMap<String, User>,
    balances: HashMap<(String, String), String>,
    nfts: HashMap<String, Vec<Nft>>,
    failures: Failures,
}

/// In-memory wallet SDK.
#[derive(Debug)]
pub struct MemoryWalletSdk {
    state: Mutex<State>,
    deploy_wallets_on_auth: bool,
    organization: Organization,
}

impl Default for MemoryWalletSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryWalletSdk {
    /// Creates an SDK whose users get a wallet as soon as they authenticate.
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: Mutex::new(State::default()),
            deploy_wallets_on_auth: true,
            organization: Organization {
                org_id: 1,
                org_name: "AegisKit".to_string(),
            },
        }
    }

    /// Creates an SDK that never deploys wallets during auth, so every user stays pending.
    #[must_use]
    pub fn without_auth_deployment() -> Self {
        Self {
            deploy_wallets_on_auth: false,
            ..Self::new()
        }
    }

    /// Derives the account address controlled by `private_key`.
    ///
    /// The address is deterministic so a key persisted by one process reconnects to the same
    /// account in the next.
    #[must_use]
    pub fn derive_address(private_key: &str) -> String {
        let mut digest: [u8; 32] = Sha256::digest(private_key.trim().to_ascii_lowercase()).into();
        digest[0] &= 0x07;
        format!("0x{}", hex::encode(digest))
    }

    /// Makes the next `deploy_account` fail with `message`.
    pub fn fail_next_deployment(&self, message: &str) {
        self.lock().failures.deployment = Some(message.to_string());
    }

    /// Makes the next `sign_up` / `sign_in` fail with `message` without touching any user.
    pub fn fail_next_auth(&self, message: &str) {
        self.lock().failures.auth = Some(message.to_string());
    }

    /// Makes the next `sign_up` register the user but report `message` as an error, the way
    /// the Aegis backend does when the wallet deployment behind a registration fails.
    pub fn fail_next_sign_up_after_registration(&self, message: &str) {
        self.lock().failures.after_registration = Some(message.to_string());
    }

    /// Makes the next balance or NFT query fail with `message`.
    pub fn fail_next_query(&self, message: &str) {
        self.lock().failures.queries = Some(message.to_string());
    }

    /// Sets the balance of `token_address` held by `address`.
    pub fn set_balance(&self, address: &str, token_address: &str, balance: &str) {
        self.lock().balances.insert(
            (address.to_ascii_lowercase(), token_address.to_ascii_lowercase()),
            balance.to_string(),
        );
    }

    /// Adds an NFT to `address`.
    pub fn add_nft(&self, address: &str, nft: Nft) {
        self.lock()
            .nfts
            .entry(address.to_ascii_lowercase())
            .or_default()
            .push(nft);
    }

    /// Exports the registered users and the signed-in email.
    #[must_use]
    pub fn snapshot(&self) -> MemorySdkSnapshot {
        let state = self.lock();
        let mut users: Vec<RegisteredUser> = state
            .users
            .iter()
            .map(|(email, user)| RegisteredUser {
                email: email.clone(),
                user_id: user.user_id.clone(),
                password_sha256: user.password_sha256.clone(),
                wallet_address: user.wallet_address.clone(),
            })
            .collect();
        users.sort_by(|a, b| a.email.cmp(&b.email));
        MemorySdkSnapshot {
            users,
            signed_in: state.signed_in.clone(),
        }
    }

    /// Replaces the registered users and the signed-in email with `snapshot`.
    ///
    /// The connected account is left alone; reconnecting is up to the caller.
    pub fn restore(&self, snapshot: MemorySdkSnapshot) {
        let mut state = self.lock();
        state.users = snapshot
            .users
            .into_iter()
            .map(|user| {
                (
                    user.email,
                    User {
                        password_sha256: user.password_sha256,
                        user_id: user.user_id,
                        wallet_address: user.wallet_address,
                    },
                )
            })
            .collect();
        let signed_in = snapshot
            .signed_in
            .filter(|email| state.users.contains_key(email));
        state.signed_in = signed_in;
    }

    /// Email of the user currently signed in, if any.
    #[must_use]
    pub fn signed_in_email(&self) -> Option<String> {
        self.lock().signed_in.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn password_sha256(password: &SecretString) -> String {
        hex::encode(Sha256::digest(password.expose_secret().as_bytes()))
    }

    fn generate_private_key() -> String {
        let mut bytes = [0u8; 32];
        OsRng.fill_bytes(&mut bytes);
        // Keep the key below the Stark field modulus.
        bytes[0] &= 0x07;
        format!("0x{}", hex::encode(bytes))
    }

    fn auth_result(&self, email: &str, user: &User) -> AuthResult {
        AuthResult {
            wallet: user.wallet_address.as_ref().map(|address| WalletInfo {
                address: Some(address.clone()),
                network: Some("sepolia".to_string()),
            }),
            email: email.to_string(),
            user_id: user.user_id.clone(),
            organization: self.organization.clone(),
            auth_data: AuthData {
                access_token: format!("access-{}", user.user_id),
                refresh_token: format!("refresh-{}", user.user_id),
                expires_in: 3600,
            },
        }
    }

    fn complete_auth(&self, state: &mut State, email: &str) -> Result<AuthResult, SdkError> {
        let deploy = self.deploy_wallets_on_auth;
        let user = state
            .users
            .get_mut(email)
            .ok_or_else(|| SdkError::Auth("Invalid credentials".to_string()))?;

        if deploy && user.wallet_address.is_none() {
            user.wallet_address = Some(Self::derive_address(&Self::generate_private_key()));
        }
        let user = user.clone();

        state.signed_in = Some(email.to_string());
        if let Some(address) = &user.wallet_address {
            state.address = Some(address.clone());
        }
        Ok(self.auth_result(email, &user))
    }

    fn connected_address(state: &mut State) -> Result<String, SdkError> {
        if let Some(message) = state.failures.queries.take() {
            return Err(SdkError::Query(message));
        }
        state
            .address
            .clone()
            .ok_or_else(|| SdkError::Query("No account connected".to_string()))
    }

    fn balance_of(state: &State, address: &str, token_address: &str) -> String {
        state
            .balances
            .get(&(address.to_ascii_lowercase(), token_address.to_ascii_lowercase()))
            .cloned()
            .unwrap_or_else(|| "0".to_string())
    }
}

#[async_trait]
impl WalletSdk for MemoryWalletSdk {
    async fn deploy_account(&self) -> Result<SecretString, SdkError> {
        let mut state = self.lock();
        if let Some(message) = state.failures.deployment.take() {
            return Err(SdkError::Deployment(message));
        }

        let private_key = Self::generate_private_key();
        state.address = Some(Self::derive_address(&private_key));
        Ok(SecretString::from(private_key))
    }

    async fn connect_account(&self, private_key: &SecretString) -> Result<(), SdkError> {
        let key = ContractAddress::parse_from_ffi(private_key.expose_secret(), "private_key")
            .map_err(|_| SdkError::Connection("Invalid private key".to_string()))?;
        self.lock().address = Some(Self::derive_address(key.as_str()));
        Ok(())
    }

    fn address(&self) -> Option<String> {
        self.lock().address.clone()
    }

    async fn get_eth_balance(&self) -> Result<String, SdkError> {
        let mut state = self.lock();
        let address = Self::connected_address(&mut state)?;
        Ok(Self::balance_of(&state, &address, ETH.address))
    }

    async fn get_token_balance(
        &self,
        token_address: &str,
        _decimals: u8,
    ) -> Result<String, SdkError> {
        let mut state = self.lock();
        let address = Self::connected_address(&mut state)?;
        Ok(Self::balance_of(&state, &address, token_address))
    }

    async fn get_nfts(&self, address: &str) -> Result<Vec<Nft>, SdkError> {
        let mut state = self.lock();
        if let Some(message) = state.failures.queries.take() {
            return Err(SdkError::Query(message));
        }
        Ok(state
            .nfts
            .get(&address.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn sign_up(&self, email: &str, password: &SecretString) -> Result<AuthResult, SdkError> {
        let mut state = self.lock();
        if let Some(message) = state.failures.auth.take() {
            return Err(SdkError::Auth(message));
        }
        if state.users.contains_key(email) {
            return Err(SdkError::Auth("User already exists".to_string()));
        }

        let user_id = format!("user-{}", state.users.len() + 1);
        state.users.insert(
            email.to_string(),
            User {
                password_sha256: Self::password_sha256(password),
                user_id,
                wallet_address: None,
            },
        );

        if let Some(message) = state.failures.after_registration.take() {
            return Err(SdkError::Auth(message));
        }
        self.complete_auth(&mut state, email)
    }

    async fn sign_in(&self, email: &str, password: &SecretString) -> Result<AuthResult, SdkError> {
        let mut state = self.lock();
        if let Some(message) = state.failures.auth.take() {
            return Err(SdkError::Auth(message));
        }
        let digest = Self::password_sha256(password);
        let accepted = state
            .users
            .get(email)
            .is_some_and(|user| user.password_sha256 == digest);
        if !accepted {
            return Err(SdkError::Auth("Invalid credentials".to_string()));
        }
        self.complete_auth(&mut state, email)
    }

    async fn sign_out(&self) -> Result<(), SdkError> {
        let mut state = self.lock();
        if state.signed_in.take().is_some() {
            state.address = None;
        }
        Ok(())
    }

    fn disconnect(&self) {
        self.lock().address = None;
    }
}
