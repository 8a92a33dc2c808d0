//! Common test utilities shared across integration tests.
#![allow(dead_code, missing_docs, reason = "each test binary uses a subset; shared test helpers")]

use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

use aegiskit_core::{
    sdk::{AuthData, Organization, WalletInfo},
    AegisKitError, AuthResult, CredentialStore, Nft, SdkError, SessionController, StorageError,
    WalletSdk,
};
use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

/// A wallet SDK whose answers are scripted by the test.
#[derive(Default)]
pub struct ScriptedSdk {
    pub accepted_key: Mutex<Option<(String, String)>>,
    pub address: Mutex<Option<String>>,
    pub auth_responses: Mutex<VecDeque<Result<AuthResult, SdkError>>>,
    pub calls: Mutex<Vec<String>>,
}

impl ScriptedSdk {
    pub fn new() -> Self {
        Self::default()
    }

    /// Accepts `key` on `connect_account`, connecting to `address`.
    pub fn accept_key(&self, key: &str, address: &str) {
        *self.accepted_key.lock().unwrap() = Some((key.to_string(), address.to_string()));
    }

    pub fn push_auth(&self, response: Result<AuthResult, SdkError>) {
        self.auth_responses.lock().unwrap().push_back(response);
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn record(&self, call: &str) {
        self.calls.lock().unwrap().push(call.to_string());
    }

    fn next_auth(&self) -> Result<AuthResult, SdkError> {
        self.auth_responses
            .lock()
            .unwrap()
            .pop_front()
            .expect("unexpected auth call")
    }
}

#[async_trait]
impl WalletSdk for ScriptedSdk {
    async fn deploy_account(&self) -> Result<SecretString, SdkError> {
        self.record("deploy_account");
        Err(SdkError::Deployment("not scripted".to_string()))
    }

    async fn connect_account(&self, private_key: &SecretString) -> Result<(), SdkError> {
        self.record("connect_account");
        let accepted = self.accepted_key.lock().unwrap().clone();
        match accepted {
            Some((key, address)) if key == private_key.expose_secret() => {
                *self.address.lock().unwrap() = Some(address);
                Ok(())
            }
            _ => Err(SdkError::Connection("Invalid private key".to_string())),
        }
    }

    fn address(&self) -> Option<String> {
        self.address.lock().unwrap().clone()
    }

    async fn get_eth_balance(&self) -> Result<String, SdkError> {
        self.record("get_eth_balance");
        Ok("1.0".to_string())
    }

    async fn get_token_balance(
        &self,
        token_address: &str,
        decimals: u8,
    ) -> Result<String, SdkError> {
        self.record(&format!("get_token_balance({token_address},{decimals})"));
        Ok("2.0".to_string())
    }

    async fn get_nfts(&self, address: &str) -> Result<Vec<Nft>, SdkError> {
        self.record(&format!("get_nfts({address})"));
        Ok(vec![Nft {
            contract_address: "0x1".to_string(),
            token_id: "7".to_string(),
            name: Some("Cavos Pass".to_string()),
            image_url: None,
        }])
    }

    async fn sign_up(&self, _email: &str, _password: &SecretString) -> Result<AuthResult, SdkError> {
        self.record("sign_up");
        self.next_auth()
    }

    async fn sign_in(&self, _email: &str, _password: &SecretString) -> Result<AuthResult, SdkError> {
        self.record("sign_in");
        self.next_auth()
    }

    async fn sign_out(&self) -> Result<(), SdkError> {
        self.record("sign_out");
        Ok(())
    }

    fn disconnect(&self) {
        self.record("disconnect");
        *self.address.lock().unwrap() = None;
    }
}

/// A credential store that can be told to fail every read.
#[derive(Default)]
pub struct FlakyStore {
    pub entries: Mutex<HashMap<String, String>>,
    pub fail_reads: bool,
}

impl CredentialStore for FlakyStore {
    fn get(&self, key: String) -> Result<Option<String>, StorageError> {
        if self.fail_reads {
            return Err(StorageError::Read("keychain locked".to_string()));
        }
        Ok(self.entries.lock().unwrap().get(&key).cloned())
    }

    fn set(&self, key: String, secret: String) -> Result<(), StorageError> {
        self.entries.lock().unwrap().insert(key, secret);
        Ok(())
    }

    fn delete(&self, key: String) -> Result<(), StorageError> {
        self.entries.lock().unwrap().remove(&key);
        Ok(())
    }
}

pub fn auth_result(email: &str, wallet_address: Option<&str>) -> AuthResult {
    AuthResult {
        wallet: wallet_address.map(|address| WalletInfo {
            address: Some(address.to_string()),
            network: Some("sepolia".to_string()),
        }),
        email: email.to_string(),
        user_id: "user-42".to_string(),
        organization: Organization {
            org_id: 3,
            org_name: "Cavos".to_string(),
        },
        auth_data: AuthData {
            access_token: "at".to_string(),
            refresh_token: "rt".to_string(),
            expires_in: 3600,
        },
    }
}

pub fn password() -> SecretString {
    SecretString::from("correct horse".to_string())
}

pub fn controller(
    sdk: &Arc<ScriptedSdk>,
    store: &Arc<FlakyStore>,
) -> SessionController {
    SessionController::new(sdk.clone(), store.clone())
}

pub fn sdk_message(error: &AegisKitError) -> Option<&str> {
    match error {
        AegisKitError::Sdk(error) => Some(error.message()),
        _ => None,
    }
}
