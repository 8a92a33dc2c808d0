//! Session reconciliation against scripted SDK and storage collaborators.

mod common;

use std::sync::Arc;

use aegiskit_core::{
    defaults::{STRK, WALLET_PRIVATE_KEY},
    AegisKitError, CredentialStore, SdkError, WalletSession,
};
use common::{auth_result, controller, password, sdk_message, FlakyStore, ScriptedSdk};

fn pending(email: &str) -> WalletSession {
    WalletSession::PendingDeployment {
        email: email.to_string(),
    }
}

#[tokio::test]
async fn test_startup_without_credential_never_touches_the_sdk() {
    let sdk = Arc::new(ScriptedSdk::new());
    let store = Arc::new(FlakyStore::default());
    let controller = controller(&sdk, &store);

    assert_eq!(controller.reconcile_on_startup().await, WalletSession::Disconnected);
    assert!(sdk.calls().is_empty());
}

#[tokio::test]
async fn test_startup_reconnects_with_sdk_reported_address() {
    let sdk = Arc::new(ScriptedSdk::new());
    sdk.accept_key("0xkey", "0xABC");
    let store = Arc::new(FlakyStore::default());
    store
        .set(WALLET_PRIVATE_KEY.to_string(), "0xkey".to_string())
        .unwrap();
    let controller = controller(&sdk, &store);

    assert_eq!(
        controller.reconcile_on_startup().await,
        WalletSession::Connected {
            address: "0xABC".to_string()
        }
    );
}

#[tokio::test]
async fn test_startup_swallows_store_and_sdk_failures() {
    let sdk = Arc::new(ScriptedSdk::new());
    let store = Arc::new(FlakyStore {
        fail_reads: true,
        ..FlakyStore::default()
    });
    assert_eq!(
        controller(&sdk, &store).reconcile_on_startup().await,
        WalletSession::Disconnected
    );

    let store = Arc::new(FlakyStore::default());
    store
        .set(WALLET_PRIVATE_KEY.to_string(), "0xstale".to_string())
        .unwrap();
    assert_eq!(
        controller(&sdk, &store).reconcile_on_startup().await,
        WalletSession::Disconnected
    );
    assert_eq!(sdk.calls(), vec!["connect_account".to_string()]);
}

#[tokio::test]
async fn test_sign_up_registered_but_deployment_failed_is_pending() {
    let sdk = Arc::new(ScriptedSdk::new());
    sdk.push_auth(Err(SdkError::Auth(
        "User registered successfully but Wallet deployment failed".to_string(),
    )));
    let store = Arc::new(FlakyStore::default());
    let controller = controller(&sdk, &store);

    let session = controller.sign_up("a@b.com", &password()).await.unwrap();
    assert_eq!(session, pending("a@b.com"));
    assert_eq!(controller.session(), pending("a@b.com"));
}

#[tokio::test]
async fn test_sign_in_with_wallet_connects() {
    let sdk = Arc::new(ScriptedSdk::new());
    sdk.push_auth(Ok(auth_result("a@b.com", Some("0xABC"))));
    let store = Arc::new(FlakyStore::default());
    let controller = controller(&sdk, &store);

    let session = controller.sign_in("a@b.com", &password()).await.unwrap();
    assert_eq!(
        session,
        WalletSession::Connected {
            address: "0xABC".to_string()
        }
    );
    assert_eq!(controller.profile().await.unwrap().user_id, "user-42");
}

#[tokio::test]
async fn test_sign_in_with_null_wallet_is_pending() {
    let sdk = Arc::new(ScriptedSdk::new());
    sdk.push_auth(Ok(auth_result("a@b.com", None)));
    let store = Arc::new(FlakyStore::default());
    let controller = controller(&sdk, &store);

    assert_eq!(
        controller.sign_in("a@b.com", &password()).await.unwrap(),
        pending("a@b.com")
    );
}

#[tokio::test]
async fn test_unknown_auth_error_is_surfaced_verbatim() {
    let message = "Request failed with status code 500: upstream timeout";
    let sdk = Arc::new(ScriptedSdk::new());
    sdk.push_auth(Err(SdkError::Auth(message.to_string())));
    let store = Arc::new(FlakyStore::default());
    let controller = controller(&sdk, &store);

    let err = controller.sign_up("a@b.com", &password()).await.unwrap_err();
    assert_eq!(sdk_message(&err), Some(message));
    assert_eq!(err.to_string(), message);
    assert_eq!(controller.session(), WalletSession::Disconnected);
}

#[tokio::test]
async fn test_logout_twice_is_a_no_op() {
    let sdk = Arc::new(ScriptedSdk::new());
    sdk.accept_key("0xkey", "0xABC");
    let store = Arc::new(FlakyStore::default());
    store
        .set(WALLET_PRIVATE_KEY.to_string(), "0xkey".to_string())
        .unwrap();
    let controller = controller(&sdk, &store);
    controller.reconcile_on_startup().await;

    assert_eq!(controller.logout().await.unwrap(), WalletSession::Disconnected);
    assert_eq!(controller.logout().await.unwrap(), WalletSession::Disconnected);
    assert!(store.get(WALLET_PRIVATE_KEY.to_string()).unwrap().is_none());
    assert!(controller.profile().await.is_none());
}

#[tokio::test]
async fn test_queries_wait_for_a_connected_session() {
    let sdk = Arc::new(ScriptedSdk::new());
    sdk.accept_key("0xkey", "0xABC");
    let store = Arc::new(FlakyStore::default());
    let controller = controller(&sdk, &store);

    assert!(matches!(
        controller.known_token_balance(STRK).await,
        Err(AegisKitError::NotConnected)
    ));

    store
        .set(WALLET_PRIVATE_KEY.to_string(), "0xkey".to_string())
        .unwrap();
    controller.reconcile_on_startup().await;

    assert_eq!(controller.eth_balance().await.unwrap(), "1.0");
    assert_eq!(controller.known_token_balance(STRK).await.unwrap(), "2.0");
    assert_eq!(controller.nfts().await.unwrap().len(), 1);
    assert!(sdk
        .calls()
        .contains(&format!("get_token_balance({},18)", STRK.address)));
    assert!(sdk.calls().contains(&"get_nfts(0xABC)".to_string()));
}
