use std::sync::Arc;

use aegiskit_core::{
    defaults::{ETH, STRK},
    format_address, AegisConfig, MemoryCredentialStore, MemoryWalletSdk, SessionController,
    WalletSession,
};
use eyre::WrapErr;
use secrecy::{ExposeSecret, SecretString};

use crate::store::FileCredentialStore;

pub enum BalanceQuery {
    Eth,
    Strk,
    Token { address: String, decimals: u8 },
}

pub fn print_config(config: &AegisConfig) -> eyre::Result<()> {
    let mut value = serde_json::to_value(config)?;
    if config.paymaster_api_key.is_some() {
        value["paymasterApiKey"] = serde_json::Value::String("[REDACTED]".to_string());
    }
    println!("{}", serde_json::to_string_pretty(&value)?);
    Ok(())
}

pub async fn status(
    controller: &SessionController,
    store: &FileCredentialStore,
) -> eyre::Result<()> {
    let session = controller.reconcile_on_startup().await;
    println!("credential file: {}", store.path().display());
    println!("session:         {session}");
    Ok(())
}

pub async fn deploy(controller: &SessionController, config: &AegisConfig) -> eyre::Result<()> {
    if config.network.is_mainnet() {
        tracing::warn!("deploying on {}", config.network);
    }
    if config.is_gasless() {
        tracing::info!("paymaster configured, deployment is gasless");
    }

    let private_key = controller
        .deploy_wallet()
        .await
        .wrap_err("Failed to deploy wallet")?;
    let address = controller.connected_address()?;

    println!("Wallet deployed.");
    println!("Address:     {address}");
    println!("Private key: {}", private_key.expose_secret());
    println!("Save your private key securely, it is not shown again.");
    Ok(())
}

pub async fn sign_up(
    controller: &SessionController,
    email: &str,
    password: &SecretString,
) -> eyre::Result<()> {
    let session = controller
        .sign_up(email, password)
        .await
        .wrap_err("Sign up failed")?;
    println!("Account created for {email}.");
    print_auth_session(&session);
    Ok(())
}

pub async fn sign_in(
    controller: &SessionController,
    email: &str,
    password: &SecretString,
) -> eyre::Result<()> {
    let session = controller
        .sign_in(email, password)
        .await
        .wrap_err("Sign in failed")?;
    println!("Signed in as {email}.");
    print_auth_session(&session);
    Ok(())
}

fn print_auth_session(session: &WalletSession) {
    match session {
        WalletSession::Connected { address } => println!("Wallet address: {address}"),
        WalletSession::PendingDeployment { .. } => {
            println!("Your wallet will be created automatically on your next login.");
        }
        WalletSession::Disconnected => println!("No wallet."),
    }
}

pub async fn sign_out(controller: &SessionController) -> eyre::Result<()> {
    controller.reconcile_on_startup().await;
    controller.sign_out().await.wrap_err("Failed to sign out")?;
    println!("You have been signed out.");
    Ok(())
}

pub async fn logout(controller: &SessionController) -> eyre::Result<()> {
    controller
        .logout()
        .await
        .wrap_err("Failed to logout")?;
    println!("Logged out. The stored wallet has been removed.");
    Ok(())
}

pub async fn address(controller: &SessionController) -> eyre::Result<()> {
    controller.reconcile_on_startup().await;
    let address = controller.connected_address()?;
    println!("{address}");
    println!("{}", format_address(&address));
    Ok(())
}

pub async fn balance(controller: &SessionController, query: BalanceQuery) -> eyre::Result<()> {
    controller.reconcile_on_startup().await;
    let (balance, symbol) = match query {
        BalanceQuery::Eth => (controller.eth_balance().await, ETH.symbol.to_string()),
        BalanceQuery::Strk => (
            controller.known_token_balance(STRK).await,
            STRK.symbol.to_string(),
        ),
        BalanceQuery::Token { address, decimals } => (
            controller.token_balance(&address, decimals).await,
            format_address(&address),
        ),
    };
    let balance = balance.wrap_err_with(|| format!("Failed to get {symbol} balance"))?;
    println!("Balance: {balance} {symbol}");
    Ok(())
}

pub async fn nfts(controller: &SessionController) -> eyre::Result<()> {
    controller.reconcile_on_startup().await;
    let nfts = controller.nfts().await.wrap_err("Failed to get NFTs")?;
    if nfts.is_empty() {
        println!("No NFTs.");
    }
    for nft in nfts {
        let name = nft.name.as_deref().unwrap_or("unnamed");
        println!("{} #{} {name}", format_address(&nft.contract_address), nft.token_id);
    }
    Ok(())
}

/// Runs every transition against throwaway in-memory collaborators.
pub async fn demo() -> eyre::Result<()> {
    let sdk = Arc::new(MemoryWalletSdk::without_auth_deployment());
    let store = Arc::new(MemoryCredentialStore::new());
    let password = SecretString::from("demo-password".to_string());

    let controller = SessionController::new(sdk.clone(), store.clone());
    println!("startup:            {}", controller.reconcile_on_startup().await);

    sdk.fail_next_sign_up_after_registration(
        "User registered successfully but Wallet deployment failed",
    );
    let session = controller.sign_up("demo@aegis.example", &password).await?;
    println!("sign up:            {session}");

    sdk.fail_next_auth("Invalid credentials");
    if let Err(error) = controller.sign_in("demo@aegis.example", &password).await {
        println!("sign in (rejected): {error}");
    }

    controller.sign_out().await?;
    controller.deploy_wallet().await?;
    println!("deploy:             {}", controller.session());

    let restarted = SessionController::new(sdk.clone(), store.clone());
    println!("restart:            {}", restarted.reconcile_on_startup().await);
    println!("eth balance:        {}", restarted.eth_balance().await?);

    println!("logout:             {}", restarted.logout().await?);
    println!("logout again:       {}", restarted.logout().await?);
    println!("restart:            {}", restarted.reconcile_on_startup().await);
    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::store::SdkStateFile;

    use super::*;

    /// Builds the collaborators the way `main` does for one invocation.
    fn invocation(state: &SdkStateFile) -> (SessionController, Arc<MemoryWalletSdk>) {
        let sdk = Arc::new(MemoryWalletSdk::new());
        sdk.restore(state.load().unwrap());
        let controller = SessionController::new(sdk.clone(), Arc::new(MemoryCredentialStore::new()));
        (controller, sdk)
    }

    fn password() -> SecretString {
        SecretString::from("pw".to_string())
    }

    #[tokio::test]
    async fn test_sign_in_after_sign_up_in_earlier_invocation() {
        let dir = tempfile::tempdir().unwrap();
        let state = SdkStateFile::new(dir.path());

        let (controller, sdk) = invocation(&state);
        sign_up(&controller, "a@b.com", &password()).await.unwrap();
        let registered = controller.connected_address().unwrap();
        state.save(&sdk.snapshot()).unwrap();

        let (controller, _) = invocation(&state);
        sign_in(&controller, "a@b.com", &password()).await.unwrap();
        assert_eq!(controller.connected_address().unwrap(), registered);
    }

    #[tokio::test]
    async fn test_saved_accounts_reject_duplicates_and_wrong_passwords() {
        let dir = tempfile::tempdir().unwrap();
        let state = SdkStateFile::new(dir.path());

        let (controller, sdk) = invocation(&state);
        sign_up(&controller, "a@b.com", &password()).await.unwrap();
        state.save(&sdk.snapshot()).unwrap();

        let (controller, _) = invocation(&state);
        assert!(sign_up(&controller, "a@b.com", &password()).await.is_err());
        let wrong = SecretString::from("nope".to_string());
        assert!(sign_in(&controller, "a@b.com", &wrong).await.is_err());
    }

    #[tokio::test]
    async fn test_sign_out_in_later_invocation_is_saved() {
        let dir = tempfile::tempdir().unwrap();
        let state = SdkStateFile::new(dir.path());

        let (controller, sdk) = invocation(&state);
        sign_in_after_sign_up(&controller).await;
        state.save(&sdk.snapshot()).unwrap();

        let (controller, sdk) = invocation(&state);
        assert_eq!(sdk.signed_in_email().as_deref(), Some("a@b.com"));
        sign_out(&controller).await.unwrap();
        state.save(&sdk.snapshot()).unwrap();

        let (_, sdk) = invocation(&state);
        assert!(sdk.signed_in_email().is_none());
    }

    async fn sign_in_after_sign_up(controller: &SessionController) {
        sign_up(controller, "a@b.com", &password()).await.unwrap();
        sign_in(controller, "a@b.com", &password()).await.unwrap();
    }
}
