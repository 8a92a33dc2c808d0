//! `aegiskit`: developer CLI for the AegisKit wallet session.
//!
//! Runs against the in-process SDK, so it works offline. The private key of a deployed wallet
//! is kept in a file under `--data-dir` and reconnects on every invocation. Registered users
//! are saved beside it, so sign-in works in a later invocation.

mod commands;
mod store;

use std::path::PathBuf;
use std::sync::Arc;

use aegiskit_core::{
    config::{ENV_APP_ID, ENV_NETWORK},
    logger, AegisConfig, MemoryWalletSdk, Network, SessionController,
};
use clap::{Parser, Subcommand, ValueEnum};
use eyre::{eyre, WrapErr};
use secrecy::SecretString;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::store::{FileCredentialStore, SdkStateFile};

#[derive(Parser, Debug)]
#[command(name = "aegiskit")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Directory holding the stored wallet credential.
    #[arg(long, env = "AEGISKIT_DATA_DIR")]
    data_dir: Option<PathBuf>,

    /// Aegis app id. Overrides `AEGIS_APP_ID`.
    #[arg(long)]
    app_id: Option<String>,

    /// Starknet network (`SN_SEPOLIA` or `SN_MAINNET`). Overrides `AEGIS_NETWORK`.
    #[arg(long)]
    network: Option<Network>,

    /// Enable verbose logging.
    #[arg(short, long)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Restore the session from the stored credential and print it.
    Status,
    /// Deploy a new wallet and store its private key.
    Deploy,
    /// Register with email and password.
    SignUp {
        #[command(flatten)]
        credentials: Credentials,
        /// Make the SDK report a failed wallet deployment after registering the user.
        #[arg(long)]
        simulate_deployment_failure: bool,
    },
    /// Sign in with email and password.
    SignIn {
        #[command(flatten)]
        credentials: Credentials,
    },
    /// End the authenticated session, keeping the stored wallet.
    SignOut,
    /// Delete the stored wallet and disconnect.
    Logout,
    /// Print the connected wallet's address.
    Address,
    /// Query a balance of the connected wallet.
    Balance {
        #[arg(value_enum, default_value_t = Asset::Eth)]
        asset: Asset,
        /// Token contract address, for `token`.
        #[arg(long, required_if_eq("asset", "token"))]
        token: Option<String>,
        /// Token decimals, for `token`.
        #[arg(long, default_value_t = 18)]
        decimals: u8,
    },
    /// List the NFTs of the connected wallet.
    Nfts,
    /// Print the resolved configuration.
    Config,
    /// Walk through every session state in one process.
    Demo,
}

#[derive(clap::Args, Debug)]
struct Credentials {
    /// Account email.
    #[arg(long)]
    email: String,
    /// Account password.
    #[arg(long, env = "AEGIS_PASSWORD", hide_env_values = true)]
    password: String,
}

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Asset {
    Eth,
    Strk,
    Token,
}

fn init_tracing(verbose: bool) -> eyre::Result<()> {
    tracing_log::LogTracer::init().wrap_err("failed to bridge log records")?;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        if verbose {
            EnvFilter::new("aegiskit_core=debug,aegiskit=debug")
        } else {
            EnvFilter::new("aegiskit_core=warn,aegiskit=info")
        }
    });

    let subscriber = tracing_subscriber::registry()
        .with(fmt::layer().with_target(false))
        .with(filter);
    tracing::subscriber::set_global_default(subscriber)
        .wrap_err("failed to install tracing subscriber")
}

fn load_config(cli: &Cli) -> eyre::Result<AegisConfig> {
    let app_id = cli.app_id.clone();
    let network = cli.network.map(|network| network.to_string());
    AegisConfig::from_lookup(|key| match key {
        ENV_APP_ID if app_id.is_some() => app_id.clone(),
        ENV_NETWORK if network.is_some() => network.clone(),
        _ => std::env::var(key).ok(),
    })
    .wrap_err("invalid configuration")
}

fn data_dir(cli: &Cli) -> eyre::Result<PathBuf> {
    cli.data_dir
        .clone()
        .or_else(|| dirs::data_dir().map(|dir| dir.join("aegiskit")))
        .ok_or_else(|| eyre!("no data directory available; pass --data-dir"))
}

#[tokio::main]
async fn main() -> eyre::Result<()> {
    // A missing .env file is fine.
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let config = load_config(&cli)?;
    logger::apply_config(&config);
    tracing::debug!(?config, "configuration loaded");

    let data_dir = data_dir(&cli)?;
    let store = Arc::new(FileCredentialStore::new(&data_dir));
    let sdk_state = SdkStateFile::new(&data_dir);
    let sdk = Arc::new(MemoryWalletSdk::new());
    sdk.restore(sdk_state.load().wrap_err("failed to load SDK state")?);
    let controller = SessionController::new(sdk.clone(), store.clone());

    let touches_accounts = !matches!(cli.command, Command::Config | Command::Demo);
    let result = match cli.command {
        Command::Config => commands::print_config(&config),
        Command::Status => commands::status(&controller, &store).await,
        Command::Deploy => commands::deploy(&controller, &config).await,
        Command::SignUp {
            credentials,
            simulate_deployment_failure,
        } => {
            if simulate_deployment_failure {
                sdk.fail_next_sign_up_after_registration(
                    "User registered successfully but Wallet deployment failed",
                );
            }
            let password = SecretString::from(credentials.password);
            commands::sign_up(&controller, &credentials.email, &password).await
        }
        Command::SignIn { credentials } => {
            let password = SecretString::from(credentials.password);
            commands::sign_in(&controller, &credentials.email, &password).await
        }
        Command::SignOut => commands::sign_out(&controller).await,
        Command::Logout => commands::logout(&controller).await,
        Command::Address => commands::address(&controller).await,
        Command::Balance {
            asset,
            token,
            decimals,
        } => {
            let query = match asset {
                Asset::Eth => commands::BalanceQuery::Eth,
                Asset::Strk => commands::BalanceQuery::Strk,
                Asset::Token => commands::BalanceQuery::Token {
                    address: token.ok_or_else(|| eyre!("--token is required"))?,
                    decimals,
                },
            };
            commands::balance(&controller, query).await
        }
        Command::Nfts => commands::nfts(&controller).await,
        Command::Demo => commands::demo().await,
    };

    if touches_accounts {
        sdk_state
            .save(&sdk.snapshot())
            .wrap_err("failed to save SDK state")?;
    }
    result
}
