//! Client configuration for the Aegis SDK.
//!
//! Values come from environment-style key/value pairs with fallbacks for development. The
//! API secret is a server-side credential and is deliberately not part of this struct.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::{
    defaults::{DEFAULT_APP_ID, DEFAULT_APP_NAME},
    AegisKitError, AegisKitResult, Network,
};

/// Environment key for the Aegis app id.
pub const ENV_APP_ID: &str = "AEGIS_APP_ID";
/// Environment key for the app display name.
pub const ENV_APP_NAME: &str = "AEGIS_APP_NAME";
/// Environment key for the Starknet network (`SN_SEPOLIA` or `SN_MAINNET`).
pub const ENV_NETWORK: &str = "AEGIS_NETWORK";
/// Environment key for the logging flag.
pub const ENV_ENABLE_LOGGING: &str = "AEGIS_ENABLE_LOGGING";
/// Environment key for the optional AVNU paymaster API key.
pub const ENV_PAYMASTER_API_KEY: &str = "AEGIS_PAYMASTER_API_KEY";
/// Environment key for the optional analytics endpoint.
pub const ENV_TRACKING_API_URL: &str = "AEGIS_TRACKING_API_URL";

/// Resolved client configuration.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AegisConfig {
    /// Application identifier issued by the Aegis dashboard.
    pub app_id: String,
    /// Name shown in wallet connections.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Starknet network to connect to.
    #[serde(default)]
    pub network: Network,
    /// Whether debug logging is enabled.
    #[serde(default = "default_enable_logging")]
    pub enable_logging: bool,
    /// Enables gasless transactions through the paymaster when present.
    #[serde(default)]
    pub paymaster_api_key: Option<String>,
    /// Analytics endpoint for wallet operations.
    #[serde(default)]
    pub tracking_api_url: Option<String>,
}

fn default_app_name() -> String {
    DEFAULT_APP_NAME.to_string()
}

const fn default_enable_logging() -> bool {
    true
}

impl Default for AegisConfig {
    fn default() -> Self {
        Self {
            app_id: DEFAULT_APP_ID.to_string(),
            app_name: default_app_name(),
            network: Network::default(),
            enable_logging: default_enable_logging(),
            paymaster_api_key: None,
            tracking_api_url: None,
        }
    }
}

impl fmt::Debug for AegisConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AegisConfig")
            .field("app_id", &self.app_id)
            .field("app_name", &self.app_name)
            .field("network", &self.network)
            .field("enable_logging", &self.enable_logging)
            .field(
                "paymaster_api_key",
                &self.paymaster_api_key.as_ref().map(|_| "[REDACTED]"),
            )
            .field("tracking_api_url", &self.tracking_api_url)
            .finish()
    }
}

impl AegisConfig {
    /// Loads the configuration from the process environment.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `AEGIS_NETWORK` or `AEGIS_ENABLE_LOGGING` hold an unknown value.
    pub fn from_env() -> AegisKitResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Loads the configuration through an arbitrary key lookup.
    ///
    /// Missing or empty values fall back to the defaults.
    ///
    /// # Errors
    /// Returns `InvalidConfig` if `AEGIS_NETWORK` or `AEGIS_ENABLE_LOGGING` hold an unknown value.
    pub fn from_lookup<F>(lookup: F) -> AegisKitResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|value| !value.trim().is_empty());
        let defaults = Self::default();

        let network = match get(ENV_NETWORK) {
            Some(value) => Network::from_str(value.trim()).map_err(|_| {
                AegisKitError::InvalidConfig {
                    key: ENV_NETWORK.to_string(),
                    reason: format!("unknown network `{value}`"),
                }
            })?,
            None => defaults.network,
        };

        let enable_logging = match get(ENV_ENABLE_LOGGING) {
            Some(value) => parse_flag(ENV_ENABLE_LOGGING, &value)?,
            None => defaults.enable_logging,
        };

        Ok(Self {
            app_id: get(ENV_APP_ID).unwrap_or(defaults.app_id),
            app_name: get(ENV_APP_NAME).unwrap_or(defaults.app_name),
            network,
            enable_logging,
            paymaster_api_key: get(ENV_PAYMASTER_API_KEY),
            tracking_api_url: get(ENV_TRACKING_API_URL),
        })
    }

    /// Parses a JSON configuration.
    ///
    /// # Errors
    /// Returns `SerializationError` if the JSON is malformed or `InvalidConfig` if the app id is empty.
    pub fn from_json(json: &str) -> AegisKitResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        if config.app_id.trim().is_empty() {
            return Err(AegisKitError::InvalidConfig {
                key: "appId".to_string(),
                reason: "must not be empty".to_string(),
            });
        }
        Ok(config)
    }

    /// Whether gasless transactions are available.
    #[must_use]
    pub const fn is_gasless(&self) -> bool {
        self.paymaster_api_key.is_some()
    }

    /// The `log` level filter this configuration asks for.
    #[must_use]
    pub const fn log_level_filter(&self) -> log::LevelFilter {
        if self.enable_logging {
            log::LevelFilter::Trace
        } else {
            log::LevelFilter::Error
        }
    }
}

fn parse_flag(key: &str, value: &str) -> AegisKitResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" => Ok(true),
        "false" | "0" | "no" => Ok(false),
        other => Err(AegisKitError::InvalidConfig {
            key: key.to_string(),
            reason: format!("expected a boolean, got `{other}`"),
        }),
    }
}
