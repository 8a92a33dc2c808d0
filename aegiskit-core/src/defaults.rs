//! Fixed values shared by the SDK glue: storage keys, fallback configuration and well-known tokens.

/// Storage key under which the deployed wallet's private key is persisted.
pub const WALLET_PRIVATE_KEY: &str = "wallet_private_key";

/// Fallback Aegis app id used when `AEGIS_APP_ID` is not set.
pub const DEFAULT_APP_ID: &str = "app-6fd6d3c95e7a16fc717c5895d3b76ee0";

/// Fallback display name used when `AEGIS_APP_NAME` is not set.
pub const DEFAULT_APP_NAME: &str = "Aegis SDK Example";

/// Decimals of the native fee token and of STRK.
pub const STARKNET_TOKEN_DECIMALS: u8 = 18;

/// A fungible token known to the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KnownToken {
    /// Ticker shown to users.
    pub symbol: &'static str,
    /// Token contract address.
    pub address: &'static str,
    /// Number of decimals used to render balances.
    pub decimals: u8,
}

/// The STRK token. The contract address is the same on Sepolia and mainnet.
pub const STRK: KnownToken = KnownToken {
    symbol: "STRK",
    address: "0x04718f5a0fc34cc1af16a1cdee98ffb20c31f5cd61d6ab07201858f4287c938d",
    decimals: STARKNET_TOKEN_DECIMALS,
};

/// The bridged ETH token used as the balance reported by `get_eth_balance`.
pub const ETH: KnownToken = KnownToken {
    symbol: "ETH",
    address: "0x049d36570d4e46f48e99674bd3fcc84644ddd6b96f7c741b1562b82f9e004dc7",
    decimals: STARKNET_TOKEN_DECIMALS,
};
