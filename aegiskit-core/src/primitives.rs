use std::fmt;

use crate::error::AegisKitError;

/// A trait for parsing primitive types from foreign bindings.
///
/// This trait is used to parse primitive types from foreign provided values. For example, parsing
/// a user-entered token address into a [`ContractAddress`].
///
/// # Examples
/// ```rust,ignore
/// let token = ContractAddress::parse_from_ffi("0x0471...", "token_address")?;
/// ```
///
/// # Errors
/// - `AegisKitError::InvalidInput` if the provided string is not valid for the type.
pub trait ParseFromForeignBinding {
    /// Parses `s`, naming `attr` in the error when the value is rejected.
    ///
    /// # Errors
    /// Returns `InvalidInput` if the value cannot be parsed.
    fn parse_from_ffi(s: &str, attr: &'static str) -> Result<Self, AegisKitError>
    where
        Self: Sized;
}

/// A Starknet contract address: a field element rendered as `0x`-prefixed hex.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ContractAddress(String);

impl ContractAddress {
    /// Maximum number of hex digits in a Starknet field element.
    pub const MAX_HEX_DIGITS: usize = 64;

    /// The normalized `0x`-prefixed lowercase form.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ContractAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl ParseFromForeignBinding for ContractAddress {
    fn parse_from_ffi(s: &str, attr: &'static str) -> Result<Self, AegisKitError> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .ok_or_else(|| AegisKitError::invalid_input(attr, "missing 0x prefix"))?;

        if digits.is_empty() || digits.len() > Self::MAX_HEX_DIGITS {
            return Err(AegisKitError::invalid_input(
                attr,
                format!("expected 1 to {} hex digits", Self::MAX_HEX_DIGITS),
            ));
        }
        if !digits.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(AegisKitError::invalid_input(attr, "not a hex string"));
        }

        Ok(Self(format!("0x{}", digits.to_ascii_lowercase())))
    }
}

/// Shortens an address for display: the first six characters, `...`, then the last three.
///
/// An empty address renders as `0x0...000`.
#[uniffi::export]
#[must_use]
pub fn format_address(address: &str) -> String {
    const HEAD: usize = 6;
    const TAIL: usize = 3;

    if address.is_empty() {
        return "0x0...000".to_string();
    }

    let chars: Vec<char> = address.chars().collect();
    let head: String = chars.iter().take(HEAD).collect();
    let tail: String = chars[chars.len().saturating_sub(TAIL)..].iter().collect();
    format!("{head}...{tail}")
}
