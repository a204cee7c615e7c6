//! Wallet address type.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::TypesError;

/// A wallet address as handed over by the session provider.
///
/// The cache does not validate checksums; it only guarantees the address is
/// non-blank and contains no whitespace.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WalletAddress(String);

impl WalletAddress {
    /// Characters kept on each side by [`WalletAddress::short`].
    const SHORT_HEAD: usize = 6;
    const SHORT_TAIL: usize = 4;

    /// Parse a raw address string, trimming surrounding whitespace.
    pub fn parse(raw: &str) -> Result<Self, TypesError> {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.chars().any(char::is_whitespace) {
            return Err(TypesError::InvalidAddress(raw.to_string()));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Return the raw address string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Abbreviated form for display, e.g. `SP2J6Z...9EJ7`.
    pub fn short(&self) -> String {
        let chars: Vec<char> = self.0.chars().collect();
        if chars.len() <= Self::SHORT_HEAD + Self::SHORT_TAIL + 3 {
            return self.0.clone();
        }
        let head: String = chars[..Self::SHORT_HEAD].iter().collect();
        let tail: String = chars[chars.len() - Self::SHORT_TAIL..].iter().collect();
        format!("{head}...{tail}")
    }
}

impl FromStr for WalletAddress {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for WalletAddress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
