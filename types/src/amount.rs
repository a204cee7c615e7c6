//! Token amounts in integer micro-units.
//!
//! The contract-call layer only ever sees integer micro-units. Drafts keep the
//! amount as the string the user typed; [`MicroAmount::parse_decimal`] turns it
//! into micro-units when the draft is checked for submission.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Add;

use crate::TypesError;

/// An amount of the platform token, stored as micro-units (10^-6).
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct MicroAmount(u64);

impl MicroAmount {
    pub const ZERO: Self = Self(0);

    /// Micro-units per whole token.
    pub const UNITS_PER_TOKEN: u64 = 1_000_000;

    const DECIMALS: usize = 6;

    pub fn new(micro: u64) -> Self {
        Self(micro)
    }

    pub fn from_tokens(tokens: u64) -> Option<Self> {
        tokens.checked_mul(Self::UNITS_PER_TOKEN).map(Self)
    }

    pub fn micro(&self) -> u64 {
        self.0
    }

    pub fn is_zero(&self) -> bool {
        self.0 == 0
    }

    pub fn checked_add(self, other: Self) -> Option<Self> {
        self.0.checked_add(other.0).map(Self)
    }

    /// Parse a human decimal such as `"1500"`, `"12.5"` or `"0.000001"`.
    ///
    /// At most six fractional digits are accepted; signs, exponents and
    /// thousands separators are rejected.
    pub fn parse_decimal(raw: &str) -> Result<Self, TypesError> {
        let invalid = || TypesError::InvalidAmount(raw.to_string());
        let s = raw.trim();
        let (whole, frac) = match s.split_once('.') {
            Some((w, f)) => (w, f),
            None => (s, ""),
        };
        if whole.is_empty() && frac.is_empty() {
            return Err(invalid());
        }
        if !whole.chars().all(|c| c.is_ascii_digit())
            || !frac.chars().all(|c| c.is_ascii_digit())
            || frac.len() > Self::DECIMALS
        {
            return Err(invalid());
        }

        let whole_units: u64 = if whole.is_empty() {
            0
        } else {
            whole.parse().map_err(|_| invalid())?
        };
        let frac_units: u64 = if frac.is_empty() {
            0
        } else {
            let padded = format!("{frac:0<width$}", width = Self::DECIMALS);
            padded.parse().map_err(|_| invalid())?
        };

        whole_units
            .checked_mul(Self::UNITS_PER_TOKEN)
            .and_then(|w| w.checked_add(frac_units))
            .map(Self)
            .ok_or_else(invalid)
    }
}

impl Add for MicroAmount {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self(self.0 + rhs.0)
    }
}

/// Whole tokens with trailing fractional zeros removed: `12.5`, `3`, `0.000001`.
impl fmt::Display for MicroAmount {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let whole = self.0 / Self::UNITS_PER_TOKEN;
        let frac = self.0 % Self::UNITS_PER_TOKEN;
        if frac == 0 {
            return write!(f, "{whole}");
        }
        let digits = format!("{frac:0width$}", width = Self::DECIMALS);
        write!(f, "{whole}.{}", digits.trim_end_matches('0'))
    }
}
