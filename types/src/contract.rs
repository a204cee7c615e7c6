//! Interfaces to the remote chain and the wallet session.
//!
//! The cache never talks to the network itself. Votes that need to reach the
//! chain go through a [`ContractCaller`], which signs and broadcasts a single
//! contract call and hands back a transaction id.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

use crate::{MicroAmount, WalletAddress};

/// Transaction id returned by a successful broadcast.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TxId(String);

impl TxId {
    pub fn new(raw: impl Into<String>) -> Self {
        Self(raw.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TxId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A typed contract-call argument.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum CallArg {
    Uint(u128),
    Bool(bool),
    Principal(WalletAddress),
    Ascii(String),
    Amount(MicroAmount),
}

/// One call of a public function on a deployed contract.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContractCall {
    /// Fully qualified contract, e.g. `SP000...ABC.micro-grants`.
    pub contract: String,
    pub function: String,
    pub args: Vec<CallArg>,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CallError {
    #[error("wallet is not signed in")]
    NotSignedIn,

    #[error("broadcast rejected: {0}")]
    Rejected(String),

    #[error("network error: {0}")]
    Network(String),
}

/// Sign-and-broadcast primitive of the remote chain.
pub trait ContractCaller {
    fn call(&self, call: &ContractCall) -> Result<TxId, CallError>;
}

impl<T: ContractCaller + ?Sized> ContractCaller for &T {
    fn call(&self, call: &ContractCall) -> Result<TxId, CallError> {
        (**self).call(call)
    }
}

/// The wallet session provider.
pub trait Session {
    /// Address of the signed-in wallet, if any.
    fn address(&self) -> Option<WalletAddress>;

    fn is_signed_in(&self) -> bool {
        self.address().is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn call_args_serialize_tagged() {
        let json = serde_json::to_string(&CallArg::Uint(42)).unwrap();
        assert_eq!(json, r#"{"type":"uint","value":42}"#);
    }
}
