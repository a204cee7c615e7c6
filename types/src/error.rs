//! Parse errors for the fundamental types.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum TypesError {
    #[error("invalid wallet address: {0}")]
    InvalidAddress(String),

    #[error("unknown proposal category: {0}")]
    UnknownCategory(String),

    #[error("unknown vote type: {0} (expected \"yes\" or \"no\")")]
    UnknownVoteType(String),

    #[error("invalid amount: {0}")]
    InvalidAmount(String),

    #[error("identifier must not be blank")]
    BlankId,

    #[error("randomness unavailable: {0}")]
    Randomness(String),
}
