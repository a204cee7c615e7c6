//! Record identifiers and id generation.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::TypesError;

macro_rules! string_id {
    ($(#[$meta:meta])* $name:ident) => {
        $(#[$meta])*
        #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(String);

        impl $name {
            /// Wrap a raw id, trimming whitespace. Blank ids are rejected.
            pub fn new(raw: impl AsRef<str>) -> Result<Self, TypesError> {
                let trimmed = raw.as_ref().trim();
                if trimmed.is_empty() {
                    return Err(TypesError::BlankId);
                }
                Ok(Self(trimmed.to_string()))
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }

        impl std::str::FromStr for $name {
            type Err = TypesError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }
    };
}

string_id!(
    /// On-chain proposal identifier. Partitions comments and scheduled votes.
    ProposalId
);
string_id!(
    /// Client-chosen identifier of a locally saved draft.
    DraftId
);
string_id!(CommentId);
string_id!(
    /// Stable identifier of a scheduled vote; cancellation is keyed by it.
    ScheduledVoteId
);
string_id!(QueuedVoteId);

/// Source of fresh record identifiers.
pub trait IdGenerator {
    /// Produce a new id of the form `{prefix}_{unique}`.
    fn next_id(&self, prefix: &str) -> Result<String, TypesError>;
}

impl<G: IdGenerator + ?Sized> IdGenerator for &G {
    fn next_id(&self, prefix: &str) -> Result<String, TypesError> {
        (**self).next_id(prefix)
    }
}

/// 128-bit random ids from the operating system RNG, hex encoded.
#[derive(Clone, Copy, Debug, Default)]
pub struct RandomIds;

impl IdGenerator for RandomIds {
    fn next_id(&self, prefix: &str) -> Result<String, TypesError> {
        let mut bytes = [0u8; 16];
        getrandom::getrandom(&mut bytes).map_err(|e| TypesError::Randomness(e.to_string()))?;
        Ok(format!("{prefix}_{}", hex::encode(bytes)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_ids_are_rejected() {
        assert_eq!(DraftId::new("  "), Err(TypesError::BlankId));
        assert_eq!(ProposalId::new(" 42 ").unwrap().as_str(), "42");
    }

    #[test]
    fn random_ids_are_prefixed_and_distinct() {
        let ids = RandomIds;
        let a = ids.next_id("sv").unwrap();
        let b = ids.next_id("sv").unwrap();
        assert!(a.starts_with("sv_"));
        assert_eq!(a.len(), "sv_".len() + 32);
        assert_ne!(a, b);
    }
}
