//! Fundamental types for the mgrant governance cache.
//!
//! This crate defines the types shared across every other crate in the workspace:
//! timestamps and clocks, record identifiers, wallet addresses, micro-unit amounts,
//! proposal categories, vote choices, and the interfaces to the remote chain.

pub mod address;
pub mod amount;
pub mod category;
pub mod clock;
pub mod contract;
pub mod error;
pub mod ids;
pub mod time;
pub mod vote;

pub use address::WalletAddress;
pub use amount::MicroAmount;
pub use category::ProposalCategory;
pub use clock::{Clock, SystemClock};
pub use contract::{CallArg, CallError, ContractCall, ContractCaller, Session, TxId};
pub use error::TypesError;
pub use ids::{CommentId, DraftId, IdGenerator, ProposalId, QueuedVoteId, RandomIds, ScheduledVoteId};
pub use time::Timestamp;
pub use vote::VoteType;
