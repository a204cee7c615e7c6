//! Local governance state cache for the micro-grants DAO.
//!
//! Everything a voter keeps on their own machine between sessions:
//! - proposal drafts, saved and replaced by id
//! - comment threads, one append-only partition per proposal
//! - scheduled vote intents, executed through a contract caller once due
//! - a batch vote queue priced by quadratic cost (weight²), kept in memory only
//!
//! All persistent state goes through a [`mgrant_store::KvStore`] owned by an
//! explicitly constructed [`GovernanceCache`]. Corrupt local data reads as
//! empty; a failing store degrades the cache to in-memory operation.

pub mod cache;
pub mod comments;
pub mod drafts;
pub mod error;
pub mod executor;
pub mod queue;
pub mod schedule;
pub mod scoring;
pub mod state;

pub use cache::GovernanceCache;
pub use comments::{Comment, CommentStore};
pub use drafts::{DraftStore, ProposalDraft, SaveOutcome, SubmissionIssue};
pub use error::GovernanceError;
pub use executor::{vote_call, SimulatedContractCaller, VOTING_CONTRACT};
pub use queue::{max_weight_for_budget, quadratic_cost, BatchVoteQueue, QueuedVote};
pub use schedule::{Countdown, ExecutionReport, ScheduleLedger, ScheduledVote, VoteStatus};
pub use scoring::{HealthStatus, ReputationTier, UrgencyLevel};
pub use state::StateCache;
