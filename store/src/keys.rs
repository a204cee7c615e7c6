//! Storage key layout.
//!
//! One key holds all drafts, one key holds all scheduled votes, and comments
//! are partitioned with one key per proposal.

/// All proposal drafts.
pub const DRAFTS: &str = "proposal_drafts";

/// All scheduled votes, across proposals.
pub const SCHEDULED_VOTES: &str = "scheduled_votes";

const COMMENTS_PREFIX: &str = "comments_";

/// The comment partition for one proposal.
pub fn comments(proposal_id: &str) -> String {
    format!("{COMMENTS_PREFIX}{proposal_id}")
}
