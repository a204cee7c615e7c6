//! Proposal comment threads.
//!
//! Append-only: a comment is never edited or removed once written. Each
//! proposal's thread is stored under its own key, so threads never mix.

use mgrant_store::{keys, KvStore};
use mgrant_types::{Clock, CommentId, IdGenerator, ProposalId, Timestamp, WalletAddress};
use mgrant_utils::format_relative;
use serde::{Deserialize, Serialize};

use crate::state::StateCache;
use crate::GovernanceError;

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: CommentId,
    pub proposal_id: ProposalId,
    pub author: WalletAddress,
    pub text: String,
    pub timestamp: Timestamp,
}

impl Comment {
    /// `just now`, `5m ago`, `3h ago`, `2d ago`.
    pub fn age(&self, now: Timestamp) -> String {
        format_relative(self.timestamp, now)
    }
}

pub struct CommentStore<'a, S, C, I> {
    state: &'a StateCache<S>,
    clock: &'a C,
    ids: &'a I,
}

impl<'a, S: KvStore, C: Clock, I: IdGenerator> CommentStore<'a, S, C, I> {
    pub(crate) fn new(state: &'a StateCache<S>, clock: &'a C, ids: &'a I) -> Self {
        Self { state, clock, ids }
    }

    /// Append a comment to a proposal's thread.
    ///
    /// The text is stored trimmed. A missing author or blank text is rejected
    /// and leaves the thread untouched.
    pub fn add(
        &self,
        proposal_id: &ProposalId,
        author: Option<&WalletAddress>,
        text: &str,
    ) -> Result<Comment, GovernanceError> {
        let author = author.ok_or(GovernanceError::MissingAuthor)?;
        let text = text.trim();
        if text.is_empty() {
            return Err(GovernanceError::EmptyComment);
        }

        let comment = Comment {
            id: CommentId::new(self.ids.next_id("c")?)?,
            proposal_id: proposal_id.clone(),
            author: author.clone(),
            text: text.to_string(),
            timestamp: self.clock.now(),
        };

        let key = keys::comments(proposal_id.as_str());
        self.state.update_list(&key, |thread: &mut Vec<Comment>| {
            thread.push(comment.clone());
            Ok(())
        })?;

        tracing::debug!(
            proposal = %proposal_id,
            comment = %comment.id,
            author = %author.short(),
            "comment added"
        );
        Ok(comment)
    }

    /// A proposal's thread, oldest first.
    pub fn list(&self, proposal_id: &ProposalId) -> Vec<Comment> {
        self.state.read_list(&keys::comments(proposal_id.as_str()))
    }

    pub fn count(&self, proposal_id: &ProposalId) -> usize {
        self.list(proposal_id).len()
    }
}
