//! Scheduled vote intents.
//!
//! A voter picks a future instant at which a vote should be cast. Records are
//! keyed by a stable id; cancellation looks the id up instead of using a
//! position in some filtered view, so concurrent edits cannot shift the target.
//!
//! Lifecycle:
//! ```text
//! pending --[cancel]--------------------> removed
//! pending --[time passes]--> executing (display only, still pending)
//! pending --[execute_due claims it]-----> submitting
//! submitting --[call ok]----------------> executed
//! submitting --[call error]-------------> failed
//! ```
//!
//! The claim is written to the store before the contract is called. A vote
//! whose outcome could not be recorded stays `submitting` on disk and is never
//! sent again.

use std::fmt;

use mgrant_store::{keys, KvStore};
use mgrant_types::{
    CallError, Clock, ContractCaller, IdGenerator, ProposalId, ScheduledVoteId, Timestamp, TxId,
    VoteType,
};
use mgrant_utils::format_countdown;
use serde::{Deserialize, Serialize};

use crate::executor::vote_call;
use crate::state::StateCache;
use crate::GovernanceError;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VoteStatus {
    Pending,
    /// Claimed by an execution pass; the contract call may or may not have gone out.
    Submitting,
    Executed,
    Failed,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledVote {
    pub id: ScheduledVoteId,
    pub proposal_id: ProposalId,
    pub vote_type: VoteType,
    pub execution_time: Timestamp,
    pub created_at: Timestamp,
    pub status: VoteStatus,
    /// Set once executed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tx_id: Option<TxId>,
    /// Set once failed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settled_at: Option<Timestamp>,
}

impl ScheduledVote {
    pub fn is_pending(&self) -> bool {
        self.status == VoteStatus::Pending
    }

    /// Pending and its execution time has arrived.
    pub fn is_due(&self, now: Timestamp) -> bool {
        self.is_pending() && self.execution_time.has_passed(now)
    }

    pub fn countdown(&self, now: Timestamp) -> Countdown {
        match self.status {
            VoteStatus::Submitting => Countdown::Submitting,
            VoteStatus::Executed => Countdown::Executed,
            VoteStatus::Failed => Countdown::Failed,
            VoteStatus::Pending => {
                let left = self.execution_time.secs_until(now);
                if left == 0 {
                    Countdown::Executing
                } else {
                    Countdown::Remaining { secs: left }
                }
            }
        }
    }
}

/// What a countdown badge shows for a scheduled vote.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Countdown {
    Remaining { secs: u64 },
    /// Due, waiting for the next execution pass.
    Executing,
    Submitting,
    Executed,
    Failed,
}

impl fmt::Display for Countdown {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Remaining { secs } => f.write_str(&format_countdown(*secs)),
            Self::Executing => f.write_str("executing"),
            Self::Submitting => f.write_str("submitting"),
            Self::Executed => f.write_str("executed"),
            Self::Failed => f.write_str("failed"),
        }
    }
}

/// Result of submitting one due vote.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ExecutionReport {
    pub vote_id: ScheduledVoteId,
    pub proposal_id: ProposalId,
    pub vote_type: VoteType,
    pub outcome: Result<TxId, CallError>,
}

pub struct ScheduleLedger<'a, S, C, I> {
    state: &'a StateCache<S>,
    clock: &'a C,
    ids: &'a I,
    contract: &'a str,
}

impl<'a, S: KvStore, C: Clock, I: IdGenerator> ScheduleLedger<'a, S, C, I> {
    pub(crate) fn new(state: &'a StateCache<S>, clock: &'a C, ids: &'a I, contract: &'a str) -> Self {
        Self {
            state,
            clock,
            ids,
            contract,
        }
    }

    /// Schedule a vote. `execution_time` must be strictly after now.
    pub fn schedule(
        &self,
        proposal_id: &ProposalId,
        vote_type: VoteType,
        execution_time: Timestamp,
    ) -> Result<ScheduledVote, GovernanceError> {
        let now = self.clock.now();
        if execution_time <= now {
            return Err(GovernanceError::ExecutionTimeNotInFuture {
                execution_time: execution_time.as_secs(),
                now: now.as_secs(),
            });
        }

        let vote = ScheduledVote {
            id: ScheduledVoteId::new(self.ids.next_id("sv")?)?,
            proposal_id: proposal_id.clone(),
            vote_type,
            execution_time,
            created_at: now,
            status: VoteStatus::Pending,
            tx_id: None,
            failure: None,
            settled_at: None,
        };

        self.state.update_list(keys::SCHEDULED_VOTES, |all: &mut Vec<ScheduledVote>| {
            all.push(vote.clone());
            Ok(())
        })?;

        tracing::info!(
            id = %vote.id,
            proposal = %proposal_id,
            vote = %vote_type,
            in_secs = execution_time.secs_until(now),
            "vote scheduled"
        );
        Ok(vote)
    }

    /// Every scheduled vote, all proposals, stored order.
    pub fn list_all(&self) -> Vec<ScheduledVote> {
        self.state.read_list(keys::SCHEDULED_VOTES)
    }

    /// Scheduled votes for one proposal.
    pub fn list(&self, proposal_id: &ProposalId) -> Vec<ScheduledVote> {
        self.list_all()
            .into_iter()
            .filter(|v| &v.proposal_id == proposal_id)
            .collect()
    }

    pub fn get(&self, id: &ScheduledVoteId) -> Option<ScheduledVote> {
        self.list_all().into_iter().find(|v| &v.id == id)
    }

    /// Cancel a pending vote by id, removing it.
    pub fn cancel(&self, id: &ScheduledVoteId) -> Result<ScheduledVote, GovernanceError> {
        let removed = self.state.update_list(keys::SCHEDULED_VOTES, |all: &mut Vec<ScheduledVote>| {
            let index = all
                .iter()
                .position(|v| &v.id == id)
                .ok_or_else(|| GovernanceError::ScheduledVoteNotFound(id.to_string()))?;
            if !all[index].is_pending() {
                return Err(GovernanceError::VoteAlreadyFinal(id.to_string()));
            }
            Ok(all.remove(index))
        })?;
        tracing::info!(id = %id, proposal = %removed.proposal_id, "scheduled vote cancelled");
        Ok(removed)
    }

    /// Countdown for a vote relative to the cache clock.
    pub fn countdown(&self, vote: &ScheduledVote) -> Countdown {
        vote.countdown(self.clock.now())
    }

    /// Earliest execution time among pending votes.
    pub fn next_due(&self) -> Option<Timestamp> {
        self.list_all()
            .iter()
            .filter(|v| v.is_pending())
            .map(|v| v.execution_time)
            .min()
    }

    /// Submit every due vote through `caller`.
    ///
    /// Due votes are first claimed as `submitting`, and that claim must reach
    /// the store; if it cannot, nothing is called and the store error is
    /// returned. Each claimed vote is then called once: success marks it
    /// executed with the returned transaction id, an error marks it failed.
    /// Failed votes are not retried.
    pub fn execute_due(&self, caller: &impl ContractCaller) -> Result<Vec<ExecutionReport>, GovernanceError> {
        let now = self.clock.now();
        let claimed = self.state.commit_list(keys::SCHEDULED_VOTES, |all: &mut Vec<ScheduledVote>| {
            let mut claimed = Vec::new();
            for vote in all.iter_mut().filter(|v| v.is_due(now)) {
                vote.status = VoteStatus::Submitting;
                claimed.push(vote.clone());
            }
            Ok(claimed)
        })?;
        if claimed.is_empty() {
            return Ok(Vec::new());
        }

        let reports: Vec<ExecutionReport> = claimed
            .into_iter()
            .map(|vote| {
                let call = vote_call(self.contract, &vote.proposal_id, vote.vote_type);
                let outcome = caller.call(&call);
                match &outcome {
                    Ok(tx_id) => {
                        tracing::info!(id = %vote.id, proposal = %vote.proposal_id, tx_id = %tx_id, "scheduled vote executed");
                    }
                    Err(e) => {
                        tracing::warn!(id = %vote.id, proposal = %vote.proposal_id, error = %e, "scheduled vote failed");
                    }
                }
                ExecutionReport {
                    vote_id: vote.id,
                    proposal_id: vote.proposal_id,
                    vote_type: vote.vote_type,
                    outcome,
                }
            })
            .collect();

        self.state.update_list(keys::SCHEDULED_VOTES, |all: &mut Vec<ScheduledVote>| {
            for report in &reports {
                let Some(vote) = all.iter_mut().find(|v| v.id == report.vote_id) else {
                    continue;
                };
                match &report.outcome {
                    Ok(tx_id) => {
                        vote.status = VoteStatus::Executed;
                        vote.tx_id = Some(tx_id.clone());
                    }
                    Err(e) => {
                        vote.status = VoteStatus::Failed;
                        vote.failure = Some(e.to_string());
                    }
                }
                vote.settled_at = Some(now);
            }
            Ok(())
        })?;
        Ok(reports)
    }
}
