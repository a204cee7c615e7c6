//! The governance cache: one explicitly constructed owner for all local state.

use mgrant_store::KvStore;
use mgrant_types::{Clock, IdGenerator, RandomIds, SystemClock};

use crate::comments::CommentStore;
use crate::drafts::DraftStore;
use crate::executor::VOTING_CONTRACT;
use crate::schedule::ScheduleLedger;
use crate::state::StateCache;

/// Owns the durable store, clock and id source, and hands out the draft,
/// comment and schedule stores borrowing them.
///
/// Create one per session and pass it by reference. The batch vote queue is
/// not part of the cache because it is never persisted.
pub struct GovernanceCache<S, C = SystemClock, I = RandomIds> {
    state: StateCache<S>,
    clock: C,
    ids: I,
    contract: String,
}

impl<S: KvStore> GovernanceCache<S> {
    /// A cache on the system clock with random ids.
    pub fn open(store: S) -> Self {
        Self::with_parts(store, SystemClock, RandomIds)
    }
}

impl<S: KvStore, C: Clock, I: IdGenerator> GovernanceCache<S, C, I> {
    pub fn with_parts(store: S, clock: C, ids: I) -> Self {
        Self {
            state: StateCache::new(store),
            clock,
            ids,
            contract: VOTING_CONTRACT.to_string(),
        }
    }

    /// Target a different voting contract for scheduled votes.
    pub fn with_contract(mut self, contract: impl Into<String>) -> Self {
        self.contract = contract.into();
        self
    }

    pub fn drafts(&self) -> DraftStore<'_, S, C> {
        DraftStore::new(&self.state, &self.clock)
    }

    pub fn comments(&self) -> CommentStore<'_, S, C, I> {
        CommentStore::new(&self.state, &self.clock, &self.ids)
    }

    pub fn schedule(&self) -> ScheduleLedger<'_, S, C, I> {
        ScheduleLedger::new(&self.state, &self.clock, &self.ids, &self.contract)
    }

    pub fn clock(&self) -> &C {
        &self.clock
    }

    pub fn contract(&self) -> &str {
        &self.contract
    }

    /// Whether some state currently lives only in memory.
    pub fn is_degraded(&self) -> bool {
        self.state.is_degraded()
    }

    /// Retry persisting in-memory-only state. Returns how many keys were written.
    pub fn flush(&self) -> usize {
        self.state.flush()
    }

    pub fn store(&self) -> &S {
        self.state.store()
    }
}
