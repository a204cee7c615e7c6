//! The `vote watch` loop.
//!
//! On every tick: retry persisting in-memory-only state, execute due votes,
//! notify the webhook, and log the countdown of every pending vote. The
//! interval timer is owned by the loop and dropped when it exits.

use std::time::Duration;

use mgrant_governance::{ExecutionReport, GovernanceCache, GovernanceError};
use mgrant_store::KvStore;
use mgrant_types::{Clock, ContractCaller, IdGenerator};
use tokio::sync::broadcast;
use tokio::time::MissedTickBehavior;

use crate::notify::{execution_embed, WebhookNotifier};
use crate::shutdown::StopReason;

pub struct Watcher<'a, S, C, I, X> {
    cache: &'a GovernanceCache<S, C, I>,
    caller: &'a X,
    notifier: Option<&'a WebhookNotifier>,
}

impl<'a, S, C, I, X> Watcher<'a, S, C, I, X>
where
    S: KvStore,
    C: Clock,
    I: IdGenerator,
    X: ContractCaller,
{
    pub fn new(
        cache: &'a GovernanceCache<S, C, I>,
        caller: &'a X,
        notifier: Option<&'a WebhookNotifier>,
    ) -> Self {
        Self {
            cache,
            caller,
            notifier,
        }
    }

    /// One pass over the schedule.
    pub fn tick(&self) -> Result<Vec<ExecutionReport>, GovernanceError> {
        if self.cache.is_degraded() {
            self.cache.flush();
        }

        let ledger = self.cache.schedule();
        let reports = ledger.execute_due(self.caller)?;
        let now = self.cache.clock().now();

        if let Some(notifier) = self.notifier {
            for report in &reports {
                notifier.notify(execution_embed(report, now));
            }
        }

        for vote in ledger.list_all().iter().filter(|v| v.is_pending()) {
            tracing::info!(
                id = %vote.id,
                proposal = %vote.proposal_id,
                vote = %vote.vote_type,
                countdown = %vote.countdown(now),
                "pending vote"
            );
        }
        Ok(reports)
    }

    /// Tick every `interval` until `shutdown` fires.
    ///
    /// A failed pass is logged and retried on the next tick.
    pub async fn run(&self, interval: Duration, mut shutdown: broadcast::Receiver<StopReason>) {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        tracing::info!(interval_secs = interval.as_secs(), "watching scheduled votes");

        loop {
            tokio::select! {
                _ = ticker.tick() => match self.tick() {
                    Ok(reports) if !reports.is_empty() => {
                        tracing::info!(executed = reports.len(), "execution pass complete");
                    }
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "execution pass skipped");
                    }
                },
                reason = shutdown.recv() => {
                    match reason {
                        Ok(reason) => tracing::info!(%reason, "watch stopped"),
                        Err(_) => tracing::info!("watch stopped"),
                    }
                    break;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shutdown::ShutdownController;
    use mgrant_governance::VoteStatus;
    use mgrant_nullables::{NullClock, NullContractCaller, NullIds, NullKvStore};
    use mgrant_types::{ProposalId, Timestamp, VoteType};

    fn cache() -> GovernanceCache<NullKvStore, NullClock, NullIds> {
        GovernanceCache::with_parts(NullKvStore::new(), NullClock::new(1_000), NullIds::new())
    }

    #[test]
    fn tick_executes_only_due_votes() {
        let cache = cache();
        let proposal = ProposalId::new("3").unwrap();
        let due = cache
            .schedule()
            .schedule(&proposal, VoteType::Yes, Timestamp::new(1_010))
            .unwrap();
        cache
            .schedule()
            .schedule(&proposal, VoteType::No, Timestamp::new(9_000))
            .unwrap();

        let caller = NullContractCaller::new();
        let watcher = Watcher::new(&cache, &caller, None);
        assert!(watcher.tick().unwrap().is_empty());

        cache.clock().advance(10);
        let reports = watcher.tick().unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(reports[0].vote_id, due.id);
        assert_eq!(
            cache.schedule().get(&due.id).unwrap().status,
            VoteStatus::Executed
        );
    }

    #[test]
    fn tick_flushes_degraded_state() {
        let cache = cache();
        cache.store().fail_writes(true);
        cache
            .schedule()
            .schedule(&ProposalId::new("3").unwrap(), VoteType::Yes, Timestamp::new(5_000))
            .unwrap();
        assert!(cache.is_degraded());

        cache.store().fail_writes(false);
        let caller = NullContractCaller::new();
        Watcher::new(&cache, &caller, None).tick().unwrap();
        assert!(!cache.is_degraded());
    }

    #[test]
    fn tick_sends_nothing_while_store_rejects_writes() {
        let cache = cache();
        cache
            .schedule()
            .schedule(&ProposalId::new("3").unwrap(), VoteType::Yes, Timestamp::new(1_005))
            .unwrap();
        cache.clock().advance(5);
        cache.store().fail_writes(true);

        let caller = NullContractCaller::new();
        let watcher = Watcher::new(&cache, &caller, None);
        assert!(watcher.tick().is_err());
        assert!(caller.calls().is_empty());

        cache.store().fail_writes(false);
        assert_eq!(watcher.tick().unwrap().len(), 1);
        assert_eq!(caller.calls().len(), 1);
    }

    #[tokio::test]
    async fn run_stops_on_shutdown() {
        let cache = cache();
        let caller = NullContractCaller::new();
        let controller = ShutdownController::new();
        let rx = controller.subscribe();
        controller.stop(StopReason::Requested);

        Watcher::new(&cache, &caller, None)
            .run(Duration::from_millis(10), rx)
            .await;
    }
}
