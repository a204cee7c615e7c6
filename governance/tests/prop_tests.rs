use proptest::prelude::*;

use mgrant_governance::{quadratic_cost, BatchVoteQueue, GovernanceCache, ProposalDraft, QueuedVote};
use mgrant_nullables::{NullClock, NullIds, NullKvStore};
use mgrant_types::{DraftId, ProposalCategory, QueuedVoteId};

fn cache() -> GovernanceCache<NullKvStore, NullClock, NullIds> {
    GovernanceCache::with_parts(NullKvStore::new(), NullClock::new(1_700_000_000), NullIds::new())
}

fn arb_draft() -> impl Strategy<Value = ProposalDraft> {
    (
        "[a-z0-9]{1,8}",
        ".{0,40}",
        ".{0,120}",
        "[0-9]{0,6}(\\.[0-9]{1,6})?",
        prop::option::of(prop::sample::select(ProposalCategory::ALL.to_vec())),
    )
        .prop_map(|(id, title, description, amount, category)| ProposalDraft {
            title,
            description,
            amount,
            category,
            ..ProposalDraft::new(DraftId::new(id).unwrap())
        })
}

proptest! {
    /// A single queued vote of weight w costs w².
    #[test]
    fn single_vote_cost_is_square(w in 1u32..100_000) {
        let mut queue = BatchVoteQueue::new();
        queue.add(QueuedVote { id: QueuedVoteId::new("v").unwrap(), title: "t".into(), weight: w }).unwrap();
        prop_assert_eq!(queue.total_cost(), u64::from(w) * u64::from(w));
    }

    /// Queue cost is the sum of each entry's squared weight.
    #[test]
    fn queue_cost_is_sum_of_squares(weights in prop::collection::vec(1u32..10_000, 0..20)) {
        let mut queue = BatchVoteQueue::new();
        for (i, w) in weights.iter().enumerate() {
            queue.add(QueuedVote {
                id: QueuedVoteId::new(format!("v{i}")).unwrap(),
                title: format!("Proposal {i}"),
                weight: *w,
            }).unwrap();
        }
        let expected: u64 = weights.iter().map(|w| quadratic_cost(*w)).sum();
        prop_assert_eq!(queue.total_cost(), expected);
    }

    /// Saving a known id keeps the length; a new id adds exactly one.
    #[test]
    fn save_replaces_or_appends(drafts in prop::collection::vec(arb_draft(), 1..12)) {
        let cache = cache();
        let store = cache.drafts();
        for draft in drafts {
            let before = store.list();
            let known = before.iter().any(|d| d.id == draft.id);
            store.save(draft).unwrap();
            let after = store.list().len();
            if known {
                prop_assert_eq!(after, before.len());
            } else {
                prop_assert_eq!(after, before.len() + 1);
            }
        }
    }

    /// Deleting an absent id twice leaves the same state as deleting it once.
    #[test]
    fn delete_absent_is_idempotent(drafts in prop::collection::vec(arb_draft(), 0..6)) {
        let cache = cache();
        let store = cache.drafts();
        for draft in drafts {
            store.save(draft).unwrap();
        }
        let absent = DraftId::new("NOT-A-DRAFT").unwrap();
        prop_assert!(!store.delete(&absent).unwrap());
        let once = store.list();
        prop_assert!(!store.delete(&absent).unwrap());
        prop_assert_eq!(store.list(), once);
    }

    /// Drafts read back from the persistence layer equal what was saved.
    #[test]
    fn drafts_round_trip_through_store(drafts in prop::collection::vec(arb_draft(), 1..10)) {
        let cache = cache();
        let mut expected: Vec<ProposalDraft> = Vec::new();
        for draft in drafts {
            let (saved, _) = cache.drafts().save(draft).unwrap();
            match expected.iter_mut().find(|d| d.id == saved.id) {
                Some(slot) => *slot = saved,
                None => expected.push(saved),
            }
        }

        // A fresh cache over the same raw bytes sees the same list.
        let raw = cache.store().raw(mgrant_store::keys::DRAFTS).unwrap();
        let reopened_store = NullKvStore::new();
        reopened_store.insert_raw(mgrant_store::keys::DRAFTS, &raw);
        let reopened = GovernanceCache::with_parts(reopened_store, NullClock::new(0), NullIds::new());
        prop_assert_eq!(reopened.drafts().list(), expected);
    }
}
