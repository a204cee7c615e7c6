//! End-to-end runs of the governance cache on the LMDB backend.

use mgrant_governance::{Countdown, GovernanceCache, GovernanceError, ProposalDraft, VoteStatus};
use mgrant_nullables::{NullClock, NullContractCaller, NullIds};
use mgrant_store_lmdb::{environment::DEFAULT_MAP_SIZE, LmdbEnvironment, LmdbKvStore};
use mgrant_types::{DraftId, ProposalCategory, ProposalId, Timestamp, VoteType, WalletAddress};

const NOW: u64 = 1_700_000_000;

fn open(dir: &tempfile::TempDir) -> (LmdbEnvironment, GovernanceCache<LmdbKvStore, NullClock, NullIds>) {
    let env = LmdbEnvironment::open(dir.path(), DEFAULT_MAP_SIZE).unwrap();
    let cache = GovernanceCache::with_parts(env.kv_store(), NullClock::new(NOW), NullIds::new());
    (env, cache)
}

#[test]
fn draft_lifecycle_on_lmdb() {
    let dir = tempfile::tempdir().unwrap();
    let (_env, cache) = open(&dir);
    let drafts = cache.drafts();

    let draft = ProposalDraft {
        title: "Open-source grant tracker".into(),
        description: "Track micro-grant disbursements in a public dashboard".into(),
        amount: "2500".into(),
        category: Some(ProposalCategory::Development),
        ..ProposalDraft::new(DraftId::new("draft-1").unwrap())
    };
    drafts.save(draft.clone()).unwrap();
    assert!(drafts.get(&draft.id).unwrap().submission_issues().is_empty());

    assert!(drafts.delete(&draft.id).unwrap());
    assert!(drafts.list().is_empty());
}

#[test]
fn comments_are_partitioned_on_lmdb() {
    let dir = tempfile::tempdir().unwrap();
    let (_env, cache) = open(&dir);
    let author = WalletAddress::parse("SP3FBR2AGK5H9QBDH3EEN6DF8EK8JY7RX8QJ5SVTE").unwrap();
    let p42 = ProposalId::new("42").unwrap();

    cache.comments().add(&p42, Some(&author), "first").unwrap();
    cache.comments().add(&p42, Some(&author), "second").unwrap();
    let err = cache.comments().add(&p42, Some(&author), "   ").unwrap_err();
    assert!(matches!(err, GovernanceError::EmptyComment));

    let texts: Vec<String> = cache.comments().list(&p42).into_iter().map(|c| c.text).collect();
    assert_eq!(texts, vec!["first", "second"]);
    assert!(cache.comments().list(&ProposalId::new("41").unwrap()).is_empty());
}

#[test]
fn scheduled_vote_executes_when_due() {
    let dir = tempfile::tempdir().unwrap();
    let (_env, cache) = open(&dir);
    let ledger = cache.schedule();
    let proposal = ProposalId::new("7").unwrap();

    let vote = ledger
        .schedule(&proposal, VoteType::Yes, Timestamp::new(NOW + 90 * 60))
        .unwrap();
    assert_eq!(ledger.countdown(&vote).to_string(), "1h 30m");

    cache.clock().advance(90 * 60);
    assert_eq!(ledger.countdown(&vote), Countdown::Executing);

    let caller = NullContractCaller::new();
    let reports = ledger.execute_due(&caller).unwrap();
    assert_eq!(reports.len(), 1);
    assert_eq!(ledger.get(&vote.id).unwrap().status, VoteStatus::Executed);
}
