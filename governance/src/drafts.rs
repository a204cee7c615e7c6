//! Proposal drafts.
//!
//! All drafts live in one list under [`keys::DRAFTS`]. Saving with a known id
//! replaces that entry where it stands; a new id is appended.

use mgrant_store::{keys, KvStore};
use mgrant_types::{Clock, DraftId, MicroAmount, ProposalCategory, Timestamp};
use serde::{de, Deserialize, Deserializer, Serialize};

use crate::state::StateCache;
use crate::GovernanceError;

/// Minimum description length (in characters, after trimming) for submission.
pub const MIN_DESCRIPTION_CHARS: usize = 20;

/// An unsubmitted proposal, saved locally while it is being written.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProposalDraft {
    pub id: DraftId,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Requested amount exactly as typed, e.g. `"1500"` or `"12.5"`.
    #[serde(default)]
    pub amount: String,
    /// A blank category, as left by a form with nothing selected, reads as `None`.
    #[serde(default, deserialize_with = "category_or_blank")]
    pub category: Option<ProposalCategory>,
    /// Set by the store on every save.
    #[serde(default = "epoch")]
    pub last_saved: Timestamp,
}

fn epoch() -> Timestamp {
    Timestamp::EPOCH
}

fn category_or_blank<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<ProposalCategory>, D::Error> {
    match Option::<String>::deserialize(deserializer)? {
        Some(raw) if !raw.trim().is_empty() => raw.parse().map(Some).map_err(de::Error::custom),
        _ => Ok(None),
    }
}

/// Reasons a draft is not yet ready to be submitted on chain.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SubmissionIssue {
    MissingTitle,
    DescriptionTooShort { chars: usize },
    InvalidAmount(String),
    ZeroAmount,
    MissingCategory,
}

impl ProposalDraft {
    pub fn new(id: DraftId) -> Self {
        Self {
            id,
            title: String::new(),
            description: String::new(),
            amount: String::new(),
            category: None,
            last_saved: Timestamp::EPOCH,
        }
    }

    /// The requested amount in micro-units, if it parses.
    pub fn amount_micro(&self) -> Option<MicroAmount> {
        MicroAmount::parse_decimal(&self.amount).ok()
    }

    /// Everything that blocks submission. Empty means ready.
    pub fn submission_issues(&self) -> Vec<SubmissionIssue> {
        let mut issues = Vec::new();
        if self.title.trim().is_empty() {
            issues.push(SubmissionIssue::MissingTitle);
        }
        let chars = self.description.trim().chars().count();
        if chars < MIN_DESCRIPTION_CHARS {
            issues.push(SubmissionIssue::DescriptionTooShort { chars });
        }
        match MicroAmount::parse_decimal(&self.amount) {
            Ok(amount) if amount.is_zero() => issues.push(SubmissionIssue::ZeroAmount),
            Ok(_) => {}
            Err(_) => issues.push(SubmissionIssue::InvalidAmount(self.amount.clone())),
        }
        if self.category.is_none() {
            issues.push(SubmissionIssue::MissingCategory);
        }
        issues
    }
}

/// Whether a save created a new draft or replaced an existing one.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SaveOutcome {
    Created,
    Updated,
}

/// CRUD over the saved drafts.
pub struct DraftStore<'a, S, C> {
    state: &'a StateCache<S>,
    clock: &'a C,
}

impl<'a, S: KvStore, C: Clock> DraftStore<'a, S, C> {
    pub(crate) fn new(state: &'a StateCache<S>, clock: &'a C) -> Self {
        Self { state, clock }
    }

    /// Save a draft, stamping `last_saved`.
    ///
    /// `last_saved` never moves backwards for a given id, even if the clock does.
    pub fn save(&self, mut draft: ProposalDraft) -> Result<(ProposalDraft, SaveOutcome), GovernanceError> {
        if draft.id.as_str().trim().is_empty() {
            return Err(GovernanceError::MissingDraftId);
        }

        let now = self.clock.now();
        let (draft, outcome, total) = self.state.update_list(keys::DRAFTS, move |drafts: &mut Vec<ProposalDraft>| {
            let outcome = match drafts.iter_mut().find(|d| d.id == draft.id) {
                Some(existing) => {
                    draft.last_saved = now.max(existing.last_saved);
                    *existing = draft.clone();
                    SaveOutcome::Updated
                }
                None => {
                    draft.last_saved = now;
                    drafts.push(draft.clone());
                    SaveOutcome::Created
                }
            };
            Ok((draft, outcome, drafts.len()))
        })?;

        tracing::debug!(draft = %draft.id, ?outcome, total, "draft saved");
        Ok((draft, outcome))
    }

    /// All drafts in stored order. Absent or corrupt data reads as empty.
    pub fn list(&self) -> Vec<ProposalDraft> {
        self.state.read_list(keys::DRAFTS)
    }

    pub fn get(&self, id: &DraftId) -> Option<ProposalDraft> {
        self.list().into_iter().find(|d| &d.id == id)
    }

    /// Delete a draft. Returns `false` (and writes nothing) if it was absent.
    pub fn delete(&self, id: &DraftId) -> Result<bool, GovernanceError> {
        let removed = self.state.update_list(keys::DRAFTS, |drafts: &mut Vec<ProposalDraft>| {
            let before = drafts.len();
            drafts.retain(|d| &d.id != id);
            Ok(drafts.len() != before)
        })?;
        if removed {
            tracing::debug!(draft = %id, "draft deleted");
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mgrant_nullables::{NullClock, NullKvStore};

    fn draft(id: &str, title: &str) -> ProposalDraft {
        ProposalDraft {
            title: title.to_string(),
            ..ProposalDraft::new(DraftId::new(id).unwrap())
        }
    }

    #[test]
    fn save_new_appends_and_stamps() {
        let state = StateCache::new(NullKvStore::new());
        let clock = NullClock::new(1_000);
        let drafts = DraftStore::new(&state, &clock);

        let (saved, outcome) = drafts.save(draft("d1", "Solar kiosk")).unwrap();
        assert_eq!(outcome, SaveOutcome::Created);
        assert_eq!(saved.last_saved, Timestamp::new(1_000));
        assert_eq!(drafts.list().len(), 1);
    }

    #[test]
    fn save_existing_replaces_in_place() {
        let state = StateCache::new(NullKvStore::new());
        let clock = NullClock::new(1_000);
        let drafts = DraftStore::new(&state, &clock);

        drafts.save(draft("a", "A")).unwrap();
        drafts.save(draft("b", "B")).unwrap();
        drafts.save(draft("c", "C")).unwrap();
        clock.advance(60);
        let (_, outcome) = drafts.save(draft("b", "B v2")).unwrap();

        assert_eq!(outcome, SaveOutcome::Updated);
        let list = drafts.list();
        let titles: Vec<&str> = list.iter().map(|d| d.title.as_str()).collect();
        assert_eq!(titles, vec!["A", "B v2", "C"]);
        assert_eq!(list[1].last_saved, Timestamp::new(1_060));
    }

    #[test]
    fn last_saved_never_decreases() {
        let state = StateCache::new(NullKvStore::new());
        let clock = NullClock::new(5_000);
        let drafts = DraftStore::new(&state, &clock);

        drafts.save(draft("a", "A")).unwrap();
        clock.set(4_000);
        let (saved, _) = drafts.save(draft("a", "A again")).unwrap();
        assert_eq!(saved.last_saved, Timestamp::new(5_000));
    }

    #[test]
    fn delete_is_idempotent() {
        let state = StateCache::new(NullKvStore::new());
        let clock = NullClock::new(0);
        let drafts = DraftStore::new(&state, &clock);
        drafts.save(draft("a", "A")).unwrap();

        let id = DraftId::new("a").unwrap();
        assert!(drafts.delete(&id).unwrap());
        assert!(!drafts.delete(&id).unwrap());
        assert!(!drafts.delete(&id).unwrap());
        assert!(drafts.list().is_empty());
    }

    #[test]
    fn corrupt_drafts_read_as_empty() {
        let store = NullKvStore::new();
        store.insert_raw(keys::DRAFTS, "{\"oops\": true");
        let state = StateCache::new(store);
        let clock = NullClock::new(0);
        let drafts = DraftStore::new(&state, &clock);

        assert!(drafts.list().is_empty());
        drafts.save(draft("fresh", "Fresh")).unwrap();
        assert_eq!(drafts.list().len(), 1);
    }

    #[test]
    fn reads_drafts_written_by_browser_client() {
        let store = NullKvStore::new();
        store.insert_raw(
            keys::DRAFTS,
            r#"[{"id":"d-17","title":"Meetup","description":"","amount":"250","category":"events","lastSaved":1700000000},
                {"id":"d-18","title":"Unknown cat","category":"marketing"}]"#,
        );
        let state = StateCache::new(store);
        let clock = NullClock::new(0);
        let list = DraftStore::new(&state, &clock).list();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].category, Some(ProposalCategory::Events));
        assert_eq!(list[0].amount_micro(), Some(MicroAmount::new(250_000_000)));
    }

    #[test]
    fn save_keeps_drafts_this_version_cannot_read() {
        let store = NullKvStore::new();
        store.insert_raw(
            keys::DRAFTS,
            r#"[{"id":"d-18","title":"Flyers","category":"marketing","lastSaved":1700000000}]"#,
        );
        let state = StateCache::new(&store);
        let clock = NullClock::new(1_700_000_100);
        let drafts = DraftStore::new(&state, &clock);

        drafts.save(draft("new", "New draft")).unwrap();
        drafts.delete(&DraftId::new("new").unwrap()).unwrap();
        drafts.save(draft("other", "Other")).unwrap();

        let raw = store.raw(keys::DRAFTS).unwrap();
        assert!(raw.contains(r#""id":"d-18""#));
        assert!(raw.contains(r#""category":"marketing""#));
        let ids: Vec<String> = drafts.list().into_iter().map(|d| d.id.to_string()).collect();
        assert_eq!(ids, vec!["other"]);
    }

    #[test]
    fn blank_category_reads_as_unset() {
        let store = NullKvStore::new();
        store.insert_raw(
            keys::DRAFTS,
            r#"[{"id":"d-19","title":"No category yet","category":"","lastSaved":1700000000}]"#,
        );
        let state = StateCache::new(store);
        let clock = NullClock::new(0);
        let list = DraftStore::new(&state, &clock).list();

        assert_eq!(list.len(), 1);
        assert_eq!(list[0].category, None);
        assert!(list[0].submission_issues().contains(&SubmissionIssue::MissingCategory));
    }

    #[test]
    fn submission_issues_cover_each_field() {
        let empty = draft("x", "");
        assert_eq!(
            empty.submission_issues(),
            vec![
                SubmissionIssue::MissingTitle,
                SubmissionIssue::DescriptionTooShort { chars: 0 },
                SubmissionIssue::InvalidAmount(String::new()),
                SubmissionIssue::MissingCategory,
            ]
        );

        let ready = ProposalDraft {
            description: "Community solar kiosk for the market square".into(),
            amount: "1500".into(),
            category: Some(ProposalCategory::Infrastructure),
            ..draft("y", "Solar kiosk")
        };
        assert!(ready.submission_issues().is_empty());

        let zero = ProposalDraft {
            amount: "0".into(),
            ..ready
        };
        assert_eq!(zero.submission_issues(), vec![SubmissionIssue::ZeroAmount]);
    }
}
