//! Dashboard heuristics.
//!
//! Linear weighted sums with fixed thresholds. Every score is clamped to
//! `0..=100` and mapped to a closed set of levels through an explicit table.

use mgrant_types::ProposalCategory;

const MAX_SCORE: u32 = 100;
const DAY_SECS: u64 = 86_400;

fn clamp(score: u64) -> u8 {
    score.min(u64::from(MAX_SCORE)) as u8
}

// ── Reputation ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReputationInputs {
    pub proposals_funded: u32,
    pub proposals_submitted: u32,
    pub votes_cast: u32,
    pub comments_posted: u32,
    pub account_age_days: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum ReputationTier {
    Newcomer,
    Contributor,
    Builder,
    Champion,
}

impl ReputationTier {
    /// Lower bound of each tier, highest first.
    const THRESHOLDS: [(u8, ReputationTier); 4] = [
        (80, ReputationTier::Champion),
        (50, ReputationTier::Builder),
        (20, ReputationTier::Contributor),
        (0, ReputationTier::Newcomer),
    ];

    pub fn from_score(score: u8) -> Self {
        Self::THRESHOLDS
            .iter()
            .find(|(min, _)| score >= *min)
            .map(|(_, tier)| *tier)
            .unwrap_or(ReputationTier::Newcomer)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Newcomer => "Newcomer",
            Self::Contributor => "Contributor",
            Self::Builder => "Builder",
            Self::Champion => "Champion",
        }
    }
}

/// Funded proposals dominate; account age contributes at most 12 points.
pub fn reputation_score(inputs: &ReputationInputs) -> u8 {
    let score = u64::from(inputs.proposals_funded) * 15
        + u64::from(inputs.proposals_submitted) * 3
        + u64::from(inputs.votes_cast)
        + u64::from(inputs.comments_posted) / 2
        + u64::from((inputs.account_age_days / 30).min(12));
    clamp(score)
}

// ── DAO health ─────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct DaoMetrics {
    /// Share of members who voted in the last cycle, basis points.
    pub participation_bps: u32,
    pub treasury_runway_months: u32,
    pub active_proposals: u32,
    /// Share of proposals that got funded, basis points.
    pub funded_ratio_bps: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum HealthStatus {
    Critical,
    AtRisk,
    Stable,
    Healthy,
}

impl HealthStatus {
    pub fn from_score(score: u8) -> Self {
        match score {
            75.. => Self::Healthy,
            50..=74 => Self::Stable,
            25..=49 => Self::AtRisk,
            _ => Self::Critical,
        }
    }
}

/// Participation 40%, runway (capped at 24 months) 30%, funded ratio 20%,
/// activity (capped at 10 proposals) 10%.
pub fn dao_health(metrics: &DaoMetrics) -> u8 {
    let participation = u64::from(metrics.participation_bps.min(10_000)) * 40 / 10_000;
    let runway = u64::from(metrics.treasury_runway_months.min(24)) * 30 / 24;
    let funded = u64::from(metrics.funded_ratio_bps.min(10_000)) * 20 / 10_000;
    let activity = u64::from(metrics.active_proposals.min(10));
    clamp(participation + runway + funded + activity)
}

// ── Urgency ────────────────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub enum UrgencyLevel {
    Low,
    Medium,
    High,
    Critical,
}

impl UrgencyLevel {
    pub fn from_score(score: u8) -> Self {
        match score {
            80.. => Self::Critical,
            60..=79 => Self::High,
            35..=59 => Self::Medium,
            _ => Self::Low,
        }
    }
}

/// Base urgency of each category.
fn category_weight(category: ProposalCategory) -> u64 {
    match category {
        ProposalCategory::Infrastructure => 30,
        ProposalCategory::Development => 25,
        ProposalCategory::Events => 20,
        ProposalCategory::Research => 15,
        ProposalCategory::Education => 10,
        ProposalCategory::Community => 10,
    }
}

/// Category weight plus a deadline component that grows as the deadline nears.
pub fn urgency(category: ProposalCategory, secs_until_deadline: u64) -> u8 {
    let deadline = match secs_until_deadline {
        s if s <= DAY_SECS => 70,
        s if s <= 3 * DAY_SECS => 50,
        s if s <= 7 * DAY_SECS => 30,
        _ => 10,
    };
    clamp(category_weight(category) + deadline)
}

// ── Success prediction ─────────────────────────────────────────────────

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct PredictionInputs {
    pub yes_votes: u64,
    pub no_votes: u64,
    /// Votes required for the result to be binding.
    pub quorum: u64,
    /// Proposer reputation score, `0..=100`.
    pub proposer_reputation: u8,
}

/// Approval share 60%, quorum progress 25%, proposer reputation 15%.
pub fn success_prediction(inputs: &PredictionInputs) -> u8 {
    let total = inputs.yes_votes.saturating_add(inputs.no_votes);
    let approval = if total == 0 {
        0
    } else {
        inputs.yes_votes * 60 / total
    };
    let quorum = if inputs.quorum == 0 {
        25
    } else {
        total.min(inputs.quorum) * 25 / inputs.quorum
    };
    let reputation = u64::from(inputs.proposer_reputation.min(100)) * 15 / 100;
    clamp(approval + quorum + reputation)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reputation_tiers() {
        let newcomer = ReputationInputs::default();
        assert_eq!(reputation_score(&newcomer), 0);
        assert_eq!(ReputationTier::from_score(0), ReputationTier::Newcomer);

        let builder = ReputationInputs {
            proposals_funded: 2,
            proposals_submitted: 4,
            votes_cast: 10,
            comments_posted: 9,
            account_age_days: 200,
        };
        // 30 + 12 + 10 + 4 + 6
        assert_eq!(reputation_score(&builder), 62);
        assert_eq!(ReputationTier::from_score(62), ReputationTier::Builder);

        let veteran = ReputationInputs {
            proposals_funded: 10,
            ..builder
        };
        assert_eq!(reputation_score(&veteran), 100);
        assert_eq!(ReputationTier::from_score(100).label(), "Champion");
    }

    #[test]
    fn dao_health_weights() {
        let thriving = DaoMetrics {
            participation_bps: 10_000,
            treasury_runway_months: 36,
            active_proposals: 12,
            funded_ratio_bps: 10_000,
        };
        assert_eq!(dao_health(&thriving), 100);
        assert_eq!(HealthStatus::from_score(100), HealthStatus::Healthy);

        let middling = DaoMetrics {
            participation_bps: 5_000,
            treasury_runway_months: 12,
            active_proposals: 3,
            funded_ratio_bps: 5_000,
        };
        // 20 + 15 + 10 + 3
        assert_eq!(dao_health(&middling), 48);
        assert_eq!(HealthStatus::from_score(48), HealthStatus::AtRisk);
        assert_eq!(HealthStatus::from_score(dao_health(&DaoMetrics::default())), HealthStatus::Critical);
    }

    #[test]
    fn urgency_rises_near_deadline() {
        let far = urgency(ProposalCategory::Community, 30 * DAY_SECS);
        let near = urgency(ProposalCategory::Community, 2 * 3600);
        assert_eq!(far, 20);
        assert_eq!(near, 80);
        assert_eq!(UrgencyLevel::from_score(far), UrgencyLevel::Low);
        assert_eq!(UrgencyLevel::from_score(near), UrgencyLevel::Critical);
        assert_eq!(urgency(ProposalCategory::Infrastructure, 0), 100);
    }

    #[test]
    fn success_prediction_components() {
        let no_votes = PredictionInputs {
            quorum: 100,
            ..Default::default()
        };
        assert_eq!(success_prediction(&no_votes), 0);

        let strong = PredictionInputs {
            yes_votes: 90,
            no_votes: 10,
            quorum: 100,
            proposer_reputation: 80,
        };
        // 54 + 25 + 12
        assert_eq!(success_prediction(&strong), 91);
    }
}
