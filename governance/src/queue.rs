//! Batch vote queue with quadratic pricing.
//!
//! Casting a vote of weight `w` costs `w²` credits, so doubling influence
//! quadruples the price. The queue lives for one session and is never
//! persisted.

use mgrant_types::QueuedVoteId;

use crate::GovernanceError;

/// Credits needed for a single vote of `weight`.
pub fn quadratic_cost(weight: u32) -> u64 {
    u64::from(weight) * u64::from(weight)
}

/// Largest weight whose quadratic cost fits in `budget`.
pub fn max_weight_for_budget(budget: u64) -> u32 {
    // Float sqrt is exact enough to land within one of the answer; fix up after.
    let budget = u128::from(budget);
    let mut w = (budget as f64).sqrt() as u128;
    while w * w > budget {
        w -= 1;
    }
    while (w + 1) * (w + 1) <= budget {
        w += 1;
    }
    u32::try_from(w).unwrap_or(u32::MAX)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct QueuedVote {
    pub id: QueuedVoteId,
    pub title: String,
    pub weight: u32,
}

impl QueuedVote {
    pub fn cost(&self) -> u64 {
        quadratic_cost(self.weight)
    }
}

/// Votes waiting to be submitted together, in insertion order.
#[derive(Debug, Default)]
pub struct BatchVoteQueue {
    votes: Vec<QueuedVote>,
}

impl BatchVoteQueue {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, vote: QueuedVote) -> Result<(), GovernanceError> {
        if vote.weight == 0 {
            return Err(GovernanceError::ZeroWeight);
        }
        if self.votes.iter().any(|v| v.id == vote.id) {
            return Err(GovernanceError::DuplicateQueuedVote(vote.id.to_string()));
        }
        tracing::debug!(id = %vote.id, weight = vote.weight, cost = vote.cost(), "vote queued");
        self.votes.push(vote);
        Ok(())
    }

    pub fn remove(&mut self, id: &QueuedVoteId) -> Result<QueuedVote, GovernanceError> {
        let index = self
            .votes
            .iter()
            .position(|v| &v.id == id)
            .ok_or_else(|| GovernanceError::QueuedVoteNotFound(id.to_string()))?;
        Ok(self.votes.remove(index))
    }

    /// Sum of `weight²` over the queue, saturating at `u64::MAX`.
    pub fn total_cost(&self) -> u64 {
        self.votes
            .iter()
            .map(QueuedVote::cost)
            .fold(0, u64::saturating_add)
    }

    /// Empty the queue for submission, oldest first.
    pub fn drain(&mut self) -> Vec<QueuedVote> {
        std::mem::take(&mut self.votes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &QueuedVote> {
        self.votes.iter()
    }

    pub fn len(&self) -> usize {
        self.votes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.votes.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vote(id: &str, weight: u32) -> QueuedVote {
        QueuedVote {
            id: QueuedVoteId::new(id).unwrap(),
            title: format!("Proposal {id}"),
            weight,
        }
    }

    #[test]
    fn total_cost_is_sum_of_squares() {
        let mut queue = BatchVoteQueue::new();
        queue.add(vote("a", 3)).unwrap();
        queue.add(vote("b", 1)).unwrap();
        queue.add(vote("c", 4)).unwrap();
        assert_eq!(queue.total_cost(), 9 + 1 + 16);
    }

    #[test]
    fn doubling_weight_quadruples_cost() {
        assert_eq!(quadratic_cost(5) * 4, quadratic_cost(10));
        assert_eq!(quadratic_cost(u32::MAX), (u32::MAX as u64) * (u32::MAX as u64));
    }

    #[test]
    fn zero_weight_and_duplicates_rejected() {
        let mut queue = BatchVoteQueue::new();
        assert!(matches!(queue.add(vote("a", 0)), Err(GovernanceError::ZeroWeight)));
        queue.add(vote("a", 2)).unwrap();
        assert!(matches!(
            queue.add(vote("a", 5)),
            Err(GovernanceError::DuplicateQueuedVote(_))
        ));
        assert_eq!(queue.len(), 1);
    }

    #[test]
    fn remove_and_drain_keep_order() {
        let mut queue = BatchVoteQueue::new();
        for (id, w) in [("a", 1), ("b", 2), ("c", 3)] {
            queue.add(vote(id, w)).unwrap();
        }
        let removed = queue.remove(&QueuedVoteId::new("b").unwrap()).unwrap();
        assert_eq!(removed.weight, 2);
        assert!(queue.remove(&QueuedVoteId::new("b").unwrap()).is_err());

        let drained: Vec<String> = queue.drain().into_iter().map(|v| v.id.to_string()).collect();
        assert_eq!(drained, vec!["a", "c"]);
        assert!(queue.is_empty());
        assert_eq!(queue.total_cost(), 0);
    }

    #[test]
    fn budget_to_weight() {
        assert_eq!(max_weight_for_budget(0), 0);
        assert_eq!(max_weight_for_budget(99), 9);
        assert_eq!(max_weight_for_budget(100), 10);
        assert_eq!(max_weight_for_budget(u64::MAX), u32::MAX);
    }
}
