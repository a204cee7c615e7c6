use mgrant_store::StoreError;
use mgrant_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum GovernanceError {
    #[error("draft id is required")]
    MissingDraftId,

    #[error("comment text is empty")]
    EmptyComment,

    #[error("comment author is required")]
    MissingAuthor,

    #[error("execution time {execution_time} is not after now ({now})")]
    ExecutionTimeNotInFuture { execution_time: u64, now: u64 },

    #[error("scheduled vote {0} not found")]
    ScheduledVoteNotFound(String),

    #[error("scheduled vote {0} is already settled or being submitted")]
    VoteAlreadyFinal(String),

    #[error("vote weight must be at least 1")]
    ZeroWeight,

    #[error("vote {0} is already queued")]
    DuplicateQueuedVote(String),

    #[error("queued vote {0} not found")]
    QueuedVoteNotFound(String),

    #[error(transparent)]
    Types(#[from] TypesError),

    #[error("storage error: {0}")]
    Store(#[from] StoreError),
}
