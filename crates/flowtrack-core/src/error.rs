use thiserror::Error;

use crate::app::BuildError;
use crate::domain::{SyncState, TaskId};
use crate::ports::RemoteError;

#[derive(Debug, Error)]
pub enum Error {
    #[error("task title must not be empty")]
    EmptyTitle,

    #[error("task date must not be empty")]
    MissingDate,

    #[error("unknown priority: {0}")]
    InvalidPriority(String),

    #[error("task not found: id={0}")]
    TaskNotFound(TaskId),

    #[error("task id={id} has nothing to retry (sync={state:?})")]
    NotRetryable { id: TaskId, state: SyncState },

    #[error("config: {0}")]
    Config(String),

    #[error("insights store: {0}")]
    Insights(String),

    #[error("json: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Build(#[from] BuildError),

    #[error(transparent)]
    Remote(#[from] RemoteError),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
