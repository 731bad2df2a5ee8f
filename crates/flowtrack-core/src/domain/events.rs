//! Events - TaskStore の変更通知
//!
//! ビューは共有参照の書き換えを期待せず、このイベントを購読して再描画する。

use super::ids::TaskId;
use super::state::LoadSource;
use super::task::Status;

/// StoreEvent は TaskStore のコレクションが変わったことを通知
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StoreEvent {
    /// The whole collection was replaced.
    Loaded { count: usize, source: LoadSource },
    /// A task was appended under a temporary id.
    Added { id: TaskId },
    /// The remote store accepted a task; `temp_id` is gone from the collection.
    Confirmed { temp_id: TaskId, id: TaskId },
    /// Persisting a new task failed; it stays under its temporary id.
    PersistFailed { id: TaskId },
    /// A failed task was sent to the remote store again.
    RetryRequested { id: TaskId },
    Toggled { id: TaskId, status: Status },
    Updated { id: TaskId },
    Deleted { id: TaskId },
}

impl StoreEvent {
    /// The task the event is about, if it concerns a single task.
    pub fn task_id(&self) -> Option<&TaskId> {
        match self {
            StoreEvent::Loaded { .. } => None,
            StoreEvent::Added { id }
            | StoreEvent::PersistFailed { id }
            | StoreEvent::RetryRequested { id }
            | StoreEvent::Toggled { id, .. }
            | StoreEvent::Updated { id }
            | StoreEvent::Deleted { id } => Some(id),
            StoreEvent::Confirmed { id, .. } => Some(id),
        }
    }
}
