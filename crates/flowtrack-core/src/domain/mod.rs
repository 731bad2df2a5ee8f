//! Domain model (task, ids, sync state, events, advisory cache).

pub mod advisory;
pub mod events;
pub mod ids;
pub mod state;
pub mod task;

pub use advisory::{AdvisoryAction, AdvisoryPatch, AdvisoryState};
pub use events::StoreEvent;
pub use ids::TaskId;
pub use state::{LoadSource, SyncState};
pub use task::{Priority, Status, StoredTask, Task, TaskExtras, TaskPatch, TaskRecord};
