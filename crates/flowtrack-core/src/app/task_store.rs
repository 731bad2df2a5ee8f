//! TaskStore - タスクコレクションの所有者
//!
//! ビューから見たタスクの正本。変更はまずローカルに反映し、
//! RemoteStore への書き込みは spawn したタスクで後から行う（楽観的更新）。
//!
//! # 設計原則
//! - コレクションは tokio::sync::Mutex で保護し、ロックを握ったまま await しない
//! - remote への update/delete は write lane で直列化し、送る値は lane の中で読み直す
//!   （後から届いた古い値で上書きしない）
//! - update/delete を remote に送るのは `SyncState::Confirmed` のタスクだけ
//! - 確定前に変更されたタスクは、確定後に差分を送り直す
//! - 確定前に削除されたタスクは tombstone に記録し、確定した remote 側のドキュメントを削除する
//! - 確定前に load でコレクションが置き換わっても、確定したタスクは失わない
//! - 変更は全て `StoreEvent` として broadcast する

use std::collections::HashSet;
use std::future::Future;
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::{Mutex, broadcast};
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use super::demo::demo_tasks;
use super::status::TaskCounts;
use crate::domain::{
    LoadSource, Priority, Status, StoreEvent, SyncState, Task, TaskExtras, TaskId, TaskPatch,
    TaskRecord,
};
use crate::error::{Error, Result};
use crate::ports::{Clock, IdGenerator, MillisIdGenerator, RemoteError, RemoteStore};

const EVENT_CAPACITY: usize = 64;

/// How a background sync ended.
#[derive(Debug, Clone, PartialEq)]
pub enum SyncOutcome {
    /// The remote store accepted a new task under this id.
    Confirmed(TaskId),
    /// An update or delete reached the remote store.
    Synced,
    /// Nothing had to be sent.
    Skipped,
    /// The task was deleted locally before its add settled.
    Discarded,
    Failed(RemoteError),
    /// The background task panicked or was cancelled.
    Aborted,
}

/// Completion handle for the remote half of a mutation.
///
/// Dropping it does not cancel the sync.
#[derive(Debug)]
pub struct SyncHandle {
    join: Option<JoinHandle<SyncOutcome>>,
}

impl SyncHandle {
    fn spawn<F>(job: F) -> Self
    where
        F: Future<Output = SyncOutcome> + Send + 'static,
    {
        Self {
            join: Some(tokio::spawn(job)),
        }
    }

    fn skipped() -> Self {
        Self { join: None }
    }

    /// Whether a remote call was started for this mutation.
    pub fn is_remote(&self) -> bool {
        self.join.is_some()
    }

    /// Wait for the remote round-trip to finish.
    pub async fn settled(self) -> SyncOutcome {
        match self.join {
            None => SyncOutcome::Skipped,
            Some(join) => join.await.unwrap_or_else(|err| {
                warn!(error = %err, "sync task did not complete");
                SyncOutcome::Aborted
            }),
        }
    }
}

/// Result of [`TaskStore::add`].
#[derive(Debug)]
pub struct AddedTask {
    /// The temporary id. Replaced in the collection once confirmed.
    pub id: TaskId,
    pub sync: SyncHandle,
}

/// TaskStore は明示的に渡して使うハンドル（clone しても同じコレクションを指す）
///
/// # 使用例
/// ```ignore
/// let store = TaskStore::new(remote, clock);
/// store.load().await;
/// let added = store.add("Write docs", Priority::High, "2026-02-05", TaskExtras::default()).await?;
/// added.sync.settled().await;
/// ```
#[derive(Clone)]
pub struct TaskStore {
    inner: Arc<Inner>,
}

struct Inner {
    state: Mutex<Collection>,
    remote: Arc<dyn RemoteStore>,
    ids: Arc<dyn IdGenerator>,
    clock: Arc<dyn Clock>,
    events: broadcast::Sender<StoreEvent>,
    /// Serializes remote update/delete calls.
    write_lane: Mutex<()>,
}

/// The collection plus bookkeeping for adds still in flight.
#[derive(Default)]
struct Collection {
    tasks: Vec<Task>,
    /// Temp ids whose add has not settled yet.
    persisting: HashSet<TaskId>,
    /// Ids from `persisting` that were deleted locally.
    tombstones: HashSet<TaskId>,
}

/// Where a confirmed add ends up.
enum Settled {
    /// Still held under its temp id. Carries edits made while in flight.
    InPlace(TaskPatch),
    /// A reload dropped the temp id; the confirmed task was put back.
    Reinserted,
    /// Deleted locally while in flight. `reloaded` when a reload had already
    /// brought the stored copy into the collection.
    Deleted { reloaded: bool },
}

impl TaskStore {
    /// Temp ids come from a [`MillisIdGenerator`] on `clock`.
    pub fn new(remote: Arc<dyn RemoteStore>, clock: Arc<dyn Clock>) -> Self {
        let ids = Arc::new(MillisIdGenerator::new(clock.clone()));
        Self::with_id_generator(remote, ids, clock)
    }

    pub fn with_id_generator(
        remote: Arc<dyn RemoteStore>,
        ids: Arc<dyn IdGenerator>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        let (events, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            inner: Arc::new(Inner {
                state: Mutex::new(Collection::default()),
                remote,
                ids,
                clock,
                events,
                write_lane: Mutex::new(()),
            }),
        }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<StoreEvent> {
        self.inner.events.subscribe()
    }

    pub fn today(&self) -> NaiveDate {
        self.inner.clock.today()
    }

    /// Replace the collection with the remote contents, or with the demo set
    /// when the remote store fails or is empty.
    pub async fn load(&self) -> LoadSource {
        let (tasks, source) = match self.inner.remote.get_all().await {
            Ok(docs) if !docs.is_empty() => (
                docs.into_iter().map(Task::from_stored).collect::<Vec<_>>(),
                LoadSource::Remote,
            ),
            Ok(_) => {
                info!("remote store is empty; showing demo tasks");
                (demo_tasks(), LoadSource::Demo)
            }
            Err(err) => {
                warn!(error = %err, "failed to load tasks; showing demo tasks");
                (demo_tasks(), LoadSource::Demo)
            }
        };

        let count = tasks.len();
        self.inner.state.lock().await.tasks = tasks;
        info!(count, ?source, "tasks loaded");
        self.emit(StoreEvent::Loaded { count, source });
        source
    }

    /// Append a task under a temporary id and persist it in the background.
    pub async fn add(
        &self,
        title: &str,
        priority: Priority,
        date: &str,
        extras: TaskExtras,
    ) -> Result<AddedTask> {
        let title = title.trim();
        if title.is_empty() {
            return Err(Error::EmptyTitle);
        }
        let date = date.trim();
        if date.is_empty() {
            return Err(Error::MissingDate);
        }

        let created_at = self.inner.clock.now_utc();
        let (id, record) = {
            let mut state = self.inner.state.lock().await;
            let mut id = self.inner.ids.generate_temp_id();
            while state.tasks.iter().any(|t| t.id == id) {
                id = self.inner.ids.generate_temp_id();
            }
            let task = Task::new_local(id.clone(), title, priority, date, extras, created_at);
            let record = task.to_record();
            state.tasks.push(task);
            state.persisting.insert(id.clone());
            (id, record)
        };

        debug!(%id, title, "task added locally");
        self.emit(StoreEvent::Added { id: id.clone() });
        let sync = self.spawn_persist(id.clone(), record);
        Ok(AddedTask { id, sync })
    }

    /// Flip pending/completed. `None` when the id is unknown.
    pub async fn toggle(&self, id: &TaskId) -> Option<(Status, SyncHandle)> {
        let (status, confirmed) = {
            let mut state = self.inner.state.lock().await;
            let task = state.tasks.iter_mut().find(|t| &t.id == id)?;
            task.status = task.status.toggled();
            (task.status, task.sync.is_confirmed())
        };

        debug!(%id, ?status, "task toggled");
        self.emit(StoreEvent::Toggled {
            id: id.clone(),
            status,
        });
        let sync = if confirmed {
            self.spawn_update(id.clone(), TaskPatch::status(status))
        } else {
            SyncHandle::skipped()
        };
        Some((status, sync))
    }

    /// Apply a partial update.
    pub async fn update(&self, id: &TaskId, patch: TaskPatch) -> Result<SyncHandle> {
        if patch.title.as_deref().is_some_and(|t| t.trim().is_empty()) {
            return Err(Error::EmptyTitle);
        }
        if patch.date.as_deref().is_some_and(|d| d.trim().is_empty()) {
            return Err(Error::MissingDate);
        }

        let confirmed = {
            let mut state = self.inner.state.lock().await;
            let task = state
                .tasks
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
            task.apply(&patch);
            task.sync.is_confirmed()
        };

        self.emit(StoreEvent::Updated { id: id.clone() });
        Ok(if confirmed && !patch.is_empty() {
            self.spawn_update(id.clone(), patch)
        } else {
            SyncHandle::skipped()
        })
    }

    /// Remove a task. `None` when the id is unknown.
    pub async fn delete(&self, id: &TaskId) -> Option<SyncHandle> {
        let removed = {
            let mut state = self.inner.state.lock().await;
            let index = state.tasks.iter().position(|t| &t.id == id)?;
            if state.persisting.contains(id) {
                state.tombstones.insert(id.clone());
            }
            state.tasks.remove(index)
        };

        debug!(%id, "task deleted locally");
        self.emit(StoreEvent::Deleted { id: id.clone() });
        Some(if removed.sync.is_confirmed() {
            self.spawn_delete(removed.id)
        } else {
            SyncHandle::skipped()
        })
    }

    /// Send a task whose persist attempt failed to the remote store again.
    pub async fn retry(&self, id: &TaskId) -> Result<SyncHandle> {
        let record = {
            let mut state = self.inner.state.lock().await;
            let task = state
                .tasks
                .iter_mut()
                .find(|t| &t.id == id)
                .ok_or_else(|| Error::TaskNotFound(id.clone()))?;
            if task.sync != SyncState::Failed {
                return Err(Error::NotRetryable {
                    id: id.clone(),
                    state: task.sync,
                });
            }
            task.sync = SyncState::Local;
            let record = task.to_record();
            state.persisting.insert(id.clone());
            record
        };

        info!(%id, "retrying persist");
        self.emit(StoreEvent::RetryRequested { id: id.clone() });
        Ok(self.spawn_persist(id.clone(), record))
    }

    pub async fn tasks(&self) -> Vec<Task> {
        self.inner.state.lock().await.tasks.clone()
    }

    pub async fn get(&self, id: &TaskId) -> Option<Task> {
        self.with_task(id, Task::clone).await
    }

    /// Find a task from the text form of its id.
    ///
    /// All-digit text parses as a temp id, but a remote store may hand out
    /// numeric document ids too; those are matched on their text.
    pub async fn resolve(&self, raw: &str) -> Option<TaskId> {
        let raw = raw.trim();
        let parsed: TaskId = raw.parse().ok()?;
        let state = self.inner.state.lock().await;
        state
            .tasks
            .iter()
            .find(|t| t.id == parsed)
            .or_else(|| state.tasks.iter().find(|t| t.id.to_string() == raw))
            .map(|t| t.id.clone())
    }

    /// Tasks whose `date` is exactly `date` (`YYYY-MM-DD`).
    pub async fn tasks_on(&self, date: &str) -> Vec<Task> {
        let state = self.inner.state.lock().await;
        state.tasks.iter().filter(|t| t.date == date).cloned().collect()
    }

    pub async fn counts(&self) -> TaskCounts {
        TaskCounts::from_tasks(&self.inner.state.lock().await.tasks)
    }

    fn emit(&self, event: StoreEvent) {
        // 購読者がいなければ送信エラーになるが、無視してよい
        let _ = self.inner.events.send(event);
    }

    async fn with_task<T>(&self, id: &TaskId, f: impl FnOnce(&Task) -> T) -> Option<T> {
        let state = self.inner.state.lock().await;
        state.tasks.iter().find(|t| &t.id == id).map(f)
    }

    fn spawn_persist(&self, temp_id: TaskId, record: TaskRecord) -> SyncHandle {
        let store = self.clone();
        SyncHandle::spawn(async move { store.persist(temp_id, record).await })
    }

    fn spawn_update(&self, id: TaskId, patch: TaskPatch) -> SyncHandle {
        let store = self.clone();
        SyncHandle::spawn(async move { store.push_update(&id, &patch).await })
    }

    fn spawn_delete(&self, id: TaskId) -> SyncHandle {
        let store = self.clone();
        SyncHandle::spawn(async move { store.push_delete(&id).await })
    }

    /// `fallback` is the body captured when the add was queued. It is sent
    /// when a reload has already dropped the temp id from the collection.
    async fn persist(&self, temp_id: TaskId, fallback: TaskRecord) -> SyncOutcome {
        let sent = {
            let mut state = self.inner.state.lock().await;
            if state.tombstones.remove(&temp_id) {
                state.persisting.remove(&temp_id);
                debug!(%temp_id, "task deleted before persist started");
                return SyncOutcome::Discarded;
            }
            match state.tasks.iter().find(|t| t.id == temp_id) {
                Some(task) => task.to_record(),
                None => fallback,
            }
        };

        match self.inner.remote.add(&sent).await {
            Ok(stored) => self.confirm(temp_id, &sent, stored.id).await,
            Err(err) => {
                warn!(id = %temp_id, error = %err, "failed to persist task; keeping it locally");
                let marked = {
                    let mut state = self.inner.state.lock().await;
                    state.persisting.remove(&temp_id);
                    if state.tombstones.remove(&temp_id) {
                        false
                    } else {
                        match state.tasks.iter_mut().find(|t| t.id == temp_id) {
                            Some(task) => task.sync = SyncState::Failed,
                            None => state.tasks.push(Task::from_record(
                                temp_id.clone(),
                                sent,
                                SyncState::Failed,
                            )),
                        }
                        true
                    }
                };
                if marked {
                    self.emit(StoreEvent::PersistFailed { id: temp_id });
                }
                SyncOutcome::Failed(err)
            }
        }
    }

    /// Swap the temp id for the store id, then reconcile anything that
    /// happened to the task while the add was in flight.
    async fn confirm(&self, temp_id: TaskId, sent: &TaskRecord, remote_id: String) -> SyncOutcome {
        let id = TaskId::Remote(remote_id);
        let settled = {
            let mut state = self.inner.state.lock().await;
            state.persisting.remove(&temp_id);
            if state.tombstones.remove(&temp_id) {
                let before = state.tasks.len();
                state.tasks.retain(|t| t.id != id);
                Settled::Deleted {
                    reloaded: state.tasks.len() != before,
                }
            } else if let Some(task) = state.tasks.iter_mut().find(|t| t.id == temp_id) {
                task.id = id.clone();
                task.sync = SyncState::Confirmed;
                Settled::InPlace(TaskPatch::changes_since(sent, task))
            } else {
                // load() が一時 ID ごとコレクションを置き換えた
                if !state.tasks.iter().any(|t| t.id == id) {
                    state
                        .tasks
                        .push(Task::from_record(id.clone(), sent.clone(), SyncState::Confirmed));
                }
                Settled::Reinserted
            }
        };

        let changes = match settled {
            Settled::Deleted { reloaded } => {
                info!(%temp_id, %id, "task deleted before confirmation; removing remote copy");
                if reloaded {
                    self.emit(StoreEvent::Deleted { id: id.clone() });
                }
                if let SyncOutcome::Failed(err) = self.push_delete(&id).await {
                    return SyncOutcome::Failed(err);
                }
                return SyncOutcome::Discarded;
            }
            Settled::Reinserted => {
                info!(%temp_id, %id, "collection reloaded while add was in flight; keeping confirmed task");
                TaskPatch::default()
            }
            Settled::InPlace(changes) => {
                info!(%temp_id, %id, "task confirmed");
                changes
            }
        };

        self.emit(StoreEvent::Confirmed {
            temp_id,
            id: id.clone(),
        });

        if !changes.is_empty() {
            debug!(%id, "replaying local edits made before confirmation");
            self.push_update(&id, &changes).await;
        }
        SyncOutcome::Confirmed(id)
    }

    async fn push_update(&self, id: &TaskId, patch: &TaskPatch) -> SyncOutcome {
        let Some(remote_id) = id.as_remote() else {
            return SyncOutcome::Skipped;
        };
        let _lane = self.inner.write_lane.lock().await;
        let Some(patch) = self.with_task(id, |task| patch.refreshed_from(task)).await else {
            debug!(%id, "task gone before update was sent");
            return SyncOutcome::Skipped;
        };

        match self.inner.remote.update(remote_id, &patch).await {
            Ok(()) => {
                debug!(%id, "remote update applied");
                SyncOutcome::Synced
            }
            Err(err) => {
                warn!(%id, error = %err, "remote update failed; keeping local change");
                SyncOutcome::Failed(err)
            }
        }
    }

    async fn push_delete(&self, id: &TaskId) -> SyncOutcome {
        let Some(remote_id) = id.as_remote() else {
            return SyncOutcome::Skipped;
        };
        let _lane = self.inner.write_lane.lock().await;

        match self.inner.remote.delete(remote_id).await {
            Ok(()) => {
                debug!(%id, "remote delete applied");
                SyncOutcome::Synced
            }
            Err(err) => {
                warn!(%id, error = %err, "remote delete failed");
                SyncOutcome::Failed(err)
            }
        }
    }
}
