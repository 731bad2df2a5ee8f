//! InMemoryRemoteStore - 開発・テスト用のドキュメントストア
//!
//! # 学習ポイント
//! - tokio::sync::Mutex で状態を保護（ロックを跨いで await しない）
//! - watch チャネルで書き込みを一時停止（確定待ちの間に起きる操作のテスト用）
//! - 失敗注入で「リモートが落ちている」状況を再現

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::{Mutex, watch};

use super::mint_document_id;
use crate::domain::{StoredTask, TaskPatch, TaskRecord};
use crate::ports::{Clock, RemoteError, RemoteStore, SystemClock};

/// RemoteStore に届いた呼び出しの記録
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteCall {
    GetAll,
    Add { title: String },
    Update { id: String, patch: TaskPatch },
    Delete { id: String },
}

#[derive(Default)]
struct RemoteState {
    /// 挿入順を保つ
    docs: Vec<StoredTask>,
    unavailable: bool,
    calls: Vec<RemoteCall>,
}

/// InMemoryRemoteStore は開発用のドキュメントストア
///
/// # 実装詳細
/// - Vec<StoredTask> で挿入順にドキュメントを管理
/// - `pause_writes()` 中は add/update/delete が `resume_writes()` まで待つ
/// - `set_unavailable(true)` 中は全操作が `RemoteError::Unavailable`
///
/// # 使用例
/// ```ignore
/// let remote = Arc::new(InMemoryRemoteStore::new());
/// remote.pause_writes();
/// let added = store.add("Write docs", Priority::High, "2026-02-05", TaskExtras::default()).await?;
/// // ... 確定前の操作 ...
/// remote.resume_writes();
/// added.sync.settled().await;
/// ```
pub struct InMemoryRemoteStore {
    state: Arc<Mutex<RemoteState>>,
    /// true = 書き込み可
    gate: watch::Sender<bool>,
    clock: Arc<dyn Clock>,
}

impl InMemoryRemoteStore {
    pub fn new() -> Self {
        Self::with_clock(Arc::new(SystemClock))
    }

    pub fn with_clock(clock: Arc<dyn Clock>) -> Self {
        let (gate, _) = watch::channel(true);
        Self {
            state: Arc::new(Mutex::new(RemoteState::default())),
            gate,
            clock,
        }
    }

    /// Insert a document directly, bypassing the gate and failure switch.
    pub async fn seed(&self, record: TaskRecord) -> String {
        let id = mint_document_id(self.clock.as_ref());
        self.seed_with_id(id.clone(), record).await;
        id
    }

    /// Like [`seed`](Self::seed), under a caller-chosen document id.
    pub async fn seed_with_id(&self, id: impl Into<String>, record: TaskRecord) {
        let mut state = self.state.lock().await;
        state.docs.push(StoredTask {
            id: id.into(),
            record,
        });
    }

    pub async fn set_unavailable(&self, unavailable: bool) {
        self.state.lock().await.unavailable = unavailable;
    }

    pub fn pause_writes(&self) {
        self.gate.send_replace(false);
    }

    pub fn resume_writes(&self) {
        self.gate.send_replace(true);
    }

    pub async fn documents(&self) -> Vec<StoredTask> {
        self.state.lock().await.docs.clone()
    }

    pub async fn calls(&self) -> Vec<RemoteCall> {
        self.state.lock().await.calls.clone()
    }

    async fn record_call(&self, call: RemoteCall) {
        self.state.lock().await.calls.push(call);
    }

    async fn wait_until_open(&self) {
        let mut rx = self.gate.subscribe();
        // Sender は self が持っているので closed にはならない
        let _ = rx.wait_for(|open| *open).await;
    }

    fn unavailable() -> RemoteError {
        RemoteError::Unavailable("in-memory store switched off".to_string())
    }
}

impl Default for InMemoryRemoteStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RemoteStore for InMemoryRemoteStore {
    async fn get_all(&self) -> Result<Vec<StoredTask>, RemoteError> {
        let mut state = self.state.lock().await;
        state.calls.push(RemoteCall::GetAll);
        if state.unavailable {
            return Err(Self::unavailable());
        }
        Ok(state.docs.clone())
    }

    async fn add(&self, task: &TaskRecord) -> Result<StoredTask, RemoteError> {
        self.record_call(RemoteCall::Add {
            title: task.title.clone(),
        })
        .await;
        self.wait_until_open().await;

        let now = self.clock.now_utc();
        let mut record = task.clone();
        record.created_at = record.created_at.or(Some(now));
        record.updated_at = Some(now);
        let stored = StoredTask {
            id: mint_document_id(self.clock.as_ref()),
            record,
        };

        let mut state = self.state.lock().await;
        if state.unavailable {
            return Err(Self::unavailable());
        }
        state.docs.push(stored.clone());
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<(), RemoteError> {
        self.record_call(RemoteCall::Update {
            id: id.to_string(),
            patch: patch.clone(),
        })
        .await;
        self.wait_until_open().await;

        let now = self.clock.now_utc();
        let mut state = self.state.lock().await;
        if state.unavailable {
            return Err(Self::unavailable());
        }
        let doc = state
            .docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        doc.record.apply(patch);
        doc.record.updated_at = Some(now);
        Ok(())
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        self.record_call(RemoteCall::Delete { id: id.to_string() })
            .await;
        self.wait_until_open().await;

        let mut state = self.state.lock().await;
        if state.unavailable {
            return Err(Self::unavailable());
        }
        // 存在しない ID の削除は成功扱い
        state.docs.retain(|d| d.id != id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, Status};
    use std::time::Duration;

    fn record(title: &str) -> TaskRecord {
        TaskRecord {
            title: title.to_string(),
            priority: Priority::Medium,
            date: "2026-02-06".to_string(),
            status: Status::Pending,
            time: None,
            deadline: None,
            reminder: None,
            created_at: None,
            updated_at: None,
        }
    }

    #[tokio::test]
    async fn add_assigns_id_and_stamps() {
        let remote = InMemoryRemoteStore::new();
        let stored = remote.add(&record("Dashboard Fix")).await.unwrap();

        assert!(stored.id.len() > 5);
        assert!(stored.record.created_at.is_some());
        assert!(stored.record.updated_at.is_some());
        assert_eq!(remote.get_all().await.unwrap(), vec![stored]);
    }

    #[tokio::test]
    async fn update_and_delete() {
        let remote = InMemoryRemoteStore::new();
        let id = remote.seed(record("Update Docs")).await;

        remote
            .update(&id, &TaskPatch::status(Status::Completed))
            .await
            .unwrap();
        assert_eq!(remote.documents().await[0].record.status, Status::Completed);

        remote.delete(&id).await.unwrap();
        assert!(remote.documents().await.is_empty());
        // 2 回目の削除も成功
        remote.delete(&id).await.unwrap();

        let err = remote
            .update(&id, &TaskPatch::status(Status::Pending))
            .await
            .unwrap_err();
        assert_eq!(err, RemoteError::NotFound(id));
    }

    #[tokio::test]
    async fn unavailable_fails_every_operation() {
        let remote = InMemoryRemoteStore::new();
        remote.set_unavailable(true).await;

        assert!(remote.get_all().await.is_err());
        assert!(remote.add(&record("x")).await.is_err());
        assert!(remote.documents().await.is_empty());
    }

    #[tokio::test]
    async fn paused_writes_wait_for_resume() {
        let remote = Arc::new(InMemoryRemoteStore::new());
        remote.pause_writes();

        let pending = tokio::spawn({
            let remote = remote.clone();
            async move { remote.add(&record("Team meeting")).await }
        });

        tokio::time::sleep(Duration::from_millis(50)).await;
        assert!(!pending.is_finished());
        assert_eq!(
            remote.calls().await,
            vec![RemoteCall::Add {
                title: "Team meeting".into()
            }]
        );

        remote.resume_writes();
        let stored = pending.await.unwrap().unwrap();
        assert_eq!(stored.record.title, "Team meeting");
    }
}
