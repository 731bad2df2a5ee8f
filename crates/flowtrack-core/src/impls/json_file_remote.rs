//! JsonFileRemoteStore - 単一 JSON ファイルをドキュメントストアとして使う
//!
//! CLI から複数回起動しても状態が残るようにするための実装。
//! ファイルが無ければ空のコレクションとして扱う。

use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::Mutex;

use super::mint_document_id;
use crate::domain::{StoredTask, TaskPatch, TaskRecord};
use crate::ports::{Clock, RemoteError, RemoteStore, SystemClock};

pub struct JsonFileRemoteStore {
    path: PathBuf,
    clock: Arc<dyn Clock>,
    /// read-modify-write を直列化する
    lock: Mutex<()>,
}

impl JsonFileRemoteStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self::with_clock(path, Arc::new(SystemClock))
    }

    pub fn with_clock(path: impl Into<PathBuf>, clock: Arc<dyn Clock>) -> Self {
        Self {
            path: path.into(),
            clock,
            lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_docs(&self) -> Result<Vec<StoredTask>, RemoteError> {
        let raw = match tokio::fs::read_to_string(&self.path).await {
            Ok(raw) => raw,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(RemoteError::Io(format!("{}: {e}", self.path.display()))),
        };
        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }
        serde_json::from_str(&raw)
            .map_err(|e| RemoteError::Malformed(format!("{}: {e}", self.path.display())))
    }

    async fn write_docs(&self, docs: &[StoredTask]) -> Result<(), RemoteError> {
        let json = serde_json::to_string_pretty(docs)
            .map_err(|e| RemoteError::Malformed(e.to_string()))?;
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RemoteError::Io(format!("{}: {e}", parent.display())))?;
        }
        tokio::fs::write(&self.path, json)
            .await
            .map_err(|e| RemoteError::Io(format!("{}: {e}", self.path.display())))
    }
}

#[async_trait]
impl RemoteStore for JsonFileRemoteStore {
    async fn get_all(&self) -> Result<Vec<StoredTask>, RemoteError> {
        let _guard = self.lock.lock().await;
        self.read_docs().await
    }

    async fn add(&self, task: &TaskRecord) -> Result<StoredTask, RemoteError> {
        let _guard = self.lock.lock().await;
        let mut docs = self.read_docs().await?;

        let now = self.clock.now_utc();
        let mut record = task.clone();
        record.created_at = record.created_at.or(Some(now));
        record.updated_at = Some(now);
        let stored = StoredTask {
            id: mint_document_id(self.clock.as_ref()),
            record,
        };
        docs.push(stored.clone());

        self.write_docs(&docs).await?;
        Ok(stored)
    }

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<(), RemoteError> {
        let _guard = self.lock.lock().await;
        let mut docs = self.read_docs().await?;

        let doc = docs
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| RemoteError::NotFound(id.to_string()))?;
        doc.record.apply(patch);
        doc.record.updated_at = Some(self.clock.now_utc());

        self.write_docs(&docs).await
    }

    async fn delete(&self, id: &str) -> Result<(), RemoteError> {
        let _guard = self.lock.lock().await;
        let mut docs = self.read_docs().await?;
        let before = docs.len();
        docs.retain(|d| d.id != id);
        if docs.len() == before {
            return Ok(());
        }
        self.write_docs(&docs).await
    }
}
