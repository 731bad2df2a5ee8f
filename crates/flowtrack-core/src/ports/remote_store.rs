//! RemoteStore port - タスクを永続化するドキュメントストア
//!
//! RemoteStore は以下だけを提供します：
//! - 全件取得（get_all）
//! - 追加（add、ID はストア側で採番）
//! - 部分更新（update）
//! - 削除（delete）
//!
//! # 実装
//! - **InMemoryRemoteStore**: 開発・テスト用（失敗注入・一時停止つき）
//! - **JsonFileRemoteStore**: 単一 JSON ファイル

use async_trait::async_trait;
use thiserror::Error;

use crate::domain::{StoredTask, TaskPatch, TaskRecord};

/// RemoteError は RemoteStore の境界で起きた失敗
///
/// この境界から外には panic を出さない。呼び出し側（TaskStore）は
/// ログに残してローカル状態を維持する。
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RemoteError {
    #[error("remote store unavailable: {0}")]
    Unavailable(String),

    #[error("document not found: {0}")]
    NotFound(String),

    #[error("remote store I/O failed: {0}")]
    Io(String),

    #[error("malformed document data: {0}")]
    Malformed(String),
}

/// RemoteStore はタスクドキュメントのコレクション
///
/// # 設計原則
/// - ID はストアが採番する（`add` の戻り値で受け取る）
/// - `created_at` / `updated_at` はストア側で刻む
/// - 失敗は `RemoteError` で返す（null / false の代わり）
#[async_trait]
pub trait RemoteStore: Send + Sync {
    async fn get_all(&self) -> Result<Vec<StoredTask>, RemoteError>;

    async fn add(&self, task: &TaskRecord) -> Result<StoredTask, RemoteError>;

    async fn update(&self, id: &str, patch: &TaskPatch) -> Result<(), RemoteError>;

    async fn delete(&self, id: &str) -> Result<(), RemoteError>;
}
