//! State - タスクの同期状態
//!
//! ID の長さなどから「確定済みかどうか」を推測せず、タスクごとに明示的に持つ。

use serde::{Deserialize, Serialize};

/// SyncState はローカルのタスクと RemoteStore の関係を表現
///
/// # 状態遷移
/// - Local -> Confirmed: add が成功し、確定 ID に置き換わった
/// - Local -> Failed: add が失敗した（ローカルには残る）
/// - Failed -> Local: retry で再送中
///
/// Remote への update/delete は Confirmed のときだけ送る。
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncState {
    /// Only known locally; a persist request may be in flight.
    #[default]
    Local,
    /// Persisted; the id is the store-assigned one.
    Confirmed,
    /// The last persist attempt failed. Eligible for retry.
    Failed,
}

impl SyncState {
    pub fn is_confirmed(self) -> bool {
        self == SyncState::Confirmed
    }
}

/// Where the collection came from on the last `load`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LoadSource {
    Remote,
    Demo,
}
