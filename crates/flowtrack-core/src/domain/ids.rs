//! Task identifiers.
//!
//! # 2 種類の ID
//! - **Temp**: ローカルで作成した直後に振る一時 ID（ミリ秒タイムスタンプ）
//! - **Remote**: RemoteStore が永続化時に採番した確定 ID
//!
//! 一時 ID は確定後に Remote へ丸ごと置き換えられる（部分的な置換はしない）。
//! serde では untagged（数値 or 文字列）として扱うので、
//! 既存のドキュメント形式（数値 ID のデモデータ、文字列 ID の保存済みデータ）と互換。

use serde::{Deserialize, Serialize};
use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskId {
    /// Locally assigned, not (yet) known to the remote store.
    Temp(u64),
    /// Assigned by the remote store.
    Remote(String),
}

impl TaskId {
    pub fn remote(id: impl Into<String>) -> Self {
        Self::Remote(id.into())
    }

    pub fn is_temp(&self) -> bool {
        matches!(self, TaskId::Temp(_))
    }

    /// Remote document id, if this id has been assigned by the store.
    pub fn as_remote(&self) -> Option<&str> {
        match self {
            TaskId::Remote(id) => Some(id),
            TaskId::Temp(_) => None,
        }
    }
}

impl From<u64> for TaskId {
    fn from(value: u64) -> Self {
        Self::Temp(value)
    }
}

impl From<&str> for TaskId {
    fn from(value: &str) -> Self {
        Self::Remote(value.to_string())
    }
}

impl From<String> for TaskId {
    fn from(value: String) -> Self {
        Self::Remote(value)
    }
}

/// All-digit input is a temp id, anything else a remote id.
///
/// A store that assigns numeric document ids is not told apart here; look
/// those up with `TaskStore::resolve`.
impl FromStr for TaskId {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Ok(match s.parse::<u64>() {
            Ok(n) => TaskId::Temp(n),
            Err(_) => TaskId::Remote(s.to_string()),
        })
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TaskId::Temp(n) => write!(f, "{n}"),
            TaskId::Remote(id) => f.write_str(id),
        }
    }
}
