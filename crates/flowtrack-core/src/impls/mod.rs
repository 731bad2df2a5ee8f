//! Impls - ports の実装
//!
//! # 含まれる実装
//! - **InMemoryRemoteStore**: 開発・テスト用のドキュメントストア
//! - **JsonFileRemoteStore**: JSON ファイルに永続化するドキュメントストア
//! - **InMemoryInsightsStore** / **JsonFileInsightsStore**: アドバイスキャッシュ

pub mod inmem_insights;
pub mod inmem_remote;
pub mod json_file_insights;
pub mod json_file_remote;

// 主要な型を再エクスポート
pub use self::inmem_insights::InMemoryInsightsStore;
pub use self::inmem_remote::{InMemoryRemoteStore, RemoteCall};
pub use self::json_file_insights::JsonFileInsightsStore;
pub use self::json_file_remote::JsonFileRemoteStore;

use crate::ports::Clock;
use ulid::Ulid;

/// ストア側で採番するドキュメント ID（ULID 文字列）
///
/// Clock から timestamp 部分を作るので、FixedClock でも一意（ランダム部分が異なる）。
pub(crate) fn mint_document_id(clock: &dyn Clock) -> String {
    let timestamp_ms = clock.now().timestamp_millis().max(0) as u64;
    Ulid::from_parts(timestamp_ms, rand::random()).to_string()
}
