//! InsightsStore port - アドバイス状態のローカルキャッシュ
//!
//! 正本ではない二次キャッシュ。1 つのキー付き blob として保存し、
//! 書き込みは常に既存値へのマージ（置き換えではない）。
//!
//! # 実装
//! - **InMemoryInsightsStore**: テスト用
//! - **JsonFileInsightsStore**: JSON ファイル

use crate::domain::{AdvisoryPatch, AdvisoryState};
use crate::error::Result;

/// InsightsStore は AdvisoryState を読み書き
///
/// # 設計原則
/// - read は失敗しない（読めなければ空の状態を返し、ログに残す）
/// - merge は `updated_at` を刻んでマージ後の状態を返す
pub trait InsightsStore: Send + Sync {
    fn read(&self) -> AdvisoryState;

    fn merge(&self, patch: AdvisoryPatch) -> Result<AdvisoryState>;
}
