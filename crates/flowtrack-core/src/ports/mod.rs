//! Ports - 抽象化レイヤー
//!
//! このモジュールは Hexagonal Architecture の「ポート」を定義します。
//! 各 trait は外部システム（リモートのドキュメントストア、ローカルキャッシュ、時計）への
//! インターフェースを提供し、実装の詳細を隠蔽します。
//!
//! # 設計原則
//! - メモリ上の TaskStore が UI から見た正本
//! - RemoteStore は永続化先（確定 ID を採番する）
//! - InsightsStore はアドバイス状態の二次キャッシュ

pub mod clock;
pub mod id_generator;
pub mod insights_store;
pub mod remote_store;

// 主要な trait を再エクスポート
pub use self::clock::{Clock, FixedClock, SystemClock};
pub use self::id_generator::{IdGenerator, MillisIdGenerator};
pub use self::insights_store::InsightsStore;
pub use self::remote_store::{RemoteError, RemoteStore};
