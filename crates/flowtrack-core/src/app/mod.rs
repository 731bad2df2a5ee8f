//! App - アプリケーション層
//!
//! ports を組み合わせて、ビューから使う操作を提供します。
//!
//! # 主要コンポーネント
//! - **TaskStore**: タスクコレクションの所有者（楽観的更新 + RemoteStore との突き合わせ）
//! - **AppBuilder**: 設定からのワイヤリングと起動時検証
//! - **TaskCounts**: 進捗表示用の集計
//! - **demo**: RemoteStore が空・失敗のときのデモデータ

pub mod builder;
pub mod demo;
pub mod status;
pub mod task_store;

// 主要な型を再エクスポート
pub use self::builder::{App, AppBuilder, BuildError};
pub use self::demo::demo_tasks;
pub use self::status::TaskCounts;
pub use self::task_store::{AddedTask, SyncHandle, SyncOutcome, TaskStore};
