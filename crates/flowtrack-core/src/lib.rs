//! flowtrack-core
//!
//! Core of the FlowTrack planner: the task collection with optimistic sync
//! against a remote document store, task ranking, daily plan generation and
//! the month calendar grid.
//!
//! # モジュール構成
//! - **domain**: ドメインモデル（Task, TaskId, Priority, Status, SyncState, StoreEvent, advisory）
//! - **ports**: 抽象化レイヤー（RemoteStore, InsightsStore, Clock, IdGenerator）
//! - **impls**: 実装（InMemory / JSON ファイル）
//! - **app**: TaskStore, AppBuilder, 集計
//! - **plan**: 順位付け、デイリープラン、tip、focus リスト
//! - **calendar**: 月グリッドと月送り
//! - **config**: TOML + 環境変数の設定
//! - **observability**: tracing subscriber の初期化
//! - **error**: エラー型

pub mod app;
pub mod calendar;
pub mod config;
pub mod domain;
pub mod error;
pub mod impls;
pub mod observability;
pub mod plan;
pub mod ports;

pub use app::{App, AppBuilder, SyncHandle, SyncOutcome, TaskStore};
pub use config::PlannerConfig;
pub use error::{Error, Result};
