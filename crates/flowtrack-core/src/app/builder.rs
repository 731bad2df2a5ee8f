//! AppBuilder - アプリケーションの構築とワイヤリング
//!
//! # 設計原則
//! - 起動時検証（Fail-fast）: 不正な設定は build() で BuildError
//! - 差し替えなかった port は設定から組み立てる
//!   （パスがあれば JSON ファイル、無ければメモリ上）

use std::sync::Arc;

use tracing::debug;

use super::task_store::TaskStore;
use crate::calendar::MonthCursor;
use crate::config::PlannerConfig;
use crate::domain::{AdvisoryAction, AdvisoryPatch, AdvisoryState};
use crate::error::Result;
use crate::impls::{
    InMemoryInsightsStore, InMemoryRemoteStore, JsonFileInsightsStore, JsonFileRemoteStore,
};
use crate::plan::{DailyPlan, PlanBuilder, extract_tips, tip_pool};
use crate::ports::{Clock, InsightsStore, RemoteStore, SystemClock};

/// AppBuilder は App を構築
///
/// # 使用例
/// ```ignore
/// let app = AppBuilder::from_config(PlannerConfig::load(None)?)
///     .clock(Arc::new(FixedClock::on(today)))
///     .build()?;
/// app.store.load().await;
/// let plan = app.daily_plan().await;
/// ```
pub struct AppBuilder {
    config: PlannerConfig,
    clock: Option<Arc<dyn Clock>>,
    remote: Option<Arc<dyn RemoteStore>>,
    insights: Option<Arc<dyn InsightsStore>>,
}

/// BuildError はアプリケーション構築時のエラー
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("plan_size must be at least 1")]
    InvalidPlanSize,
}

impl AppBuilder {
    pub fn new() -> Self {
        Self::from_config(PlannerConfig::default())
    }

    pub fn from_config(config: PlannerConfig) -> Self {
        Self {
            config,
            clock: None,
            remote: None,
            insights: None,
        }
    }

    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn remote(mut self, remote: Arc<dyn RemoteStore>) -> Self {
        self.remote = Some(remote);
        self
    }

    pub fn insights(mut self, insights: Arc<dyn InsightsStore>) -> Self {
        self.insights = Some(insights);
        self
    }

    pub fn build(self) -> Result<App, BuildError> {
        if self.config.plan_size == 0 {
            return Err(BuildError::InvalidPlanSize);
        }

        let clock: Arc<dyn Clock> = match self.clock {
            Some(clock) => clock,
            None => Arc::new(SystemClock),
        };
        let remote: Arc<dyn RemoteStore> = match self.remote {
            Some(remote) => remote,
            None => match &self.config.store_path {
                Some(path) => {
                    debug!(path = %path.display(), "using JSON file task store");
                    Arc::new(JsonFileRemoteStore::with_clock(path.clone(), clock.clone()))
                }
                None => Arc::new(InMemoryRemoteStore::with_clock(clock.clone())),
            },
        };
        let insights: Arc<dyn InsightsStore> = match self.insights {
            Some(insights) => insights,
            None => match &self.config.insights_path {
                Some(path) => {
                    Arc::new(JsonFileInsightsStore::with_clock(path.clone(), clock.clone()))
                }
                None => Arc::new(InMemoryInsightsStore::with_clock(clock.clone())),
            },
        };

        Ok(App {
            store: TaskStore::new(remote, clock),
            insights,
            planner: PlanBuilder::new(self.config.plan_size),
            config: self.config,
        })
    }
}

impl Default for AppBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// App は TaskStore と周辺の port を束ねたもの
pub struct App {
    pub store: TaskStore,
    pub insights: Arc<dyn InsightsStore>,
    pub planner: PlanBuilder,
    pub config: PlannerConfig,
}

impl App {
    /// Today's plan from the current collection and the cached tips.
    pub async fn daily_plan(&self) -> DailyPlan {
        let tasks = self.store.tasks().await;
        let pool = tip_pool(&self.insights.read());
        self.planner.build(&tasks, &pool, self.store.today())
    }

    /// The month containing today.
    pub fn current_month(&self) -> MonthCursor {
        MonthCursor::from_date(self.store.today())
    }

    /// Cache an assistant reply: classify the question and keep any numbered
    /// tips from the answer for the daily plan.
    pub fn record_advice(&self, message: &str, response: &str) -> Result<AdvisoryState> {
        let tips = extract_tips(response);
        self.insights.merge(AdvisoryPatch {
            last_action: Some(AdvisoryAction::classify(message)),
            latest_response: Some(response.to_string()),
            latest_tips: (!tips.is_empty()).then_some(tips),
            ..AdvisoryPatch::default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ports::FixedClock;
    use chrono::NaiveDate;

    fn app() -> App {
        AppBuilder::new()
            .clock(Arc::new(FixedClock::on(
                NaiveDate::from_ymd_opt(2026, 2, 6).unwrap(),
            )))
            .build()
            .unwrap()
    }

    #[test]
    fn build_rejects_zero_plan_size() {
        let config = PlannerConfig {
            plan_size: 0,
            ..PlannerConfig::default()
        };
        assert!(matches!(
            AppBuilder::from_config(config).build(),
            Err(BuildError::InvalidPlanSize)
        ));
    }

    #[tokio::test]
    async fn daily_plan_from_demo_collection() {
        let app = app();
        app.store.load().await;

        let plan = app.daily_plan().await;
        let titles: Vec<_> = plan.items().iter().map(|i| i.title.as_str()).collect();
        assert_eq!(titles, ["Review mockups", "Payment UI", "Dashboard Fix"]);
        assert_eq!(app.current_month().title(), "February 2026");
    }

    #[tokio::test]
    async fn toggling_twice_leaves_the_plan_unchanged() {
        let app = app();
        for (title, date) in [("Payment UI", "2026-02-05"), ("Team meeting", "2026-02-10")] {
            let added = app
                .store
                .add(title, crate::domain::Priority::High, date, Default::default())
                .await
                .unwrap();
            added.sync.settled().await;
        }
        let before = app.daily_plan().await;
        assert_eq!(before.items().len(), 2);

        let id = app.store.tasks().await[0].id.clone();
        for _ in 0..2 {
            let (_, sync) = app.store.toggle(&id).await.unwrap();
            sync.settled().await;
        }
        assert_eq!(app.daily_plan().await, before);

        app.store.load().await;
        assert_eq!(app.daily_plan().await, before);
    }

    #[tokio::test]
    async fn recorded_tips_feed_the_plan() {
        let app = app();
        app.store.load().await;

        let state = app
            .record_advice(
                "Give me productivity tips",
                "Try these:\n1. **Single-task First** - one thing at a time\n2. Batch email",
            )
            .unwrap();
        assert_eq!(state.last_action, Some(AdvisoryAction::Tips));
        assert_eq!(state.latest_tips.len(), 2);

        let plan = app.daily_plan().await;
        let tips: Vec<_> = plan.items().iter().map(|i| i.tip.as_str()).collect();
        assert_eq!(
            tips,
            [
                "Single-task First - one thing at a time",
                "Batch email",
                "Single-task First - one thing at a time"
            ]
        );
    }
}
