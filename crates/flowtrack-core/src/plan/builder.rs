//! Daily plan: the top pending tasks in plan order, each paired with a tip.

use chrono::NaiveDate;
use serde::Serialize;

use super::ranking::{parse_deadline, plan_order};
use super::tips::FALLBACK_TIPS;
use crate::domain::Task;

/// One line of the daily plan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PlanItem {
    pub title: String,
    /// `"No deadline"` or an abbreviated month and day, e.g. `"Feb 5"`.
    pub deadline: String,
    pub tip: String,
}

/// Result of [`PlanBuilder::build`].
///
/// `Empty` is its own variant so callers render an empty state instead of an
/// empty list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "items", rename_all = "lowercase")]
pub enum DailyPlan {
    Empty,
    Ready(Vec<PlanItem>),
}

impl DailyPlan {
    pub fn items(&self) -> &[PlanItem] {
        match self {
            DailyPlan::Empty => &[],
            DailyPlan::Ready(items) => items,
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, DailyPlan::Empty)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlanBuilder {
    size: usize,
}

impl PlanBuilder {
    pub const DEFAULT_SIZE: usize = 3;

    pub fn new(size: usize) -> Self {
        Self { size }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    /// Picks the first `size` tasks that are not completed, in plan order.
    /// Tips cycle through `tip_pool` by position; an empty pool falls back to
    /// [`FALLBACK_TIPS`].
    pub fn build(&self, tasks: &[Task], tip_pool: &[String], today: NaiveDate) -> DailyPlan {
        let pending = tasks.iter().filter(|t| !t.status.is_completed());
        let selected: Vec<&Task> = plan_order(pending, today)
            .into_iter()
            .take(self.size)
            .collect();
        if selected.is_empty() {
            return DailyPlan::Empty;
        }

        let fallback: Vec<String>;
        let tips: &[String] = if tip_pool.is_empty() {
            fallback = FALLBACK_TIPS.iter().map(|t| t.to_string()).collect();
            &fallback
        } else {
            tip_pool
        };

        let items = selected
            .into_iter()
            .enumerate()
            .map(|(index, task)| PlanItem {
                title: task.title.clone(),
                deadline: format_deadline(task.effective_deadline()),
                tip: tips[index % tips.len()].clone(),
            })
            .collect();
        DailyPlan::Ready(items)
    }
}

impl Default for PlanBuilder {
    fn default() -> Self {
        Self::new(Self::DEFAULT_SIZE)
    }
}

/// `"Feb 5"` style, or `"No deadline"` when absent or unparseable.
pub fn format_deadline(raw: Option<&str>) -> String {
    raw.and_then(parse_deadline)
        .map(|dt| dt.format("%b %-d").to_string())
        .unwrap_or_else(|| "No deadline".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, Status, TaskExtras, TaskId};
    use chrono::{TimeZone, Utc};

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 6).unwrap()
    }

    fn task(title: &str, priority: Priority, date: &str, status: Status) -> Task {
        let mut t = Task::new_local(
            TaskId::Temp(0),
            title,
            priority,
            date,
            TaskExtras::default(),
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        );
        t.status = status;
        t
    }

    fn demo_like() -> Vec<Task> {
        vec![
            task("Payment UI", Priority::High, "2026-02-05", Status::Pending),
            task("Dashboard Fix", Priority::Medium, "2026-02-06", Status::Pending),
            task("Update Docs", Priority::Low, "2026-02-07", Status::Completed),
            task("Client Call", Priority::Ontime, "2026-02-08", Status::Pending),
            task("Review mockups", Priority::High, "2026-02-04", Status::Pending),
            task("Team meeting", Priority::Medium, "2026-02-10", Status::Pending),
        ]
    }

    #[test]
    fn picks_three_pending_in_plan_order() {
        let plan = PlanBuilder::default().build(&demo_like(), &[], today());
        let titles: Vec<_> = plan.items().iter().map(|i| i.title.as_str()).collect();

        // 期限切れ(high) 2 件: 期限の早い順、その後に今日が期限の task
        assert_eq!(titles, ["Review mockups", "Payment UI", "Dashboard Fix"]);
        assert_eq!(plan.items()[0].deadline, "Feb 4");
        assert_eq!(plan.items()[2].deadline, "Feb 6");
    }

    #[test]
    fn never_includes_completed_tasks() {
        let tasks = vec![
            task("done", Priority::High, "2026-02-01", Status::Completed),
            task("open", Priority::Low, "2026-03-01", Status::Pending),
        ];
        let plan = PlanBuilder::new(5).build(&tasks, &[], today());
        assert_eq!(plan.items().len(), 1);
        assert_eq!(plan.items()[0].title, "open");
    }

    #[test]
    fn tips_cycle_by_position() {
        let pool = vec!["first".to_string(), "second".to_string()];
        let plan = PlanBuilder::default().build(&demo_like(), &pool, today());
        let tips: Vec<_> = plan.items().iter().map(|i| i.tip.as_str()).collect();
        assert_eq!(tips, ["first", "second", "first"]);
    }

    #[test]
    fn empty_pool_uses_fallback_tips() {
        let plan = PlanBuilder::default().build(&demo_like(), &[], today());
        assert_eq!(plan.items()[0].tip, FALLBACK_TIPS[0]);
        assert_eq!(plan.items()[2].tip, FALLBACK_TIPS[2]);
    }

    #[test]
    fn no_pending_tasks_is_the_empty_state() {
        let tasks = vec![task("done", Priority::High, "2026-02-01", Status::Completed)];
        let plan = PlanBuilder::default().build(&tasks, &[], today());
        assert!(plan.is_empty());
        assert_eq!(plan, DailyPlan::Empty);
        assert!(PlanBuilder::default().build(&[], &[], today()).is_empty());
    }

    #[test]
    fn missing_or_bad_deadline_formats_as_no_deadline() {
        assert_eq!(format_deadline(None), "No deadline");
        assert_eq!(format_deadline(Some("tomorrow")), "No deadline");
        assert_eq!(format_deadline(Some("2026-12-25")), "Dec 25");
    }

    #[test]
    fn serializes_with_explicit_kind() {
        let json = serde_json::to_value(DailyPlan::Empty).unwrap();
        assert_eq!(json, serde_json::json!({"kind": "empty"}));
    }
}
