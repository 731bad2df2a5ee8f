//! Ranking: priority and urgency scores, and the two orderings built on them.
//!
//! Everything here is a pure function of its inputs (plus an explicit
//! `today`); no task is mutated.

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, NaiveDateTime};

use crate::domain::{Priority, Task};

/// Sentinel used for tasks without a usable deadline so they sort last.
pub const NO_DEADLINE: i64 = i64::MAX;

/// `high:3, medium:2, ontime:1, low:0`; anything else 0.
pub fn priority_rank(task: &Task) -> u8 {
    match task.priority {
        Priority::High => 3,
        Priority::Medium => 2,
        Priority::Ontime => 1,
        Priority::Low | Priority::Unknown => 0,
    }
}

/// 3 overdue, 2 due today, 1 due later, 0 when there is no parseable deadline.
pub fn urgency_rank(task: &Task, today: NaiveDate) -> u8 {
    let Some(deadline) = task.effective_deadline().and_then(parse_deadline) else {
        return 0;
    };
    match deadline.date().cmp(&today) {
        Ordering::Less => 3,
        Ordering::Equal => 2,
        Ordering::Greater => 1,
    }
}

/// Parses the date forms a deadline can take: a bare `YYYY-MM-DD`, a local
/// date-time with or without seconds, or RFC 3339.
pub fn parse_deadline(raw: &str) -> Option<NaiveDateTime> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0);
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S", "%Y-%m-%d %H:%M"] {
        if let Ok(dt) = NaiveDateTime::parse_from_str(raw, format) {
            return Some(dt);
        }
    }
    DateTime::parse_from_rfc3339(raw)
        .ok()
        .map(|dt| dt.naive_local())
}

/// Millisecond timestamp of the effective deadline, or [`NO_DEADLINE`].
pub fn deadline_timestamp(task: &Task) -> i64 {
    task.effective_deadline()
        .and_then(parse_deadline)
        .map(|dt| dt.and_utc().timestamp_millis())
        .unwrap_or(NO_DEADLINE)
}

/// Position in the focus list: `high:0, medium:1, ontime:2, low:3`.
pub fn focus_rank(priority: Priority) -> u8 {
    match priority {
        Priority::High => 0,
        Priority::Medium => 1,
        Priority::Ontime => 2,
        Priority::Low => 3,
        Priority::Unknown => 4,
    }
}

/// Focus-list order. Stable: equal priorities keep their input order.
pub fn focus_order<'a, I>(tasks: I) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut ordered: Vec<&Task> = tasks.into_iter().collect();
    ordered.sort_by_key(|t| focus_rank(t.priority));
    ordered
}

/// Daily-plan comparison: urgency desc, priority desc, deadline asc.
pub fn compare_for_plan(a: &Task, b: &Task, today: NaiveDate) -> Ordering {
    urgency_rank(b, today)
        .cmp(&urgency_rank(a, today))
        .then_with(|| priority_rank(b).cmp(&priority_rank(a)))
        .then_with(|| deadline_timestamp(a).cmp(&deadline_timestamp(b)))
}

/// Daily-plan order. Stable on full ties.
pub fn plan_order<'a, I>(tasks: I, today: NaiveDate) -> Vec<&'a Task>
where
    I: IntoIterator<Item = &'a Task>,
{
    let mut ordered: Vec<&Task> = tasks.into_iter().collect();
    ordered.sort_by(|a, b| compare_for_plan(a, b, today));
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{TaskExtras, TaskId};
    use chrono::{Days, TimeZone, Utc};
    use rstest::rstest;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 2, 6).unwrap()
    }

    fn task(title: &str, priority: Priority, date: &str) -> Task {
        Task::new_local(
            TaskId::Temp(0),
            title,
            priority,
            date,
            TaskExtras::default(),
            Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).unwrap(),
        )
    }

    fn shifted(days: i64) -> String {
        let date = if days >= 0 {
            today().checked_add_days(Days::new(days as u64))
        } else {
            today().checked_sub_days(Days::new((-days) as u64))
        };
        date.unwrap().format("%Y-%m-%d").to_string()
    }

    #[rstest]
    #[case(Priority::High, 3)]
    #[case(Priority::Medium, 2)]
    #[case(Priority::Ontime, 1)]
    #[case(Priority::Low, 0)]
    #[case(Priority::Unknown, 0)]
    fn priority_rank_table(#[case] priority: Priority, #[case] expected: u8) {
        assert_eq!(priority_rank(&task("t", priority, "2026-02-06")), expected);
    }

    #[test]
    fn stored_task_without_priority_ranks_zero() {
        let stored: crate::domain::StoredTask = serde_json::from_str(
            r#"{"id":"abcdef123","title":"x","date":"2026-02-06","status":"pending"}"#,
        )
        .unwrap();
        let untagged = Task::from_stored(stored);
        assert_eq!(priority_rank(&untagged), 0);

        let low = task("low", Priority::Low, "2026-02-06");
        let ordered: Vec<_> = focus_order([&untagged, &low]).into_iter().map(|t| t.title.as_str()).collect();
        assert_eq!(ordered, ["low", "x"]);
    }

    #[rstest]
    #[case(-1, 3)]
    #[case(-30, 3)]
    #[case(0, 2)]
    #[case(1, 1)]
    #[case(5, 1)]
    fn urgency_rank_by_date(#[case] offset: i64, #[case] expected: u8) {
        let t = task("t", Priority::Low, &shifted(offset));
        assert_eq!(urgency_rank(&t, today()), expected);
    }

    #[rstest]
    #[case("")]
    #[case("someday")]
    #[case("2026-02-30")]
    #[case("06/02/2026")]
    fn unparseable_deadline_has_no_urgency(#[case] date: &str) {
        let t = task("t", Priority::High, date);
        assert_eq!(urgency_rank(&t, today()), 0);
        assert_eq!(deadline_timestamp(&t), NO_DEADLINE);
    }

    #[test]
    fn deadline_field_wins_over_date() {
        let mut t = task("t", Priority::High, &shifted(10));
        t.deadline = Some(shifted(-2));
        assert_eq!(urgency_rank(&t, today()), 3);
    }

    #[test]
    fn time_of_day_is_ignored_for_urgency() {
        let t = task("t", Priority::High, "2026-02-06T23:59");
        assert_eq!(urgency_rank(&t, today()), 2);
        let t = task("t", Priority::High, "2026-02-06T00:00:00+09:00");
        assert_eq!(urgency_rank(&t, today()), 2);
    }

    #[test]
    fn focus_order_is_stable_severity_order() {
        let tasks = vec![
            task("low-a", Priority::Low, "2026-02-01"),
            task("high-a", Priority::High, "2026-02-01"),
            task("ontime", Priority::Ontime, "2026-02-01"),
            task("high-b", Priority::High, "2026-02-01"),
            task("medium", Priority::Medium, "2026-02-01"),
            task("low-b", Priority::Low, "2026-02-01"),
        ];
        let titles: Vec<_> = focus_order(&tasks).into_iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["high-a", "high-b", "medium", "ontime", "low-a", "low-b"]);
    }

    #[test]
    fn overdue_low_beats_future_high() {
        let tasks = vec![
            task("B", Priority::High, &shifted(5)),
            task("A", Priority::Low, &shifted(-1)),
        ];
        let titles: Vec<_> = plan_order(&tasks, today()).into_iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["A", "B"]);
    }

    #[test]
    fn earlier_deadline_breaks_ties_and_missing_deadline_sorts_last() {
        let mut undated = task("undated", Priority::High, "");
        undated.deadline = None;
        let tasks = vec![
            undated,
            task("later", Priority::High, &shifted(9)),
            task("sooner", Priority::High, &shifted(2)),
        ];
        let titles: Vec<_> = plan_order(&tasks, today()).into_iter().map(|t| t.title.as_str()).collect();
        assert_eq!(titles, ["sooner", "later", "undated"]);
    }

    #[test]
    fn undated_tasks_compare_equal() {
        // urgency 0 の 2 件: どちらも日付なし -> 入力順のまま
        let a = task("a", Priority::Medium, "");
        let b = task("b", Priority::Medium, "nope");
        assert_eq!(compare_for_plan(&a, &b, today()), Ordering::Equal);
    }
}
