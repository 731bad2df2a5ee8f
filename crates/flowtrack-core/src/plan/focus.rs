//! Focus list: every task in severity order, plus title search.

use super::ranking::focus_order;
use crate::domain::Task;

/// All tasks in focus order (priority only, stable).
pub fn focus_list(tasks: &[Task]) -> Vec<&Task> {
    focus_order(tasks)
}

/// Case-insensitive title substring match, in focus order.
/// A blank query matches everything.
pub fn search<'a>(tasks: &'a [Task], query: &str) -> Vec<&'a Task> {
    let needle = query.trim().to_lowercase();
    if needle.is_empty() {
        return focus_list(tasks);
    }
    focus_order(
        tasks
            .iter()
            .filter(|t| t.title.to_lowercase().contains(&needle)),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskExtras, TaskId};
    use chrono::Utc;

    fn task(title: &str, priority: Priority) -> Task {
        Task::new_local(
            TaskId::Temp(0),
            title,
            priority,
            "2026-02-06",
            TaskExtras::default(),
            Utc::now(),
        )
    }

    #[test]
    fn search_is_case_insensitive_and_ordered() {
        let tasks = vec![
            task("Update docs", Priority::Low),
            task("Review mockups", Priority::High),
            task("DOCS review", Priority::Medium),
        ];

        let hits: Vec<_> = search(&tasks, "  Docs ").into_iter().map(|t| t.title.as_str()).collect();
        assert_eq!(hits, ["DOCS review", "Update docs"]);

        assert_eq!(search(&tasks, "").len(), 3);
        assert!(search(&tasks, "invoice").is_empty());
    }
}
