//! Status - コレクションの集計
//!
//! ダッシュボードの進捗表示（`completed/total`）と、未同期・失敗の件数。

use serde::{Deserialize, Serialize};

use crate::domain::{SyncState, Task};

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskCounts {
    pub total: usize,
    pub pending: usize,
    pub completed: usize,
    /// Not yet confirmed by the remote store (demo tasks included).
    pub local: usize,
    pub failed: usize,
}

impl TaskCounts {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        tasks.iter().fold(Self::default(), |mut counts, task| {
            counts.total += 1;
            if task.status.is_completed() {
                counts.completed += 1;
            } else {
                counts.pending += 1;
            }
            match task.sync {
                SyncState::Local => counts.local += 1,
                SyncState::Failed => counts.failed += 1,
                SyncState::Confirmed => {}
            }
            counts
        })
    }

    /// e.g. `"3/7"`
    pub fn progress_label(&self) -> String {
        format!("{}/{}", self.completed, self.total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::demo::demo_tasks;

    #[test]
    fn counts_demo_collection() {
        let mut tasks = demo_tasks();
        tasks[0].sync = SyncState::Failed;
        tasks[1].sync = SyncState::Confirmed;

        let counts = TaskCounts::from_tasks(&tasks);
        assert_eq!(
            counts,
            TaskCounts {
                total: 7,
                pending: 6,
                completed: 1,
                local: 5,
                failed: 1,
            }
        );
        assert_eq!(counts.progress_label(), "1/7");
        assert_eq!(TaskCounts::default().progress_label(), "0/0");
    }
}
