//! The fixed demo collection shown when the remote store has nothing to offer.

use crate::domain::{Priority, Status, SyncState, Task, TaskId};

const DEMO: [(u64, &str, Priority, &str, Status); 7] = [
    (1, "Payment UI", Priority::High, "2026-02-05", Status::Pending),
    (2, "Dashboard Fix", Priority::Medium, "2026-02-06", Status::Pending),
    (3, "Update Docs", Priority::Low, "2026-02-07", Status::Completed),
    // 旧データでは status が "ontime" だった。読み込み時は Pending 扱い
    (4, "Client Call", Priority::Ontime, "2026-02-08", Status::Pending),
    (5, "Review mockups", Priority::High, "2026-02-04", Status::Pending),
    (6, "Team meeting", Priority::Medium, "2026-02-10", Status::Pending),
    (7, "Presentation", Priority::High, "2026-02-12", Status::Pending),
];

/// Seven tasks with ids 1..=7. They are never persisted, so they stay `Local`.
pub fn demo_tasks() -> Vec<Task> {
    DEMO.iter()
        .map(|&(id, title, priority, date, status)| Task {
            id: TaskId::Temp(id),
            title: title.to_string(),
            priority,
            date: date.to_string(),
            status,
            time: None,
            deadline: None,
            reminder: None,
            created_at: None,
            sync: SyncState::Local,
        })
        .collect()
}
