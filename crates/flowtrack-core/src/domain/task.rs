use chrono::{DateTime, Utc};
use serde::de::{self, IgnoredAny, MapAccess, SeqAccess, Visitor};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;
use std::str::FromStr;

use super::ids::TaskId;
use super::state::SyncState;
use crate::error::Error;

/// How important a task is.
///
/// `Ontime` is a priority tag only; the same word used to appear as a status
/// value and is read as [`Status::Pending`] there.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Ontime,
    Low,
    /// Missing, `null`, or any value the store hands back that is not one of
    /// the above. Ranks below every known priority.
    #[default]
    Unknown,
}

impl Priority {
    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "high",
            Priority::Medium => "medium",
            Priority::Ontime => "ontime",
            Priority::Low => "low",
            Priority::Unknown => "unknown",
        }
    }

    /// Badge text shown next to a task in the focus list.
    pub fn label(self) -> &'static str {
        match self {
            Priority::High => "High Priority",
            Priority::Medium => "Medium",
            Priority::Ontime => "On Time",
            Priority::Low => "Low Priority",
            Priority::Unknown => "Unranked",
        }
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(PriorityVisitor)
    }
}

/// Accepts anything on the wire; only the four known strings map to a rank.
struct PriorityVisitor;

impl<'de> Visitor<'de> for PriorityVisitor {
    type Value = Priority;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a priority string")
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Priority, E> {
        Ok(match v {
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "ontime" => Priority::Ontime,
            "low" => Priority::Low,
            _ => Priority::Unknown,
        })
    }

    fn visit_bool<E: de::Error>(self, _: bool) -> Result<Priority, E> {
        Ok(Priority::Unknown)
    }

    fn visit_i64<E: de::Error>(self, _: i64) -> Result<Priority, E> {
        Ok(Priority::Unknown)
    }

    fn visit_u64<E: de::Error>(self, _: u64) -> Result<Priority, E> {
        Ok(Priority::Unknown)
    }

    fn visit_f64<E: de::Error>(self, _: f64) -> Result<Priority, E> {
        Ok(Priority::Unknown)
    }

    fn visit_unit<E: de::Error>(self) -> Result<Priority, E> {
        Ok(Priority::Unknown)
    }

    fn visit_none<E: de::Error>(self) -> Result<Priority, E> {
        Ok(Priority::Unknown)
    }

    fn visit_some<D: Deserializer<'de>>(self, deserializer: D) -> Result<Priority, D::Error> {
        deserializer.deserialize_any(self)
    }

    fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Priority, A::Error> {
        while seq.next_element::<IgnoredAny>()?.is_some() {}
        Ok(Priority::Unknown)
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Priority, A::Error> {
        while map.next_entry::<IgnoredAny, IgnoredAny>()?.is_some() {}
        Ok(Priority::Unknown)
    }
}

impl FromStr for Priority {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "ontime" | "on-time" => Ok(Priority::Ontime),
            "low" => Ok(Priority::Low),
            other => Err(Error::InvalidPriority(other.to_string())),
        }
    }
}

/// Completion status.
///
/// Anything other than `completed` coming off the wire (the legacy `ontime`
/// included) is read as `Pending`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Completed,
    #[default]
    #[serde(other)]
    Pending,
}

impl Status {
    pub fn toggled(self) -> Self {
        match self {
            Status::Pending => Status::Completed,
            Status::Completed => Status::Pending,
        }
    }

    pub fn is_completed(self) -> bool {
        self == Status::Completed
    }

    pub fn label(self) -> &'static str {
        match self {
            Status::Pending => "Pending",
            Status::Completed => "Completed",
        }
    }
}

/// Optional fields entered alongside a new task.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TaskExtras {
    pub time: Option<String>,
    pub deadline: Option<String>,
    pub reminder: Option<String>,
}

impl TaskExtras {
    fn normalized(self) -> Self {
        Self {
            time: non_blank(self.time),
            deadline: non_blank(self.deadline),
            reminder: non_blank(self.reminder),
        }
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}

/// A task as held by the `TaskStore`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Task {
    pub id: TaskId,
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    /// `YYYY-MM-DD`; calendar placement and deadline fallback.
    pub date: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub sync: SyncState,
}

impl Task {
    /// A freshly created task that has not been sent to the remote store.
    pub fn new_local(
        id: TaskId,
        title: impl Into<String>,
        priority: Priority,
        date: impl Into<String>,
        extras: TaskExtras,
        created_at: DateTime<Utc>,
    ) -> Self {
        let extras = extras.normalized();
        Self {
            id,
            title: title.into(),
            priority,
            date: date.into(),
            status: Status::Pending,
            time: extras.time,
            deadline: extras.deadline,
            reminder: extras.reminder,
            created_at: Some(created_at),
            sync: SyncState::Local,
        }
    }

    /// A task read back from the remote store.
    pub fn from_stored(stored: StoredTask) -> Self {
        let StoredTask { id, record } = stored;
        Self::from_record(TaskId::Remote(id), record, SyncState::Confirmed)
    }

    /// A task rebuilt from a document body under `id`.
    pub fn from_record(id: TaskId, record: TaskRecord, sync: SyncState) -> Self {
        Self {
            id,
            title: record.title,
            priority: record.priority,
            date: record.date,
            status: record.status,
            time: non_blank(record.time),
            deadline: non_blank(record.deadline),
            reminder: non_blank(record.reminder),
            created_at: record.created_at,
            sync,
        }
    }

    /// The body sent to the remote store when persisting this task.
    pub fn to_record(&self) -> TaskRecord {
        TaskRecord {
            title: self.title.clone(),
            priority: self.priority,
            date: self.date.clone(),
            status: self.status,
            time: self.time.clone(),
            deadline: self.deadline.clone(),
            reminder: self.reminder.clone(),
            created_at: self.created_at,
            updated_at: None,
        }
    }

    /// `deadline` if set, else `date`.
    pub fn effective_deadline(&self) -> Option<&str> {
        self.deadline
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .or_else(|| Some(self.date.as_str()).filter(|s| !s.trim().is_empty()))
    }

    /// Apply a partial update. A blank optional field clears it.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(date) = &patch.date {
            self.date = date.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(time) = &patch.time {
            self.time = non_blank(Some(time.clone()));
        }
        if let Some(deadline) = &patch.deadline {
            self.deadline = non_blank(Some(deadline.clone()));
        }
        if let Some(reminder) = &patch.reminder {
            self.reminder = non_blank(Some(reminder.clone()));
        }
    }
}

/// Task document body as it crosses the remote store boundary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskRecord {
    pub title: String,
    #[serde(default)]
    pub priority: Priority,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub status: Status,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl TaskRecord {
    /// Store-side partial update.
    pub fn apply(&mut self, patch: &TaskPatch) {
        if let Some(title) = &patch.title {
            self.title = title.clone();
        }
        if let Some(priority) = patch.priority {
            self.priority = priority;
        }
        if let Some(date) = &patch.date {
            self.date = date.clone();
        }
        if let Some(status) = patch.status {
            self.status = status;
        }
        if let Some(time) = &patch.time {
            self.time = Some(time.clone());
        }
        if let Some(deadline) = &patch.deadline {
            self.deadline = Some(deadline.clone());
        }
        if let Some(reminder) = &patch.reminder {
            self.reminder = Some(reminder.clone());
        }
    }
}

/// A persisted document: store-assigned id plus body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredTask {
    pub id: String,
    #[serde(flatten)]
    pub record: TaskRecord,
}

/// Partial field update. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<Priority>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<Status>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub deadline: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub reminder: Option<String>,
}

impl TaskPatch {
    pub fn status(status: Status) -> Self {
        Self {
            status: Some(status),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    /// Fields of `current` that differ from what was `sent`.
    ///
    /// Used after a late confirmation to replay local edits made while the
    /// add was in flight.
    pub fn changes_since(sent: &TaskRecord, current: &Task) -> Self {
        fn changed<T: PartialEq + Clone>(sent: &T, current: &T) -> Option<T> {
            (sent != current).then(|| current.clone())
        }
        fn changed_opt(sent: &Option<String>, current: &Option<String>) -> Option<String> {
            (sent != current).then(|| current.clone().unwrap_or_default())
        }

        Self {
            title: changed(&sent.title, &current.title),
            priority: changed(&sent.priority, &current.priority),
            date: changed(&sent.date, &current.date),
            status: changed(&sent.status, &current.status),
            time: changed_opt(&sent.time, &current.time),
            deadline: changed_opt(&sent.deadline, &current.deadline),
            reminder: changed_opt(&sent.reminder, &current.reminder),
        }
    }

    /// Same keys as `self`, with the values `task` holds right now.
    pub fn refreshed_from(&self, task: &Task) -> Self {
        Self {
            title: self.title.as_ref().map(|_| task.title.clone()),
            priority: self.priority.map(|_| task.priority),
            date: self.date.as_ref().map(|_| task.date.clone()),
            status: self.status.map(|_| task.status),
            time: self.time.as_ref().map(|_| task.time.clone().unwrap_or_default()),
            deadline: self
                .deadline
                .as_ref()
                .map(|_| task.deadline.clone().unwrap_or_default()),
            reminder: self
                .reminder
                .as_ref()
                .map(|_| task.reminder.clone().unwrap_or_default()),
        }
    }
}
