//! Task model.
//!
//! A task is a unit of shop-floor work (cutting, assembly, finishing...)
//! created by the surrounding order system. The planner only reads open
//! tasks and never creates them.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Task priority.
///
/// Ranked `Urgent > High > Medium > Low`. Any other stored value is kept
/// verbatim as `Other` and ranks after all recognized priorities.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Priority {
    Urgent,
    High,
    #[default]
    Medium,
    Low,
    /// Unrecognized priority value.
    Other(String),
}

impl Priority {
    /// Sort rank: 0 for urgent, 4 for unrecognized values.
    pub fn rank(&self) -> u8 {
        match self {
            Priority::Urgent => 0,
            Priority::High => 1,
            Priority::Medium => 2,
            Priority::Low => 3,
            Priority::Other(_) => 4,
        }
    }
}

impl From<&str> for Priority {
    fn from(value: &str) -> Self {
        match value.trim().to_ascii_lowercase().as_str() {
            "urgent" => Priority::Urgent,
            "high" => Priority::High,
            "medium" => Priority::Medium,
            "low" => Priority::Low,
            _ => Priority::Other(value.to_string()),
        }
    }
}

impl From<String> for Priority {
    fn from(value: String) -> Self {
        Priority::from(value.as_str())
    }
}

impl From<Priority> for String {
    fn from(value: Priority) -> Self {
        value.to_string()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::Urgent => f.write_str("Urgent"),
            Priority::High => f.write_str("High"),
            Priority::Medium => f.write_str("Medium"),
            Priority::Low => f.write_str("Low"),
            Priority::Other(raw) => f.write_str(raw),
        }
    }
}

/// Task lifecycle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TaskStatus {
    /// Not started. The only schedulable state.
    #[default]
    Todo,
    InProgress,
    Completed,
    /// Waiting on a limit phase (external prerequisite).
    Hold,
}

/// A task to be planned.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Task {
    /// Unique task identifier.
    pub id: String,
    /// Short title shown on schedule entries.
    pub title: String,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Planned duration in minutes. `None` = use the configured default.
    #[serde(default)]
    pub duration_minutes: Option<i64>,
    #[serde(default)]
    pub priority: Priority,
    /// Due date. `None` sorts after any dated task.
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[serde(default)]
    pub status: TaskStatus,
    /// Directly assigned worker, if any.
    #[serde(default)]
    pub assignee: Option<String>,
    /// Linked workstation names.
    #[serde(default)]
    pub workstations: Vec<String>,
    /// Owning project (via the task's phase).
    #[serde(default)]
    pub project: Option<String>,
}

impl Task {
    /// Creates an open task with the given ID.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: String::new(),
            description: String::new(),
            duration_minutes: None,
            priority: Priority::default(),
            due_date: None,
            status: TaskStatus::Todo,
            assignee: None,
            workstations: Vec::new(),
            project: None,
        }
    }

    /// Sets the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets the planned duration (minutes).
    pub fn with_duration(mut self, minutes: i64) -> Self {
        self.duration_minutes = Some(minutes);
        self
    }

    /// Sets the priority.
    pub fn with_priority(mut self, priority: impl Into<Priority>) -> Self {
        self.priority = priority.into();
        self
    }

    /// Sets the due date.
    pub fn with_due_date(mut self, due: NaiveDate) -> Self {
        self.due_date = Some(due);
        self
    }

    /// Sets the status.
    pub fn with_status(mut self, status: TaskStatus) -> Self {
        self.status = status;
        self
    }

    /// Assigns the task directly to a worker.
    pub fn with_assignee(mut self, worker_id: impl Into<String>) -> Self {
        self.assignee = Some(worker_id.into());
        self
    }

    /// Links the task to a workstation.
    pub fn with_workstation(mut self, workstation: impl Into<String>) -> Self {
        self.workstations.push(workstation.into());
        self
    }

    /// Sets the owning project.
    pub fn with_project(mut self, project: impl Into<String>) -> Self {
        self.project = Some(project.into());
        self
    }

    /// Whether the task may be scheduled.
    #[inline]
    pub fn is_open(&self) -> bool {
        self.status == TaskStatus::Todo
    }

    /// Planned minutes, falling back to `default_minutes` when unset or non-positive.
    pub fn effective_minutes(&self, default_minutes: i64) -> i64 {
        match self.duration_minutes {
            Some(m) if m > 0 => m,
            _ => default_minutes,
        }
    }

    /// Whether the task is linked to any workstation.
    pub fn has_workstations(&self) -> bool {
        !self.workstations.is_empty()
    }
}
