//! Selection context for dispatching rule evaluation.

use chrono::NaiveDate;

/// Planning state passed to dispatching rules.
#[derive(Debug, Clone)]
pub struct SelectionContext {
    /// Date being planned.
    pub planning_date: NaiveDate,
    /// Duration assumed for tasks without one (minutes).
    pub default_task_minutes: i64,
}

impl SelectionContext {
    /// Creates a context for the given planning date.
    pub fn for_date(planning_date: NaiveDate) -> Self {
        Self {
            planning_date,
            ..Default::default()
        }
    }

    /// Sets the fallback task duration.
    pub fn with_default_task_minutes(mut self, minutes: i64) -> Self {
        self.default_task_minutes = minutes;
        self
    }
}

impl Default for SelectionContext {
    fn default() -> Self {
        Self {
            planning_date: NaiveDate::default(),
            default_task_minutes: 60,
        }
    }
}
