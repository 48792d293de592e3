//! Schedule entry models.
//!
//! A worker's day is a list of [`ScheduleEntry`] values. Each entry sits
//! inside one working-hours window and never spans a break. Entries for
//! the same worker and date never overlap.
//!
//! [`WorkstationScheduleEntry`] is a derived projection of worker entries
//! onto the workstations their tasks are linked to. It is regenerated
//! wholesale and never edited directly.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// One block of planned work on a worker's calendar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScheduleEntry {
    /// Unique entry identifier.
    pub id: String,
    /// Owning worker.
    pub worker_id: String,
    /// Linked task. `None` for free-form manual entries.
    #[serde(default)]
    pub task_id: Option<String>,
    /// Title (task title, with a part marker when split).
    pub title: String,
    #[serde(default)]
    pub description: String,
    /// Start (inclusive).
    pub start: NaiveDateTime,
    /// End (exclusive).
    pub end: NaiveDateTime,
    /// `true` when produced by the slot packer, `false` for manual entries.
    pub auto_generated: bool,
}

impl ScheduleEntry {
    /// Creates an auto-generated entry with a fresh ID.
    pub fn generated(
        worker_id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            worker_id: worker_id.into(),
            task_id: None,
            title: title.into(),
            description: String::new(),
            start,
            end,
            auto_generated: true,
        }
    }

    /// Creates a manual entry with a fresh ID.
    pub fn manual(
        worker_id: impl Into<String>,
        title: impl Into<String>,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> Self {
        Self {
            auto_generated: false,
            ..Self::generated(worker_id, title, start, end)
        }
    }

    /// Overrides the generated ID.
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Links the entry to a task.
    pub fn with_task(mut self, task_id: impl Into<String>) -> Self {
        self.task_id = Some(task_id.into());
        self
    }

    /// Sets the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Length in minutes.
    #[inline]
    pub fn duration_minutes(&self) -> i64 {
        (self.end - self.start).num_minutes()
    }

    /// Calendar date of the entry (date of its start).
    #[inline]
    pub fn date(&self) -> NaiveDate {
        self.start.date()
    }

    /// Whether two entries overlap in time. Touching entries do not.
    pub fn overlaps(&self, other: &Self) -> bool {
        self.overlaps_span(other.start, other.end)
    }

    /// Whether this entry overlaps `[start, end)`.
    pub fn overlaps_span(&self, start: NaiveDateTime, end: NaiveDateTime) -> bool {
        self.start < end && start < self.end
    }

    /// Whether the entry is linked to `task_id`.
    pub fn is_for_task(&self, task_id: &str) -> bool {
        self.task_id.as_deref() == Some(task_id)
    }
}

/// A worker entry projected onto a workstation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkstationScheduleEntry {
    pub id: String,
    /// Workstation name.
    pub workstation: String,
    pub task_id: String,
    pub worker_id: String,
    /// Display label: task title and worker name.
    pub label: String,
    pub start: NaiveDateTime,
    pub end: NaiveDateTime,
}

/// Freshly fetched worker and workstation views for one date.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DaySchedule {
    /// Worker entries keyed by worker ID, each sorted by start.
    pub by_worker: BTreeMap<String, Vec<ScheduleEntry>>,
    /// Workstation entries keyed by workstation, each sorted by start.
    pub by_workstation: BTreeMap<String, Vec<WorkstationScheduleEntry>>,
}

impl DaySchedule {
    /// Groups flat entry lists into the per-worker and per-workstation views.
    pub fn from_entries(
        entries: Vec<ScheduleEntry>,
        workstation_entries: Vec<WorkstationScheduleEntry>,
    ) -> Self {
        let mut by_worker: BTreeMap<String, Vec<ScheduleEntry>> = BTreeMap::new();
        for e in entries {
            by_worker.entry(e.worker_id.clone()).or_default().push(e);
        }
        for list in by_worker.values_mut() {
            list.sort_by_key(|e| e.start);
        }

        let mut by_workstation: BTreeMap<String, Vec<WorkstationScheduleEntry>> = BTreeMap::new();
        for e in workstation_entries {
            by_workstation.entry(e.workstation.clone()).or_default().push(e);
        }
        for list in by_workstation.values_mut() {
            list.sort_by_key(|e| e.start);
        }

        Self {
            by_worker,
            by_workstation,
        }
    }

    /// Entries for one worker, sorted by start.
    pub fn worker_entries(&self, worker_id: &str) -> &[ScheduleEntry] {
        self.by_worker
            .get(worker_id)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Total planned minutes for one worker.
    pub fn planned_minutes(&self, worker_id: &str) -> i64 {
        self.worker_entries(worker_id)
            .iter()
            .map(|e| e.duration_minutes())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(h: u32, m: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(h, m, 0)
            .unwrap()
    }

    #[test]
    fn test_entry_basics() {
        let e = ScheduleEntry::generated("W1", "Cut", at(7, 0), at(8, 30)).with_task("T1");
        assert!(e.auto_generated);
        assert_eq!(e.duration_minutes(), 90);
        assert_eq!(e.date(), NaiveDate::from_ymd_opt(2024, 5, 6).unwrap());
        assert!(e.is_for_task("T1"));
        assert!(!e.is_for_task("T2"));
        assert!(!e.id.is_empty());

        let m = ScheduleEntry::manual("W1", "Meeting", at(9, 0), at(9, 30));
        assert!(!m.auto_generated);
        assert_ne!(m.id, e.id);
    }

    #[test]
    fn test_entry_overlap() {
        let a = ScheduleEntry::generated("W1", "A", at(7, 0), at(8, 0));
        let b = ScheduleEntry::generated("W1", "B", at(7, 30), at(9, 0));
        let c = ScheduleEntry::generated("W1", "C", at(8, 0), at(9, 0));
        assert!(a.overlaps(&b));
        assert!(b.overlaps(&a));
        assert!(!a.overlaps(&c)); // touching
    }

    #[test]
    fn test_day_schedule_grouping() {
        let entries = vec![
            ScheduleEntry::generated("W1", "B", at(9, 0), at(10, 0)),
            ScheduleEntry::generated("W1", "A", at(7, 0), at(9, 0)),
            ScheduleEntry::generated("W2", "C", at(7, 0), at(7, 30)),
        ];
        let day = DaySchedule::from_entries(entries, Vec::new());

        let w1 = day.worker_entries("W1");
        assert_eq!(w1.len(), 2);
        assert_eq!(w1[0].title, "A");
        assert_eq!(day.planned_minutes("W1"), 180);
        assert_eq!(day.planned_minutes("W2"), 30);
        assert!(day.worker_entries("W9").is_empty());
    }
}
