//! In-memory store.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use super::{PlanningStore, StoreResult};
use crate::error::StoreError;
use crate::models::{
    HolidayRequest, ProductionHoliday, ScheduleEntry, Task, Worker, WorkstationScheduleEntry,
};

/// A [`PlanningStore`] backed by vectors.
///
/// Used by tests and by embedders that load everything up front. Can be
/// told to fail inserts for one worker to simulate a backend outage.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    workers: Vec<Worker>,
    tasks: Vec<Task>,
    production_holidays: Vec<ProductionHoliday>,
    holiday_requests: Vec<HolidayRequest>,
    entries: Vec<ScheduleEntry>,
    workstation_entries: Vec<WorkstationScheduleEntry>,
    failing_worker: Option<String>,
}

impl MemoryStore {
    /// Creates an empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a worker.
    pub fn with_worker(mut self, worker: Worker) -> Self {
        self.workers.push(worker);
        self
    }

    /// Adds a task (any status).
    pub fn with_task(mut self, task: Task) -> Self {
        self.tasks.push(task);
        self
    }

    /// Adds a production holiday.
    pub fn with_production_holiday(mut self, holiday: ProductionHoliday) -> Self {
        self.production_holidays.push(holiday);
        self
    }

    /// Adds a personal holiday request.
    pub fn with_holiday_request(mut self, request: HolidayRequest) -> Self {
        self.holiday_requests.push(request);
        self
    }

    /// Adds an existing schedule entry.
    pub fn with_entry(mut self, entry: ScheduleEntry) -> Self {
        self.entries.push(entry);
        self
    }

    /// Makes every insert containing an entry for `worker_id` fail.
    pub fn with_failing_worker(mut self, worker_id: impl Into<String>) -> Self {
        self.failing_worker = Some(worker_id.into());
        self
    }

    /// All stored schedule entries.
    pub fn entries(&self) -> &[ScheduleEntry] {
        &self.entries
    }

    /// All stored workstation entries.
    pub fn workstation_entries(&self) -> &[WorkstationScheduleEntry] {
        &self.workstation_entries
    }

    /// Stored entries of one worker on one date, sorted by start.
    pub fn worker_entries(&self, worker_id: &str, date: NaiveDate) -> Vec<&ScheduleEntry> {
        let mut list: Vec<&ScheduleEntry> = self
            .entries
            .iter()
            .filter(|e| e.worker_id == worker_id && e.date() == date)
            .collect();
        list.sort_by_key(|e| e.start);
        list
    }
}

impl PlanningStore for MemoryStore {
    fn workers(&self) -> StoreResult<Vec<Worker>> {
        Ok(self.workers.clone())
    }

    fn open_tasks(&self) -> StoreResult<Vec<Task>> {
        Ok(self.tasks.iter().filter(|t| t.is_open()).cloned().collect())
    }

    fn tasks(&self, ids: &[String]) -> StoreResult<Vec<Task>> {
        Ok(self
            .tasks
            .iter()
            .filter(|t| ids.contains(&t.id))
            .cloned()
            .collect())
    }

    fn production_holidays(&self) -> StoreResult<Vec<ProductionHoliday>> {
        Ok(self.production_holidays.clone())
    }

    fn holiday_requests(&self) -> StoreResult<Vec<HolidayRequest>> {
        Ok(self.holiday_requests.clone())
    }

    fn planned_minutes_before(&self, date: NaiveDate) -> StoreResult<HashMap<String, i64>> {
        let mut planned: HashMap<String, i64> = HashMap::new();
        for e in self.entries.iter().filter(|e| e.date() < date) {
            if let Some(task_id) = &e.task_id {
                *planned.entry(task_id.clone()).or_default() += e.duration_minutes();
            }
        }
        Ok(planned)
    }

    fn entry(&self, id: &str) -> StoreResult<Option<ScheduleEntry>> {
        Ok(self.entries.iter().find(|e| e.id == id).cloned())
    }

    fn entries_on(&self, date: NaiveDate) -> StoreResult<Vec<ScheduleEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.date() == date)
            .cloned()
            .collect())
    }

    fn delete_generated_entries(&mut self, worker_id: &str, date: NaiveDate) -> StoreResult<usize> {
        let before = self.entries.len();
        self.entries
            .retain(|e| !(e.auto_generated && e.worker_id == worker_id && e.date() == date));
        Ok(before - self.entries.len())
    }

    fn insert_entries(&mut self, entries: Vec<ScheduleEntry>) -> StoreResult<()> {
        if let Some(failing) = &self.failing_worker {
            if entries.iter().any(|e| &e.worker_id == failing) {
                return Err(StoreError::Backend(format!(
                    "insert rejected for worker {failing}"
                )));
            }
        }
        self.entries.extend(entries);
        Ok(())
    }

    fn delete_entries(&mut self, ids: &[String]) -> StoreResult<()> {
        self.entries.retain(|e| !ids.contains(&e.id));
        Ok(())
    }

    fn update_entry_times(
        &mut self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> StoreResult<()> {
        let entry = self
            .entries
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| StoreError::NotFound {
                kind: "schedule entry",
                id: id.to_string(),
            })?;
        entry.start = start;
        entry.end = end;
        Ok(())
    }

    fn workstation_entries_on(&self, date: NaiveDate) -> StoreResult<Vec<WorkstationScheduleEntry>> {
        Ok(self
            .workstation_entries
            .iter()
            .filter(|e| e.start.date() == date)
            .cloned()
            .collect())
    }

    fn replace_workstation_entries(
        &mut self,
        date: NaiveDate,
        entries: Vec<WorkstationScheduleEntry>,
    ) -> StoreResult<()> {
        self.workstation_entries.retain(|e| e.start.date() != date);
        self.workstation_entries.extend(entries);
        Ok(())
    }
}
