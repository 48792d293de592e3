//! Persistence gateway.
//!
//! [`PlanningStore`] is the only seam between the planning algorithms and
//! the hosted data store. Algorithms work on the in-memory values these
//! methods return; the [`Planner`](crate::planner::Planner) writes results
//! back through the same trait.
//!
//! Writes are not transactional. Two callers regenerating the same date
//! at once race on delete-then-insert; the last writer wins.

mod memory;

pub use memory::MemoryStore;

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};

use crate::error::StoreError;
use crate::models::{
    HolidayRequest, ProductionHoliday, ScheduleEntry, Task, Worker, WorkstationScheduleEntry,
};

/// Result alias for store calls.
pub type StoreResult<T> = Result<T, StoreError>;

/// Reads and writes planning data.
pub trait PlanningStore {
    /// All workers, in display order.
    fn workers(&self) -> StoreResult<Vec<Worker>>;

    /// Open (TODO) tasks with their workstation links.
    fn open_tasks(&self) -> StoreResult<Vec<Task>>;

    /// Tasks with the given IDs, whatever their status. Unknown IDs are
    /// left out.
    fn tasks(&self, ids: &[String]) -> StoreResult<Vec<Task>>;

    /// Team-wide production holidays.
    fn production_holidays(&self) -> StoreResult<Vec<ProductionHoliday>>;

    /// Personal holiday requests, any status.
    fn holiday_requests(&self) -> StoreResult<Vec<HolidayRequest>>;

    /// Minutes already scheduled per task on dates before `date`, summed
    /// over all workers.
    fn planned_minutes_before(&self, date: NaiveDate) -> StoreResult<HashMap<String, i64>>;

    /// One schedule entry by ID.
    fn entry(&self, id: &str) -> StoreResult<Option<ScheduleEntry>>;

    /// Every worker's schedule entries starting on `date`.
    fn entries_on(&self, date: NaiveDate) -> StoreResult<Vec<ScheduleEntry>>;

    /// Deletes the auto-generated entries of `worker_id` on `date`.
    ///
    /// Manual entries are kept. Returns the number of deleted entries.
    fn delete_generated_entries(&mut self, worker_id: &str, date: NaiveDate) -> StoreResult<usize>;

    /// Inserts new entries.
    fn insert_entries(&mut self, entries: Vec<ScheduleEntry>) -> StoreResult<()>;

    /// Deletes entries by ID. Unknown IDs are ignored.
    fn delete_entries(&mut self, ids: &[String]) -> StoreResult<()>;

    /// Updates the time bounds of one entry.
    fn update_entry_times(
        &mut self,
        id: &str,
        start: NaiveDateTime,
        end: NaiveDateTime,
    ) -> StoreResult<()>;

    /// Workstation entries starting on `date`.
    fn workstation_entries_on(&self, date: NaiveDate) -> StoreResult<Vec<WorkstationScheduleEntry>>;

    /// Replaces all workstation entries of `date`.
    fn replace_workstation_entries(
        &mut self,
        date: NaiveDate,
        entries: Vec<WorkstationScheduleEntry>,
    ) -> StoreResult<()>;
}
