//! Daily plan orchestration.
//!
//! [`Planner`] ties the pure pieces together over a [`PlanningStore`]:
//! availability, task selection, slot packing, conflict detection and
//! resolution, workstation projection and manual adjustments.
//!
//! # Batch generation
//!
//! 1. Refuse the date if it is a production holiday.
//! 2. For each schedulable worker in store order: skip if on holiday,
//!    without workstations or without open work; otherwise delete the
//!    worker's auto-generated entries for the date, pack the selected
//!    tasks around the worker's remaining manual entries and insert the
//!    result.
//! 3. Detect conflicts across the day and rebuild the workstation view.
//!
//! Tasks only contribute the minutes not already scheduled on earlier
//! dates, so consecutive days continue work instead of repeating it.
//!
//! Workers are processed one after the other. A store failure aborts the
//! batch; workers already written keep their new entries.

use std::collections::HashSet;

use chrono::{NaiveDate, NaiveDateTime};
use tracing::{debug, error, info, warn};

use crate::adjust::{pixels_to_minutes, Adjustment, AdjustmentOutcome, AdjustmentValidator};
use crate::availability::Availability;
use crate::config::PlannerConfig;
use crate::conflict::{self, ConflictSession, KeepDecisions};
use crate::dispatching::{RuleEngine, SelectionContext};
use crate::error::{PlanningError, PlanningResult};
use crate::models::{
    DaySchedule, HolidayRequest, ProductionHoliday, Task, TaskConflict, Worker,
};
use crate::scheduler::{project_workstations, DeferredTask, SlotPacker};
use crate::selection;
use crate::store::PlanningStore;
use crate::validation;

/// Why a worker got no new entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Approved personal holiday covers the date.
    OnHoliday,
    /// Role does not take part in planning.
    NotSchedulable,
    /// Worker staffs no workstation.
    NoWorkstations,
    /// Nothing eligible left to plan.
    NoTasks,
}

/// Result of planning one worker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerStatus {
    Generated {
        /// Entries inserted.
        entries: usize,
        planned_minutes: i64,
        /// Work that did not fit into the day.
        deferred: Vec<DeferredTask>,
    },
    Skipped(SkipReason),
}

/// Per-worker line of a [`GenerationReport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkerOutcome {
    pub worker_id: String,
    pub status: WorkerStatus,
}

impl WorkerOutcome {
    /// Whether the worker was skipped.
    pub fn is_skipped(&self) -> bool {
        matches!(self.status, WorkerStatus::Skipped(_))
    }
}

/// What a batch generation did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    pub date: NaiveDate,
    /// One outcome per schedulable worker, in store order.
    pub outcomes: Vec<WorkerOutcome>,
    /// Open tasks without any entry on the date.
    pub unscheduled_task_ids: Vec<String>,
    /// Tasks held by more than one worker after generation.
    pub conflicts: Vec<TaskConflict>,
}

impl GenerationReport {
    /// Outcome for one worker.
    pub fn outcome_for(&self, worker_id: &str) -> Option<&WorkerOutcome> {
        self.outcomes.iter().find(|o| o.worker_id == worker_id)
    }

    /// Skipped workers with the reason.
    pub fn skipped(&self) -> impl Iterator<Item = (&str, SkipReason)> + '_ {
        self.outcomes.iter().filter_map(|o| match o.status {
            WorkerStatus::Skipped(reason) => Some((o.worker_id.as_str(), reason)),
            WorkerStatus::Generated { .. } => None,
        })
    }

    /// Total entries inserted.
    pub fn generated_entries(&self) -> usize {
        self.outcomes
            .iter()
            .map(|o| match &o.status {
                WorkerStatus::Generated { entries, .. } => *entries,
                WorkerStatus::Skipped(_) => 0,
            })
            .sum()
    }

    /// Whether conflicts need a keep decision.
    pub fn has_conflicts(&self) -> bool {
        !self.conflicts.is_empty()
    }
}

/// Everything one operation reads up front.
struct Snapshot {
    workers: Vec<Worker>,
    /// Open tasks as stored.
    tasks: Vec<Task>,
    /// Open tasks minus work scheduled before the planning date.
    plannable: Vec<Task>,
    production_holidays: Vec<ProductionHoliday>,
    holiday_requests: Vec<HolidayRequest>,
}

impl Snapshot {
    fn load<S: PlanningStore>(
        store: &S,
        date: NaiveDate,
        default_task_minutes: i64,
    ) -> PlanningResult<Self> {
        let tasks = store.open_tasks()?;
        let planned = store.planned_minutes_before(date)?;
        let plannable = selection::remaining_work(tasks.clone(), &planned, default_task_minutes);
        Ok(Self {
            workers: store.workers()?,
            tasks,
            plannable,
            production_holidays: store.production_holidays()?,
            holiday_requests: store.holiday_requests()?,
        })
    }

    fn availability<'a>(&'a self, team: &'a str, skip_weekends: bool) -> Availability<'a> {
        Availability::new(&self.production_holidays, &self.holiday_requests, team)
            .with_skip_weekends(skip_weekends)
    }

    fn worker(&self, worker_id: &str) -> Option<&Worker> {
        self.workers.iter().find(|w| w.id == worker_id)
    }
}

/// Plans worker days against a store.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_workplan::config::PlannerConfig;
/// use u_workplan::models::{Task, Worker};
/// use u_workplan::planner::Planner;
/// use u_workplan::store::MemoryStore;
///
/// let store = MemoryStore::new()
///     .with_worker(Worker::new("W1").with_workstation("Saw"))
///     .with_task(Task::new("T1").with_title("Cut panels").with_workstation("Saw").with_duration(90));
///
/// let mut planner = Planner::new(store, PlannerConfig::default()).unwrap();
/// let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
/// let report = planner.generate_day(date).unwrap();
///
/// assert_eq!(report.generated_entries(), 1);
/// assert!(report.conflicts.is_empty());
/// ```
#[derive(Debug)]
pub struct Planner<S> {
    store: S,
    config: PlannerConfig,
    engine: RuleEngine,
}

impl<S: PlanningStore> Planner<S> {
    /// Creates a planner. Fails if the configuration is invalid.
    pub fn new(store: S, config: PlannerConfig) -> PlanningResult<Self> {
        config.validate()?;
        Ok(Self {
            store,
            config,
            engine: RuleEngine::task_order(),
        })
    }

    /// Replaces the task ordering.
    pub fn with_engine(mut self, engine: RuleEngine) -> Self {
        self.engine = engine;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn store_mut(&mut self) -> &mut S {
        &mut self.store
    }

    pub fn config(&self) -> &PlannerConfig {
        &self.config
    }

    /// Consumes the planner, returning its store.
    pub fn into_store(self) -> S {
        self.store
    }

    /// Generates every schedulable worker's day.
    pub fn generate_day(&mut self, date: NaiveDate) -> PlanningResult<GenerationReport> {
        let snapshot = Snapshot::load(&self.store, date, self.config.default_task_minutes)?;
        let team = self.config.production_team.clone();
        let availability = snapshot.availability(&team, self.config.skip_weekends);

        if availability.is_blocked_date(date) {
            warn!(event = "date_blocked", date = %date);
            return Err(PlanningError::BlockedDate(date));
        }

        if let Err(errors) = validation::validate_input(&snapshot.workers, &snapshot.tasks) {
            for e in &errors {
                warn!(event = "input_invalid", kind = ?e.kind, message = %e.message);
            }
        }

        info!(
            event = "generate_start",
            date = %date,
            worker_count = snapshot.workers.len(),
            task_count = snapshot.plannable.len(),
        );

        let no_exclusions = HashSet::new();
        let mut outcomes = Vec::new();
        for worker in &snapshot.workers {
            if !self.config.is_schedulable_role(&worker.role) {
                continue;
            }
            let on_holiday = availability.is_worker_unavailable(&worker.id, date);
            let status =
                match self.plan_worker(worker, date, &snapshot.plannable, on_holiday, &no_exclusions) {
                    Ok(status) => status,
                    Err(e) => {
                        error!(event = "generate_aborted", worker_id = %worker.id, error = %e);
                        return Err(e);
                    }
                };
            outcomes.push(WorkerOutcome {
                worker_id: worker.id.clone(),
                status,
            });
        }

        let entries = self.store.entries_on(date)?;
        let conflicts = conflict::detect_conflicts(
            &entries,
            &snapshot.tasks,
            &snapshot.workers,
            self.config.default_task_minutes,
        );
        self.regenerate_workstations(date)?;

        let scheduled: HashSet<&str> = entries.iter().filter_map(|e| e.task_id.as_deref()).collect();
        let unscheduled_task_ids: Vec<String> = snapshot
            .plannable
            .iter()
            .filter(|t| !scheduled.contains(t.id.as_str()))
            .map(|t| t.id.clone())
            .collect();

        let report = GenerationReport {
            date,
            outcomes,
            unscheduled_task_ids,
            conflicts,
        };
        info!(
            event = "generate_end",
            date = %date,
            entries = report.generated_entries(),
            skipped = report.skipped().count(),
            unscheduled = report.unscheduled_task_ids.len(),
            conflicts = report.conflicts.len(),
        );
        Ok(report)
    }

    /// Regenerates one worker's day.
    pub fn generate_worker(
        &mut self,
        worker_id: &str,
        date: NaiveDate,
    ) -> PlanningResult<WorkerOutcome> {
        let snapshot = Snapshot::load(&self.store, date, self.config.default_task_minutes)?;
        let team = self.config.production_team.clone();
        let availability = snapshot.availability(&team, self.config.skip_weekends);

        if availability.is_blocked_date(date) {
            warn!(event = "date_blocked", date = %date);
            return Err(PlanningError::BlockedDate(date));
        }
        let worker = snapshot
            .worker(worker_id)
            .ok_or_else(|| PlanningError::UnknownWorker(worker_id.to_string()))?;

        let status = if self.config.is_schedulable_role(&worker.role) {
            let on_holiday = availability.is_worker_unavailable(worker_id, date);
            self.plan_worker(worker, date, &snapshot.plannable, on_holiday, &HashSet::new())?
        } else {
            WorkerStatus::Skipped(SkipReason::NotSchedulable)
        };
        self.regenerate_workstations(date)?;

        Ok(WorkerOutcome {
            worker_id: worker_id.to_string(),
            status,
        })
    }

    /// The first planning day strictly after `from`.
    pub fn next_eligible_date(&self, from: NaiveDate) -> PlanningResult<NaiveDate> {
        let production_holidays = self.store.production_holidays()?;
        Availability::new(&production_holidays, &[], &self.config.production_team)
            .with_skip_weekends(self.config.skip_weekends)
            .next_eligible_date(from)
            .ok_or(PlanningError::NoEligibleDate(from))
    }

    /// Generates the next planning day after `from`.
    pub fn generate_next_day(&mut self, from: NaiveDate) -> PlanningResult<GenerationReport> {
        let date = self.next_eligible_date(from)?;
        debug!(event = "next_day", from = %from, date = %date);
        self.generate_day(date)
    }

    /// Tasks held by more than one worker on `date`.
    pub fn detect_conflicts(&self, date: NaiveDate) -> PlanningResult<Vec<TaskConflict>> {
        let workers = self.store.workers()?;
        let tasks = self.store.open_tasks()?;
        let entries = self.store.entries_on(date)?;
        Ok(conflict::detect_conflicts(
            &entries,
            &tasks,
            &workers,
            self.config.default_task_minutes,
        ))
    }

    /// Runs one resolution round and returns what is still in conflict.
    ///
    /// Dropped workers lose their entries for the task and are re-packed
    /// without it. A task nobody kept is offered to the other eligible
    /// workers by re-packing their days. When nothing remains the session
    /// is cleared.
    pub fn resolve_conflicts(
        &mut self,
        date: NaiveDate,
        session: &mut ConflictSession,
        decisions: &KeepDecisions,
    ) -> PlanningResult<Vec<TaskConflict>> {
        let snapshot = Snapshot::load(&self.store, date, self.config.default_task_minutes)?;
        let entries = self.store.entries_on(date)?;
        let conflicts = session.outstanding(conflict::detect_conflicts(
            &entries,
            &snapshot.tasks,
            &snapshot.workers,
            self.config.default_task_minutes,
        ));

        let plan = session.apply(&conflicts, decisions);
        info!(
            event = "resolve_round",
            date = %date,
            round = session.rounds(),
            dropped = plan.dropped_entry_ids.len(),
            affected = plan.affected_workers.len(),
            orphaned = plan.orphaned_task_ids.len(),
        );

        if !plan.is_empty() {
            self.store.delete_entries(&plan.dropped_entry_ids)?;

            let team = self.config.production_team.clone();
            let availability = snapshot.availability(&team, self.config.skip_weekends);
            let mut repack: Vec<&Worker> = plan
                .affected_workers
                .iter()
                .filter_map(|id| snapshot.worker(id))
                .collect();
            for task_id in &plan.orphaned_task_ids {
                let Some(task) = snapshot.plannable.iter().find(|t| &t.id == task_id) else {
                    continue;
                };
                let takers: Vec<&Worker> = snapshot
                    .workers
                    .iter()
                    .filter(|w| self.config.is_schedulable_role(&w.role))
                    .filter(|w| !plan.affected_workers.contains(&w.id))
                    .filter(|w| selection::is_eligible(w, task))
                    .filter(|w| !session.excluded_for(&w.id).contains(task_id))
                    .collect();
                for worker in takers {
                    if !repack.iter().any(|w| w.id == worker.id) {
                        repack.push(worker);
                    }
                }
            }

            for worker in repack {
                let excluded = session.excluded_for(&worker.id);
                let on_holiday = availability.is_worker_unavailable(&worker.id, date);
                self.plan_worker(worker, date, &snapshot.plannable, on_holiday, &excluded)?;
            }
            self.regenerate_workstations(date)?;

            let entries = self.store.entries_on(date)?;
            for task_id in &plan.orphaned_task_ids {
                if !entries.iter().any(|e| e.is_for_task(task_id)) {
                    warn!(event = "task_unassigned", date = %date, task_id = %task_id);
                }
            }
        }

        let remaining = session.outstanding(self.detect_conflicts(date)?);
        if remaining.is_empty() {
            info!(event = "conflicts_resolved", date = %date, rounds = session.rounds());
            session.clear();
        }
        Ok(remaining)
    }

    /// Converts a drag distance to a minute delta at the configured snap.
    pub fn drag_minutes(&self, pixels: f64, pixels_per_minute: f64) -> i64 {
        pixels_to_minutes(pixels, pixels_per_minute, self.config.snap_minutes)
    }

    /// Validates and persists a manual move or resize.
    ///
    /// Only the entry's start and end are written.
    pub fn adjust_entry(
        &mut self,
        entry_id: &str,
        adjustment: Adjustment,
    ) -> PlanningResult<AdjustmentOutcome> {
        let entry = self
            .store
            .entry(entry_id)?
            .ok_or_else(|| PlanningError::UnknownEntry(entry_id.to_string()))?;
        let date = entry.date();
        let others = self.store.entries_on(date)?;

        let working_day = self.config.working_day();
        let validator = AdjustmentValidator::new(&working_day)
            .with_min_entry_minutes(self.config.min_entry_minutes);
        let outcome = match validator.validate(&entry, &others, adjustment) {
            Ok(outcome) => outcome,
            Err(e) => {
                warn!(event = "adjust_rejected", entry_id = %entry_id, reason = %e);
                return Err(e.into());
            }
        };

        let placement = outcome.placement();
        self.store
            .update_entry_times(entry_id, placement.start, placement.end)?;
        info!(
            event = "adjust_applied",
            entry_id = %entry_id,
            start = %placement.start,
            end = %placement.end,
            outcome = ?outcome,
        );

        self.regenerate_workstations(date)?;
        Ok(outcome)
    }

    /// Deletes one entry and refreshes the workstation view.
    pub fn delete_entry(&mut self, entry_id: &str) -> PlanningResult<()> {
        let entry = self
            .store
            .entry(entry_id)?
            .ok_or_else(|| PlanningError::UnknownEntry(entry_id.to_string()))?;
        self.store.delete_entries(&[entry.id.clone()])?;
        info!(event = "entry_deleted", entry_id = %entry_id, worker_id = %entry.worker_id);
        self.regenerate_workstations(entry.date())?;
        Ok(())
    }

    /// Fresh worker and workstation views for `date`.
    pub fn day_schedule(&self, date: NaiveDate) -> PlanningResult<DaySchedule> {
        Ok(DaySchedule::from_entries(
            self.store.entries_on(date)?,
            self.store.workstation_entries_on(date)?,
        ))
    }

    /// Rebuilds the workstation view of `date` from the worker entries.
    ///
    /// Returns the number of workstation entries written.
    pub fn regenerate_workstations(&mut self, date: NaiveDate) -> PlanningResult<usize> {
        let entries = self.store.entries_on(date)?;
        let mut task_ids: Vec<String> = entries.iter().filter_map(|e| e.task_id.clone()).collect();
        task_ids.sort();
        task_ids.dedup();

        let tasks = self.store.tasks(&task_ids)?;
        let workers = self.store.workers()?;
        let projected = project_workstations(&entries, &tasks, &workers);
        let count = projected.len();

        self.store.replace_workstation_entries(date, projected)?;
        debug!(event = "workstations_regenerated", date = %date, entries = count);
        Ok(count)
    }

    fn plan_worker(
        &mut self,
        worker: &Worker,
        date: NaiveDate,
        tasks: &[Task],
        on_holiday: bool,
        excluded: &HashSet<String>,
    ) -> PlanningResult<WorkerStatus> {
        let skip = if on_holiday {
            Some(SkipReason::OnHoliday)
        } else if worker.assigned_workstations().is_empty() {
            Some(SkipReason::NoWorkstations)
        } else {
            None
        };
        if let Some(reason) = skip {
            warn!(event = "worker_skipped", worker_id = %worker.id, reason = ?reason);
            return Ok(WorkerStatus::Skipped(reason));
        }

        let context = SelectionContext::for_date(date)
            .with_default_task_minutes(self.config.default_task_minutes);
        let selected = selection::select_tasks(worker, tasks, excluded, &self.engine, &context);
        if selected.is_empty() {
            warn!(event = "worker_skipped", worker_id = %worker.id, reason = ?SkipReason::NoTasks);
            return Ok(WorkerStatus::Skipped(SkipReason::NoTasks));
        }

        let removed = self.store.delete_generated_entries(&worker.id, date)?;
        let busy: Vec<(NaiveDateTime, NaiveDateTime)> = self
            .store
            .entries_on(date)?
            .into_iter()
            .filter(|e| e.worker_id == worker.id)
            .map(|e| (e.start, e.end))
            .collect();
        let packed = SlotPacker::new(self.config.working_day())
            .with_default_task_minutes(self.config.default_task_minutes)
            .pack_around(&worker.id, date, &selected, &busy);
        let planned_minutes = packed.planned_minutes();
        let entries = packed.entries.len();
        self.store.insert_entries(packed.entries)?;

        debug!(
            event = "worker_planned",
            worker_id = %worker.id,
            removed,
            kept = busy.len(),
            entries,
            planned_minutes,
            deferred = packed.deferred.len(),
        );
        Ok(WorkerStatus::Generated {
            entries,
            planned_minutes,
            deferred: packed.deferred,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{PlacementError, StoreError};
    use crate::models::{ScheduleEntry, TaskStatus, WorkingHoursWindow};
    use crate::store::MemoryStore;
    use chrono::{NaiveDateTime, NaiveTime};

    fn monday() -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 5, 6).unwrap()
    }

    fn at(h: u32, m: u32) -> NaiveDateTime {
        monday().and_time(NaiveTime::from_hms_opt(h, m, 0).unwrap())
    }

    fn shop() -> MemoryStore {
        MemoryStore::new()
            .with_worker(Worker::new("W1").with_name("Ann").with_workstation("Saw"))
            .with_worker(Worker::new("W2").with_name("Bert").with_workstation("Press"))
            .with_task(Task::new("T1").with_title("Cut").with_workstation("Saw").with_duration(120))
            .with_task(Task::new("T2").with_title("Glue").with_workstation("Press").with_duration(60))
    }

    fn planner(store: MemoryStore) -> Planner<MemoryStore> {
        Planner::new(store, PlannerConfig::default()).unwrap()
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = PlannerConfig::default().with_working_hours(vec![]);
        let err = Planner::new(MemoryStore::new(), config).unwrap_err();
        assert!(matches!(err, PlanningError::Config(_)));
    }

    #[test]
    fn test_generate_day() {
        let mut p = planner(shop());
        let report = p.generate_day(monday()).unwrap();

        assert_eq!(report.outcomes.len(), 2);
        assert_eq!(report.generated_entries(), 2);
        assert!(report.unscheduled_task_ids.is_empty());
        assert!(!report.has_conflicts());

        let day = p.day_schedule(monday()).unwrap();
        assert_eq!(day.planned_minutes("W1"), 120);
        assert_eq!(day.worker_entries("W2")[0].start, at(7, 0));
        assert_eq!(day.by_workstation["Saw"][0].label, "Cut - Ann");
    }

    #[test]
    fn test_regeneration_replaces_auto_entries_only() {
        let store = shop().with_entry(ScheduleEntry::manual("W1", "Meeting", at(15, 0), at(16, 0)));
        let mut p = planner(store);

        p.generate_day(monday()).unwrap();
        p.generate_day(monday()).unwrap();

        let w1 = p.store().worker_entries("W1", monday());
        assert_eq!(w1.len(), 2);
        assert!(w1.iter().any(|e| !e.auto_generated && e.title == "Meeting"));
        assert_eq!(p.store().worker_entries("W2", monday()).len(), 1);
    }

    #[test]
    fn test_packs_around_manual_entry() {
        let store = shop().with_entry(
            ScheduleEntry::manual("W1", "Meeting", at(7, 30), at(8, 30)).with_id("M"),
        );
        let mut p = planner(store);
        p.generate_day(monday()).unwrap();

        let w1 = p.store().worker_entries("W1", monday());
        let spans: Vec<(&str, NaiveDateTime, NaiveDateTime)> = w1
            .iter()
            .map(|e| (e.title.as_str(), e.start, e.end))
            .collect();
        assert_eq!(
            spans,
            vec![
                ("Cut (Part 1)", at(7, 0), at(7, 30)),
                ("Meeting", at(7, 30), at(8, 30)),
                ("Cut (Part 2)", at(8, 30), at(10, 0)),
            ]
        );
    }

    #[test]
    fn test_blocked_date_writes_nothing() {
        let store = shop().with_production_holiday(ProductionHoliday::new(monday()));
        let mut p = planner(store);

        let err = p.generate_day(monday()).unwrap_err();
        assert!(matches!(err, PlanningError::BlockedDate(d) if d == monday()));
        assert!(p.store().entries().is_empty());
        assert!(p.store().workstation_entries().is_empty());
    }

    #[test]
    fn test_other_team_holiday_does_not_block() {
        let store =
            shop().with_production_holiday(ProductionHoliday::new(monday()).for_team("office"));
        let mut p = planner(store);
        assert!(p.generate_day(monday()).is_ok());
    }

    #[test]
    fn test_skip_reasons() {
        let store = shop()
            .with_worker(Worker::new("W3").with_workstation("Saw"))
            .with_worker(Worker::new("W4"))
            .with_worker(Worker::new("W5").with_workstation("Paint"))
            .with_worker(Worker::new("W6").with_role("admin").with_workstation("Saw"))
            .with_holiday_request(HolidayRequest::new("H1", "W3", monday(), monday()).approved());
        let mut p = planner(store);

        let report = p.generate_day(monday()).unwrap();
        let skipped: Vec<(&str, SkipReason)> = report.skipped().collect();
        assert_eq!(
            skipped,
            vec![
                ("W3", SkipReason::OnHoliday),
                ("W4", SkipReason::NoWorkstations),
                ("W5", SkipReason::NoTasks),
            ]
        );
        assert!(report.outcome_for("W6").is_none());
        assert!(p.store().worker_entries("W3", monday()).is_empty());
    }

    #[test]
    fn test_pending_holiday_does_not_skip() {
        let store = shop().with_holiday_request(HolidayRequest::new("H1", "W1", monday(), monday()));
        let mut p = planner(store);
        let report = p.generate_day(monday()).unwrap();
        assert!(!report.outcome_for("W1").unwrap().is_skipped());
    }

    #[test]
    fn test_unscheduled_and_deferred() {
        let store = shop()
            .with_task(Task::new("T3").with_title("Sand").with_workstation("Saw").with_duration(500))
            .with_task(Task::new("T4").with_title("Paint").with_workstation("Booth"));
        let mut p = planner(store);

        let report = p.generate_day(monday()).unwrap();
        assert_eq!(report.unscheduled_task_ids, vec!["T4"]);
        match &report.outcome_for("W1").unwrap().status {
            WorkerStatus::Generated { planned_minutes, deferred, .. } => {
                assert_eq!(*planned_minutes, 495);
                assert_eq!(deferred[0].remaining_minutes, 125);
            }
            other => panic!("unexpected status {other:?}"),
        }
    }

    #[test]
    fn test_store_failure_aborts_batch() {
        let store = shop().with_failing_worker("W2");
        let mut p = planner(store);

        let err = p.generate_day(monday()).unwrap_err();
        assert!(matches!(err, PlanningError::Store(StoreError::Backend(_))));
        // W1 ran first and keeps its entries
        assert_eq!(p.store().worker_entries("W1", monday()).len(), 1);
        assert!(p.store().worker_entries("W2", monday()).is_empty());
    }

    #[test]
    fn test_generate_worker() {
        let mut p = planner(shop());
        let outcome = p.generate_worker("W2", monday()).unwrap();
        assert!(!outcome.is_skipped());
        assert!(p.store().worker_entries("W1", monday()).is_empty());

        let err = p.generate_worker("nobody", monday()).unwrap_err();
        assert!(matches!(err, PlanningError::UnknownWorker(_)));
    }

    #[test]
    fn test_generate_worker_not_schedulable() {
        let store = shop().with_worker(Worker::new("A1").with_role("admin").with_workstation("Saw"));
        let mut p = planner(store);
        let outcome = p.generate_worker("A1", monday()).unwrap();
        assert_eq!(outcome.status, WorkerStatus::Skipped(SkipReason::NotSchedulable));
    }

    #[test]
    fn test_generate_next_day_skips_holidays() {
        let tuesday = monday().succ_opt().unwrap();
        let store = shop().with_production_holiday(ProductionHoliday::new(tuesday));
        let mut p = planner(store);

        let report = p.generate_next_day(monday()).unwrap();
        assert_eq!(report.date, tuesday.succ_opt().unwrap());
    }

    #[test]
    fn test_next_day_continues_earlier_work() {
        let store = shop().with_task(
            Task::new("T3")
                .with_title("Sand")
                .with_workstation("Saw")
                .with_duration(600),
        );
        let mut p = planner(store);
        let tuesday = monday().succ_opt().unwrap();

        p.generate_day(monday()).unwrap();
        let report = p.generate_next_day(monday()).unwrap();
        assert_eq!(report.date, tuesday);

        // T1 and T2 were fully planned on Monday; only Sand's rest is left
        assert_eq!(
            report.outcome_for("W2").unwrap().status,
            WorkerStatus::Skipped(SkipReason::NoTasks)
        );
        let w1 = p.store().worker_entries("W1", tuesday);
        assert!(w1.iter().all(|e| e.is_for_task("T3")));
        assert_eq!(w1.iter().map(|e| e.duration_minutes()).sum::<i64>(), 600 - 375);
        assert!(report.unscheduled_task_ids.is_empty());

        // Monday itself is planned the same way again
        p.generate_day(monday()).unwrap();
        assert_eq!(p.store().worker_entries("W1", monday()).len(), 4);
    }

    #[test]
    fn test_generate_next_day_skips_weekend() {
        let friday = NaiveDate::from_ymd_opt(2024, 5, 3).unwrap();
        let config = PlannerConfig::default().with_skip_weekends(true);
        let p = Planner::new(shop(), config).unwrap();
        assert_eq!(p.next_eligible_date(friday).unwrap(), monday());
    }

    #[test]
    fn test_conflict_resolution_round() {
        let store = MemoryStore::new()
            .with_worker(Worker::new("A").with_workstation("Edge"))
            .with_worker(Worker::new("B").with_workstation("Edge").with_workstation("CNC"))
            .with_task(Task::new("T").with_title("Band").with_workstation("Edge").with_priority("Urgent"))
            .with_task(Task::new("U").with_title("Drill").with_workstation("CNC"));
        let mut p = planner(store);

        let report = p.generate_day(monday()).unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].worker_ids(), vec!["A", "B"]);

        let mut session = ConflictSession::new();
        let mut decisions = KeepDecisions::new();
        decisions.insert("T".into(), ["A".to_string()].into_iter().collect());

        let remaining = p.resolve_conflicts(monday(), &mut session, &decisions).unwrap();
        assert!(remaining.is_empty());
        assert!(session.is_empty());

        // B now starts its day with U
        let b = p.store().worker_entries("B", monday());
        assert_eq!(b.len(), 1);
        assert!(b[0].is_for_task("U"));
        assert_eq!(b[0].start, at(7, 0));
        assert!(p.store().worker_entries("A", monday())[0].is_for_task("T"));
    }

    #[test]
    fn test_repack_conflict_needs_second_round() {
        let store = MemoryStore::new()
            .with_worker(Worker::new("A").with_workstation("Edge"))
            .with_worker(Worker::new("B").with_workstation("Edge").with_workstation("CNC"))
            .with_worker(Worker::new("C").with_workstation("CNC"))
            .with_task(
                Task::new("T")
                    .with_title("Band")
                    .with_workstation("Edge")
                    .with_priority("Urgent")
                    .with_duration(495),
            )
            .with_task(Task::new("U").with_title("Drill").with_workstation("CNC").with_duration(60));
        let mut p = planner(store);

        // B's day is full with T, so U only lands on C
        let report = p.generate_day(monday()).unwrap();
        assert_eq!(report.conflicts.len(), 1);
        assert_eq!(report.conflicts[0].task_id, "T");

        let mut session = ConflictSession::new();
        let mut decisions = KeepDecisions::new();
        decisions.insert("T".into(), ["A".to_string()].into_iter().collect());
        let remaining = p.resolve_conflicts(monday(), &mut session, &decisions).unwrap();

        // Re-packing B without T pulls U in
        assert_eq!(remaining.len(), 1);
        assert_eq!(remaining[0].task_id, "U");
        assert_eq!(remaining[0].worker_ids(), vec!["B", "C"]);
        assert!(!session.is_empty());
        assert_eq!(session.rounds(), 1);
        assert!(session.excluded_for("B").contains("T"));

        let mut decisions = KeepDecisions::new();
        decisions.insert("U".into(), ["C".to_string()].into_iter().collect());
        let remaining = p.resolve_conflicts(monday(), &mut session, &decisions).unwrap();
        assert!(remaining.is_empty());
        assert!(session.is_empty());

        assert!(p.store().worker_entries("B", monday()).is_empty());
        assert!(p.store().worker_entries("C", monday())[0].is_for_task("U"));
        assert!(p.detect_conflicts(monday()).unwrap().is_empty());
    }

    #[test]
    fn test_task_kept_by_nobody_goes_to_other_worker() {
        let store = MemoryStore::new()
            .with_worker(Worker::new("A").with_workstation("Edge"))
            .with_worker(Worker::new("B").with_workstation("Edge"))
            .with_worker(Worker::new("C").with_workstation("Edge"))
            .with_worker(Worker::new("D").with_workstation("CNC"))
            .with_task(Task::new("T").with_title("Band").with_workstation("Edge"))
            .with_entry(ScheduleEntry::manual("A", "Band", at(7, 0), at(8, 0)).with_task("T"))
            .with_entry(ScheduleEntry::manual("B", "Band", at(9, 0), at(10, 0)).with_task("T"));
        let mut p = planner(store);

        let mut session = ConflictSession::new();
        let mut decisions = KeepDecisions::new();
        decisions.insert("T".into(), HashSet::new());
        let remaining = p.resolve_conflicts(monday(), &mut session, &decisions).unwrap();
        assert!(remaining.is_empty());

        assert!(p.store().worker_entries("A", monday()).is_empty());
        assert!(p.store().worker_entries("B", monday()).is_empty());
        assert!(p.store().worker_entries("D", monday()).is_empty());
        let c = p.store().worker_entries("C", monday());
        assert_eq!(c.len(), 1);
        assert!(c[0].is_for_task("T"));
        assert_eq!(c[0].start, at(7, 0));
    }

    #[test]
    fn test_keep_both_ends_session() {
        let store = MemoryStore::new()
            .with_worker(Worker::new("A").with_workstation("Edge"))
            .with_worker(Worker::new("B").with_workstation("Edge"))
            .with_task(Task::new("T").with_workstation("Edge"));
        let mut p = planner(store);
        p.generate_day(monday()).unwrap();

        let mut session = ConflictSession::new();
        let mut decisions = KeepDecisions::new();
        decisions.insert(
            "T".into(),
            ["A".to_string(), "B".to_string()].into_iter().collect(),
        );

        let remaining = p.resolve_conflicts(monday(), &mut session, &decisions).unwrap();
        assert!(remaining.is_empty());
        assert_eq!(p.store().entries().len(), 2);
        // Raw detection still sees the shared task
        assert_eq!(p.detect_conflicts(monday()).unwrap().len(), 1);
    }

    #[test]
    fn test_adjust_entry_persists_and_reprojects() {
        let mut p = planner(shop());
        p.generate_day(monday()).unwrap();
        let id = p.store().worker_entries("W1", monday())[0].id.clone();

        let outcome = p
            .adjust_entry(&id, Adjustment::Move { delta_minutes: 30 })
            .unwrap();
        assert!(matches!(outcome, AdjustmentOutcome::Exact(_)));

        let moved = p.store().entry(&id).unwrap().unwrap();
        assert_eq!((moved.start, moved.end), (at(7, 30), at(9, 30)));
        let saw = &p.day_schedule(monday()).unwrap().by_workstation["Saw"];
        assert_eq!(saw[0].start, at(7, 30));
    }

    #[test]
    fn test_adjust_entry_rejected_leaves_store() {
        let mut p = planner(shop());
        p.generate_day(monday()).unwrap();
        let id = p.store().worker_entries("W1", monday())[0].id.clone();

        let err = p
            .adjust_entry(&id, Adjustment::Resize { delta_minutes: -118 })
            .unwrap_err();
        assert!(matches!(
            err,
            PlanningError::Placement(PlacementError::TooShort { minutes: 2 })
        ));
        let entry = p.store().entry(&id).unwrap().unwrap();
        assert_eq!(entry.end, at(9, 0));

        let err = p
            .adjust_entry("missing", Adjustment::Move { delta_minutes: 5 })
            .unwrap_err();
        assert!(matches!(err, PlanningError::UnknownEntry(_)));
    }

    #[test]
    fn test_delete_entry() {
        let mut p = planner(shop());
        p.generate_day(monday()).unwrap();
        let id = p.store().worker_entries("W1", monday())[0].id.clone();

        p.delete_entry(&id).unwrap();
        assert!(p.store().entry(&id).unwrap().is_none());
        let day = p.day_schedule(monday()).unwrap();
        assert!(!day.by_workstation.contains_key("Saw"));
        assert!(day.by_workstation.contains_key("Press"));
    }

    #[test]
    fn test_workstation_view_keeps_non_open_tasks() {
        let store = MemoryStore::new()
            .with_worker(Worker::new("W1").with_name("Ann").with_workstation("Saw"))
            .with_task(
                Task::new("T9")
                    .with_title("Done cut")
                    .with_workstation("Saw")
                    .with_status(TaskStatus::InProgress),
            )
            .with_entry(
                ScheduleEntry::manual("W1", "Done cut", at(7, 0), at(8, 0)).with_task("T9"),
            );
        let mut p = planner(store);

        assert_eq!(p.regenerate_workstations(monday()).unwrap(), 1);
        assert_eq!(p.store().workstation_entries()[0].workstation, "Saw");
    }

    #[test]
    fn test_drag_minutes_uses_snap() {
        let p = planner(MemoryStore::new());
        assert_eq!(p.drag_minutes(37.0, 1.0), 35);
        assert_eq!(p.drag_minutes(-23.0, 2.0), -10);
    }

    #[test]
    fn test_custom_working_hours() {
        let hours = vec![WorkingHoursWindow::from_hm("Short", (8, 0), (9, 0)).unwrap()];
        let config = PlannerConfig::default().with_working_hours(hours);
        let mut p = Planner::new(shop(), config).unwrap();

        let report = p.generate_day(monday()).unwrap();
        match &report.outcome_for("W1").unwrap().status {
            WorkerStatus::Generated { planned_minutes, deferred, .. } => {
                assert_eq!(*planned_minutes, 60);
                assert_eq!(deferred.len(), 1);
            }
            other => panic!("unexpected status {other:?}"),
        }
    }
}
