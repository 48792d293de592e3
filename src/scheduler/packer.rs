//! Greedy slot packer.
//!
//! # Algorithm
//!
//! 1. Cut each working-hours window into free segments around the busy
//!    spans already on the worker's day (kept manual entries).
//! 2. Walk the segments in order with a clock starting at each segment's
//!    start.
//! 3. Allocate `min(task remaining, segment remaining)` minutes of the
//!    current task at the clock, then advance the clock.
//! 4. When the task is exhausted, move to the next task; when the segment
//!    is exhausted, move to the next segment.
//! 5. Stop when either tasks or segments run out. Leftover tasks are
//!    deferred, not failed.
//!
//! A task that needed more than one allocation gets a `(Part N)` suffix
//! on each of its entries, numbered within that task.
//!
//! # Complexity
//! O(t + w·b log b) where t=tasks, w=windows, b=busy spans.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::models::{ScheduleEntry, Task, WorkingDay};

/// A task that did not fit completely into the day.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeferredTask {
    pub task_id: String,
    /// Minutes still to be planned on a later day.
    pub remaining_minutes: i64,
}

/// Output of one packing run.
#[derive(Debug, Clone, Default)]
pub struct PackResult {
    /// Entries in chronological order.
    pub entries: Vec<ScheduleEntry>,
    /// Tasks that were cut off or never started.
    pub deferred: Vec<DeferredTask>,
}

impl PackResult {
    /// Total planned minutes.
    pub fn planned_minutes(&self) -> i64 {
        self.entries.iter().map(|e| e.duration_minutes()).sum()
    }
}

/// Packs a worker's ordered tasks into the working day.
///
/// # Example
///
/// ```
/// use chrono::NaiveDate;
/// use u_workplan::config::PlannerConfig;
/// use u_workplan::models::Task;
/// use u_workplan::scheduler::SlotPacker;
///
/// let packer = SlotPacker::new(PlannerConfig::default().working_day());
/// let date = NaiveDate::from_ymd_opt(2024, 5, 6).unwrap();
/// let tasks = vec![Task::new("T1").with_title("Cut").with_duration(90)];
///
/// let result = packer.pack("W1", date, &tasks);
/// assert_eq!(result.entries.len(), 1);
/// assert_eq!(result.entries[0].duration_minutes(), 90);
/// ```
#[derive(Debug, Clone)]
pub struct SlotPacker {
    working_day: WorkingDay,
    default_task_minutes: i64,
}

impl SlotPacker {
    /// Creates a packer for the given working day.
    pub fn new(working_day: WorkingDay) -> Self {
        Self {
            working_day,
            default_task_minutes: 60,
        }
    }

    /// Sets the duration used for tasks without one.
    pub fn with_default_task_minutes(mut self, minutes: i64) -> Self {
        self.default_task_minutes = minutes;
        self
    }

    /// The working day this packer fills.
    pub fn working_day(&self) -> &WorkingDay {
        &self.working_day
    }

    /// Packs `tasks` (already in priority order) for `worker_id` on `date`.
    pub fn pack(&self, worker_id: &str, date: NaiveDate, tasks: &[Task]) -> PackResult {
        self.pack_around(worker_id, date, tasks, &[])
    }

    /// Like [`pack`](Self::pack), but leaves `busy` spans untouched.
    ///
    /// `busy` is usually the worker's manual entries for the date. Spans
    /// may be unsorted and may reach outside the windows.
    pub fn pack_around(
        &self,
        worker_id: &str,
        date: NaiveDate,
        tasks: &[Task],
        busy: &[(NaiveDateTime, NaiveDateTime)],
    ) -> PackResult {
        let mut result = PackResult::default();
        let mut cursor = 0;
        let mut remaining = 0;
        let mut parts: Vec<ScheduleEntry> = Vec::new();

        if let Some(task) = tasks.first() {
            remaining = task.effective_minutes(self.default_task_minutes);
        }

        'segments: for (segment_start, segment_end) in self.free_segments(date, busy) {
            let mut segment_left = (segment_end - segment_start).num_minutes();
            let mut clock: NaiveDateTime = segment_start;

            while segment_left > 0 {
                let Some(task) = tasks.get(cursor) else {
                    break 'segments;
                };

                let minutes = remaining.min(segment_left);
                if minutes > 0 {
                    let end = clock + Duration::minutes(minutes);
                    parts.push(
                        ScheduleEntry::generated(worker_id, task.title.clone(), clock, end)
                            .with_task(task.id.clone())
                            .with_description(task.description.clone()),
                    );
                    clock = end;
                    segment_left -= minutes;
                    remaining -= minutes;
                }

                if remaining <= 0 {
                    finish_task(&mut parts, &mut result.entries);
                    cursor += 1;
                    if let Some(next) = tasks.get(cursor) {
                        remaining = next.effective_minutes(self.default_task_minutes);
                    }
                }
            }
        }

        // Day is full: the task in progress and everything after it is deferred
        if let Some(task) = tasks.get(cursor) {
            finish_task(&mut parts, &mut result.entries);
            result.deferred.push(DeferredTask {
                task_id: task.id.clone(),
                remaining_minutes: remaining,
            });
            result
                .deferred
                .extend(tasks[cursor + 1..].iter().map(|t| DeferredTask {
                    task_id: t.id.clone(),
                    remaining_minutes: t.effective_minutes(self.default_task_minutes),
                }));
        }

        result
    }

    /// Window parts not covered by `busy`, in chronological order.
    fn free_segments(
        &self,
        date: NaiveDate,
        busy: &[(NaiveDateTime, NaiveDateTime)],
    ) -> Vec<(NaiveDateTime, NaiveDateTime)> {
        let mut spans = busy.to_vec();
        spans.sort();

        let mut segments = Vec::new();
        for window in self.working_day.windows() {
            let mut free_from = date.and_time(window.start);
            let window_end = date.and_time(window.end);

            for &(start, end) in &spans {
                if end <= free_from || start >= window_end {
                    continue;
                }
                if start > free_from {
                    segments.push((free_from, start));
                }
                free_from = free_from.max(end);
                if free_from >= window_end {
                    break;
                }
            }
            if free_from < window_end {
                segments.push((free_from, window_end));
            }
        }
        segments
    }
}

/// Moves a task's entries to the output, numbering them if split.
fn finish_task(parts: &mut Vec<ScheduleEntry>, out: &mut Vec<ScheduleEntry>) {
    if parts.len() > 1 {
        for (i, entry) in parts.iter_mut().enumerate() {
            entry.title = format!("{} (Part {})", entry.title, i + 1);
        }
    }
    out.append(parts);
}
