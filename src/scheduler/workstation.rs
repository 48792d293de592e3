//! Workstation schedule projection.
//!
//! Projects worker entries onto the workstations their tasks are linked
//! to, one workstation entry per (entry, workstation) pair. Entries
//! without a task, or whose task has no workstation, produce nothing.

use std::collections::HashMap;

use crate::models::{ScheduleEntry, Task, Worker, WorkstationScheduleEntry};

/// Builds the workstation view of a set of worker entries.
///
/// `tasks` and `workers` are lookup tables; entries referring to tasks not
/// in `tasks` are skipped, and unknown workers are labelled by ID.
pub fn project_workstations(
    entries: &[ScheduleEntry],
    tasks: &[Task],
    workers: &[Worker],
) -> Vec<WorkstationScheduleEntry> {
    let task_by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let worker_by_id: HashMap<&str, &Worker> =
        workers.iter().map(|w| (w.id.as_str(), w)).collect();

    let mut projected = Vec::new();
    for entry in entries {
        let Some(task) = entry
            .task_id
            .as_deref()
            .and_then(|id| task_by_id.get(id))
        else {
            continue;
        };
        let worker_name = worker_by_id
            .get(entry.worker_id.as_str())
            .map_or(entry.worker_id.as_str(), |w| w.display_name());

        for workstation in &task.workstations {
            projected.push(WorkstationScheduleEntry {
                id: uuid::Uuid::new_v4().to_string(),
                workstation: workstation.clone(),
                task_id: task.id.clone(),
                worker_id: entry.worker_id.clone(),
                label: format!("{} - {}", task.title, worker_name),
                start: entry.start,
                end: entry.end,
            });
        }
    }
    projected
}
