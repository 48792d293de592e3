//! Task selection.
//!
//! Collects the open tasks a worker may be offered, in the order they
//! should be packed into the day.
//!
//! A task is eligible for a worker when it is open and either directly
//! assigned to the worker or linked to at least one workstation the
//! worker staffs. Tasks excluded for the worker during conflict
//! resolution are never offered again in the same resolution session.

use std::collections::{HashMap, HashSet};

use crate::dispatching::{RuleEngine, SelectionContext};
use crate::models::{Task, Worker};

/// Whether `task` may be offered to `worker`.
pub fn is_eligible(worker: &Worker, task: &Task) -> bool {
    if !task.is_open() {
        return false;
    }
    if task.assignee.as_deref() == Some(worker.id.as_str()) {
        return true;
    }
    task.workstations.iter().any(|ws| worker.works_at(ws))
}

/// Open tasks eligible for `worker`, minus `excluded`, in packing order.
pub fn select_tasks(
    worker: &Worker,
    tasks: &[Task],
    excluded: &HashSet<String>,
    engine: &RuleEngine,
    context: &SelectionContext,
) -> Vec<Task> {
    let mut selected: Vec<Task> = tasks
        .iter()
        .filter(|t| is_eligible(worker, t) && !excluded.contains(&t.id))
        .cloned()
        .collect();
    engine.sort(&mut selected, context);
    selected
}

/// Open tasks with the minutes already scheduled on earlier days taken off.
///
/// Tasks whose remaining work is zero or less are dropped; the others
/// carry their remaining minutes as their duration.
pub fn remaining_work(
    tasks: Vec<Task>,
    planned_minutes: &HashMap<String, i64>,
    default_minutes: i64,
) -> Vec<Task> {
    tasks
        .into_iter()
        .filter_map(|mut task| {
            let Some(&planned) = planned_minutes.get(&task.id) else {
                return Some(task);
            };
            let left = task.effective_minutes(default_minutes) - planned;
            if left <= 0 {
                return None;
            }
            task.duration_minutes = Some(left);
            Some(task)
        })
        .collect()
}

/// Total minutes of open work eligible for `worker`.
pub fn open_task_minutes(worker: &Worker, tasks: &[Task], default_minutes: i64) -> i64 {
    tasks
        .iter()
        .filter(|t| is_eligible(worker, t))
        .map(|t| t.effective_minutes(default_minutes))
        .sum()
}
