//! Assignment conflict detection and resolution.
//!
//! After a batch generation, the same task can land on several workers'
//! days (each worker selects tasks independently). Detection groups the
//! day's entries by task; any task held by more than one worker is a
//! [`TaskConflict`].
//!
//! Resolution is decision-driven: for each conflict the caller names the
//! workers that keep the task. Everyone else loses their entries for it,
//! and the task is excluded for them for the rest of the session so that
//! re-packing cannot hand it straight back. Re-packing can shift other
//! tasks into new collisions, so detection runs again after every round
//! until nothing is left.
//!
//! A task nobody keeps is reported as orphaned so the caller can offer
//! it to other workers.
//!
//! Keeping a task on several workers is allowed. Such a shared assignment
//! is remembered by the session and not reported again.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use tracing::debug;

use crate::models::{ConflictClaim, ScheduleEntry, Task, TaskConflict, Worker};
use crate::selection;

/// Finds tasks scheduled for more than one worker.
///
/// `entries` should be one date's entries across all workers. Conflicts
/// are ordered by task ID and claims by worker ID.
pub fn detect_conflicts(
    entries: &[ScheduleEntry],
    tasks: &[Task],
    workers: &[Worker],
    default_task_minutes: i64,
) -> Vec<TaskConflict> {
    let mut by_task: BTreeMap<&str, BTreeMap<&str, Vec<&ScheduleEntry>>> = BTreeMap::new();
    for entry in entries {
        if let Some(task_id) = entry.task_id.as_deref() {
            by_task
                .entry(task_id)
                .or_default()
                .entry(entry.worker_id.as_str())
                .or_default()
                .push(entry);
        }
    }

    let task_by_id: HashMap<&str, &Task> = tasks.iter().map(|t| (t.id.as_str(), t)).collect();
    let worker_by_id: HashMap<&str, &Worker> =
        workers.iter().map(|w| (w.id.as_str(), w)).collect();

    by_task
        .into_iter()
        .filter(|(_, holders)| holders.len() > 1)
        .map(|(task_id, holders)| {
            let claims = holders
                .into_iter()
                .map(|(worker_id, held)| {
                    let worker = worker_by_id.get(worker_id);
                    ConflictClaim {
                        worker_id: worker_id.to_string(),
                        worker_name: worker
                            .map_or(worker_id, |w| w.display_name())
                            .to_string(),
                        entry_ids: held.iter().map(|e| e.id.clone()).collect(),
                        scheduled_minutes: held.iter().map(|e| e.duration_minutes()).sum(),
                        open_task_minutes: worker.map_or(0, |w| {
                            selection::open_task_minutes(w, tasks, default_task_minutes)
                        }),
                    }
                })
                .collect();

            TaskConflict {
                task_id: task_id.to_string(),
                task_title: task_by_id
                    .get(task_id)
                    .map_or_else(String::new, |t| t.title.clone()),
                claims,
            }
        })
        .collect()
}

/// What one resolution round must change in the store.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResolutionPlan {
    /// Entries to delete.
    pub dropped_entry_ids: Vec<String>,
    /// Workers whose day must be re-packed, in ID order.
    pub affected_workers: Vec<String>,
    /// Tasks every holder dropped; other eligible workers may pick them up.
    pub orphaned_task_ids: Vec<String>,
}

impl ResolutionPlan {
    /// Whether the round changes nothing.
    pub fn is_empty(&self) -> bool {
        self.dropped_entry_ids.is_empty() && self.affected_workers.is_empty()
    }
}

/// Keep decisions: task ID → workers that keep the task.
pub type KeepDecisions = HashMap<String, HashSet<String>>;

/// State carried across the rounds of one conflict resolution.
#[derive(Debug, Clone, Default)]
pub struct ConflictSession {
    /// worker ID → tasks that may not be offered to that worker again.
    exclusions: HashMap<String, HashSet<String>>,
    /// task ID → workers accepted as sharing the task.
    shared: HashMap<String, HashSet<String>>,
    rounds: usize,
}

impl ConflictSession {
    /// Creates an empty session.
    pub fn new() -> Self {
        Self::default()
    }

    /// Tasks excluded for `worker_id` so far.
    pub fn excluded_for(&self, worker_id: &str) -> HashSet<String> {
        self.exclusions.get(worker_id).cloned().unwrap_or_default()
    }

    /// Number of rounds applied.
    pub fn rounds(&self) -> usize {
        self.rounds
    }

    /// Whether the session holds no exclusions or shared assignments.
    pub fn is_empty(&self) -> bool {
        self.exclusions.is_empty() && self.shared.is_empty()
    }

    /// Whether every holder of `conflict` was already accepted as sharing it.
    pub fn is_accepted(&self, conflict: &TaskConflict) -> bool {
        self.shared.get(&conflict.task_id).is_some_and(|kept| {
            conflict
                .claims
                .iter()
                .all(|c| kept.contains(&c.worker_id))
        })
    }

    /// Drops conflicts already accepted as shared assignments.
    pub fn outstanding(&self, conflicts: Vec<TaskConflict>) -> Vec<TaskConflict> {
        conflicts
            .into_iter()
            .filter(|c| !self.is_accepted(c))
            .collect()
    }

    /// Applies one round of keep decisions.
    ///
    /// Conflicts without a decision are left as they are. Exclusions
    /// accumulate across rounds.
    pub fn apply(&mut self, conflicts: &[TaskConflict], decisions: &KeepDecisions) -> ResolutionPlan {
        self.rounds += 1;
        let mut dropped = Vec::new();
        let mut affected = BTreeSet::new();
        let mut orphaned = Vec::new();

        for conflict in conflicts {
            let Some(keep) = decisions.get(&conflict.task_id) else {
                continue;
            };

            for claim in &conflict.claims {
                if keep.contains(&claim.worker_id) {
                    continue;
                }
                debug!(
                    event = "conflict_drop",
                    task_id = %conflict.task_id,
                    worker_id = %claim.worker_id,
                    entries = claim.entry_ids.len(),
                );
                dropped.extend(claim.entry_ids.iter().cloned());
                affected.insert(claim.worker_id.clone());
                self.exclusions
                    .entry(claim.worker_id.clone())
                    .or_default()
                    .insert(conflict.task_id.clone());
            }

            let kept: HashSet<String> = conflict
                .claims
                .iter()
                .filter(|c| keep.contains(&c.worker_id))
                .map(|c| c.worker_id.clone())
                .collect();
            if kept.is_empty() {
                orphaned.push(conflict.task_id.clone());
            } else if kept.len() > 1 {
                self.shared
                    .entry(conflict.task_id.clone())
                    .or_default()
                    .extend(kept);
            }
        }

        ResolutionPlan {
            dropped_entry_ids: dropped,
            affected_workers: affected.into_iter().collect(),
            orphaned_task_ids: orphaned,
        }
    }

    /// Forgets all exclusions and shared assignments.
    pub fn clear(&mut self) {
        self.exclusions.clear();
        self.shared.clear();
        self.rounds = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, NaiveDateTime};

    fn at(h: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2024, 5, 6)
            .unwrap()
            .and_hms_opt(h, 0, 0)
            .unwrap()
    }

    fn entry(id: &str, worker: &str, task: &str, from: u32, to: u32) -> ScheduleEntry {
        ScheduleEntry::generated(worker, task, at(from), at(to))
            .with_id(id)
            .with_task(task)
    }

    fn fixture() -> (Vec<ScheduleEntry>, Vec<Task>, Vec<Worker>) {
        let entries = vec![
            entry("a1", "A", "T", 7, 9),
            entry("b1", "B", "T", 7, 8),
            entry("b2", "B", "T", 8, 9),
            entry("b3", "B", "U", 9, 10),
            entry("c1", "C", "U", 13, 14),
            entry("c2", "C", "V", 14, 15),
        ];
        let tasks = vec![
            Task::new("T").with_title("Edge banding").with_workstation("Edge").with_duration(120),
            Task::new("U").with_title("Drilling").with_workstation("CNC"),
            Task::new("V").with_title("Packing").with_assignee("C"),
        ];
        let workers = vec![
            Worker::new("A").with_name("Ann").with_workstation("Edge"),
            Worker::new("B").with_name("Bert").with_workstation("Edge").with_workstation("CNC"),
            Worker::new("C").with_name("Cas").with_workstation("CNC"),
        ];
        (entries, tasks, workers)
    }

    fn keep(task: &str, workers: &[&str]) -> KeepDecisions {
        let mut d = KeepDecisions::new();
        d.insert(task.to_string(), workers.iter().map(|w| w.to_string()).collect());
        d
    }

    #[test]
    fn test_detect_conflicts() {
        let (entries, tasks, workers) = fixture();
        let conflicts = detect_conflicts(&entries, &tasks, &workers, 60);

        assert_eq!(conflicts.len(), 2);
        let t = &conflicts[0];
        assert_eq!(t.task_id, "T");
        assert_eq!(t.task_title, "Edge banding");
        assert_eq!(t.worker_ids(), vec!["A", "B"]);

        let bert = t.claim_for("B").unwrap();
        assert_eq!(bert.worker_name, "Bert");
        assert_eq!(bert.entry_ids, vec!["b1", "b2"]);
        assert_eq!(bert.scheduled_minutes, 120);
        assert_eq!(bert.open_task_minutes, 180); // T (120) + U (60)

        assert_eq!(conflicts[1].task_id, "U");
        assert_eq!(conflicts[1].worker_ids(), vec!["B", "C"]);
    }

    #[test]
    fn test_single_holder_is_not_a_conflict() {
        let (entries, tasks, workers) = fixture();
        let only_c: Vec<ScheduleEntry> = entries.into_iter().filter(|e| e.worker_id == "C").collect();
        assert!(detect_conflicts(&only_c, &tasks, &workers, 60).is_empty());
    }

    #[test]
    fn test_keep_one_worker() {
        let (entries, tasks, workers) = fixture();
        let conflicts = detect_conflicts(&entries, &tasks, &workers, 60);
        let mut session = ConflictSession::new();

        let plan = session.apply(&conflicts, &keep("T", &["A"]));
        assert_eq!(plan.dropped_entry_ids, vec!["b1", "b2"]);
        assert_eq!(plan.affected_workers, vec!["B"]);
        assert!(plan.orphaned_task_ids.is_empty());
        assert!(session.excluded_for("B").contains("T"));
        assert!(session.excluded_for("A").is_empty());
        assert_eq!(session.rounds(), 1);

        // Removing B's entries for T leaves only A holding it
        let remaining: Vec<ScheduleEntry> = entries
            .into_iter()
            .filter(|e| !plan.dropped_entry_ids.contains(&e.id))
            .collect();
        let after = detect_conflicts(&remaining, &tasks, &workers, 60);
        assert!(after.iter().all(|c| c.task_id != "T"));
    }

    #[test]
    fn test_keep_both_is_accepted() {
        let (entries, tasks, workers) = fixture();
        let conflicts = detect_conflicts(&entries, &tasks, &workers, 60);
        let mut session = ConflictSession::new();

        let plan = session.apply(&conflicts, &keep("U", &["B", "C"]));
        assert!(plan.is_empty());

        let outstanding = session.outstanding(conflicts);
        assert_eq!(outstanding.len(), 1);
        assert_eq!(outstanding[0].task_id, "T");
    }

    #[test]
    fn test_exclusions_accumulate_and_clear() {
        let (entries, tasks, workers) = fixture();
        let conflicts = detect_conflicts(&entries, &tasks, &workers, 60);
        let mut session = ConflictSession::new();

        session.apply(&conflicts, &keep("T", &["A"]));
        session.apply(&conflicts, &keep("U", &["C"]));
        let excluded = session.excluded_for("B");
        assert!(excluded.contains("T") && excluded.contains("U"));
        assert_eq!(session.rounds(), 2);

        session.clear();
        assert!(session.is_empty());
        assert_eq!(session.rounds(), 0);
    }

    #[test]
    fn test_keep_nobody_orphans_task() {
        let (entries, tasks, workers) = fixture();
        let conflicts = detect_conflicts(&entries, &tasks, &workers, 60);
        let mut session = ConflictSession::new();

        let plan = session.apply(&conflicts, &keep("T", &[]));
        assert_eq!(plan.dropped_entry_ids, vec!["a1", "b1", "b2"]);
        assert_eq!(plan.affected_workers, vec!["A", "B"]);
        assert_eq!(plan.orphaned_task_ids, vec!["T"]);
        assert!(session.excluded_for("A").contains("T"));
    }

    #[test]
    fn test_undecided_conflicts_untouched() {
        let (entries, tasks, workers) = fixture();
        let conflicts = detect_conflicts(&entries, &tasks, &workers, 60);
        let mut session = ConflictSession::new();
        let plan = session.apply(&conflicts, &KeepDecisions::new());
        assert!(plan.is_empty());
        assert_eq!(session.outstanding(conflicts).len(), 2);
    }
}
