//! Task conflict model.
//!
//! A conflict exists when one task shows up on more than one worker's
//! schedule for the same date. Conflicts are transient: they live between
//! schedule generation and resolution and are never persisted.

use serde::{Deserialize, Serialize};

/// One worker's hold on a conflicting task.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConflictClaim {
    pub worker_id: String,
    pub worker_name: String,
    /// This worker's entries for the task.
    pub entry_ids: Vec<String>,
    /// Minutes of the task scheduled for this worker.
    pub scheduled_minutes: i64,
    /// Total minutes of open work eligible for this worker (informational).
    pub open_task_minutes: i64,
}

/// A task concurrently assigned to several workers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskConflict {
    pub task_id: String,
    pub task_title: String,
    /// Claims ordered by worker ID.
    pub claims: Vec<ConflictClaim>,
}

impl TaskConflict {
    /// IDs of the workers holding the task.
    pub fn worker_ids(&self) -> Vec<&str> {
        self.claims.iter().map(|c| c.worker_id.as_str()).collect()
    }

    /// The claim held by `worker_id`, if any.
    pub fn claim_for(&self, worker_id: &str) -> Option<&ConflictClaim> {
        self.claims.iter().find(|c| c.worker_id == worker_id)
    }
}
