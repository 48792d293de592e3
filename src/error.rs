//! Error types.
//!
//! Per-worker skips (holiday, no workstations, no open tasks) are not
//! errors; they are reported through
//! [`GenerationReport`](crate::planner::GenerationReport).

use chrono::NaiveDate;
use thiserror::Error;

use crate::config::ConfigError;

/// Failure reported by a [`PlanningStore`](crate::store::PlanningStore).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("backend error: {0}")]
    Backend(String),

    #[error("{kind} not found: {id}")]
    NotFound { kind: &'static str, id: String },
}

/// Why a manual move or resize was rejected.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PlacementError {
    #[error("placement falls outside the working day")]
    OutOfBounds,

    #[error("placement overlaps a break")]
    CrossesBreak,

    #[error("placement overlaps entry {entry_id}")]
    Overlaps { entry_id: String },

    #[error("entry would be {minutes} minutes, below the minimum")]
    TooShort { minutes: i64 },
}

/// Top-level planning error.
#[derive(Debug, Error)]
pub enum PlanningError {
    #[error("{0} is a production holiday")]
    BlockedDate(NaiveDate),

    #[error("no planning day after {0}")]
    NoEligibleDate(NaiveDate),

    #[error("unknown worker: {0}")]
    UnknownWorker(String),

    #[error("unknown schedule entry: {0}")]
    UnknownEntry(String),

    #[error(transparent)]
    Placement(#[from] PlacementError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Result alias for planner operations.
pub type PlanningResult<T> = Result<T, PlanningError>;
