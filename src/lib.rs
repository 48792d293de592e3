//! Daily work planning for shop-floor workers and workstations.
//!
//! Assigns open tasks to workers' days across fixed working-hours windows,
//! splits tasks over breaks, detects and resolves double assignments, and
//! projects the result onto workstations. Manual drag and resize edits are
//! validated against the same working day.
//!
//! # Modules
//!
//! - **`models`**: Domain types: `Worker`, `Task`, `WorkingDay`,
//!   `ScheduleEntry`, `WorkstationScheduleEntry`, `TaskConflict`
//! - **`availability`**: Production and personal holiday checks
//! - **`dispatching`**: Rule-based task ordering (priority, due date)
//! - **`selection`**: Eligible tasks per worker
//! - **`scheduler`**: Greedy slot packing and workstation projection
//! - **`conflict`**: Conflict detection and keep/drop resolution
//! - **`adjust`**: Manual move/resize validation with clamp and snap
//! - **`store`**: Persistence gateway and an in-memory store
//! - **`planner`**: Orchestration of the above over a store
//! - **`config`**: TOML configuration
//! - **`validation`**: Input integrity checks
//!
//! # Architecture
//!
//! Everything except [`planner`] and [`store`] is a pure function over
//! in-memory values. The planner reads a snapshot through
//! [`store::PlanningStore`], runs the algorithms and writes the results
//! back. Writes are sequential and not transactional.

pub mod adjust;
pub mod availability;
pub mod config;
pub mod conflict;
pub mod dispatching;
pub mod error;
pub mod models;
pub mod planner;
pub mod scheduler;
pub mod selection;
pub mod store;
pub mod validation;

pub use config::PlannerConfig;
pub use error::{PlanningError, PlanningResult};
pub use planner::{GenerationReport, Planner};
