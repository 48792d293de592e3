//! Schedule construction.
//!
//! - [`SlotPacker`]: fills a worker's working day with ordered tasks,
//!   splitting tasks across breaks.
//! - [`project_workstations`]: derives the workstation view from worker
//!   entries.

mod packer;
mod workstation;

pub use packer::{DeferredTask, PackResult, SlotPacker};
pub use workstation::project_workstations;
