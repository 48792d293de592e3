//! Planning domain models.
//!
//! Plain data types for the shop-floor planning problem and its solutions.
//! All types are serde-serializable so callers can persist them in
//! whatever store they use.
//!
//! # Domain Mappings
//!
//! | u-workplan | Shop floor | Storage row |
//! |------------|------------|-------------|
//! | Worker | Employee | employee + workstation links |
//! | Task | Production step | task + workstation links |
//! | WorkingDay | Shift layout | static configuration |
//! | ScheduleEntry | Calendar block | schedule |
//! | WorkstationScheduleEntry | Machine booking | workstation schedule |

mod calendar;
mod conflict;
mod schedule;
mod task;
mod worker;

pub use calendar::{
    BreakGap, HolidayRequest, HolidayStatus, ProductionHoliday, WorkingDay, WorkingHoursWindow,
};
pub use conflict::{ConflictClaim, TaskConflict};
pub use schedule::{DaySchedule, ScheduleEntry, WorkstationScheduleEntry};
pub use task::{Priority, Task, TaskStatus};
pub use worker::Worker;
