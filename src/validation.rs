//! Input validation for planning problems.
//!
//! Checks structural integrity of the configuration and of the workers
//! and tasks loaded from the store. Detects:
//! - Duplicate IDs
//! - Tasks assigned to unknown workers
//! - Tasks linked only to workstations no worker staffs
//! - Empty, inverted, unordered or overlapping working-hours windows
//! - Non-positive duration settings
//!
//! All problems are collected; validation never stops at the first one.

use crate::config::PlannerConfig;
use crate::models::{Task, Worker};
use std::collections::HashSet;

/// Validation result.
pub type ValidationResult = Result<(), Vec<ValidationError>>;

/// A validation error.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidationError {
    /// Error category.
    pub kind: ValidationErrorKind,
    /// Human-readable description.
    pub message: String,
}

/// Categories of validation errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationErrorKind {
    /// Two entities share the same ID.
    DuplicateId,
    /// A task's assignee is not a known worker.
    UnknownAssignee,
    /// A task is linked only to workstations nobody works at.
    UnstaffedWorkstation,
    /// The working day has no windows.
    EmptyWorkingDay,
    /// A window ends at or before its start.
    InvertedWindow,
    /// A window starts before the previous one ends.
    OverlappingWindows,
    /// A minute setting is zero or negative.
    InvalidSetting,
}

impl ValidationError {
    fn new(kind: ValidationErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

/// Validates the planner configuration.
///
/// Checks:
/// 1. At least one working-hours window
/// 2. Every window has a positive length
/// 3. Windows are in chronological order and do not overlap
/// 4. Default duration, snap and minimum entry length are positive
pub fn validate_config(config: &PlannerConfig) -> ValidationResult {
    let mut errors = Vec::new();

    if config.working_hours.is_empty() {
        errors.push(ValidationError::new(
            ValidationErrorKind::EmptyWorkingDay,
            "Working day has no windows",
        ));
    }

    for w in &config.working_hours {
        if w.end <= w.start {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvertedWindow,
                format!("Window '{}' ends at or before its start", w.name),
            ));
        }
    }

    for pair in config.working_hours.windows(2) {
        if pair[1].start < pair[0].end {
            errors.push(ValidationError::new(
                ValidationErrorKind::OverlappingWindows,
                format!("Window '{}' overlaps window '{}'", pair[1].name, pair[0].name),
            ));
        }
    }

    for (name, value) in [
        ("default_task_minutes", config.default_task_minutes),
        ("snap_minutes", config.snap_minutes),
        ("min_entry_minutes", config.min_entry_minutes),
    ] {
        if value <= 0 {
            errors.push(ValidationError::new(
                ValidationErrorKind::InvalidSetting,
                format!("{name} must be positive, got {value}"),
            ));
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

/// Validates workers and tasks loaded from the store.
///
/// Checks:
/// 1. No duplicate worker IDs
/// 2. No duplicate task IDs
/// 3. Every task assignee is a known worker
/// 4. Every workstation-linked task without an assignee has at least one
///    linked workstation that some worker staffs
///
/// # Returns
/// `Ok(())` if all checks pass, `Err(errors)` with all detected issues.
pub fn validate_input(workers: &[Worker], tasks: &[Task]) -> ValidationResult {
    let mut errors = Vec::new();

    let mut worker_ids = HashSet::new();
    let mut staffed: HashSet<&str> = HashSet::new();
    for w in workers {
        if !worker_ids.insert(w.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate worker ID: {}", w.id),
            ));
        }
        staffed.extend(w.assigned_workstations());
    }

    let mut task_ids = HashSet::new();
    for task in tasks {
        if !task_ids.insert(task.id.as_str()) {
            errors.push(ValidationError::new(
                ValidationErrorKind::DuplicateId,
                format!("Duplicate task ID: {}", task.id),
            ));
        }

        match &task.assignee {
            Some(assignee) if !worker_ids.contains(assignee.as_str()) => {
                errors.push(ValidationError::new(
                    ValidationErrorKind::UnknownAssignee,
                    format!("Task '{}' is assigned to unknown worker '{}'", task.id, assignee),
                ));
            }
            Some(_) => {}
            None => {
                if task.has_workstations()
                    && !task.workstations.iter().any(|ws| staffed.contains(ws.as_str()))
                {
                    errors.push(ValidationError::new(
                        ValidationErrorKind::UnstaffedWorkstation,
                        format!(
                            "Task '{}' is linked only to unstaffed workstations: {}",
                            task.id,
                            task.workstations.join(", ")
                        ),
                    ));
                }
            }
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
