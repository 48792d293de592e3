//! Planner configuration.
//!
//! Load the shop's working-day layout and planning knobs from TOML.
//! Every key is optional; missing keys fall back to the standard
//! three-window day (07:00-10:00, 10:15-12:30, 13:00-16:00).
//!
//! # Examples
//!
//! ```
//! use u_workplan::config::PlannerConfig;
//!
//! let config = PlannerConfig::from_toml_str(r#"
//!     default_task_minutes = 45
//!
//!     [[working_hours]]
//!     name = "Early"
//!     start = "06:00:00"
//!     end = "11:00:00"
//! "#).unwrap();
//!
//! assert_eq!(config.default_task_minutes, 45);
//! assert_eq!(config.working_day().capacity_minutes(), 300);
//! assert_eq!(config.snap_minutes, 5);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::{WorkingDay, WorkingHoursWindow};
use crate::validation;

/// Configuration error.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Planner configuration.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, rename_all = "snake_case")]
pub struct PlannerConfig {
    /// Productive windows in chronological order.
    pub working_hours: Vec<WorkingHoursWindow>,

    /// Duration used for tasks without a positive planned duration.
    pub default_task_minutes: i64,

    /// Granularity of manual drag/resize deltas.
    pub snap_minutes: i64,

    /// Shortest entry a resize may produce.
    pub min_entry_minutes: i64,

    /// Worker roles that take part in planning.
    pub schedulable_roles: Vec<String>,

    /// Team whose production holidays block planning.
    pub production_team: String,

    /// Skip Saturdays and Sundays when looking for the next planning day.
    pub skip_weekends: bool,
}

impl Default for PlannerConfig {
    fn default() -> Self {
        Self {
            working_hours: default_working_hours(),
            default_task_minutes: 60,
            snap_minutes: 5,
            min_entry_minutes: 5,
            schedulable_roles: vec!["worker".into(), "teamleader".into()],
            production_team: "production".into(),
            skip_weekends: false,
        }
    }
}

fn default_working_hours() -> Vec<WorkingHoursWindow> {
    [
        ("Morning", (7, 0), (10, 0)),
        ("Mid-day", (10, 15), (12, 30)),
        ("Afternoon", (13, 0), (16, 0)),
    ]
    .into_iter()
    .filter_map(|(name, start, end)| WorkingHoursWindow::from_hm(name, start, end))
    .collect()
}

impl PlannerConfig {
    /// Creates the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads and validates configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, is not valid TOML, or
    /// describes an unusable working day.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let config = Self::from_toml_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a TOML file without validating it.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Parses configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(s)?)
    }

    /// Replaces the working-hours windows.
    pub fn with_working_hours(mut self, windows: Vec<WorkingHoursWindow>) -> Self {
        self.working_hours = windows;
        self
    }

    /// Sets the fallback task duration.
    pub fn with_default_task_minutes(mut self, minutes: i64) -> Self {
        self.default_task_minutes = minutes;
        self
    }

    /// Enables or disables weekend skipping.
    pub fn with_skip_weekends(mut self, skip: bool) -> Self {
        self.skip_weekends = skip;
        self
    }

    /// The working day described by `working_hours`.
    pub fn working_day(&self) -> WorkingDay {
        WorkingDay::new(self.working_hours.clone())
    }

    /// Whether workers with `role` take part in planning.
    pub fn is_schedulable_role(&self, role: &str) -> bool {
        self.schedulable_roles
            .iter()
            .any(|r| r.eq_ignore_ascii_case(role))
    }

    /// Checks the working day and numeric settings.
    pub fn validate(&self) -> Result<(), ConfigError> {
        validation::validate_config(self).map_err(|errors| {
            let messages: Vec<String> = errors.into_iter().map(|e| e.message).collect();
            ConfigError::Invalid(messages.join("; "))
        })
    }
}
