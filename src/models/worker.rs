//! Worker model.
//!
//! Workers are the people whose day gets packed with tasks. A worker is
//! linked to one or more workstations; tasks linked to any of those
//! workstations are eligible for the worker.
//!
//! # Workstation links
//! Newer records carry explicit worker↔workstation links. Older records
//! only have a single legacy workstation field, which is used as a
//! fallback when no explicit link exists.

use serde::{Deserialize, Serialize};

/// A shop-floor worker.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Worker {
    /// Unique worker identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Role name (e.g., "worker", "teamleader", "admin").
    ///
    /// Only roles listed in the planner configuration are scheduled.
    pub role: String,
    /// Workstation names from explicit links.
    #[serde(default)]
    pub workstations: Vec<String>,
    /// Legacy single-workstation field.
    #[serde(default)]
    pub legacy_workstation: Option<String>,
}

impl Worker {
    /// Creates a worker with the default "worker" role.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: String::new(),
            role: "worker".into(),
            workstations: Vec::new(),
            legacy_workstation: None,
        }
    }

    /// Sets the display name.
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    /// Sets the role.
    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = role.into();
        self
    }

    /// Adds an explicit workstation link.
    pub fn with_workstation(mut self, workstation: impl Into<String>) -> Self {
        self.workstations.push(workstation.into());
        self
    }

    /// Sets the legacy workstation field.
    pub fn with_legacy_workstation(mut self, workstation: impl Into<String>) -> Self {
        self.legacy_workstation = Some(workstation.into());
        self
    }

    /// Workstations this worker may be scheduled on.
    ///
    /// Explicit links win; the legacy field is used only when there are none.
    pub fn assigned_workstations(&self) -> Vec<&str> {
        if !self.workstations.is_empty() {
            return self.workstations.iter().map(|w| w.as_str()).collect();
        }
        self.legacy_workstation
            .iter()
            .map(|w| w.as_str())
            .filter(|w| !w.is_empty())
            .collect()
    }

    /// Whether the worker is linked to the given workstation.
    pub fn works_at(&self, workstation: &str) -> bool {
        self.assigned_workstations().contains(&workstation)
    }

    /// Name for display, falling back to the ID.
    pub fn display_name(&self) -> &str {
        if self.name.is_empty() {
            &self.id
        } else {
            &self.name
        }
    }
}
