//! Dispatching rules and rule engine for task ordering.
//!
//! The planner offers tasks to a worker in a fixed total order: priority
//! rank first (urgent before low), then earliest due date. Each criterion
//! is a [`DispatchingRule`]; a [`RuleEngine`] chains them.
//!
//! # Usage
//!
//! ```
//! use u_workplan::dispatching::{RuleEngine, SelectionContext};
//! use u_workplan::dispatching::rules;
//!
//! let engine = RuleEngine::new()
//!     .with_rule(rules::PriorityRank)
//!     .with_tie_breaker(rules::EarliestDueDate);
//!
//! let context = SelectionContext::default();
//! assert!(engine.sort_indices(&[], &context).is_empty());
//! ```

mod context;
mod engine;
pub mod rules;

pub use context::SelectionContext;
pub use engine::RuleEngine;

use crate::models::Task;
use std::fmt::Debug;

/// Score returned by a dispatching rule.
///
/// Lower scores = offered first.
pub type RuleScore = f64;

/// A dispatching rule that evaluates task priority.
///
/// # Score Convention
/// **Lower score = higher priority.** Rules should return smaller values
/// for tasks that should be scheduled first.
pub trait DispatchingRule: Send + Sync + Debug {
    /// Rule name (e.g., "PRIORITY", "EDD").
    fn name(&self) -> &'static str;

    /// Evaluates the priority of a task.
    ///
    /// Returns a score where lower = higher priority.
    fn evaluate(&self, task: &Task, context: &SelectionContext) -> RuleScore;

    /// Rule description.
    fn description(&self) -> &'static str {
        self.name()
    }
}
