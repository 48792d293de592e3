//! Built-in dispatching rules.
//!
//! # Score Convention
//! All rules return lower scores for tasks that should be offered first.

use super::{DispatchingRule, RuleScore, SelectionContext};
use crate::models::Task;

/// Priority rank: urgent, high, medium, low, then anything unrecognized.
#[derive(Debug, Clone, Copy)]
pub struct PriorityRank;

impl DispatchingRule for PriorityRank {
    fn name(&self) -> &'static str {
        "PRIORITY"
    }

    fn evaluate(&self, task: &Task, _context: &SelectionContext) -> RuleScore {
        task.priority.rank() as f64
    }

    fn description(&self) -> &'static str {
        "Priority rank (urgent first)"
    }
}

/// Earliest Due Date.
///
/// Scores by days between the planning date and the due date, so overdue
/// tasks score negative. Tasks without a due date go last.
#[derive(Debug, Clone, Copy)]
pub struct EarliestDueDate;

impl DispatchingRule for EarliestDueDate {
    fn name(&self) -> &'static str {
        "EDD"
    }

    fn evaluate(&self, task: &Task, context: &SelectionContext) -> RuleScore {
        match task.due_date {
            Some(due) => (due - context.planning_date).num_days() as f64,
            None => f64::MAX,
        }
    }

    fn description(&self) -> &'static str {
        "Earliest Due Date"
    }
}
