//! Rule engine for multi-criteria task ordering.
//!
//! Rules are applied in sequence; a later rule is consulted only when
//! every earlier rule ties.

use std::cmp::Ordering;
use std::sync::Arc;

use super::{rules, DispatchingRule, SelectionContext};
use crate::models::Task;

/// A composable rule engine for task ordering.
///
/// Full ties keep input order (the sort is stable).
///
/// # Example
/// ```
/// use u_workplan::dispatching::{rules, RuleEngine, SelectionContext};
/// use u_workplan::models::Task;
///
/// let tasks = vec![
///     Task::new("low").with_priority("Low"),
///     Task::new("urgent").with_priority("Urgent"),
/// ];
/// let engine = RuleEngine::task_order();
/// let order = engine.sort_indices(&tasks, &SelectionContext::default());
/// assert_eq!(tasks[order[0]].id, "urgent");
/// ```
#[derive(Clone)]
pub struct RuleEngine {
    rules: Vec<Arc<dyn DispatchingRule>>,
    epsilon: f64,
}

impl RuleEngine {
    /// Creates an empty rule engine.
    pub fn new() -> Self {
        Self {
            rules: Vec::new(),
            epsilon: 1e-9,
        }
    }

    /// The shop's task order: priority rank, then earliest due date.
    pub fn task_order() -> Self {
        Self::new()
            .with_rule(rules::PriorityRank)
            .with_tie_breaker(rules::EarliestDueDate)
    }

    /// Adds a rule.
    pub fn with_rule<R: DispatchingRule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Arc::new(rule));
        self
    }

    /// Adds a rule consulted only on ties of the earlier rules.
    ///
    /// Same as [`with_rule`](Self::with_rule).
    pub fn with_tie_breaker<R: DispatchingRule + 'static>(self, rule: R) -> Self {
        self.with_rule(rule)
    }

    /// Sorts tasks by priority (highest priority first).
    ///
    /// Returns indices into the original task slice. The sort is stable.
    pub fn sort_indices(&self, tasks: &[Task], context: &SelectionContext) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..tasks.len()).collect();
        indices.sort_by(|&a, &b| self.compare(&tasks[a], &tasks[b], context));
        indices
    }

    /// Sorts tasks in place.
    pub fn sort(&self, tasks: &mut [Task], context: &SelectionContext) {
        tasks.sort_by(|a, b| self.compare(a, b, context));
    }

    fn compare(&self, a: &Task, b: &Task, context: &SelectionContext) -> Ordering {
        for rule in &self.rules {
            let score_a = rule.evaluate(a, context);
            let score_b = rule.evaluate(b, context);

            if (score_a - score_b).abs() > self.epsilon {
                return score_a.partial_cmp(&score_b).unwrap_or(Ordering::Equal);
            }
        }
        Ordering::Equal
    }
}

impl Default for RuleEngine {
    fn default() -> Self {
        Self::task_order()
    }
}

impl std::fmt::Debug for RuleEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RuleEngine")
            .field(
                "rules",
                &self.rules.iter().map(|r| r.name()).collect::<Vec<_>>(),
            )
            .field("epsilon", &self.epsilon)
            .finish()
    }
}
