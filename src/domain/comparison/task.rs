//! Comparison tasks and the scopes they belong to.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::NodeId;

/// What is being compared within a scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ComparisonKind {
    /// Sibling criteria under one parent.
    CriteriaComparison,
    /// The global alternatives under one leaf criterion.
    AlternativeComparison,
}

/// Stable task identifier derived from scope and pair.
///
/// Regenerating tasks for an unchanged scope yields the same ids.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(String);

impl TaskId {
    pub fn for_pair(scope: NodeId, left: NodeId, right: NodeId) -> Self {
        Self(format!("{}:{}-{}", scope, left, right))
    }

    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// One pairwise comparison an evaluator must answer.
///
/// `left` precedes `right` in sibling order; a judgment above 1 favours `left`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonTask {
    pub id: TaskId,
    pub kind: ComparisonKind,
    pub scope: NodeId,
    pub left: NodeId,
    pub right: NodeId,
}

impl ComparisonTask {
    pub fn new(kind: ComparisonKind, scope: NodeId, left: NodeId, right: NodeId) -> Self {
        Self {
            id: TaskId::for_pair(scope, left, right),
            kind,
            scope,
            left,
            right,
        }
    }
}

/// A sibling group over which one matrix is defined.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComparisonScope {
    pub kind: ComparisonKind,
    /// Parent node for criteria scopes, leaf criterion for alternative scopes.
    pub node: NodeId,
    /// Items in sibling order; this order indexes the matrix.
    pub items: Vec<NodeId>,
}

impl ComparisonScope {
    /// Number of pairwise tasks the scope needs: C(n, 2).
    pub fn pair_count(&self) -> usize {
        pair_count(self.items.len())
    }
}

/// C(n, 2).
pub fn pair_count(n: usize) -> usize {
    n * n.saturating_sub(1) / 2
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_id_is_derived_from_scope_and_pair() {
        let task = ComparisonTask::new(
            ComparisonKind::CriteriaComparison,
            NodeId::new(0),
            NodeId::new(1),
            NodeId::new(2),
        );
        assert_eq!(task.id.as_str(), "n0:n1-n2");
    }

    #[test]
    fn pair_count_is_n_choose_two() {
        assert_eq!(pair_count(0), 0);
        assert_eq!(pair_count(1), 0);
        assert_eq!(pair_count(2), 1);
        assert_eq!(pair_count(3), 3);
        assert_eq!(pair_count(9), 36);
    }
}
