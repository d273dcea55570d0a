//! Group outcome of a completed study.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{EvaluatorId, NodeId, ProjectId, SessionId, Timestamp};
use crate::domain::priority::PriorityResult;

use super::{AggregationStrategy, Synthesis};

/// Aggregated scope results plus the synthesized ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupOutcome {
    pub project_id: ProjectId,
    /// Hierarchy version every contributing session was frozen on.
    pub hierarchy_version: u64,
    pub strategy: AggregationStrategy,
    pub evaluators: Vec<EvaluatorId>,
    /// Completed sessions left out because they answered another hierarchy version.
    pub excluded_sessions: Vec<SessionId>,
    /// Group result per scope, breadth-first.
    pub scopes: Vec<PriorityResult>,
    pub synthesis: Synthesis,
    pub computed_at: Timestamp,
}

impl GroupOutcome {
    pub fn scope(&self, scope: NodeId) -> Option<&PriorityResult> {
        self.scopes.iter().find(|r| r.scope == scope)
    }

    /// Scopes whose group CR exceeds the threshold.
    pub fn inconsistent_scopes(&self) -> Vec<NodeId> {
        self.scopes
            .iter()
            .filter(|r| !r.consistent)
            .map(|r| r.scope)
            .collect()
    }

    pub fn top_alternative(&self) -> Option<NodeId> {
        self.synthesis.ranking.first().map(|r| r.alternative)
    }
}

/// Answer to a group results query.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum GroupResults {
    /// Some live sessions have not completed yet.
    Pending { completed: usize, total: usize },
    Available(Box<GroupOutcome>),
}

impl GroupResults {
    pub fn is_available(&self) -> bool {
        matches!(self, GroupResults::Available(_))
    }

    pub fn outcome(&self) -> Option<&GroupOutcome> {
        match self {
            GroupResults::Available(outcome) => Some(outcome),
            GroupResults::Pending { .. } => None,
        }
    }
}
