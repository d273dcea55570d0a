//! Priority result repository port.
//!
//! Results are derived data: they are overwritten whenever their backing
//! matrix changes and never edited otherwise.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::aggregation::GroupOutcome;
use crate::domain::foundation::{DomainError, EvaluatorId, NodeId, ProjectId};
use crate::domain::priority::PriorityResult;

/// Whose judgments a result was derived from.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResultOwner {
    Evaluator(EvaluatorId),
    Group,
}

impl fmt::Display for ResultOwner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResultOwner::Evaluator(id) => write!(f, "evaluator:{}", id),
            ResultOwner::Group => write!(f, "group"),
        }
    }
}

#[async_trait]
pub trait PriorityResultRepository: Send + Sync {
    /// Save a result keyed by (project, scope, owner), replacing any previous one.
    async fn save(
        &self,
        project_id: &ProjectId,
        owner: &ResultOwner,
        result: &PriorityResult,
    ) -> Result<(), DomainError>;

    async fn find(
        &self,
        project_id: &ProjectId,
        scope: NodeId,
        owner: &ResultOwner,
    ) -> Result<Option<PriorityResult>, DomainError>;

    /// All results of one owner, ordered by scope id.
    async fn find_by_owner(
        &self,
        project_id: &ProjectId,
        owner: &ResultOwner,
    ) -> Result<Vec<PriorityResult>, DomainError>;

    /// Save the full group outcome, replacing any previous one.
    async fn save_outcome(&self, outcome: &GroupOutcome) -> Result<(), DomainError>;

    async fn find_outcome(&self, project_id: &ProjectId) -> Result<Option<GroupOutcome>, DomainError>;
}
