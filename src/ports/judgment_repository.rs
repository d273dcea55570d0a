//! Judgment repository port.
//!
//! One judgment per (task, evaluator) within a project; writes overwrite.

use async_trait::async_trait;

use crate::domain::evaluation::Judgment;
use crate::domain::foundation::{DomainError, EvaluatorId, ProjectId};

#[async_trait]
pub trait JudgmentRepository: Send + Sync {
    /// Insert or overwrite the judgment keyed by (task, evaluator).
    async fn upsert(&self, project_id: &ProjectId, judgment: &Judgment) -> Result<(), DomainError>;

    /// Every judgment an evaluator made in a project, in no particular order.
    async fn find_by_evaluator(
        &self,
        project_id: &ProjectId,
        evaluator: &EvaluatorId,
    ) -> Result<Vec<Judgment>, DomainError>;
}
