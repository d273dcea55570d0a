//! In-memory judgment repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::comparison::TaskId;
use crate::domain::evaluation::Judgment;
use crate::domain::foundation::{DomainError, EvaluatorId, ProjectId};
use crate::ports::JudgmentRepository;

type JudgmentKey = (ProjectId, TaskId, EvaluatorId);

#[derive(Debug, Clone, Default)]
pub struct InMemoryJudgmentRepository {
    judgments: Arc<RwLock<HashMap<JudgmentKey, Judgment>>>,
}

impl InMemoryJudgmentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn judgment_count(&self) -> usize {
        self.judgments.read().await.len()
    }
}

#[async_trait]
impl JudgmentRepository for InMemoryJudgmentRepository {
    async fn upsert(&self, project_id: &ProjectId, judgment: &Judgment) -> Result<(), DomainError> {
        let key = (*project_id, judgment.task_id.clone(), judgment.evaluator.clone());
        self.judgments.write().await.insert(key, judgment.clone());
        Ok(())
    }

    async fn find_by_evaluator(
        &self,
        project_id: &ProjectId,
        evaluator: &EvaluatorId,
    ) -> Result<Vec<Judgment>, DomainError> {
        let judgments = self.judgments.read().await;
        Ok(judgments
            .iter()
            .filter(|((p, _, e), _)| p == project_id && e == evaluator)
            .map(|(_, j)| j.clone())
            .collect())
    }
}
