//! In-memory priority result repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::aggregation::GroupOutcome;
use crate::domain::foundation::{DomainError, NodeId, ProjectId};
use crate::domain::priority::PriorityResult;
use crate::ports::{PriorityResultRepository, ResultOwner};

type ResultKey = (ProjectId, NodeId, ResultOwner);

#[derive(Debug, Clone, Default)]
pub struct InMemoryPriorityResultRepository {
    results: Arc<RwLock<HashMap<ResultKey, PriorityResult>>>,
    outcomes: Arc<RwLock<HashMap<ProjectId, GroupOutcome>>>,
}

impl InMemoryPriorityResultRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl PriorityResultRepository for InMemoryPriorityResultRepository {
    async fn save(
        &self,
        project_id: &ProjectId,
        owner: &ResultOwner,
        result: &PriorityResult,
    ) -> Result<(), DomainError> {
        let key = (*project_id, result.scope, owner.clone());
        self.results.write().await.insert(key, result.clone());
        Ok(())
    }

    async fn find(
        &self,
        project_id: &ProjectId,
        scope: NodeId,
        owner: &ResultOwner,
    ) -> Result<Option<PriorityResult>, DomainError> {
        let key = (*project_id, scope, owner.clone());
        Ok(self.results.read().await.get(&key).cloned())
    }

    async fn find_by_owner(
        &self,
        project_id: &ProjectId,
        owner: &ResultOwner,
    ) -> Result<Vec<PriorityResult>, DomainError> {
        let results = self.results.read().await;
        let mut found: Vec<PriorityResult> = results
            .iter()
            .filter(|((p, _, o), _)| p == project_id && o == owner)
            .map(|(_, r)| r.clone())
            .collect();
        found.sort_by_key(|r| r.scope);
        Ok(found)
    }

    async fn save_outcome(&self, outcome: &GroupOutcome) -> Result<(), DomainError> {
        self.outcomes
            .write()
            .await
            .insert(outcome.project_id, outcome.clone());
        Ok(())
    }

    async fn find_outcome(&self, project_id: &ProjectId) -> Result<Option<GroupOutcome>, DomainError> {
        Ok(self.outcomes.read().await.get(project_id).cloned())
    }
}
