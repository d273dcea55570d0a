//! In-memory hierarchy store for tests and single-process runs.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::hierarchy::HierarchySnapshot;
use crate::ports::HierarchyRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryHierarchyStore {
    snapshots: Arc<RwLock<HashMap<ProjectId, HierarchySnapshot>>>,
}

impl InMemoryHierarchyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn project_count(&self) -> usize {
        self.snapshots.read().await.len()
    }
}

#[async_trait]
impl HierarchyRepository for InMemoryHierarchyStore {
    async fn save(&self, snapshot: &HierarchySnapshot) -> Result<(), DomainError> {
        let mut snapshots = self.snapshots.write().await;
        snapshots.insert(snapshot.project_id, snapshot.clone());
        Ok(())
    }

    async fn load(&self, project_id: &ProjectId) -> Result<Option<HierarchySnapshot>, DomainError> {
        let snapshots = self.snapshots.read().await;
        Ok(snapshots.get(project_id).cloned())
    }

    async fn exists(&self, project_id: &ProjectId) -> Result<bool, DomainError> {
        Ok(self.snapshots.read().await.contains_key(project_id))
    }
}
