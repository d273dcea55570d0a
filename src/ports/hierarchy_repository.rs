//! Hierarchy repository port.
//!
//! Stores the flat snapshot form of a project's hierarchy. Concurrent admin
//! edits are not merged: the last save wins.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ProjectId};
use crate::domain::hierarchy::HierarchySnapshot;

#[async_trait]
pub trait HierarchyRepository: Send + Sync {
    /// Save (insert or replace) the snapshot of `snapshot.project_id`.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn save(&self, snapshot: &HierarchySnapshot) -> Result<(), DomainError>;

    /// Load the latest snapshot. Returns `None` for unknown projects.
    async fn load(&self, project_id: &ProjectId) -> Result<Option<HierarchySnapshot>, DomainError>;

    /// Check if a project has a stored hierarchy.
    async fn exists(&self, project_id: &ProjectId) -> Result<bool, DomainError>;
}
