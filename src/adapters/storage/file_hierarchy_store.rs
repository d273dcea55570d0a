//! File-based hierarchy store.
//!
//! Stores each project's hierarchy snapshot as YAML on disk:
//! `<base>/<project_id>/hierarchy.yaml`.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use tokio::fs;

use crate::domain::foundation::{DomainError, ErrorCode, ProjectId};
use crate::domain::hierarchy::HierarchySnapshot;
use crate::ports::HierarchyRepository;

const SNAPSHOT_FILE: &str = "hierarchy.yaml";

/// YAML snapshot store rooted at a data directory.
#[derive(Debug, Clone)]
pub struct FileHierarchyStore {
    base_path: PathBuf,
}

impl FileHierarchyStore {
    /// Create a new store with a base directory.
    ///
    /// # Example
    /// ```ignore
    /// let store = FileHierarchyStore::new("./data");
    /// ```
    pub fn new<P: AsRef<Path>>(base_path: P) -> Self {
        Self {
            base_path: base_path.as_ref().to_path_buf(),
        }
    }

    fn project_dir(&self, project_id: &ProjectId) -> PathBuf {
        self.base_path.join(project_id.to_string())
    }

    /// Path of a project's snapshot file.
    pub fn snapshot_path(&self, project_id: &ProjectId) -> PathBuf {
        self.project_dir(project_id).join(SNAPSHOT_FILE)
    }
}

fn io_error(e: std::io::Error) -> DomainError {
    DomainError::storage(e.to_string())
}

#[async_trait]
impl HierarchyRepository for FileHierarchyStore {
    async fn save(&self, snapshot: &HierarchySnapshot) -> Result<(), DomainError> {
        let dir = self.project_dir(&snapshot.project_id);
        fs::create_dir_all(&dir).await.map_err(io_error)?;

        let yaml = serde_yaml::to_string(snapshot)
            .map_err(|e| DomainError::storage(format!("cannot serialize snapshot: {}", e)))?;

        // Readers never see a half-written file.
        let path = self.snapshot_path(&snapshot.project_id);
        let tmp = path.with_extension("yaml.tmp");
        fs::write(&tmp, yaml).await.map_err(io_error)?;
        fs::rename(&tmp, &path).await.map_err(io_error)?;
        Ok(())
    }

    async fn load(&self, project_id: &ProjectId) -> Result<Option<HierarchySnapshot>, DomainError> {
        let path = self.snapshot_path(project_id);
        if !path.exists() {
            return Ok(None);
        }

        let yaml = fs::read_to_string(&path).await.map_err(io_error)?;
        let snapshot = serde_yaml::from_str(&yaml).map_err(|e| {
            DomainError::new(ErrorCode::CorruptSnapshot, e.to_string())
                .with_detail("path", path.display().to_string())
        })?;
        Ok(Some(snapshot))
    }

    async fn exists(&self, project_id: &ProjectId) -> Result<bool, DomainError> {
        Ok(self.snapshot_path(project_id).exists())
    }
}
