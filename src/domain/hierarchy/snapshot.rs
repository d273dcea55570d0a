//! Storage form of a hierarchy.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{NodeId, ProjectId};

use super::{HierarchyError, HierarchyModel, NodeRecord};

/// Versioned, flat snapshot of one project's hierarchy.
///
/// Sessions freeze their task list against `version`; `next_node_id` keeps
/// ids of deleted nodes from being handed out again after a reload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchySnapshot {
    pub project_id: ProjectId,
    pub version: u64,
    pub next_node_id: NodeId,
    pub nodes: Vec<NodeRecord>,
}

impl HierarchySnapshot {
    pub fn capture(project_id: ProjectId, hierarchy: &HierarchyModel) -> Self {
        Self {
            project_id,
            version: hierarchy.version(),
            next_node_id: hierarchy.next_node_id(),
            nodes: hierarchy.flatten(),
        }
    }

    pub fn restore(&self) -> Result<HierarchyModel, HierarchyError> {
        let mut hierarchy = HierarchyModel::rebuild(&self.nodes)?;
        hierarchy.restore_counters(self.next_node_id.value(), self.version);
        Ok(hierarchy)
    }
}
