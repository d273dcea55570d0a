//! Hierarchy domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, NodeId, ProjectId, Timestamp};

/// What an administrator did to the hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HierarchyChange {
    Created,
    NodeAdded,
    NodeRenamed,
    NodesDeleted,
}

/// Published after every successful hierarchy edit.
///
/// Sessions registered on an older `version` keep their frozen task lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HierarchyChanged {
    pub event_id: EventId,
    pub project_id: ProjectId,
    pub version: u64,
    pub change: HierarchyChange,
    pub affected: Vec<NodeId>,
    pub changed_at: Timestamp,
}

impl HierarchyChanged {
    pub fn new(project_id: ProjectId, version: u64, change: HierarchyChange, affected: Vec<NodeId>) -> Self {
        Self {
            event_id: EventId::new(),
            project_id,
            version,
            change,
            affected,
            changed_at: Timestamp::now(),
        }
    }
}

domain_event!(
    HierarchyChanged,
    event_type = "hierarchy.changed",
    aggregate_id = project_id,
    aggregate_type = "Hierarchy",
    occurred_at = changed_at,
    event_id = event_id
);
