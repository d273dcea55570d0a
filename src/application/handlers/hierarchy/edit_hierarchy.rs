//! EditHierarchyHandler - Command handler for administrator edits.
//!
//! Each edit loads the latest snapshot, applies one structural change and
//! saves the result under a bumped version. Sessions already registered
//! keep the task list they froze; only later registrations see the edit.

use std::sync::Arc;
use tracing::{debug, info};

use crate::application::handlers::stamped_envelope;
use crate::domain::foundation::{CommandMetadata, NodeId, ProjectId};
use crate::domain::hierarchy::{
    HierarchyChange, HierarchyChanged, HierarchyCommandError, HierarchySnapshot, NodeKind,
};
use crate::ports::{EventPublisher, HierarchyRepository};

/// One structural change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HierarchyEdit {
    AddNode {
        parent: NodeId,
        kind: NodeKind,
        name: String,
    },
    RenameNode {
        node: NodeId,
        name: String,
    },
    /// Removes the node and its whole subtree.
    DeleteNode {
        node: NodeId,
    },
}

/// Command to edit a project's hierarchy.
#[derive(Debug, Clone)]
pub struct EditHierarchyCommand {
    pub project_id: ProjectId,
    pub edit: HierarchyEdit,
}

/// Result of a successful edit.
#[derive(Debug, Clone)]
pub struct EditHierarchyResult {
    pub snapshot: HierarchySnapshot,
    /// Added, renamed, or removed (pre-order) node ids.
    pub affected: Vec<NodeId>,
}

/// Handler for hierarchy edits.
pub struct EditHierarchyHandler {
    hierarchies: Arc<dyn HierarchyRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl EditHierarchyHandler {
    pub fn new(
        hierarchies: Arc<dyn HierarchyRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            hierarchies,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: EditHierarchyCommand,
        metadata: CommandMetadata,
    ) -> Result<EditHierarchyResult, HierarchyCommandError> {
        // 1. Load current hierarchy
        let current = self
            .hierarchies
            .load(&cmd.project_id)
            .await?
            .ok_or(HierarchyCommandError::ProjectNotFound(cmd.project_id))?;
        let mut hierarchy = current.restore()?;

        // 2. Apply the edit; nothing is saved if it fails
        let (change, affected) = match &cmd.edit {
            HierarchyEdit::AddNode { parent, kind, name } => {
                let id = hierarchy.add_node(*parent, *kind, name)?;
                (HierarchyChange::NodeAdded, vec![id])
            }
            HierarchyEdit::RenameNode { node, name } => {
                let previous = hierarchy.rename_node(*node, name)?;
                debug!(node = %node, from = %previous, to = %name, "Node renamed");
                (HierarchyChange::NodeRenamed, vec![*node])
            }
            HierarchyEdit::DeleteNode { node } => {
                let removed = hierarchy.delete_node(*node)?;
                (HierarchyChange::NodesDeleted, removed)
            }
        };

        // 3. Persist
        let snapshot = HierarchySnapshot::capture(cmd.project_id, &hierarchy);
        self.hierarchies.save(&snapshot).await?;

        // 4. Publish
        let event = HierarchyChanged::new(
            cmd.project_id,
            snapshot.version,
            change,
            affected.clone(),
        );
        self.event_publisher
            .publish(stamped_envelope(&event, &metadata)?)
            .await?;

        info!(
            project_id = %cmd.project_id,
            version = snapshot.version,
            change = ?change,
            affected = affected.len(),
            "Hierarchy edited"
        );

        Ok(EditHierarchyResult { snapshot, affected })
    }
}
