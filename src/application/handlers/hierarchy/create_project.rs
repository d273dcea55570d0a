//! CreateProjectHandler - Command handler for starting a new study.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::stamped_envelope;
use crate::domain::comparison::generate_tasks;
use crate::domain::foundation::{CommandMetadata, ProjectId};
use crate::domain::hierarchy::{
    HierarchyChange, HierarchyChanged, HierarchyCommandError, HierarchyModel, HierarchySnapshot,
    HierarchyTemplate,
};
use crate::ports::{EventPublisher, HierarchyRepository};

/// Where the initial hierarchy comes from.
#[derive(Debug, Clone)]
pub enum ProjectBlueprint {
    /// A lone goal, to be built up node by node.
    Blank { goal_name: String },
    /// A template expanded into criteria and alternatives.
    Template(HierarchyTemplate),
}

/// Command to create a new project.
#[derive(Debug, Clone)]
pub struct CreateProjectCommand {
    pub blueprint: ProjectBlueprint,
}

/// Result of successful project creation.
#[derive(Debug, Clone)]
pub struct CreateProjectResult {
    pub project_id: ProjectId,
    pub snapshot: HierarchySnapshot,
    /// Comparisons each evaluator will face with the hierarchy as created.
    pub task_count: usize,
}

/// Handler for creating projects.
pub struct CreateProjectHandler {
    hierarchies: Arc<dyn HierarchyRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl CreateProjectHandler {
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
        cmd: CreateProjectCommand,
        metadata: CommandMetadata,
    ) -> Result<CreateProjectResult, HierarchyCommandError> {
        // 1. Build the hierarchy
        let hierarchy = match &cmd.blueprint {
            ProjectBlueprint::Blank { goal_name } => HierarchyModel::new(goal_name)?,
            ProjectBlueprint::Template(template) => template.expand()?,
        };

        // 2. Persist the first snapshot
        let project_id = ProjectId::new();
        let snapshot = HierarchySnapshot::capture(project_id, &hierarchy);
        self.hierarchies.save(&snapshot).await?;

        // 3. Publish
        let event = HierarchyChanged::new(
            project_id,
            hierarchy.version(),
            HierarchyChange::Created,
            hierarchy.nodes().map(|n| n.id()).collect(),
        );
        self.event_publisher
            .publish(stamped_envelope(&event, &metadata)?)
            .await?;

        let task_count = generate_tasks(&hierarchy).len();
        info!(
            project_id = %project_id,
            nodes = hierarchy.len(),
            tasks = task_count,
            actor = %metadata.actor,
            "Project created"
        );

        Ok(CreateProjectResult {
            project_id,
            snapshot,
            task_count,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::{InMemoryEventBus, InMemoryHierarchyStore};
    use crate::domain::foundation::{DomainError, EventEnvelope};
    use crate::domain::hierarchy::HierarchyError;
    use async_trait::async_trait;

    struct FailingPublisher;

    #[async_trait]
    impl EventPublisher for FailingPublisher {
        async fn publish(&self, _event: EventEnvelope) -> Result<(), DomainError> {
            Err(DomainError::storage("bus down"))
        }

        async fn publish_all(&self, _events: Vec<EventEnvelope>) -> Result<(), DomainError> {
            Err(DomainError::storage("bus down"))
        }
    }

    fn setup() -> (
        CreateProjectHandler,
        Arc<InMemoryHierarchyStore>,
        Arc<InMemoryEventBus>,
    ) {
        let store = Arc::new(InMemoryHierarchyStore::new());
        let bus = Arc::new(InMemoryEventBus::new());
        let handler = CreateProjectHandler::new(store.clone(), bus.clone());
        (handler, store, bus)
    }

    fn metadata() -> CommandMetadata {
        CommandMetadata::new("admin").with_correlation_id("req-1")
    }

    #[tokio::test]
    async fn template_project_is_saved_with_task_count() {
        let (handler, store, _) = setup();
        let cmd = CreateProjectCommand {
            blueprint: ProjectBlueprint::Template(HierarchyTemplate::new(3, 3, 3)),
        };

        let result = handler.handle(cmd, metadata()).await.unwrap();

        assert_eq!(result.task_count, 39);
        let saved = store.load(&result.project_id).await.unwrap().unwrap();
        assert_eq!(saved, result.snapshot);
    }

    #[tokio::test]
    async fn blank_project_has_only_a_goal() {
        let (handler, _, _) = setup();
        let cmd = CreateProjectCommand {
            blueprint: ProjectBlueprint::Blank {
                goal_name: "Pick a supplier".to_string(),
            },
        };

        let result = handler.handle(cmd, metadata()).await.unwrap();

        assert_eq!(result.snapshot.nodes.len(), 1);
        assert_eq!(result.task_count, 0);
    }

    #[tokio::test]
    async fn publishes_created_event_with_context() {
        let (handler, _, bus) = setup();
        let cmd = CreateProjectCommand {
            blueprint: ProjectBlueprint::Template(HierarchyTemplate::new(2, 0, 2)),
        };

        let result = handler.handle(cmd, metadata()).await.unwrap();

        let events = bus.events_of_type("hierarchy.changed");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].aggregate_id, result.project_id.to_string());
        assert_eq!(events[0].metadata.correlation_id.as_deref(), Some("req-1"));
        assert_eq!(events[0].metadata.actor.as_deref(), Some("admin"));
        assert_eq!(events[0].payload["change"], "created");
    }

    #[tokio::test]
    async fn blank_goal_name_is_rejected() {
        let (handler, _, bus) = setup();
        let cmd = CreateProjectCommand {
            blueprint: ProjectBlueprint::Blank {
                goal_name: "   ".to_string(),
            },
        };

        let result = handler.handle(cmd, metadata()).await;

        assert!(matches!(
            result,
            Err(HierarchyCommandError::Structural(HierarchyError::InvalidName(_)))
        ));
        assert_eq!(bus.event_count(), 0);
    }

    #[tokio::test]
    async fn publisher_failure_surfaces_as_infrastructure() {
        let store = Arc::new(InMemoryHierarchyStore::new());
        let handler = CreateProjectHandler::new(store, Arc::new(FailingPublisher));
        let cmd = CreateProjectCommand {
            blueprint: ProjectBlueprint::Template(HierarchyTemplate::new(2, 0, 2)),
        };

        let result = handler.handle(cmd, metadata()).await;

        assert!(matches!(result, Err(HierarchyCommandError::Infrastructure(_))));
    }
}
