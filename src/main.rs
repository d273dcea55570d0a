use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt};

use ahp_study::adapters::{FileHierarchyStore, InMemoryEventBus};
use ahp_study::application::{CreateProjectCommand, CreateProjectHandler, ProjectBlueprint};
use ahp_study::config::AppConfig;
use ahp_study::domain::comparison::{generate_tasks, ComparisonKind};
use ahp_study::domain::foundation::CommandMetadata;
use ahp_study::domain::hierarchy::HierarchyTemplate;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    let json = config.logging.json;
    tracing_subscriber::registry()
        .with(config.logging.env_filter())
        .with(json.then(|| fmt::layer().json()))
        .with((!json).then(fmt::layer))
        .init();

    let template = match std::env::args().nth(1) {
        Some(path) => {
            let yaml = tokio::fs::read_to_string(&path).await?;
            serde_yaml::from_str::<HierarchyTemplate>(&yaml)?
        }
        None => HierarchyTemplate::new(3, 3, 3),
    };

    let store = Arc::new(FileHierarchyStore::new(&config.storage.data_dir));
    let handler = CreateProjectHandler::new(store.clone(), Arc::new(InMemoryEventBus::new()));
    let created = handler
        .handle(
            CreateProjectCommand {
                blueprint: ProjectBlueprint::Template(template),
            },
            CommandMetadata::new("cli"),
        )
        .await?;

    let hierarchy = created.snapshot.restore()?;
    let mut per_kind: BTreeMap<&str, usize> = BTreeMap::new();
    for task in generate_tasks(&hierarchy) {
        let kind = match task.kind {
            ComparisonKind::CriteriaComparison => "criteria",
            ComparisonKind::AlternativeComparison => "alternatives",
        };
        *per_kind.entry(kind).or_default() += 1;
    }

    info!(
        project_id = %created.project_id,
        path = %store.snapshot_path(&created.project_id).display(),
        aggregation = %config.engine.aggregation,
        "Hierarchy stored"
    );
    for (kind, count) in per_kind {
        info!(kind, count, "Comparison tasks");
    }
    info!(total = created.task_count, "Tasks per evaluator");

    Ok(())
}
