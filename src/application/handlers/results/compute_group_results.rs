//! ComputeGroupResultsHandler - Aggregates every evaluator into one ranking.
//!
//! Runs only once all live sessions of the project are Completed. Each
//! scope is aggregated on its own from the evaluators' stored judgments,
//! then the group results are composed into global weights.

use futures::future::join_all;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::handlers::stamped_envelope;
use crate::domain::aggregation::{
    synthesize, AggregationEngine, EvaluatorInput, EvaluatorWeights, GroupOutcome, GroupResults,
    GroupResultsComputed, ResultsError,
};
use crate::domain::comparison::{comparison_scopes, scope_tasks, PairwiseMatrix, TaskId};
use crate::domain::evaluation::{EvaluationSession, EvaluationStatus};
use crate::domain::foundation::{CommandMetadata, EvaluatorId, ProjectId, Timestamp};
use crate::ports::{
    EvaluationSessionRepository, EventPublisher, HierarchyRepository, JudgmentRepository,
    PriorityResultRepository, ResultOwner,
};

/// Command to compute group results for a project.
#[derive(Debug, Clone)]
pub struct ComputeGroupResultsCommand {
    pub project_id: ProjectId,
    pub weights: EvaluatorWeights,
}

impl ComputeGroupResultsCommand {
    /// Every evaluator counts the same.
    pub fn equal_weights(project_id: ProjectId) -> Self {
        Self {
            project_id,
            weights: EvaluatorWeights::equal(),
        }
    }
}

/// Handler for group aggregation.
pub struct ComputeGroupResultsHandler {
    hierarchies: Arc<dyn HierarchyRepository>,
    sessions: Arc<dyn EvaluationSessionRepository>,
    judgments: Arc<dyn JudgmentRepository>,
    results: Arc<dyn PriorityResultRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    engine: AggregationEngine,
}

impl ComputeGroupResultsHandler {
    pub fn new(
        hierarchies: Arc<dyn HierarchyRepository>,
        sessions: Arc<dyn EvaluationSessionRepository>,
        judgments: Arc<dyn JudgmentRepository>,
        results: Arc<dyn PriorityResultRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        engine: AggregationEngine,
    ) -> Self {
        Self {
            hierarchies,
            sessions,
            judgments,
            results,
            event_publisher,
            engine,
        }
    }

    pub async fn handle(
        &self,
        cmd: ComputeGroupResultsCommand,
        metadata: CommandMetadata,
    ) -> Result<GroupResults, ResultsError> {
        let project_id = cmd.project_id;

        // 1. Load the hierarchy results are composed over
        let snapshot = self
            .hierarchies
            .load(&project_id)
            .await?
            .ok_or(ResultsError::ProjectNotFound(project_id))?;
        let hierarchy = snapshot.restore()?;

        // 2. Wait for every live session
        let live: Vec<EvaluationSession> = self
            .sessions
            .find_by_project(&project_id)
            .await?
            .into_iter()
            .filter(|s| s.status().is_live())
            .collect();
        if live.is_empty() {
            return Err(ResultsError::NotAvailable(project_id));
        }
        let completed = live
            .iter()
            .filter(|s| s.status() == EvaluationStatus::Completed)
            .count();
        if completed < live.len() {
            debug!(project_id = %project_id, completed, total = live.len(), "Group results pending");
            return Ok(GroupResults::Pending {
                completed,
                total: live.len(),
            });
        }

        // 3. Only sessions frozen on the current version are comparable
        let (current, stale): (Vec<EvaluationSession>, Vec<EvaluationSession>) = live
            .into_iter()
            .partition(|s| s.hierarchy_version() == Some(hierarchy.version()));
        for session in &stale {
            warn!(
                session_id = %session.id(),
                session_version = ?session.hierarchy_version(),
                current_version = hierarchy.version(),
                "Session excluded from aggregation, hierarchy changed after registration"
            );
        }
        let mut evaluators: Vec<EvaluatorId> =
            current.iter().filter_map(|s| s.evaluator().cloned()).collect();
        evaluators.sort();
        evaluators.dedup();
        if evaluators.is_empty() {
            return Err(ResultsError::NotAvailable(project_id));
        }

        // 4. Fan in every evaluator's judgments
        let loaded = join_all(
            evaluators
                .iter()
                .map(|e| self.judgments.find_by_evaluator(&project_id, e)),
        )
        .await;
        let mut answers: Vec<HashMap<TaskId, f64>> = Vec::with_capacity(evaluators.len());
        for judgments in loaded {
            answers.push(
                judgments?
                    .into_iter()
                    .map(|j| (j.task_id, j.value.value()))
                    .collect(),
            );
        }

        // 5. Aggregate each scope
        let mut scopes = Vec::new();
        let mut by_scope = HashMap::new();
        for scope in comparison_scopes(&hierarchy) {
            if scope.items.len() < 2 {
                continue;
            }
            let tasks = scope_tasks(&scope);
            let mut inputs = Vec::with_capacity(evaluators.len());
            for (evaluator, answered) in evaluators.iter().zip(&answers) {
                let matrix = PairwiseMatrix::for_scope(
                    &scope,
                    tasks
                        .iter()
                        .filter_map(|t| answered.get(&t.id).map(|v| (t.left, t.right, *v))),
                )?;
                let result = self.engine.priority().compute(scope.node, &matrix)?;
                inputs.push(EvaluatorInput {
                    evaluator: evaluator.clone(),
                    matrix,
                    result,
                });
            }

            let group = self.engine.aggregate(scope.node, &inputs, &cmd.weights)?;
            if !group.consistent {
                warn!(
                    project_id = %project_id,
                    scope = %scope.node,
                    consistency_ratio = group.consistency_ratio,
                    "Group judgments are inconsistent"
                );
            }
            self.results.save(&project_id, &ResultOwner::Group, &group).await?;
            by_scope.insert(scope.node, group.clone());
            scopes.push(group);
        }

        // 6. Compose and store
        let synthesis = synthesize(&hierarchy, &by_scope)?;
        let outcome = GroupOutcome {
            project_id,
            hierarchy_version: hierarchy.version(),
            strategy: self.engine.strategy(),
            evaluators,
            excluded_sessions: stale.iter().map(|s| *s.id()).collect(),
            scopes,
            synthesis,
            computed_at: Timestamp::now(),
        };
        self.results.save_outcome(&outcome).await?;

        // 7. Publish
        let event = GroupResultsComputed::from_outcome(&outcome);
        self.event_publisher
            .publish(stamped_envelope(&event, &metadata)?)
            .await?;

        info!(
            project_id = %project_id,
            strategy = %outcome.strategy,
            evaluators = outcome.evaluators.len(),
            excluded = outcome.excluded_sessions.len(),
            "Group results computed"
        );

        Ok(GroupResults::Available(Box::new(outcome)))
    }
}
