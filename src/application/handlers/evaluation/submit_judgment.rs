//! SubmitJudgmentHandler - Records one pairwise judgment.
//!
//! Whenever the submission leaves its scope fully answered (first time or
//! after a revision) the evaluator's priority result for that scope is
//! recomputed and stored.

use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::handlers::stamped_envelope;
use crate::domain::comparison::{ComparisonTask, JudgmentScale, TaskId};
use crate::domain::evaluation::{
    EvaluationError, EvaluationSession, JudgmentSubmitted, SessionCompleted, SubmissionOutcome,
};
use crate::domain::foundation::{
    CommandMetadata, EvaluatorId, EventId, NodeId, SessionId, Timestamp,
};
use crate::domain::priority::{InconsistentJudgment, PriorityEngine, PriorityResult};
use crate::ports::{
    EvaluationSessionRepository, EventPublisher, JudgmentRepository, PriorityResultRepository,
    ResultOwner,
};

/// Command to answer (or revise) one comparison.
#[derive(Debug, Clone)]
pub struct SubmitJudgmentCommand {
    pub session_id: SessionId,
    pub task_id: TaskId,
    /// Raw scale value; snapped to the exact scale constant.
    pub value: f64,
}

/// Result of an accepted judgment.
#[derive(Debug, Clone)]
pub struct SubmitJudgmentResult {
    pub outcome: SubmissionOutcome,
    /// The evaluator's result for the scope, once it is fully answered.
    pub scope_result: Option<PriorityResult>,
    /// Judgment worth revisiting when the scope came out inconsistent.
    pub revision_hint: Option<InconsistentJudgment>,
    pub next_task: Option<ComparisonTask>,
}

/// Handler for judgment submission.
pub struct SubmitJudgmentHandler {
    sessions: Arc<dyn EvaluationSessionRepository>,
    judgments: Arc<dyn JudgmentRepository>,
    results: Arc<dyn PriorityResultRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    scale: JudgmentScale,
    engine: PriorityEngine,
}

impl SubmitJudgmentHandler {
    pub fn new(
        sessions: Arc<dyn EvaluationSessionRepository>,
        judgments: Arc<dyn JudgmentRepository>,
        results: Arc<dyn PriorityResultRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        scale: JudgmentScale,
        engine: PriorityEngine,
    ) -> Self {
        Self {
            sessions,
            judgments,
            results,
            event_publisher,
            scale,
            engine,
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitJudgmentCommand,
        metadata: CommandMetadata,
    ) -> Result<SubmitJudgmentResult, EvaluationError> {
        // 1. Validate value and apply to the session
        let value = self.scale.parse(cmd.value)?;
        let mut session = self
            .sessions
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(EvaluationError::SessionNotFound(cmd.session_id))?;
        let now = Timestamp::now();
        let outcome = session.submit_judgment(&cmd.task_id, value, now)?;
        let evaluator = session
            .evaluator()
            .cloned()
            .ok_or_else(|| EvaluationError::infrastructure("active session without evaluator"))?;

        // 2. Persist judgment before the session transition
        if let Some(judgment) = session.judgment(&cmd.task_id) {
            self.judgments.upsert(session.project_id(), judgment).await?;
        }
        self.sessions.update(&session).await?;
        debug!(
            session_id = %cmd.session_id,
            task_id = %cmd.task_id,
            value = %value,
            revised = outcome.revised,
            progress = %outcome.progress,
            "Judgment recorded"
        );

        // 3. Score the scope once it is fully answered
        let (scope_result, revision_hint) = if outcome.scope_complete {
            self.score_scope(&session, outcome.task.scope, &evaluator).await?
        } else {
            (None, None)
        };

        // 4. Publish
        let submitted = JudgmentSubmitted {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            project_id: *session.project_id(),
            evaluator: evaluator.clone(),
            task_id: cmd.task_id.clone(),
            value: value.value(),
            revised: outcome.revised,
            completed_tasks: outcome.progress.completed,
            total_tasks: outcome.progress.total,
            submitted_at: now,
        };
        let mut events = vec![stamped_envelope(&submitted, &metadata)?];
        if outcome.session_completed {
            let inconsistent_scopes = self
                .results
                .find_by_owner(session.project_id(), &ResultOwner::Evaluator(evaluator.clone()))
                .await?
                .iter()
                .filter(|r| !r.consistent)
                .count();
            let completed = SessionCompleted {
                event_id: EventId::new(),
                session_id: cmd.session_id,
                project_id: *session.project_id(),
                evaluator: evaluator.clone(),
                inconsistent_scopes,
                completed_at: now,
            };
            events.push(stamped_envelope(&completed, &metadata)?);
            info!(
                session_id = %cmd.session_id,
                evaluator = %evaluator,
                inconsistent_scopes,
                "Session completed"
            );
        }
        self.event_publisher.publish_all(events).await?;

        Ok(SubmitJudgmentResult {
            next_task: session.current_task().cloned(),
            outcome,
            scope_result,
            revision_hint,
        })
    }

    async fn score_scope(
        &self,
        session: &EvaluationSession,
        scope: NodeId,
        evaluator: &EvaluatorId,
    ) -> Result<(Option<PriorityResult>, Option<InconsistentJudgment>), EvaluationError> {
        let Some(scope) = session.scope_of(scope) else {
            return Ok((None, None));
        };
        let matrix = session.matrix_for(&scope)?;
        // Judgments stand even when the scope cannot be scored (n > 15);
        // group aggregation reports the same error.
        let result = match self.engine.compute(scope.node, &matrix) {
            Ok(result) => result,
            Err(err) => {
                warn!(scope = %scope.node, error = %err, "Scope could not be scored");
                return Ok((None, None));
            }
        };
        self.results
            .save(
                session.project_id(),
                &ResultOwner::Evaluator(evaluator.clone()),
                &result,
            )
            .await?;

        let hint = if result.consistent {
            None
        } else {
            let hint = self.engine.most_inconsistent_judgment(&matrix, &result)?;
            warn!(
                session_id = %session.id(),
                scope = %scope.node,
                consistency_ratio = result.consistency_ratio,
                threshold = self.engine.threshold(),
                "Inconsistent judgments"
            );
            hint
        };
        Ok((Some(result), hint))
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Study;
    use super::*;
    use crate::domain::evaluation::{SessionStateError, EvaluationStatus};
    use crate::domain::foundation::ValidationError;
    use crate::adapters::InMemoryJudgmentRepository;
    use crate::domain::evaluation::Judgment;
    use crate::domain::foundation::{DomainError, ProjectId};
    use crate::domain::hierarchy::HierarchyTemplate;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicBool, Ordering};

    async fn answer(study: &Study, session_id: SessionId, task: &TaskId, value: f64) -> SubmitJudgmentResult {
        study
            .submit_handler()
            .handle(
                SubmitJudgmentCommand {
                    session_id,
                    task_id: task.clone(),
                    value,
                },
                Study::metadata(),
            )
            .await
            .unwrap()
    }

    async fn tasks(study: &Study, session_id: SessionId) -> Vec<ComparisonTask> {
        study
            .sessions
            .find_by_id(&session_id)
            .await
            .unwrap()
            .unwrap()
            .tasks()
            .to_vec()
    }

    #[tokio::test]
    async fn first_judgment_moves_session_in_progress() {
        let study = Study::new(HierarchyTemplate::new(3, 0, 2)).await;
        let reg = study.register("alice").await;
        let first = reg.first_task.unwrap();

        let result = answer(&study, reg.session_id, &first.id, 3.0).await;

        assert_eq!(result.outcome.progress.completed, 1);
        assert!(!result.outcome.scope_complete);
        assert!(result.scope_result.is_none());
        let session = study.sessions.find_by_id(&reg.session_id).await.unwrap().unwrap();
        assert_eq!(session.status(), EvaluationStatus::InProgress);
        let evaluator = EvaluatorId::new("alice").unwrap();
        let stored = study.judgments.find_by_evaluator(&study.project_id, &evaluator).await.unwrap();
        assert_eq!(stored.len(), 1);
    }

    #[tokio::test]
    async fn completing_a_scope_stores_evaluator_result() {
        let study = Study::new(HierarchyTemplate::new(3, 0, 2)).await;
        let reg = study.register("alice").await;
        let tasks = tasks(&study, reg.session_id).await;

        // goal scope: c1 vs c2 = 3, c1 vs c3 = 5, c2 vs c3 = 2
        answer(&study, reg.session_id, &tasks[0].id, 3.0).await;
        answer(&study, reg.session_id, &tasks[1].id, 5.0).await;
        let result = answer(&study, reg.session_id, &tasks[2].id, 2.0).await;

        let scope_result = result.scope_result.unwrap();
        assert!(scope_result.consistent);
        assert!((scope_result.weights[0].weight - 0.6483290138).abs() < 1e-9);
        assert!(result.revision_hint.is_none());

        let owner = ResultOwner::Evaluator(EvaluatorId::new("alice").unwrap());
        let stored = study
            .results
            .find(&study.project_id, tasks[0].scope, &owner)
            .await
            .unwrap();
        assert_eq!(stored, Some(scope_result));
    }

    #[tokio::test]
    async fn inconsistent_scope_comes_with_revision_hint() {
        let study = Study::new(HierarchyTemplate::new(3, 0, 2)).await;
        let reg = study.register("alice").await;
        let tasks = tasks(&study, reg.session_id).await;

        // c1 > c2, c2 > c3, but c3 > c1
        answer(&study, reg.session_id, &tasks[0].id, 9.0).await;
        answer(&study, reg.session_id, &tasks[1].id, 1.0 / 9.0).await;
        let result = answer(&study, reg.session_id, &tasks[2].id, 9.0).await;

        assert!(!result.scope_result.unwrap().consistent);
        assert!(result.revision_hint.is_some());
    }

    #[tokio::test]
    async fn revision_recomputes_scope_result() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 3)).await;
        let reg = study.register("alice").await;
        let tasks = tasks(&study, reg.session_id).await;

        let first = answer(&study, reg.session_id, &tasks[0].id, 3.0).await;
        let revised = answer(&study, reg.session_id, &tasks[0].id, 1.0 / 3.0).await;

        assert!(revised.outcome.revised);
        let before = first.scope_result.unwrap();
        let after = revised.scope_result.unwrap();
        assert!(before.weights[0].weight > 0.5);
        assert!(after.weights[0].weight < 0.5);
        assert_eq!(revised.outcome.progress.completed, 1);
    }

    #[tokio::test]
    async fn last_judgment_completes_session() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let reg = study.register("alice").await;
        let tasks = tasks(&study, reg.session_id).await;
        assert_eq!(tasks.len(), 3);

        let mut last = None;
        for task in &tasks {
            last = Some(answer(&study, reg.session_id, &task.id, 1.0).await);
        }

        let last = last.unwrap();
        assert!(last.outcome.session_completed);
        assert!(last.next_task.is_none());
        let completed = study.bus.events_of_type("evaluation.session_completed");
        assert_eq!(completed.len(), 1);
        assert_eq!(completed[0].payload["inconsistent_scopes"], 0);

        let after = study
            .submit_handler()
            .handle(
                SubmitJudgmentCommand {
                    session_id: reg.session_id,
                    task_id: tasks[0].id.clone(),
                    value: 3.0,
                },
                Study::metadata(),
            )
            .await;
        assert!(matches!(
            after,
            Err(EvaluationError::State(SessionStateError::NotActive { .. }))
        ));
    }

    #[tokio::test]
    async fn off_scale_value_is_rejected_before_any_change() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let reg = study.register("alice").await;
        let first = reg.first_task.unwrap();

        let result = study
            .submit_handler()
            .handle(
                SubmitJudgmentCommand {
                    session_id: reg.session_id,
                    task_id: first.id,
                    value: 4.5,
                },
                Study::metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(EvaluationError::Validation(ValidationError::NotOnScale { .. }))
        ));
        let session = study.sessions.find_by_id(&reg.session_id).await.unwrap().unwrap();
        assert_eq!(session.progress().completed, 0);
    }

    #[tokio::test]
    async fn skipping_ahead_is_out_of_order() {
        let study = Study::new(HierarchyTemplate::new(3, 0, 2)).await;
        let reg = study.register("alice").await;
        let tasks = tasks(&study, reg.session_id).await;

        let result = study
            .submit_handler()
            .handle(
                SubmitJudgmentCommand {
                    session_id: reg.session_id,
                    task_id: tasks[2].id.clone(),
                    value: 3.0,
                },
                Study::metadata(),
            )
            .await;

        assert!(matches!(
            result,
            Err(EvaluationError::State(SessionStateError::TaskOutOfOrder { .. }))
        ));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let missing = SessionId::new();

        let result = study
            .submit_handler()
            .handle(
                SubmitJudgmentCommand {
                    session_id: missing,
                    task_id: TaskId::from_string("n0:n1-n2"),
                    value: 3.0,
                },
                Study::metadata(),
            )
            .await;

        assert!(matches!(result, Err(EvaluationError::SessionNotFound(id)) if id == missing));
    }

    /// Judgment store that can be switched to fail every upsert.
    struct FlakyJudgments {
        inner: InMemoryJudgmentRepository,
        failing: AtomicBool,
    }

    #[async_trait]
    impl JudgmentRepository for FlakyJudgments {
        async fn upsert(&self, project_id: &ProjectId, judgment: &Judgment) -> Result<(), DomainError> {
            if self.failing.load(Ordering::SeqCst) {
                return Err(DomainError::storage("judgment store unavailable"));
            }
            self.inner.upsert(project_id, judgment).await
        }

        async fn find_by_evaluator(
            &self,
            project_id: &ProjectId,
            evaluator: &EvaluatorId,
        ) -> Result<Vec<Judgment>, DomainError> {
            self.inner.find_by_evaluator(project_id, evaluator).await
        }
    }

    #[tokio::test]
    async fn failed_judgment_write_leaves_session_retryable() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let reg = study.register("alice").await;
        let tasks = tasks(&study, reg.session_id).await;
        let judgments = Arc::new(FlakyJudgments {
            inner: InMemoryJudgmentRepository::new(),
            failing: AtomicBool::new(false),
        });
        let handler = SubmitJudgmentHandler::new(
            study.sessions.clone(),
            judgments.clone(),
            study.results.clone(),
            study.bus.clone(),
            JudgmentScale::full(),
            PriorityEngine::default(),
        );
        let submit = |task: &ComparisonTask| SubmitJudgmentCommand {
            session_id: reg.session_id,
            task_id: task.id.clone(),
            value: 3.0,
        };
        handler.handle(submit(&tasks[0]), Study::metadata()).await.unwrap();
        handler.handle(submit(&tasks[1]), Study::metadata()).await.unwrap();

        judgments.failing.store(true, Ordering::SeqCst);
        let failed = handler.handle(submit(&tasks[2]), Study::metadata()).await;

        assert!(matches!(failed, Err(EvaluationError::Infrastructure(_))));
        let session = study.sessions.find_by_id(&reg.session_id).await.unwrap().unwrap();
        assert_eq!(session.status(), EvaluationStatus::InProgress);
        assert_eq!(session.progress().completed, 2);
        assert!(!study.bus.has_event("evaluation.session_completed"));

        judgments.failing.store(false, Ordering::SeqCst);
        let retried = handler.handle(submit(&tasks[2]), Study::metadata()).await.unwrap();

        assert!(retried.outcome.session_completed);
        let alice = EvaluatorId::new("alice").unwrap();
        let stored = judgments.find_by_evaluator(&study.project_id, &alice).await.unwrap();
        assert_eq!(stored.len(), 3);
        let session = study.sessions.find_by_id(&reg.session_id).await.unwrap().unwrap();
        assert_eq!(session.status(), EvaluationStatus::Completed);
    }
}
