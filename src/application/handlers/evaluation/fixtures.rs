//! Shared wiring for evaluation handler tests.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::adapters::{
    InMemoryEvaluationSessionRepository, InMemoryEventBus, InMemoryHierarchyStore,
    InMemoryJudgmentRepository, InMemoryPriorityResultRepository,
};
use crate::config::InvitationConfig;
use crate::domain::comparison::{ComparisonTask, JudgmentScale};
use crate::domain::evaluation::SequentialCodeGenerator;
use crate::domain::foundation::{CommandMetadata, EvaluatorId, ProjectId, SessionId};
use crate::domain::hierarchy::{HierarchySnapshot, HierarchyTemplate};
use crate::domain::priority::PriorityEngine;
use crate::ports::{EvaluationSessionRepository, HierarchyRepository};

use super::{
    IssueInvitationCommand, IssueInvitationHandler, IssueInvitationResult, SubmitJudgmentCommand,
    SubmitJudgmentHandler, ValidateTokenCommand, ValidateTokenHandler, ValidateTokenResult,
};

pub struct Study {
    pub hierarchies: Arc<InMemoryHierarchyStore>,
    pub sessions: Arc<InMemoryEvaluationSessionRepository>,
    pub judgments: Arc<InMemoryJudgmentRepository>,
    pub results: Arc<InMemoryPriorityResultRepository>,
    pub bus: Arc<InMemoryEventBus>,
    pub codes: Arc<SequentialCodeGenerator>,
    pub project_id: ProjectId,
    pub snapshot: HierarchySnapshot,
}

impl Study {
    pub async fn new(template: HierarchyTemplate) -> Self {
        let hierarchies = Arc::new(InMemoryHierarchyStore::new());
        let project_id = ProjectId::new();
        let snapshot = HierarchySnapshot::capture(project_id, &template.expand().unwrap());
        hierarchies.save(&snapshot).await.unwrap();
        Self {
            hierarchies,
            sessions: Arc::new(InMemoryEvaluationSessionRepository::new()),
            judgments: Arc::new(InMemoryJudgmentRepository::new()),
            results: Arc::new(InMemoryPriorityResultRepository::new()),
            bus: Arc::new(InMemoryEventBus::new()),
            codes: Arc::new(SequentialCodeGenerator::new()),
            project_id,
            snapshot,
        }
    }

    pub fn metadata() -> CommandMetadata {
        CommandMetadata::new("test")
    }

    pub fn issue_handler(&self, config: InvitationConfig) -> IssueInvitationHandler {
        IssueInvitationHandler::new(
            self.hierarchies.clone(),
            self.sessions.clone(),
            self.bus.clone(),
            self.codes.clone(),
            config,
        )
    }

    pub fn validate_handler(&self) -> ValidateTokenHandler {
        ValidateTokenHandler::new(self.hierarchies.clone(), self.sessions.clone(), self.bus.clone())
    }

    pub fn submit_handler(&self) -> SubmitJudgmentHandler {
        SubmitJudgmentHandler::new(
            self.sessions.clone(),
            self.judgments.clone(),
            self.results.clone(),
            self.bus.clone(),
            JudgmentScale::full(),
            PriorityEngine::default(),
        )
    }

    pub async fn invite(&self, evaluator: Option<&str>) -> IssueInvitationResult {
        self.issue_handler(InvitationConfig::default())
            .handle(
                IssueInvitationCommand {
                    project_id: self.project_id,
                    evaluator: evaluator.map(|e| EvaluatorId::new(e).unwrap()),
                },
                Self::metadata(),
            )
            .await
            .unwrap()
    }

    /// Issues and redeems an invitation in one go.
    pub async fn register(&self, evaluator: &str) -> ValidateTokenResult {
        let invitation = self.invite(Some(evaluator)).await;
        self.validate_handler()
            .handle(
                ValidateTokenCommand {
                    code: invitation.token.code.to_string(),
                    demographics: BTreeMap::new(),
                },
                Self::metadata(),
            )
            .await
            .unwrap()
    }

    /// Registers `evaluator` and answers every task with `answer(task)`.
    pub async fn evaluate<F>(&self, evaluator: &str, answer: F) -> SessionId
    where
        F: Fn(&ComparisonTask) -> f64,
    {
        let session_id = self.register(evaluator).await.session_id;
        let tasks = self
            .sessions
            .find_by_id(&session_id)
            .await
            .unwrap()
            .unwrap()
            .tasks()
            .to_vec();
        let handler = self.submit_handler();
        for task in &tasks {
            handler
                .handle(
                    SubmitJudgmentCommand {
                        session_id,
                        task_id: task.id.clone(),
                        value: answer(task),
                    },
                    Self::metadata(),
                )
                .await
                .unwrap();
        }
        session_id
    }
}
