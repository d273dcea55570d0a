//! ValidateTokenHandler - Redeems an invitation code and opens the session.
//!
//! Redemption freezes the comparison tasks of the hierarchy as it is now;
//! later edits never reach this session.

use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::application::handlers::stamped_envelope;
use crate::domain::comparison::{generate_tasks, ComparisonTask};
use crate::domain::evaluation::{
    EvaluationError, EvaluationStatus, Progress, SessionCompleted, SessionRegistered, TokenCode,
    TokenError,
};
use crate::domain::foundation::{
    CommandMetadata, EvaluatorId, EventId, SessionId, Timestamp,
};
use crate::ports::{EvaluationSessionRepository, EventPublisher, HierarchyRepository};

/// Command to redeem an invitation code.
#[derive(Debug, Clone)]
pub struct ValidateTokenCommand {
    /// Code as typed or scanned; case and surrounding spaces are ignored.
    pub code: String,
    /// Optional questionnaire answers recorded right after registration.
    pub demographics: BTreeMap<String, String>,
}

/// Result of a successful redemption.
#[derive(Debug, Clone)]
pub struct ValidateTokenResult {
    pub session_id: SessionId,
    pub evaluator: EvaluatorId,
    pub progress: Progress,
    /// `None` when the hierarchy has nothing to compare.
    pub first_task: Option<ComparisonTask>,
}

/// Handler for token redemption.
pub struct ValidateTokenHandler {
    hierarchies: Arc<dyn HierarchyRepository>,
    sessions: Arc<dyn EvaluationSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ValidateTokenHandler {
    pub fn new(
        hierarchies: Arc<dyn HierarchyRepository>,
        sessions: Arc<dyn EvaluationSessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            hierarchies,
            sessions,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: ValidateTokenCommand,
        metadata: CommandMetadata,
    ) -> Result<ValidateTokenResult, EvaluationError> {
        // 1. Find the session; malformed codes cannot exist
        let code = TokenCode::try_new(&cmd.code)
            .map_err(|_| TokenError::NotFound(cmd.code.trim().to_string()))?;
        let mut session = self
            .sessions
            .find_by_token_code(&code)
            .await?
            .ok_or_else(|| TokenError::NotFound(code.to_string()))?;

        let now = Timestamp::now();
        if let Err(err) = session.validate_token(&now) {
            warn!(code = %code, session_id = %session.id(), error = %err, "Invitation rejected");
            return Err(err.into());
        }

        // 2. Freeze tasks against the current hierarchy
        let snapshot = self
            .hierarchies
            .load(session.project_id())
            .await?
            .ok_or_else(|| EvaluationError::ProjectNotFound(session.project_id().to_string()))?;
        let hierarchy = snapshot
            .restore()
            .map_err(|e| EvaluationError::infrastructure(e.to_string()))?;
        let evaluator = session.register(hierarchy.version(), generate_tasks(&hierarchy), now)?;

        if !cmd.demographics.is_empty() {
            if session.status() == EvaluationStatus::Registered {
                session.record_demographics(cmd.demographics, now)?;
            } else {
                debug!(session_id = %session.id(), "Demographics ignored, nothing to compare");
            }
        }

        // 3. Persist
        self.sessions.update(&session).await?;

        // 4. Publish
        let registered = SessionRegistered {
            event_id: EventId::new(),
            session_id: *session.id(),
            project_id: *session.project_id(),
            evaluator: evaluator.clone(),
            hierarchy_version: hierarchy.version(),
            task_count: session.tasks().len(),
            registered_at: now,
        };
        let mut events = vec![stamped_envelope(&registered, &metadata)?];
        if session.status() == EvaluationStatus::Completed {
            let completed = SessionCompleted {
                event_id: EventId::new(),
                session_id: *session.id(),
                project_id: *session.project_id(),
                evaluator: evaluator.clone(),
                inconsistent_scopes: 0,
                completed_at: now,
            };
            events.push(stamped_envelope(&completed, &metadata)?);
        }
        self.event_publisher.publish_all(events).await?;

        info!(
            session_id = %session.id(),
            evaluator = %evaluator,
            tasks = session.tasks().len(),
            hierarchy_version = hierarchy.version(),
            "Session registered"
        );

        Ok(ValidateTokenResult {
            session_id: *session.id(),
            evaluator,
            progress: session.progress(),
            first_task: session.current_task().cloned(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Study;
    use super::*;
    use crate::application::handlers::{AbandonSessionCommand, AbandonSessionHandler};
    use crate::domain::hierarchy::HierarchyTemplate;

    fn command(code: &str) -> ValidateTokenCommand {
        ValidateTokenCommand {
            code: code.to_string(),
            demographics: BTreeMap::new(),
        }
    }

    #[tokio::test]
    async fn redeems_code_and_freezes_tasks() {
        let study = Study::new(HierarchyTemplate::new(3, 3, 3)).await;
        let invitation = study.invite(Some("alice")).await;

        let result = study
            .validate_handler()
            .handle(command(invitation.token.code.as_str()), Study::metadata())
            .await
            .unwrap();

        assert_eq!(result.evaluator.as_str(), "alice");
        assert_eq!(result.progress, Progress { completed: 0, total: 39 });
        assert!(result.first_task.is_some());
        let session = study.sessions.find_by_id(&result.session_id).await.unwrap().unwrap();
        assert_eq!(session.status(), EvaluationStatus::Registered);
        assert_eq!(session.hierarchy_version(), Some(study.snapshot.version));
        assert!(study.bus.has_event("evaluation.session_registered"));
    }

    #[tokio::test]
    async fn codes_are_case_insensitive() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let invitation = study.invite(None).await;
        let typed = format!("  {} ", invitation.token.code.as_str().to_lowercase());

        let result = study.validate_handler().handle(command(&typed), Study::metadata()).await;

        let result = result.unwrap();
        assert!(result.evaluator.as_str().starts_with("anonymous-"));
    }

    #[tokio::test]
    async fn second_redemption_fails_as_already_used() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let invitation = study.invite(Some("alice")).await;
        let handler = study.validate_handler();
        handler
            .handle(command(invitation.token.code.as_str()), Study::metadata())
            .await
            .unwrap();

        let again = handler
            .handle(command(invitation.token.code.as_str()), Study::metadata())
            .await;

        assert!(matches!(
            again,
            Err(EvaluationError::Token(TokenError::AlreadyUsed(_)))
        ));
    }

    #[tokio::test]
    async fn unknown_and_malformed_codes_are_not_found() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let handler = study.validate_handler();

        for code in ["AHP-99999999", "not a code", ""] {
            let result = handler.handle(command(code), Study::metadata()).await;
            assert!(
                matches!(result, Err(EvaluationError::Token(TokenError::NotFound(_)))),
                "{:?} should be unknown",
                code
            );
        }
    }

    #[tokio::test]
    async fn revoked_invitation_cannot_be_redeemed() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let invitation = study.invite(Some("alice")).await;
        AbandonSessionHandler::new(study.sessions.clone(), study.bus.clone())
            .handle(
                AbandonSessionCommand {
                    session_id: invitation.session_id,
                    reason: None,
                },
                Study::metadata(),
            )
            .await
            .unwrap();

        let result = study
            .validate_handler()
            .handle(command(invitation.token.code.as_str()), Study::metadata())
            .await;

        assert!(matches!(result, Err(EvaluationError::Token(TokenError::Revoked(_)))));
    }

    #[tokio::test]
    async fn demographics_are_recorded() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let invitation = study.invite(None).await;
        let mut answers = BTreeMap::new();
        answers.insert("role".to_string(), "engineer".to_string());

        let result = study
            .validate_handler()
            .handle(
                ValidateTokenCommand {
                    code: invitation.token.code.to_string(),
                    demographics: answers,
                },
                Study::metadata(),
            )
            .await
            .unwrap();

        let session = study.sessions.find_by_id(&result.session_id).await.unwrap().unwrap();
        assert_eq!(session.demographics().get("role").map(String::as_str), Some("engineer"));
    }

    #[tokio::test]
    async fn hierarchy_without_comparisons_completes_immediately() {
        let study = Study::new(HierarchyTemplate::new(1, 0, 1)).await;
        let invitation = study.invite(Some("alice")).await;

        let result = study
            .validate_handler()
            .handle(command(invitation.token.code.as_str()), Study::metadata())
            .await
            .unwrap();

        assert!(result.first_task.is_none());
        assert!(result.progress.is_complete());
        assert!(study.bus.has_event("evaluation.session_completed"));
    }
}
