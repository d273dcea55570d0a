//! IssueInvitationHandler - Command handler for inviting evaluators.

use std::sync::Arc;
use tracing::{info, warn};

use crate::application::handlers::stamped_envelope;
use crate::config::InvitationConfig;
use crate::domain::evaluation::{
    EvaluationError, EvaluationSession, InvitationIssued, InvitationToken, TokenCodeGenerator,
};
use crate::domain::foundation::{CommandMetadata, EvaluatorId, EventId, ProjectId, SessionId, Timestamp};
use crate::ports::{EvaluationSessionRepository, EventPublisher, HierarchyRepository};

/// Command to invite one evaluator, or anyone holding the code.
#[derive(Debug, Clone)]
pub struct IssueInvitationCommand {
    pub project_id: ProjectId,
    /// `None` issues an open invitation.
    pub evaluator: Option<EvaluatorId>,
}

/// Result of a successful invitation.
#[derive(Debug, Clone)]
pub struct IssueInvitationResult {
    pub session_id: SessionId,
    pub token: InvitationToken,
}

/// Handler for issuing invitations.
pub struct IssueInvitationHandler {
    hierarchies: Arc<dyn HierarchyRepository>,
    sessions: Arc<dyn EvaluationSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
    codes: Arc<dyn TokenCodeGenerator>,
    config: InvitationConfig,
}

impl IssueInvitationHandler {
    pub fn new(
        hierarchies: Arc<dyn HierarchyRepository>,
        sessions: Arc<dyn EvaluationSessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
        codes: Arc<dyn TokenCodeGenerator>,
        config: InvitationConfig,
    ) -> Self {
        Self {
            hierarchies,
            sessions,
            event_publisher,
            codes,
            config,
        }
    }

    pub async fn handle(
        &self,
        cmd: IssueInvitationCommand,
        metadata: CommandMetadata,
    ) -> Result<IssueInvitationResult, EvaluationError> {
        // 1. The project must exist
        if !self.hierarchies.exists(&cmd.project_id).await? {
            return Err(EvaluationError::ProjectNotFound(cmd.project_id.to_string()));
        }

        // 2. One live session per bound evaluator
        if let Some(evaluator) = &cmd.evaluator {
            let existing = self
                .sessions
                .find_by_project(&cmd.project_id)
                .await?
                .into_iter()
                .find(|s| s.status().is_live() && s.bound_evaluator() == Some(evaluator));
            if let Some(existing) = existing {
                warn!(
                    project_id = %cmd.project_id,
                    evaluator = %evaluator,
                    session_id = %existing.id(),
                    "Evaluator already invited"
                );
                return Err(EvaluationError::AlreadyInvited {
                    evaluator: evaluator.clone(),
                    session_id: *existing.id(),
                });
            }
        }

        // 3. Create token and session
        let code = self.codes.generate(&self.config.code_prefix.to_uppercase())?;
        let now = Timestamp::now();
        let token = InvitationToken::issue(
            code,
            cmd.project_id,
            cmd.evaluator,
            now.plus_hours(self.config.token_ttl_hours),
        );
        let session = EvaluationSession::issue(token.clone(), now);

        // 4. Persist
        self.sessions.save(&session).await?;

        // 5. Publish
        let event = InvitationIssued {
            event_id: EventId::new(),
            session_id: *session.id(),
            project_id: cmd.project_id,
            code: token.code.to_string(),
            evaluator: token.evaluator.clone(),
            expires_at: token.expires_at,
            issued_at: now,
        };
        self.event_publisher
            .publish(stamped_envelope(&event, &metadata)?)
            .await?;

        info!(
            project_id = %cmd.project_id,
            session_id = %session.id(),
            open = token.is_open(),
            "Invitation issued"
        );

        Ok(IssueInvitationResult {
            session_id: *session.id(),
            token,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::fixtures::Study;
    use super::*;
    use crate::domain::evaluation::EvaluationStatus;
    use crate::domain::hierarchy::HierarchyTemplate;
    use crate::ports::JudgmentRepository;

    #[tokio::test]
    async fn issues_bound_invitation_in_issued_state() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;

        let result = study.invite(Some("alice")).await;

        assert_eq!(result.token.code.as_str(), "AHP-00000001");
        assert_eq!(result.token.evaluator.as_ref().map(|e| e.as_str()), Some("alice"));
        let saved = study.sessions.find_by_id(&result.session_id).await.unwrap().unwrap();
        assert_eq!(saved.status(), EvaluationStatus::Issued);
        assert!(study.bus.has_event("evaluation.invitation_issued"));
    }

    #[tokio::test]
    async fn expiry_follows_configured_ttl() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let config = InvitationConfig {
            token_ttl_hours: 48,
            code_prefix: "pilot".to_string(),
        };
        let before = Timestamp::now();

        let result = study
            .issue_handler(config)
            .handle(
                IssueInvitationCommand {
                    project_id: study.project_id,
                    evaluator: None,
                },
                Study::metadata(),
            )
            .await
            .unwrap();

        assert!(result.token.is_open());
        assert_eq!(result.token.code.prefix(), "PILOT");
        let ttl = result.token.expires_at.as_unix_secs() - before.as_unix_secs();
        assert!((48 * 3600..=48 * 3600 + 5).contains(&ttl));
    }

    #[tokio::test]
    async fn unknown_project_is_rejected() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;

        let result = study
            .issue_handler(InvitationConfig::default())
            .handle(
                IssueInvitationCommand {
                    project_id: ProjectId::new(),
                    evaluator: None,
                },
                Study::metadata(),
            )
            .await;

        assert!(matches!(result, Err(EvaluationError::ProjectNotFound(_))));
        assert_eq!(study.bus.event_count(), 0);
    }

    fn invite_cmd(study: &Study, evaluator: &str) -> IssueInvitationCommand {
        IssueInvitationCommand {
            project_id: study.project_id,
            evaluator: Some(EvaluatorId::new(evaluator).unwrap()),
        }
    }

    #[tokio::test]
    async fn second_invitation_for_a_live_evaluator_is_rejected() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let first = study.evaluate("alice", |_| 3.0).await;
        let alice = EvaluatorId::new("alice").unwrap();
        let before = study.judgments.find_by_evaluator(&study.project_id, &alice).await.unwrap();
        let events_before = study.bus.event_count();

        let result = study
            .issue_handler(InvitationConfig::default())
            .handle(invite_cmd(&study, "alice"), Study::metadata())
            .await;

        assert!(matches!(
            &result,
            Err(EvaluationError::AlreadyInvited { evaluator, session_id })
                if *evaluator == alice && *session_id == first
        ));
        let sessions = study.sessions.find_by_project(&study.project_id).await.unwrap();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].status(), EvaluationStatus::Completed);
        let after = study.judgments.find_by_evaluator(&study.project_id, &alice).await.unwrap();
        assert_eq!(before, after);
        assert_eq!(study.bus.event_count(), events_before);
    }

    #[tokio::test]
    async fn unredeemed_bound_invitation_also_blocks_a_duplicate() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let pending = study.invite(Some("alice")).await;

        let result = study
            .issue_handler(InvitationConfig::default())
            .handle(invite_cmd(&study, "alice"), Study::metadata())
            .await;

        assert!(matches!(
            result,
            Err(EvaluationError::AlreadyInvited { session_id, .. }) if session_id == pending.session_id
        ));
    }

    #[tokio::test]
    async fn evaluator_can_be_invited_again_after_revocation() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;
        let dropped = study.invite(Some("alice")).await;
        crate::application::handlers::AbandonSessionHandler::new(
            study.sessions.clone(),
            study.bus.clone(),
        )
        .handle(
            crate::application::handlers::AbandonSessionCommand {
                session_id: dropped.session_id,
                reason: None,
            },
            Study::metadata(),
        )
        .await
        .unwrap();

        let again = study
            .issue_handler(InvitationConfig::default())
            .handle(invite_cmd(&study, "alice"), Study::metadata())
            .await;

        assert!(again.is_ok());
    }

    #[tokio::test]
    async fn open_invitations_are_not_limited() {
        let study = Study::new(HierarchyTemplate::new(2, 0, 2)).await;

        study.invite(None).await;
        study.invite(None).await;

        let sessions = study.sessions.find_by_project(&study.project_id).await.unwrap();
        assert_eq!(sessions.len(), 2);
    }
}
