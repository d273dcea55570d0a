//! AbandonSessionHandler - Removes an evaluator from the study.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::stamped_envelope;
use crate::domain::evaluation::{EvaluationError, SessionRevoked};
use crate::domain::foundation::{CommandMetadata, EventId, SessionId, Timestamp};
use crate::ports::{EvaluationSessionRepository, EventPublisher};

/// Command to revoke a session that has not completed.
#[derive(Debug, Clone)]
pub struct AbandonSessionCommand {
    pub session_id: SessionId,
    pub reason: Option<String>,
}

/// Handler for revoking sessions.
pub struct AbandonSessionHandler {
    sessions: Arc<dyn EvaluationSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl AbandonSessionHandler {
    pub fn new(
        sessions: Arc<dyn EvaluationSessionRepository>,
        event_publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            sessions,
            event_publisher,
        }
    }

    pub async fn handle(
        &self,
        cmd: AbandonSessionCommand,
        metadata: CommandMetadata,
    ) -> Result<(), EvaluationError> {
        let mut session = self
            .sessions
            .find_by_id(&cmd.session_id)
            .await?
            .ok_or(EvaluationError::SessionNotFound(cmd.session_id))?;

        let now = Timestamp::now();
        session.abandon(now)?;
        self.sessions.update(&session).await?;

        let event = SessionRevoked {
            event_id: EventId::new(),
            session_id: cmd.session_id,
            project_id: *session.project_id(),
            reason: cmd.reason.clone(),
            revoked_at: now,
        };
        self.event_publisher
            .publish(stamped_envelope(&event, &metadata)?)
            .await?;

        info!(
            session_id = %cmd.session_id,
            reason = cmd.reason.as_deref().unwrap_or("none"),
            "Session revoked"
        );
        Ok(())
    }
}
