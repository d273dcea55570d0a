//! ExpireSessionsHandler - Sweeps lapsed invitations of a project.
//!
//! Redeeming a token never changes state on failure, so expiry is applied
//! here instead. Sessions that already hold judgments are never expired.

use std::sync::Arc;
use tracing::info;

use crate::application::handlers::stamped_envelope;
use crate::domain::evaluation::{EvaluationError, SessionExpired};
use crate::domain::foundation::{CommandMetadata, EventId, ProjectId, SessionId, Timestamp};
use crate::ports::{EvaluationSessionRepository, EventPublisher};

/// Command to expire every lapsed, unstarted session of a project.
#[derive(Debug, Clone)]
pub struct ExpireSessionsCommand {
    pub project_id: ProjectId,
    /// Reference time; tokens expiring strictly before it lapse.
    pub now: Timestamp,
}

/// Sessions expired by this sweep.
#[derive(Debug, Clone, Default)]
pub struct ExpireSessionsResult {
    pub expired: Vec<SessionId>,
}

/// Handler for the expiry sweep.
pub struct ExpireSessionsHandler {
    sessions: Arc<dyn EvaluationSessionRepository>,
    event_publisher: Arc<dyn EventPublisher>,
}

impl ExpireSessionsHandler {
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
        cmd: ExpireSessionsCommand,
        metadata: CommandMetadata,
    ) -> Result<ExpireSessionsResult, EvaluationError> {
        let mut result = ExpireSessionsResult::default();
        let mut events = Vec::new();

        for mut session in self.sessions.find_by_project(&cmd.project_id).await? {
            if !session.expire(cmd.now) {
                continue;
            }
            self.sessions.update(&session).await?;
            let event = SessionExpired {
                event_id: EventId::new(),
                session_id: *session.id(),
                project_id: cmd.project_id,
                expired_at: cmd.now,
            };
            events.push(stamped_envelope(&event, &metadata)?);
            result.expired.push(*session.id());
        }

        if !events.is_empty() {
            self.event_publisher.publish_all(events).await?;
            info!(
                project_id = %cmd.project_id,
                expired = result.expired.len(),
                "Expired lapsed invitations"
            );
        }
        Ok(result)
    }
}
