//! GetProgressHandler - Query handler for an evaluator's progress.

use std::sync::Arc;

use crate::domain::comparison::ComparisonTask;
use crate::domain::evaluation::{EvaluationError, EvaluationStatus, Progress};
use crate::domain::foundation::{EvaluatorId, SessionId};
use crate::ports::EvaluationSessionRepository;

/// Query for one session's progress.
#[derive(Debug, Clone)]
pub struct GetProgressQuery {
    pub session_id: SessionId,
}

/// What an evaluator UI needs to render "comparison N of T".
#[derive(Debug, Clone, PartialEq)]
pub struct SessionProgressView {
    pub session_id: SessionId,
    pub status: EvaluationStatus,
    pub evaluator: Option<EvaluatorId>,
    pub progress: Progress,
    pub current_task: Option<ComparisonTask>,
}

/// Handler for progress queries.
pub struct GetProgressHandler {
    sessions: Arc<dyn EvaluationSessionRepository>,
}

impl GetProgressHandler {
    pub fn new(sessions: Arc<dyn EvaluationSessionRepository>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, query: GetProgressQuery) -> Result<SessionProgressView, EvaluationError> {
        let session = self
            .sessions
            .find_by_id(&query.session_id)
            .await?
            .ok_or(EvaluationError::SessionNotFound(query.session_id))?;

        Ok(SessionProgressView {
            session_id: query.session_id,
            status: session.status(),
            evaluator: session.evaluator().cloned(),
            progress: session.progress(),
            current_task: session.current_task().cloned(),
        })
    }
}
