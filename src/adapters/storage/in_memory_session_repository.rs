//! In-memory evaluation session repository.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::evaluation::{EvaluationSession, TokenCode};
use crate::domain::foundation::{DomainError, ErrorCode, ProjectId, SessionId};
use crate::ports::EvaluationSessionRepository;

#[derive(Debug, Clone, Default)]
pub struct InMemoryEvaluationSessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, EvaluationSession>>>,
}

impl InMemoryEvaluationSessionRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn session_count(&self) -> usize {
        self.sessions.read().await.len()
    }
}

#[async_trait]
impl EvaluationSessionRepository for InMemoryEvaluationSessionRepository {
    async fn save(&self, session: &EvaluationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        let code = &session.token().code;
        if sessions
            .values()
            .any(|s| s.id() != session.id() && &s.token().code == code)
        {
            return Err(DomainError::new(
                ErrorCode::ValidationFailed,
                format!("Invitation code {} is already in use", code),
            ));
        }
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn update(&self, session: &EvaluationSession) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        match sessions.get_mut(session.id()) {
            Some(existing) => {
                *existing = session.clone();
                Ok(())
            }
            None => Err(DomainError::new(
                ErrorCode::SessionNotFound,
                format!("Session not found: {}", session.id()),
            )),
        }
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<EvaluationSession>, DomainError> {
        Ok(self.sessions.read().await.get(id).cloned())
    }

    async fn find_by_token_code(
        &self,
        code: &TokenCode,
    ) -> Result<Option<EvaluationSession>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.values().find(|s| &s.token().code == code).cloned())
    }

    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<EvaluationSession>, DomainError> {
        let sessions = self.sessions.read().await;
        let mut found: Vec<EvaluationSession> = sessions
            .values()
            .filter(|s| s.project_id() == project_id)
            .cloned()
            .collect();
        found.sort_by_key(|s| (*s.issued_at(), *s.id()));
        Ok(found)
    }
}
