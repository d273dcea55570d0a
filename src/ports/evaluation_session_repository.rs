//! Evaluation session repository port.

use async_trait::async_trait;

use crate::domain::evaluation::{EvaluationSession, TokenCode};
use crate::domain::foundation::{DomainError, ProjectId, SessionId};

/// Repository port for EvaluationSession persistence.
///
/// Implementations must ensure token codes are unique across sessions.
#[async_trait]
pub trait EvaluationSessionRepository: Send + Sync {
    /// Save a new session.
    ///
    /// # Errors
    ///
    /// - `ValidationFailed` if the token code is already taken
    /// - `StorageError` on persistence failure
    async fn save(&self, session: &EvaluationSession) -> Result<(), DomainError>;

    /// Update an existing session.
    ///
    /// # Errors
    ///
    /// - `SessionNotFound` if session doesn't exist
    async fn update(&self, session: &EvaluationSession) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<EvaluationSession>, DomainError>;

    /// Look a session up by its invitation code.
    async fn find_by_token_code(
        &self,
        code: &TokenCode,
    ) -> Result<Option<EvaluationSession>, DomainError>;

    /// All sessions of a project, oldest invitation first.
    async fn find_by_project(
        &self,
        project_id: &ProjectId,
    ) -> Result<Vec<EvaluationSession>, DomainError>;
}
