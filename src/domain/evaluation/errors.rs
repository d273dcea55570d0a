//! Evaluation-specific error types.

use thiserror::Error;

use crate::domain::comparison::{MatrixError, TaskId};
use crate::domain::foundation::{DomainError, ErrorCode, EvaluatorId, SessionId, ValidationError};

use super::EvaluationStatus;

/// Invitation token could not be redeemed. Never leaves state changed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Invitation code '{0}' not found")]
    NotFound(String),

    #[error("Invitation code '{0}' has expired")]
    Expired(String),

    #[error("Invitation code '{0}' has already been used")]
    AlreadyUsed(String),

    #[error("Invitation code '{0}' has been revoked")]
    Revoked(String),
}

impl TokenError {
    pub fn code(&self) -> ErrorCode {
        match self {
            TokenError::NotFound(_) => ErrorCode::TokenNotFound,
            TokenError::Expired(_) => ErrorCode::TokenExpired,
            TokenError::AlreadyUsed(_) => ErrorCode::TokenAlreadyUsed,
            TokenError::Revoked(_) => ErrorCode::TokenRevoked,
        }
    }
}

/// Operation not allowed in the session's current state.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionStateError {
    #[error("Session is {status} and does not accept judgments")]
    NotActive { status: EvaluationStatus },

    #[error("Task {0} is not part of this session")]
    UnknownTask(TaskId),

    #[error("Task {task} cannot be answered before {expected}")]
    TaskOutOfOrder { task: TaskId, expected: TaskId },

    #[error("Demographics can only be recorded right after registration, session is {status}")]
    DemographicsClosed { status: EvaluationStatus },

    #[error("Cannot transition from {from} to {to}")]
    InvalidTransition {
        from: EvaluationStatus,
        to: EvaluationStatus,
    },
}

impl SessionStateError {
    pub fn code(&self) -> ErrorCode {
        match self {
            SessionStateError::NotActive { .. } => ErrorCode::SessionNotActive,
            SessionStateError::UnknownTask(_) => ErrorCode::UnknownTask,
            SessionStateError::TaskOutOfOrder { .. } => ErrorCode::TaskOutOfOrder,
            SessionStateError::DemographicsClosed { .. }
            | SessionStateError::InvalidTransition { .. } => ErrorCode::InvalidStateTransition,
        }
    }
}

/// Errors surfaced by evaluation handlers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum EvaluationError {
    #[error(transparent)]
    Token(#[from] TokenError),

    #[error(transparent)]
    State(#[from] SessionStateError),

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error("Session not found: {0}")]
    SessionNotFound(SessionId),

    #[error("Project not found: {0}")]
    ProjectNotFound(String),

    #[error("Evaluator {evaluator} already holds live session {session_id}")]
    AlreadyInvited {
        evaluator: EvaluatorId,
        session_id: SessionId,
    },

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl EvaluationError {
    pub fn infrastructure(message: impl Into<String>) -> Self {
        EvaluationError::Infrastructure(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            EvaluationError::Token(e) => e.code(),
            EvaluationError::State(e) => e.code(),
            EvaluationError::Validation(_) => ErrorCode::ValidationFailed,
            EvaluationError::Matrix(e) => e.code(),
            EvaluationError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            EvaluationError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            EvaluationError::AlreadyInvited { .. } => ErrorCode::EvaluatorAlreadyInvited,
            EvaluationError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }
}

impl From<DomainError> for EvaluationError {
    fn from(err: DomainError) -> Self {
        EvaluationError::Infrastructure(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn token_errors_map_to_codes() {
        assert_eq!(TokenError::NotFound("X".into()).code(), ErrorCode::TokenNotFound);
        assert_eq!(TokenError::Expired("X".into()).code(), ErrorCode::TokenExpired);
        assert_eq!(TokenError::AlreadyUsed("X".into()).code(), ErrorCode::TokenAlreadyUsed);
        assert_eq!(TokenError::Revoked("X".into()).code(), ErrorCode::TokenRevoked);
    }

    #[test]
    fn wrapper_delegates_codes() {
        let err: EvaluationError = SessionStateError::NotActive {
            status: EvaluationStatus::Completed,
        }
        .into();
        assert_eq!(err.code(), ErrorCode::SessionNotActive);
        assert_eq!(err.to_string(), "Session is Completed and does not accept judgments");
    }

    #[test]
    fn duplicate_invitation_has_its_own_code() {
        let err = EvaluationError::AlreadyInvited {
            evaluator: EvaluatorId::new("alice").unwrap(),
            session_id: SessionId::new(),
        };
        assert_eq!(err.code(), ErrorCode::EvaluatorAlreadyInvited);
        assert_eq!(err.code().to_string(), "EVALUATOR_ALREADY_INVITED");
    }
}
