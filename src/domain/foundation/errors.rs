//! Error types for the domain layer.

use std::collections::HashMap;
use std::error::Error;
use std::fmt;
use thiserror::Error;

/// Errors that occur during value object construction.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ValidationError {
    #[error("Field '{field}' cannot be empty")]
    EmptyField { field: String },

    #[error("Field '{field}' must be between {min} and {max}, got {actual}")]
    OutOfRange {
        field: String,
        min: i64,
        max: i64,
        actual: i64,
    },

    #[error("Field '{field}' has invalid format: {reason}")]
    InvalidFormat { field: String, reason: String },

    #[error("Value {value} is not on the judgment scale")]
    NotOnScale { value: f64 },
}

impl ValidationError {
    /// Creates an empty field validation error.
    pub fn empty_field(field: impl Into<String>) -> Self {
        ValidationError::EmptyField { field: field.into() }
    }

    /// Creates an out of range validation error.
    pub fn out_of_range(field: impl Into<String>, min: i64, max: i64, actual: i64) -> Self {
        ValidationError::OutOfRange {
            field: field.into(),
            min,
            max,
            actual,
        }
    }

    /// Creates an invalid format validation error.
    pub fn invalid_format(field: impl Into<String>, reason: impl Into<String>) -> Self {
        ValidationError::InvalidFormat {
            field: field.into(),
            reason: reason.into(),
        }
    }

    /// Creates an error for a judgment value outside the reciprocal scale.
    pub fn not_on_scale(value: f64) -> Self {
        ValidationError::NotOnScale { value }
    }
}

/// Error codes organized by category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    // Validation errors
    ValidationFailed,

    // Structural errors
    InvalidParent,
    DepthExceeded,
    InvalidKind,
    NodeNotFound,
    CannotDeleteGoal,
    CorruptSnapshot,

    // Token errors
    TokenNotFound,
    TokenExpired,
    TokenAlreadyUsed,
    TokenRevoked,
    EvaluatorAlreadyInvited,

    // Session state errors
    SessionNotFound,
    SessionNotActive,
    UnknownTask,
    TaskOutOfOrder,
    InvalidStateTransition,

    // Matrix errors
    IncompleteMatrix,
    DegenerateMatrix,
    MatrixMismatch,

    // Not found errors
    ProjectNotFound,
    ResultsNotAvailable,

    // Infrastructure errors
    StorageError,
    InternalError,
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            ErrorCode::ValidationFailed => "VALIDATION_FAILED",
            ErrorCode::InvalidParent => "INVALID_PARENT",
            ErrorCode::DepthExceeded => "DEPTH_EXCEEDED",
            ErrorCode::InvalidKind => "INVALID_KIND",
            ErrorCode::NodeNotFound => "NODE_NOT_FOUND",
            ErrorCode::CannotDeleteGoal => "CANNOT_DELETE_GOAL",
            ErrorCode::CorruptSnapshot => "CORRUPT_SNAPSHOT",
            ErrorCode::TokenNotFound => "TOKEN_NOT_FOUND",
            ErrorCode::TokenExpired => "TOKEN_EXPIRED",
            ErrorCode::TokenAlreadyUsed => "TOKEN_ALREADY_USED",
            ErrorCode::TokenRevoked => "TOKEN_REVOKED",
            ErrorCode::EvaluatorAlreadyInvited => "EVALUATOR_ALREADY_INVITED",
            ErrorCode::SessionNotFound => "SESSION_NOT_FOUND",
            ErrorCode::SessionNotActive => "SESSION_NOT_ACTIVE",
            ErrorCode::UnknownTask => "UNKNOWN_TASK",
            ErrorCode::TaskOutOfOrder => "TASK_OUT_OF_ORDER",
            ErrorCode::InvalidStateTransition => "INVALID_STATE_TRANSITION",
            ErrorCode::IncompleteMatrix => "INCOMPLETE_MATRIX",
            ErrorCode::DegenerateMatrix => "DEGENERATE_MATRIX",
            ErrorCode::MatrixMismatch => "MATRIX_MISMATCH",
            ErrorCode::ProjectNotFound => "PROJECT_NOT_FOUND",
            ErrorCode::ResultsNotAvailable => "RESULTS_NOT_AVAILABLE",
            ErrorCode::StorageError => "STORAGE_ERROR",
            ErrorCode::InternalError => "INTERNAL_ERROR",
        };
        write!(f, "{}", s)
    }
}

/// Standard domain error with code, message, and optional details.
///
/// Ports speak this type; module errors convert into it at the boundary.
#[derive(Debug, Clone)]
pub struct DomainError {
    pub code: ErrorCode,
    pub message: String,
    pub details: HashMap<String, String>,
}

impl DomainError {
    /// Creates a new domain error.
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: HashMap::new(),
        }
    }

    /// Creates a storage error.
    pub fn storage(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::StorageError, message)
    }

    /// Adds a detail to the error.
    pub fn with_detail(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.details.insert(key.into(), value.into());
        self
    }
}

impl fmt::Display for DomainError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.code, self.message)
    }
}

impl Error for DomainError {}

impl From<ValidationError> for DomainError {
    fn from(err: ValidationError) -> Self {
        DomainError::new(ErrorCode::ValidationFailed, err.to_string())
    }
}
