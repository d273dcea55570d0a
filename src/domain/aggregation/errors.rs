//! Errors surfaced by the results handlers.

use thiserror::Error;

use crate::domain::comparison::MatrixError;
use crate::domain::foundation::{DomainError, ErrorCode, ProjectId};
use crate::domain::hierarchy::HierarchyError;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ResultsError {
    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("No completed session to aggregate for project {0}")]
    NotAvailable(ProjectId),

    #[error(transparent)]
    Matrix(#[from] MatrixError),

    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl ResultsError {
    pub fn code(&self) -> ErrorCode {
        match self {
            ResultsError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            ResultsError::NotAvailable(_) => ErrorCode::ResultsNotAvailable,
            ResultsError::Matrix(e) => e.code(),
            ResultsError::Hierarchy(e) => e.code(),
            ResultsError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }
}

impl From<DomainError> for ResultsError {
    fn from(err: DomainError) -> Self {
        ResultsError::Infrastructure(err.to_string())
    }
}
