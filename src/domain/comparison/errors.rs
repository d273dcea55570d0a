//! Errors raised while building or evaluating comparison matrices.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, NodeId};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum MatrixError {
    #[error("Matrix is incomplete: {missing} comparison(s) missing")]
    IncompleteMatrix { missing: usize },

    #[error("Matrix entry [{row}][{col}] is not a positive finite number")]
    DegenerateMatrix { row: usize, col: usize },

    #[error("Item {0} is not part of this matrix")]
    UnknownItem(NodeId),

    #[error("Matrices of size {0} are outside the random index table (1..=15)")]
    UnsupportedSize(usize),

    #[error("Nothing to aggregate")]
    EmptyInput,

    #[error("Inputs do not describe the same scope: {0}")]
    MismatchedScopes(String),

    #[error("Invalid evaluator weights: {0}")]
    InvalidWeights(String),
}

impl MatrixError {
    pub fn code(&self) -> ErrorCode {
        match self {
            MatrixError::IncompleteMatrix { .. } => ErrorCode::IncompleteMatrix,
            MatrixError::DegenerateMatrix { .. } => ErrorCode::DegenerateMatrix,
            MatrixError::UnknownItem(_)
            | MatrixError::UnsupportedSize(_)
            | MatrixError::EmptyInput
            | MatrixError::MismatchedScopes(_) => ErrorCode::MatrixMismatch,
            MatrixError::InvalidWeights(_) => ErrorCode::ValidationFailed,
        }
    }
}

impl From<MatrixError> for DomainError {
    fn from(err: MatrixError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}
