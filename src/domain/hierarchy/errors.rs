//! Structural errors raised by hierarchy edits and snapshot rebuilds.

use thiserror::Error;

use crate::domain::foundation::{DomainError, ErrorCode, NodeId, ProjectId, ValidationError};

use super::NodeKind;

/// Rejected hierarchy edit. No variant is ever returned after a partial mutation.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyError {
    #[error("Parent node {0} does not exist")]
    InvalidParent(NodeId),

    #[error("Node cannot be placed at level {level}; maximum is {max}")]
    DepthExceeded { level: u8, max: u8 },

    #[error("{kind} node cannot be attached under {parent_kind} node")]
    InvalidKind { kind: NodeKind, parent_kind: NodeKind },

    #[error("Node {0} not found")]
    NotFound(NodeId),

    #[error("The goal node cannot be deleted")]
    CannotDeleteGoal,

    #[error("Invalid node name: {0}")]
    InvalidName(#[from] ValidationError),

    #[error("Snapshot is not a valid hierarchy: {0}")]
    CorruptSnapshot(String),
}

impl HierarchyError {
    pub fn corrupt(reason: impl Into<String>) -> Self {
        HierarchyError::CorruptSnapshot(reason.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            HierarchyError::InvalidParent(_) => ErrorCode::InvalidParent,
            HierarchyError::DepthExceeded { .. } => ErrorCode::DepthExceeded,
            HierarchyError::InvalidKind { .. } => ErrorCode::InvalidKind,
            HierarchyError::NotFound(_) => ErrorCode::NodeNotFound,
            HierarchyError::CannotDeleteGoal => ErrorCode::CannotDeleteGoal,
            HierarchyError::InvalidName(_) => ErrorCode::ValidationFailed,
            HierarchyError::CorruptSnapshot(_) => ErrorCode::CorruptSnapshot,
        }
    }
}

impl From<HierarchyError> for DomainError {
    fn from(err: HierarchyError) -> Self {
        DomainError::new(err.code(), err.to_string())
    }
}

/// Errors surfaced by hierarchy command handlers.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum HierarchyCommandError {
    #[error(transparent)]
    Structural(#[from] HierarchyError),

    #[error("Project not found: {0}")]
    ProjectNotFound(ProjectId),

    #[error("Error: {0}")]
    Infrastructure(String),
}

impl HierarchyCommandError {
    pub fn code(&self) -> ErrorCode {
        match self {
            HierarchyCommandError::Structural(e) => e.code(),
            HierarchyCommandError::ProjectNotFound(_) => ErrorCode::ProjectNotFound,
            HierarchyCommandError::Infrastructure(_) => ErrorCode::StorageError,
        }
    }
}

impl From<DomainError> for HierarchyCommandError {
    fn from(err: DomainError) -> Self {
        HierarchyCommandError::Infrastructure(err.to_string())
    }
}
