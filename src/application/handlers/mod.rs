//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.
//!
//! - `hierarchy` - Project creation and administrator edits
//! - `evaluation` - Invitations, token redemption and judgment submission
//! - `results` - Group aggregation and synthesis

pub mod evaluation;
pub mod hierarchy;
pub mod results;

pub use evaluation::{
    AbandonSessionCommand, AbandonSessionHandler, ExpireSessionsCommand, ExpireSessionsHandler,
    ExpireSessionsResult, GetProgressHandler, GetProgressQuery, IssueInvitationCommand,
    IssueInvitationHandler, IssueInvitationResult, SessionProgressView, SubmitJudgmentCommand,
    SubmitJudgmentHandler, SubmitJudgmentResult, ValidateTokenCommand, ValidateTokenHandler,
    ValidateTokenResult,
};
pub use hierarchy::{
    CreateProjectCommand, CreateProjectHandler, CreateProjectResult, EditHierarchyCommand,
    EditHierarchyHandler, EditHierarchyResult, HierarchyEdit, ProjectBlueprint,
};
pub use results::{
    ComputeGroupResultsCommand, ComputeGroupResultsHandler, GetGroupResultsHandler,
    GetGroupResultsQuery,
};

use crate::domain::foundation::{
    CommandMetadata, DomainError, ErrorCode, EventEnvelope, SerializableDomainEvent,
};

/// Wraps `event` for publishing and stamps it with the command's context.
pub(crate) fn stamped_envelope<E: SerializableDomainEvent>(
    event: &E,
    metadata: &CommandMetadata,
) -> Result<EventEnvelope, DomainError> {
    let envelope = event.to_envelope().map_err(|e| {
        DomainError::new(
            ErrorCode::InternalError,
            format!("Failed to serialize {}: {}", event.event_type(), e),
        )
    })?;
    Ok(metadata.stamp(envelope))
}
