//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).

pub mod handlers;

pub use handlers::{
    // Hierarchy handlers
    CreateProjectCommand, CreateProjectHandler, CreateProjectResult,
    EditHierarchyCommand, EditHierarchyHandler, EditHierarchyResult, HierarchyEdit,
    ProjectBlueprint,
    // Evaluation handlers
    AbandonSessionCommand, AbandonSessionHandler,
    ExpireSessionsCommand, ExpireSessionsHandler, ExpireSessionsResult,
    GetProgressHandler, GetProgressQuery, SessionProgressView,
    IssueInvitationCommand, IssueInvitationHandler, IssueInvitationResult,
    SubmitJudgmentCommand, SubmitJudgmentHandler, SubmitJudgmentResult,
    ValidateTokenCommand, ValidateTokenHandler, ValidateTokenResult,
    // Results handlers
    ComputeGroupResultsCommand, ComputeGroupResultsHandler,
    GetGroupResultsHandler, GetGroupResultsQuery,
};
