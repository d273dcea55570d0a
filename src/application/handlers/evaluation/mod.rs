//! Evaluation handlers - from invitation to completed session.

mod abandon_session;
mod expire_sessions;
mod get_progress;
mod issue_invitation;
mod submit_judgment;
mod validate_token;

#[cfg(test)]
pub(crate) mod fixtures;

pub use abandon_session::{AbandonSessionCommand, AbandonSessionHandler};
pub use expire_sessions::{ExpireSessionsCommand, ExpireSessionsHandler, ExpireSessionsResult};
pub use get_progress::{GetProgressHandler, GetProgressQuery, SessionProgressView};
pub use issue_invitation::{IssueInvitationCommand, IssueInvitationHandler, IssueInvitationResult};
pub use submit_judgment::{SubmitJudgmentCommand, SubmitJudgmentHandler, SubmitJudgmentResult};
pub use validate_token::{ValidateTokenCommand, ValidateTokenHandler, ValidateTokenResult};
