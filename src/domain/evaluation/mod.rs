//! Evaluation module - invitations and per-evaluator sessions.
//!
//! # Components
//!
//! - `InvitationToken` / `TokenCode` - Who may join a study, until when
//! - `TokenCodeGenerator` - Injectable code source (random or sequential)
//! - `EvaluationSession` - State machine gating judgment submission
//! - `EvaluationStatus` - Issued → Registered → InProgress → Completed
//!
//! # Events
//!
//! - `InvitationIssued`, `SessionRegistered`, `JudgmentSubmitted`,
//!   `SessionCompleted`, `SessionRevoked`, `SessionExpired`

mod errors;
mod events;
mod session;
mod status;
mod token;

pub use errors::{EvaluationError, SessionStateError, TokenError};
pub use events::{
    InvitationIssued, JudgmentSubmitted, SessionCompleted, SessionExpired, SessionRegistered,
    SessionRevoked,
};
pub use session::{EvaluationSession, Judgment, Progress, SubmissionOutcome};
pub use status::EvaluationStatus;
pub use token::{
    validate_prefix, InvitationToken, RandomCodeGenerator, SequentialCodeGenerator, TokenCode,
    TokenCodeGenerator,
};
