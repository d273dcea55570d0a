//! Evaluation domain events.
//!
//! Events published as an evaluator's session moves through its lifecycle:
//! - `InvitationIssued` - Token created for a project
//! - `SessionRegistered` - Token redeemed, task list frozen
//! - `JudgmentSubmitted` - One comparison answered or revised
//! - `SessionCompleted` - Last task answered
//! - `SessionRevoked` - Evaluator removed from the study
//! - `SessionExpired` - Token lapsed before any judgment

use serde::{Deserialize, Serialize};

use crate::domain::comparison::TaskId;
use crate::domain::foundation::{
    domain_event, EvaluatorId, EventId, ProjectId, SessionId, Timestamp,
};

// ════════════════════════════════════════════════════════════════════════════
// InvitationIssued
// ════════════════════════════════════════════════════════════════════════════

/// Published when an invitation token is created.
///
/// Delivery collaborators (mail, QR) pick the code up from here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InvitationIssued {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub project_id: ProjectId,
    pub code: String,
    /// `None` for open invitations.
    pub evaluator: Option<EvaluatorId>,
    pub expires_at: Timestamp,
    pub issued_at: Timestamp,
}

domain_event!(
    InvitationIssued,
    event_type = "evaluation.invitation_issued",
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = issued_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionRegistered
// ════════════════════════════════════════════════════════════════════════════

/// Published when an evaluator redeems a token.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRegistered {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub project_id: ProjectId,
    pub evaluator: EvaluatorId,
    /// Hierarchy version the task list was frozen on.
    pub hierarchy_version: u64,
    pub task_count: usize,
    pub registered_at: Timestamp,
}

domain_event!(
    SessionRegistered,
    event_type = "evaluation.session_registered",
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = registered_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// JudgmentSubmitted
// ════════════════════════════════════════════════════════════════════════════

/// Published for every accepted judgment, including revisions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JudgmentSubmitted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub project_id: ProjectId,
    pub evaluator: EvaluatorId,
    pub task_id: TaskId,
    pub value: f64,
    pub revised: bool,
    pub completed_tasks: usize,
    pub total_tasks: usize,
    pub submitted_at: Timestamp,
}

domain_event!(
    JudgmentSubmitted,
    event_type = "evaluation.judgment_submitted",
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = submitted_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionCompleted
// ════════════════════════════════════════════════════════════════════════════

/// Published when the last task of a session is answered.
///
/// Judgments of the session are immutable from here on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionCompleted {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub project_id: ProjectId,
    pub evaluator: EvaluatorId,
    /// Scopes whose individual CR exceeded the threshold.
    pub inconsistent_scopes: usize,
    pub completed_at: Timestamp,
}

domain_event!(
    SessionCompleted,
    event_type = "evaluation.session_completed",
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = completed_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionRevoked
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRevoked {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub project_id: ProjectId,
    pub reason: Option<String>,
    pub revoked_at: Timestamp,
}

domain_event!(
    SessionRevoked,
    event_type = "evaluation.session_revoked",
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = revoked_at,
    event_id = event_id
);

// ════════════════════════════════════════════════════════════════════════════
// SessionExpired
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionExpired {
    pub event_id: EventId,
    pub session_id: SessionId,
    pub project_id: ProjectId,
    pub expired_at: Timestamp,
}

domain_event!(
    SessionExpired,
    event_type = "evaluation.session_expired",
    aggregate_id = session_id,
    aggregate_type = "EvaluationSession",
    occurred_at = expired_at,
    event_id = event_id
);
