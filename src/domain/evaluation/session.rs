//! EvaluationSession aggregate.
//!
//! One session per invitation. The session is the single writer of its
//! evaluator's judgments and walks the frozen task list strictly in order.
//!
//! # Lifecycle
//!
//! - `issue` creates the session together with its invitation token
//! - `register` redeems the token and freezes the task list
//! - `submit_judgment` fills tasks, completing the session on the last one
//! - `expire` and `abandon` end it without a result

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::fmt;

use crate::domain::comparison::{
    ComparisonKind, ComparisonScope, ComparisonTask, MatrixError, PairwiseMatrix, SaatyValue,
    TaskId,
};
use crate::domain::foundation::{
    EvaluatorId, NodeId, ProjectId, SessionId, StateMachine, Timestamp,
};

use super::{EvaluationStatus, InvitationToken, SessionStateError, TokenError};

/// One answered comparison.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Judgment {
    pub task_id: TaskId,
    pub evaluator: EvaluatorId,
    pub value: SaatyValue,
    pub submitted_at: Timestamp,
}

/// Completed versus total tasks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Progress {
    pub completed: usize,
    pub total: usize,
}

impl Progress {
    /// Completed share in 0..=1; an empty task list counts as done.
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            self.completed as f64 / self.total as f64
        }
    }

    pub fn is_complete(&self) -> bool {
        self.completed >= self.total
    }
}

impl fmt::Display for Progress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} of {}", self.completed, self.total)
    }
}

/// What a successful submission changed.
#[derive(Debug, Clone, PartialEq)]
pub struct SubmissionOutcome {
    pub task: ComparisonTask,
    /// The task had been answered before; the old value was replaced.
    pub revised: bool,
    /// Every task of the task's scope is now answered.
    pub scope_complete: bool,
    /// This submission completed the session.
    pub session_completed: bool,
    pub progress: Progress,
}

/// Per-evaluator session.
///
/// # Invariants
///
/// - `tasks[..cursor]` are exactly the answered tasks
/// - `tasks`, `hierarchy_version` and `evaluator` are set once, at registration
/// - Completed sessions never change again
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationSession {
    id: SessionId,
    project_id: ProjectId,
    token: InvitationToken,
    evaluator: Option<EvaluatorId>,
    status: EvaluationStatus,
    hierarchy_version: Option<u64>,
    tasks: Vec<ComparisonTask>,
    cursor: usize,
    judgments: HashMap<TaskId, Judgment>,
    demographics: BTreeMap<String, String>,
    issued_at: Timestamp,
    started_at: Option<Timestamp>,
    completed_at: Option<Timestamp>,
    updated_at: Timestamp,
}

impl EvaluationSession {
    /// Creates an Issued session for a freshly issued token.
    pub fn issue(token: InvitationToken, now: Timestamp) -> Self {
        Self {
            id: SessionId::new(),
            project_id: token.project,
            token,
            evaluator: None,
            status: EvaluationStatus::Issued,
            hierarchy_version: None,
            tasks: Vec::new(),
            cursor: 0,
            judgments: HashMap::new(),
            demographics: BTreeMap::new(),
            issued_at: now,
            started_at: None,
            completed_at: None,
            updated_at: now,
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn project_id(&self) -> &ProjectId {
        &self.project_id
    }

    pub fn token(&self) -> &InvitationToken {
        &self.token
    }

    /// Bound evaluator; `None` until registration.
    pub fn evaluator(&self) -> Option<&EvaluatorId> {
        self.evaluator.as_ref()
    }

    /// Evaluator this session belongs to, known from the invitation for
    /// bound tokens even before registration.
    pub fn bound_evaluator(&self) -> Option<&EvaluatorId> {
        self.evaluator.as_ref().or(self.token.evaluator.as_ref())
    }

    pub fn status(&self) -> EvaluationStatus {
        self.status
    }

    /// Hierarchy version the task list was frozen on.
    pub fn hierarchy_version(&self) -> Option<u64> {
        self.hierarchy_version
    }

    pub fn tasks(&self) -> &[ComparisonTask] {
        &self.tasks
    }

    pub fn judgment(&self, task_id: &TaskId) -> Option<&Judgment> {
        self.judgments.get(task_id)
    }

    /// Judgments in task order.
    pub fn judgments(&self) -> Vec<&Judgment> {
        self.tasks[..self.cursor]
            .iter()
            .filter_map(|t| self.judgments.get(&t.id))
            .collect()
    }

    pub fn demographics(&self) -> &BTreeMap<String, String> {
        &self.demographics
    }

    pub fn issued_at(&self) -> &Timestamp {
        &self.issued_at
    }

    pub fn started_at(&self) -> Option<&Timestamp> {
        self.started_at.as_ref()
    }

    pub fn completed_at(&self) -> Option<&Timestamp> {
        self.completed_at.as_ref()
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn progress(&self) -> Progress {
        Progress {
            completed: self.cursor,
            total: self.tasks.len(),
        }
    }

    /// The next task to answer, if any remain.
    pub fn current_task(&self) -> Option<&ComparisonTask> {
        if self.status.accepts_judgments() {
            self.tasks.get(self.cursor)
        } else {
            None
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Token redemption
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks the token can be redeemed at `now` without changing anything.
    ///
    /// # Errors
    ///
    /// - `Revoked` if the session was revoked
    /// - `Expired` if past expiry or already swept to Expired
    /// - `AlreadyUsed` if the token was redeemed before
    pub fn validate_token(&self, now: &Timestamp) -> Result<(), TokenError> {
        let code = self.token.code.to_string();
        match self.status {
            EvaluationStatus::Revoked => Err(TokenError::Revoked(code)),
            EvaluationStatus::Expired => Err(TokenError::Expired(code)),
            EvaluationStatus::Issued if self.token.is_expired(now) => Err(TokenError::Expired(code)),
            EvaluationStatus::Issued if !self.token.used => Ok(()),
            _ => Err(TokenError::AlreadyUsed(code)),
        }
    }

    /// Redeems the token, binds the evaluator and freezes the task list.
    ///
    /// Open tokens bind an anonymous identity derived from the session id.
    /// An empty task list completes the session immediately.
    pub fn register(
        &mut self,
        hierarchy_version: u64,
        tasks: Vec<ComparisonTask>,
        now: Timestamp,
    ) -> Result<EvaluatorId, TokenError> {
        self.validate_token(&now)?;

        let evaluator = self
            .token
            .evaluator
            .clone()
            .unwrap_or_else(|| EvaluatorId::anonymous(&self.id));
        self.token.used = true;
        self.evaluator = Some(evaluator.clone());
        self.hierarchy_version = Some(hierarchy_version);
        self.tasks = tasks;
        self.status = EvaluationStatus::Registered;
        self.started_at = Some(now);
        self.updated_at = now;

        if self.tasks.is_empty() {
            self.status = EvaluationStatus::Completed;
            self.completed_at = Some(now);
        }
        Ok(evaluator)
    }

    /// Stores optional answers from the post-registration questionnaire.
    pub fn record_demographics(
        &mut self,
        answers: BTreeMap<String, String>,
        now: Timestamp,
    ) -> Result<(), SessionStateError> {
        if self.status != EvaluationStatus::Registered {
            return Err(SessionStateError::DemographicsClosed {
                status: self.status,
            });
        }
        self.demographics.extend(answers);
        self.updated_at = now;
        Ok(())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Judgments
    // ─────────────────────────────────────────────────────────────────────────

    /// Records a judgment for `task_id`.
    ///
    /// Answered tasks may be revised (last write wins); otherwise only the
    /// task at the cursor may be answered.
    ///
    /// # Errors
    ///
    /// - `NotActive` outside Registered / InProgress
    /// - `UnknownTask` if the task is not in the frozen list
    /// - `TaskOutOfOrder` if earlier tasks are still unanswered
    pub fn submit_judgment(
        &mut self,
        task_id: &TaskId,
        value: SaatyValue,
        now: Timestamp,
    ) -> Result<SubmissionOutcome, SessionStateError> {
        if !self.status.accepts_judgments() {
            return Err(SessionStateError::NotActive {
                status: self.status,
            });
        }
        let evaluator = self.evaluator.clone().ok_or(SessionStateError::NotActive {
            status: self.status,
        })?;
        let index = self
            .tasks
            .iter()
            .position(|t| &t.id == task_id)
            .ok_or_else(|| SessionStateError::UnknownTask(task_id.clone()))?;
        if index > self.cursor {
            return Err(SessionStateError::TaskOutOfOrder {
                task: task_id.clone(),
                expected: self.tasks[self.cursor].id.clone(),
            });
        }

        let cursor = if index == self.cursor {
            self.cursor + 1
        } else {
            self.cursor
        };
        let session_completed = cursor == self.tasks.len();
        let next = if session_completed {
            EvaluationStatus::Completed
        } else {
            EvaluationStatus::InProgress
        };
        self.transition(next)?;

        let revised = self
            .judgments
            .insert(
                task_id.clone(),
                Judgment {
                    task_id: task_id.clone(),
                    evaluator,
                    value,
                    submitted_at: now,
                },
            )
            .is_some();
        self.cursor = cursor;
        if session_completed {
            self.completed_at = Some(now);
        }
        self.updated_at = now;

        let task = self.tasks[index].clone();
        Ok(SubmissionOutcome {
            scope_complete: self.is_scope_complete(task.scope),
            task,
            revised,
            session_completed,
            progress: self.progress(),
        })
    }

    /// True once every task of `scope` has an answer.
    pub fn is_scope_complete(&self, scope: NodeId) -> bool {
        self.tasks
            .iter()
            .filter(|t| t.scope == scope)
            .all(|t| self.judgments.contains_key(&t.id))
    }

    /// Fills a matrix for `scope` with this session's judgments.
    pub fn matrix_for(&self, scope: &ComparisonScope) -> Result<PairwiseMatrix, MatrixError> {
        PairwiseMatrix::for_scope(
            scope,
            self.tasks
                .iter()
                .filter(|t| t.scope == scope.node && t.kind == scope.kind)
                .filter_map(|t| {
                    self.judgments
                        .get(&t.id)
                        .map(|j| (t.left, t.right, j.value.value()))
                }),
        )
    }

    /// Rebuilds the comparison scope `scope` from the frozen tasks.
    ///
    /// Pairs are emitted in sibling order, so first appearance recovers the
    /// item order. Returns `None` for scopes without tasks.
    pub fn scope_of(&self, scope: NodeId) -> Option<ComparisonScope> {
        let mut kind = None;
        let mut items: Vec<NodeId> = Vec::new();
        for task in self.tasks.iter().filter(|t| t.scope == scope) {
            kind = Some(task.kind);
            for item in [task.left, task.right] {
                if !items.contains(&item) {
                    items.push(item);
                }
            }
        }
        kind.map(|kind| ComparisonScope {
            kind,
            node: scope,
            items,
        })
    }

    /// Scopes with at least one task in this session, in task order.
    pub fn scopes(&self) -> Vec<(ComparisonKind, NodeId)> {
        let mut scopes: Vec<(ComparisonKind, NodeId)> = Vec::new();
        for task in &self.tasks {
            if !scopes.contains(&(task.kind, task.scope)) {
                scopes.push((task.kind, task.scope));
            }
        }
        scopes
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Termination
    // ─────────────────────────────────────────────────────────────────────────

    /// Moves an unstarted session past its expiry to Expired.
    ///
    /// Returns true if the session expired on this call.
    pub fn expire(&mut self, now: Timestamp) -> bool {
        let unstarted = matches!(
            self.status,
            EvaluationStatus::Issued | EvaluationStatus::Registered
        );
        if !unstarted || !self.token.is_expired(&now) {
            return false;
        }
        self.status = EvaluationStatus::Expired;
        self.updated_at = now;
        true
    }

    /// Revokes the session, removing the evaluator from the study.
    pub fn abandon(&mut self, now: Timestamp) -> Result<(), SessionStateError> {
        self.transition(EvaluationStatus::Revoked)?;
        self.updated_at = now;
        Ok(())
    }

    fn transition(&mut self, target: EvaluationStatus) -> Result<(), SessionStateError> {
        if self.status == target {
            return Ok(());
        }
        self.status = self
            .status
            .transition_to(target)
            .map_err(|_| SessionStateError::InvalidTransition {
                from: self.status,
                to: target,
            })?;
        Ok(())
    }
}
