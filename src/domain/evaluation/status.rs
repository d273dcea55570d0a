//! EvaluationStatus - lifecycle of one evaluator's session.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::StateMachine;

/// Lifecycle status of an evaluation session.
///
/// ```text
/// Issued ──► Registered ──► InProgress ──► Completed
///   │            │              │
///   ├► Expired ◄─┤              │
///   └► Revoked ◄─┴──────────────┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum EvaluationStatus {
    /// Invitation created, token not yet redeemed.
    #[default]
    Issued,
    /// Token redeemed; evaluator bound, no judgment yet.
    Registered,
    InProgress,
    Completed,
    Expired,
    Revoked,
}

impl EvaluationStatus {
    /// Returns true if judgments may be submitted.
    pub fn accepts_judgments(&self) -> bool {
        matches!(self, EvaluationStatus::Registered | EvaluationStatus::InProgress)
    }

    /// Returns true unless the session ended in Expired or Revoked.
    ///
    /// Live sessions count towards a project's completion.
    pub fn is_live(&self) -> bool {
        !matches!(self, EvaluationStatus::Expired | EvaluationStatus::Revoked)
    }
}

impl StateMachine for EvaluationStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use EvaluationStatus::*;
        matches!(
            (self, target),
            (Issued, Registered)
                | (Issued, Expired)
                | (Issued, Revoked)
                // An empty task list completes at registration.
                | (Registered, Completed)
                | (Registered, InProgress)
                | (Registered, Expired)
                | (Registered, Revoked)
                | (InProgress, Completed)
                | (InProgress, Revoked)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use EvaluationStatus::*;
        match self {
            Issued => vec![Registered, Expired, Revoked],
            Registered => vec![InProgress, Completed, Expired, Revoked],
            InProgress => vec![Completed, Revoked],
            Completed | Expired | Revoked => vec![],
        }
    }
}

impl fmt::Display for EvaluationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            EvaluationStatus::Issued => "Issued",
            EvaluationStatus::Registered => "Registered",
            EvaluationStatus::InProgress => "InProgress",
            EvaluationStatus::Completed => "Completed",
            EvaluationStatus::Expired => "Expired",
            EvaluationStatus::Revoked => "Revoked",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use EvaluationStatus::*;

    const ALL: [EvaluationStatus; 6] = [Issued, Registered, InProgress, Completed, Expired, Revoked];

    #[test]
    fn valid_transitions_agree_with_can_transition_to() {
        for from in ALL {
            for to in ALL {
                assert_eq!(
                    from.can_transition_to(&to),
                    from.valid_transitions().contains(&to),
                    "{} -> {}",
                    from,
                    to
                );
            }
        }
    }

    #[test]
    fn terminal_states() {
        assert!(Completed.is_terminal());
        assert!(Expired.is_terminal());
        assert!(Revoked.is_terminal());
        assert!(!InProgress.is_terminal());
    }

    #[test]
    fn expiry_only_before_first_judgment() {
        assert!(Issued.can_transition_to(&Expired));
        assert!(Registered.can_transition_to(&Expired));
        assert!(!InProgress.can_transition_to(&Expired));
    }

    #[test]
    fn every_non_terminal_state_can_be_revoked() {
        for status in ALL.iter().filter(|s| !s.is_terminal()) {
            assert!(status.can_transition_to(&Revoked));
        }
    }

    #[test]
    fn accepts_judgments_only_while_active() {
        assert!(Registered.accepts_judgments());
        assert!(InProgress.accepts_judgments());
        assert!(!Issued.accepts_judgments());
        assert!(!Completed.accepts_judgments());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(serde_json::to_string(&InProgress).unwrap(), "\"in_progress\"");
    }
}
