//! Results domain events.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{domain_event, EventId, NodeId, ProjectId, Timestamp};

use super::{AggregationStrategy, GroupOutcome};

/// Published when group results are computed for a project.
///
/// Carries a summary only; the full outcome is in the result repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GroupResultsComputed {
    pub event_id: EventId,
    pub project_id: ProjectId,
    pub strategy: AggregationStrategy,
    pub evaluator_count: usize,
    pub excluded_count: usize,
    /// Heaviest alternative, if the hierarchy has any.
    pub top_alternative: Option<NodeId>,
    pub inconsistent_scopes: Vec<NodeId>,
    pub computed_at: Timestamp,
}

impl GroupResultsComputed {
    pub fn from_outcome(outcome: &GroupOutcome) -> Self {
        Self {
            event_id: EventId::new(),
            project_id: outcome.project_id,
            strategy: outcome.strategy,
            evaluator_count: outcome.evaluators.len(),
            excluded_count: outcome.excluded_sessions.len(),
            top_alternative: outcome.top_alternative(),
            inconsistent_scopes: outcome.inconsistent_scopes(),
            computed_at: outcome.computed_at,
        }
    }
}

domain_event!(
    GroupResultsComputed,
    event_type = "results.group_computed",
    aggregate_id = project_id,
    aggregate_type = "Results",
    occurred_at = computed_at,
    event_id = event_id
);
