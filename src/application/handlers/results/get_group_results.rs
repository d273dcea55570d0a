//! GetGroupResultsHandler - Query handler for the results view.
//!
//! Never computes anything. Reports `Pending` until every live session is
//! complete and an outcome has been stored that is newer than the last
//! completion and was composed over the current hierarchy version.

use std::sync::Arc;
use tracing::debug;

use crate::domain::aggregation::{GroupResults, ResultsError};
use crate::domain::evaluation::EvaluationStatus;
use crate::domain::foundation::ProjectId;
use crate::ports::{EvaluationSessionRepository, HierarchyRepository, PriorityResultRepository};

/// Query for a project's group results.
#[derive(Debug, Clone)]
pub struct GetGroupResultsQuery {
    pub project_id: ProjectId,
}

/// Handler for group results queries.
pub struct GetGroupResultsHandler {
    hierarchies: Arc<dyn HierarchyRepository>,
    sessions: Arc<dyn EvaluationSessionRepository>,
    results: Arc<dyn PriorityResultRepository>,
}

impl GetGroupResultsHandler {
    pub fn new(
        hierarchies: Arc<dyn HierarchyRepository>,
        sessions: Arc<dyn EvaluationSessionRepository>,
        results: Arc<dyn PriorityResultRepository>,
    ) -> Self {
        Self {
            hierarchies,
            sessions,
            results,
        }
    }

    pub async fn handle(&self, query: GetGroupResultsQuery) -> Result<GroupResults, ResultsError> {
        let version = self
            .hierarchies
            .load(&query.project_id)
            .await?
            .ok_or(ResultsError::ProjectNotFound(query.project_id))?
            .version;

        let live: Vec<_> = self
            .sessions
            .find_by_project(&query.project_id)
            .await?
            .into_iter()
            .filter(|s| s.status().is_live())
            .collect();
        if live.is_empty() {
            return Err(ResultsError::NotAvailable(query.project_id));
        }

        let completed = live
            .iter()
            .filter(|s| s.status() == EvaluationStatus::Completed)
            .count();
        let pending = GroupResults::Pending {
            completed,
            total: live.len(),
        };
        if completed < live.len() {
            return Ok(pending);
        }

        let last_completion = live.iter().filter_map(|s| s.completed_at()).max();
        match self.results.find_outcome(&query.project_id).await? {
            Some(outcome)
                if outcome.hierarchy_version == version
                    && last_completion.map_or(true, |t| *t <= outcome.computed_at) =>
            {
                Ok(GroupResults::Available(Box::new(outcome)))
            }
            Some(outcome) => {
                debug!(
                    project_id = %query.project_id,
                    outcome_version = outcome.hierarchy_version,
                    current_version = version,
                    "Stored group results are stale"
                );
                Ok(pending)
            }
            None => Ok(pending),
        }
    }
}
