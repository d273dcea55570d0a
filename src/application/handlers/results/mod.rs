//! Results handlers - group aggregation and its read side.

mod compute_group_results;
mod get_group_results;

pub use compute_group_results::{ComputeGroupResultsCommand, ComputeGroupResultsHandler};
pub use get_group_results::{GetGroupResultsHandler, GetGroupResultsQuery};
