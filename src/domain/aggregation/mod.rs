//! Aggregation module - group results across evaluators.
//!
//! # Components
//!
//! - `AggregationEngine` - Combines one scope across evaluators (matrix or vector strategy)
//! - `EvaluatorWeights` - Optional per-evaluator influence
//! - `synthesize` - Composes local weights into global weights and a ranking
//! - `GroupOutcome` - Stored result of a completed study
//!
//! Like the priority module, everything here is pure; handlers do the I/O.

mod engine;
mod errors;
mod events;
mod outcome;
mod strategy;
mod synthesis;
mod weights;

pub use engine::{aggregate_matrices, aggregate_vectors, AggregationEngine, EvaluatorInput};
pub use errors::ResultsError;
pub use events::GroupResultsComputed;
pub use outcome::{GroupOutcome, GroupResults};
pub use strategy::AggregationStrategy;
pub use synthesis::{synthesize, CriterionWeight, RankedAlternative, Synthesis};
pub use weights::EvaluatorWeights;
