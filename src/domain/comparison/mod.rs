//! Comparison module - what an evaluator must compare, and how answers are stored.
//!
//! # Components
//!
//! - `generate_tasks` - Ordered pairwise tasks derived from a hierarchy
//! - `SaatyValue` / `JudgmentScale` - The reciprocal 1/9 .. 9 scale
//! - `PairwiseMatrix` - Reciprocal matrix over one scope
//!
//! Generation is pure and deterministic; no ids are random.

mod errors;
mod generator;
mod matrix;
mod scale;
mod task;

pub use errors::MatrixError;
pub use generator::{comparison_scopes, expected_task_count, generate_tasks, scope_tasks};
pub use matrix::PairwiseMatrix;
pub use scale::{JudgmentScale, SaatyValue};
pub use task::{pair_count, ComparisonKind, ComparisonScope, ComparisonTask, TaskId};
