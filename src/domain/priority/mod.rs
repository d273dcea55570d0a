//! Priority module - pure numeric derivation of weights from one matrix.
//!
//! All functions are pure and stateless; no ports are involved.

mod engine;
mod random_index;
mod result;

pub use engine::{PriorityEngine, DEFAULT_CONSISTENCY_THRESHOLD};
pub use random_index::{random_index, MAX_MATRIX_SIZE, RANDOM_INDEX};
pub use result::{InconsistentJudgment, ItemWeight, PriorityResult};
