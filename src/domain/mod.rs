//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, errors, events)
//! - `hierarchy` - Decision tree and its structural invariants
//! - `comparison` - Task generation, judgment scale, pairwise matrices
//! - `priority` - Priority vectors and consistency from one matrix
//! - `aggregation` - Group results across evaluators and final synthesis
//! - `evaluation` - Invitations and the per-evaluator session state machine

pub mod aggregation;
pub mod comparison;
pub mod evaluation;
pub mod foundation;
pub mod hierarchy;
pub mod priority;
