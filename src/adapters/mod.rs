//! Adapters - Implementations of ports for specific technologies.
//!
//! - `events` - Event publishing
//! - `storage` - Hierarchy snapshots, sessions, judgments and results

pub mod events;
pub mod storage;

pub use events::InMemoryEventBus;
pub use storage::{
    FileHierarchyStore, InMemoryEvaluationSessionRepository, InMemoryHierarchyStore,
    InMemoryJudgmentRepository, InMemoryPriorityResultRepository,
};
