//! Storage adapters.
//!
//! - `FileHierarchyStore` - YAML hierarchy snapshots on disk
//! - `InMemory*` - Process-local repositories for tests and single runs

mod file_hierarchy_store;
mod in_memory_hierarchy_store;
mod in_memory_judgment_repository;
mod in_memory_result_repository;
mod in_memory_session_repository;

pub use file_hierarchy_store::FileHierarchyStore;
pub use in_memory_hierarchy_store::InMemoryHierarchyStore;
pub use in_memory_judgment_repository::InMemoryJudgmentRepository;
pub use in_memory_result_repository::InMemoryPriorityResultRepository;
pub use in_memory_session_repository::InMemoryEvaluationSessionRepository;
