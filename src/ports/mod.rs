//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `HierarchyRepository` - Hierarchy snapshots per project
//! - `EvaluationSessionRepository` - Sessions and their invitation tokens
//! - `JudgmentRepository` - Judgments keyed by (task, evaluator)
//! - `PriorityResultRepository` - Individual and group results
//!
//! ## Event Ports
//!
//! - `EventPublisher` - Port for publishing domain events

mod evaluation_session_repository;
mod event_publisher;
mod hierarchy_repository;
mod judgment_repository;
mod priority_result_repository;

pub use evaluation_session_repository::EvaluationSessionRepository;
pub use event_publisher::EventPublisher;
pub use hierarchy_repository::HierarchyRepository;
pub use judgment_repository::JudgmentRepository;
pub use priority_result_repository::{PriorityResultRepository, ResultOwner};
