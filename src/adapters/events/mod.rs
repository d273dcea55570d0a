//! Event bus adapters.
//!
//! - `InMemoryEventBus` - In-process bus capturing events in publish order

mod in_memory;

pub use in_memory::InMemoryEventBus;
