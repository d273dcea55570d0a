//! Hierarchy module - the decision tree and its structural invariants.
//!
//! # Shape
//!
//! ```text
//! Goal (level 0)
//! ├── Criterion ── Criterion ... (up to level 5)
//! ├── Criterion
//! ├── Alternative   (global set, directly under the goal)
//! └── Alternative
//! ```
//!
//! # Events
//!
//! - `HierarchyChanged` - Published after every successful edit

mod errors;
mod events;
mod model;
mod node;
mod snapshot;
mod template;

pub use errors::{HierarchyCommandError, HierarchyError};
pub use events::{HierarchyChange, HierarchyChanged};
pub use model::HierarchyModel;
pub use node::{HierarchyNode, NodeKind, NodeRecord, MAX_LEVEL, MAX_NAME_LENGTH};
pub use snapshot::HierarchySnapshot;
pub use template::HierarchyTemplate;
