//! Hierarchy handlers - project creation and administrator edits.

mod create_project;
mod edit_hierarchy;

pub use create_project::{
    CreateProjectCommand, CreateProjectHandler, CreateProjectResult, ProjectBlueprint,
};
pub use edit_hierarchy::{
    EditHierarchyCommand, EditHierarchyHandler, EditHierarchyResult, HierarchyEdit,
};
