//! Decision nodes and their flat storage form.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::{NodeId, ValidationError};

/// Maximum level a node may sit at (Goal is level 0).
pub const MAX_LEVEL: u8 = 5;

/// Maximum length of a node name, after trimming.
pub const MAX_NAME_LENGTH: usize = 200;

/// Role a node plays in the decision hierarchy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeKind {
    Goal,
    Criterion,
    Alternative,
}

impl fmt::Display for NodeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            NodeKind::Goal => "Goal",
            NodeKind::Criterion => "Criterion",
            NodeKind::Alternative => "Alternative",
        };
        write!(f, "{}", s)
    }
}

/// A node in the hierarchy arena.
///
/// `parent` is a back-reference for traversal only; ownership lives in the
/// arena and in the parent's ordered `children` list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HierarchyNode {
    id: NodeId,
    kind: NodeKind,
    name: String,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    level: u8,
}

impl HierarchyNode {
    pub(crate) fn new(
        id: NodeId,
        kind: NodeKind,
        name: String,
        parent: Option<NodeId>,
        level: u8,
    ) -> Self {
        Self {
            id,
            kind,
            name,
            parent,
            children: Vec::new(),
            level,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    /// Child ids in insertion (sibling) order.
    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    pub fn level(&self) -> u8 {
        self.level
    }

    pub fn is_goal(&self) -> bool {
        self.kind == NodeKind::Goal
    }

    pub(crate) fn set_name(&mut self, name: String) {
        self.name = name;
    }

    pub(crate) fn push_child(&mut self, child: NodeId) {
        self.children.push(child);
    }

    pub(crate) fn remove_child(&mut self, child: NodeId) {
        self.children.retain(|c| *c != child);
    }
}

/// One row of a flattened hierarchy: a parent-pointer record.
///
/// `position` is the index of the node in its parent's child list, which
/// lets a rebuild restore sibling order whatever order the rows arrive in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeRecord {
    pub id: NodeId,
    pub kind: NodeKind,
    pub name: String,
    pub parent: Option<NodeId>,
    pub position: usize,
    pub level: u8,
}

/// Normalizes and validates a node name.
pub(crate) fn validate_name(name: &str) -> Result<String, ValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field("name"));
    }
    let length = trimmed.chars().count();
    if length > MAX_NAME_LENGTH {
        return Err(ValidationError::out_of_range(
            "name_length",
            1,
            MAX_NAME_LENGTH as i64,
            length as i64,
        ));
    }
    Ok(trimmed.to_string())
}
