//! Hierarchy aggregate - arena of decision nodes.
//!
//! Nodes live in a single map keyed by `NodeId`; parent/child relations are
//! id references. Child ids are only ever appended by `add_node`, so a node
//! can never become its own ancestor.

use std::collections::{BTreeMap, HashMap, HashSet, VecDeque};

use crate::domain::foundation::NodeId;

use super::node::{validate_name, HierarchyNode, NodeKind, NodeRecord, MAX_LEVEL};
use super::HierarchyError;

/// Hierarchy aggregate: goal, criteria tree, and the global alternative set.
///
/// # Invariants
///
/// - exactly one Goal, at level 0, with no parent
/// - every other node has exactly one parent and `level == parent.level + 1`
/// - no node sits deeper than `MAX_LEVEL`
/// - Alternatives hang directly under the Goal and have no children
/// - Criteria hang under the Goal or under another Criterion
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HierarchyModel {
    nodes: BTreeMap<NodeId, HierarchyNode>,
    goal: NodeId,
    next_id: u64,
    version: u64,
}

impl HierarchyModel {
    /// Creates a hierarchy holding only its goal.
    pub fn new(goal_name: &str) -> Result<Self, HierarchyError> {
        let name = validate_name(goal_name)?;
        let goal = NodeId::new(0);
        let mut nodes = BTreeMap::new();
        nodes.insert(goal, HierarchyNode::new(goal, NodeKind::Goal, name, None, 0));
        Ok(Self {
            nodes,
            goal,
            next_id: 1,
            version: 1,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn goal_id(&self) -> NodeId {
        self.goal
    }

    pub fn goal(&self) -> &HierarchyNode {
        // The goal is inserted at construction and can never be deleted.
        &self.nodes[&self.goal]
    }

    /// Monotonic edit counter; bumped by every successful mutation.
    pub fn version(&self) -> u64 {
        self.version
    }

    /// Id the next `add_node` call will hand out.
    pub fn next_node_id(&self) -> NodeId {
        NodeId::new(self.next_id)
    }

    pub fn node(&self, id: NodeId) -> Option<&HierarchyNode> {
        self.nodes.get(&id)
    }

    /// Looks up a node, failing with `NotFound`.
    pub fn get(&self, id: NodeId) -> Result<&HierarchyNode, HierarchyError> {
        self.nodes.get(&id).ok_or(HierarchyError::NotFound(id))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All nodes in id (creation) order.
    pub fn nodes(&self) -> impl Iterator<Item = &HierarchyNode> {
        self.nodes.values()
    }

    /// Criterion children of `id`, in sibling order.
    pub fn criteria_children(&self, id: NodeId) -> Vec<NodeId> {
        self.children_of_kind(id, NodeKind::Criterion)
    }

    /// The global alternative set, in sibling order.
    pub fn alternatives(&self) -> Vec<NodeId> {
        self.children_of_kind(self.goal, NodeKind::Alternative)
    }

    /// True for a Criterion with no Criterion children.
    pub fn is_leaf_criterion(&self, id: NodeId) -> bool {
        matches!(self.node(id), Some(n) if n.kind() == NodeKind::Criterion)
            && self.criteria_children(id).is_empty()
    }

    /// Leaf criteria in breadth-first order.
    pub fn leaf_criteria(&self) -> Vec<NodeId> {
        self.breadth_first()
            .into_iter()
            .filter(|id| self.is_leaf_criterion(*id))
            .collect()
    }

    /// Every node, breadth-first from the goal, siblings in insertion order.
    pub fn breadth_first(&self) -> Vec<NodeId> {
        let mut order = Vec::with_capacity(self.nodes.len());
        let mut queue = VecDeque::from([self.goal]);
        while let Some(id) = queue.pop_front() {
            order.push(id);
            if let Some(node) = self.nodes.get(&id) {
                queue.extend(node.children().iter().copied());
            }
        }
        order
    }

    /// Transitive descendants of `id` in pre-order, excluding `id` itself.
    pub fn descendants(&self, id: NodeId) -> Result<Vec<NodeId>, HierarchyError> {
        let mut subtree = self.subtree(id)?;
        subtree.remove(0);
        Ok(subtree)
    }

    /// Node ids from the goal down to `id`, both included.
    pub fn path_from_goal(&self, id: NodeId) -> Result<Vec<NodeId>, HierarchyError> {
        let mut path = vec![id];
        let mut current = self.get(id)?;
        while let Some(parent) = current.parent() {
            path.push(parent);
            current = self.get(parent)?;
        }
        path.reverse();
        Ok(path)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Mutations
    // ─────────────────────────────────────────────────────────────────────────

    /// Attaches a new node as the last child of `parent`.
    ///
    /// # Errors
    ///
    /// - `InvalidParent` if `parent` does not exist
    /// - `InvalidKind` for a second Goal, any child of an Alternative, or an
    ///   Alternative anywhere but directly under the Goal
    /// - `DepthExceeded` if the node would sit below `MAX_LEVEL`
    /// - `InvalidName` for an empty or overlong name
    pub fn add_node(
        &mut self,
        parent: NodeId,
        kind: NodeKind,
        name: &str,
    ) -> Result<NodeId, HierarchyError> {
        let parent_node = self
            .nodes
            .get(&parent)
            .ok_or(HierarchyError::InvalidParent(parent))?;
        let parent_kind = parent_node.kind();
        if !Self::may_attach(kind, parent_kind) {
            return Err(HierarchyError::InvalidKind { kind, parent_kind });
        }
        let level = parent_node.level() + 1;
        if level > MAX_LEVEL {
            return Err(HierarchyError::DepthExceeded {
                level,
                max: MAX_LEVEL,
            });
        }
        let name = validate_name(name)?;

        let id = NodeId::new(self.next_id);
        self.next_id += 1;
        self.nodes
            .insert(id, HierarchyNode::new(id, kind, name, Some(parent), level));
        if let Some(p) = self.nodes.get_mut(&parent) {
            p.push_child(id);
        }
        self.version += 1;
        Ok(id)
    }

    /// Renames a node, returning the previous name.
    pub fn rename_node(&mut self, id: NodeId, name: &str) -> Result<String, HierarchyError> {
        let name = validate_name(name)?;
        let node = self.nodes.get_mut(&id).ok_or(HierarchyError::NotFound(id))?;
        let old = node.name().to_string();
        node.set_name(name);
        self.version += 1;
        Ok(old)
    }

    /// Removes `id` and its whole subtree, returning the removed ids in pre-order.
    ///
    /// The subtree is collected before anything is removed; on error the
    /// hierarchy is untouched.
    pub fn delete_node(&mut self, id: NodeId) -> Result<Vec<NodeId>, HierarchyError> {
        if id == self.goal {
            return Err(HierarchyError::CannotDeleteGoal);
        }
        let removed = self.subtree(id)?;
        let parent = self.get(id)?.parent();

        for node_id in &removed {
            self.nodes.remove(node_id);
        }
        if let Some(parent) = parent.and_then(|p| self.nodes.get_mut(&p)) {
            parent.remove_child(id);
        }
        self.version += 1;
        Ok(removed)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Flat form
    // ─────────────────────────────────────────────────────────────────────────

    /// Flattens the hierarchy to parent-pointer records in pre-order.
    pub fn flatten(&self) -> Vec<NodeRecord> {
        let mut records = Vec::with_capacity(self.nodes.len());
        let mut stack = vec![(self.goal, 0usize)];
        while let Some((id, position)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            records.push(NodeRecord {
                id,
                kind: node.kind(),
                name: node.name().to_string(),
                parent: node.parent(),
                position,
                level: node.level(),
            });
            for (index, child) in node.children().iter().enumerate().rev() {
                stack.push((*child, index));
            }
        }
        records
    }

    /// Rebuilds a hierarchy from flat records, checking every invariant.
    ///
    /// Record order does not matter; sibling order comes from `position`.
    pub fn rebuild(records: &[NodeRecord]) -> Result<Self, HierarchyError> {
        let mut by_id: HashMap<NodeId, &NodeRecord> = HashMap::with_capacity(records.len());
        for record in records {
            if by_id.insert(record.id, record).is_some() {
                return Err(HierarchyError::corrupt(format!("duplicate node id {}", record.id)));
            }
        }

        let mut goals = records.iter().filter(|r| r.kind == NodeKind::Goal);
        let goal = match (goals.next(), goals.next()) {
            (Some(goal), None) => goal,
            (None, _) => return Err(HierarchyError::corrupt("no goal node")),
            (Some(_), Some(_)) => return Err(HierarchyError::corrupt("more than one goal node")),
        };
        if goal.parent.is_some() {
            return Err(HierarchyError::corrupt("goal node has a parent"));
        }
        if goal.level != 0 {
            return Err(HierarchyError::corrupt(format!(
                "goal node records level {}",
                goal.level
            )));
        }

        let mut children: HashMap<NodeId, Vec<&NodeRecord>> = HashMap::new();
        for record in records.iter().filter(|r| r.kind != NodeKind::Goal) {
            let parent = record
                .parent
                .ok_or_else(|| HierarchyError::corrupt(format!("node {} has no parent", record.id)))?;
            let parent_record = by_id.get(&parent).ok_or_else(|| {
                HierarchyError::corrupt(format!("node {} references missing parent {}", record.id, parent))
            })?;
            if !Self::may_attach(record.kind, parent_record.kind) {
                return Err(HierarchyError::corrupt(format!(
                    "{} node {} under {} node {}",
                    record.kind, record.id, parent_record.kind, parent
                )));
            }
            children.entry(parent).or_default().push(record);
        }
        for siblings in children.values_mut() {
            siblings.sort_by_key(|r| r.position);
            if siblings.windows(2).any(|w| w[0].position == w[1].position) {
                return Err(HierarchyError::corrupt("two siblings share a position"));
            }
        }

        let name = validate_name(&goal.name)?;
        let mut nodes = BTreeMap::new();
        nodes.insert(goal.id, HierarchyNode::new(goal.id, NodeKind::Goal, name, None, 0));

        let mut queue = VecDeque::from([(goal.id, 0u8)]);
        while let Some((id, level)) = queue.pop_front() {
            let Some(siblings) = children.get(&id) else {
                continue;
            };
            let child_level = level + 1;
            for record in siblings {
                if record.level != child_level {
                    return Err(HierarchyError::corrupt(format!(
                        "node {} records level {} but sits at level {}",
                        record.id, record.level, child_level
                    )));
                }
                if child_level > MAX_LEVEL {
                    return Err(HierarchyError::DepthExceeded {
                        level: child_level,
                        max: MAX_LEVEL,
                    });
                }
                let name = validate_name(&record.name)?;
                nodes.insert(
                    record.id,
                    HierarchyNode::new(record.id, record.kind, name, Some(id), child_level),
                );
                if let Some(parent) = nodes.get_mut(&id) {
                    parent.push_child(record.id);
                }
                queue.push_back((record.id, child_level));
            }
        }

        if nodes.len() != records.len() {
            return Err(HierarchyError::corrupt("some nodes are unreachable from the goal"));
        }

        let next_id = nodes.keys().map(|id| id.value() + 1).max().unwrap_or(1);
        Ok(Self {
            nodes,
            goal: goal.id,
            next_id,
            version: 1,
        })
    }

    /// Same node set, same parent/child edges and child order, same levels and names.
    pub fn structurally_eq(&self, other: &HierarchyModel) -> bool {
        self.goal == other.goal && self.nodes == other.nodes
    }

    pub(crate) fn restore_counters(&mut self, next_id: u64, version: u64) {
        self.next_id = self.next_id.max(next_id);
        self.version = version;
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Private helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn may_attach(kind: NodeKind, parent_kind: NodeKind) -> bool {
        matches!(
            (kind, parent_kind),
            (NodeKind::Criterion, NodeKind::Goal)
                | (NodeKind::Criterion, NodeKind::Criterion)
                | (NodeKind::Alternative, NodeKind::Goal)
        )
    }

    fn children_of_kind(&self, id: NodeId, kind: NodeKind) -> Vec<NodeId> {
        self.nodes
            .get(&id)
            .map(|node| {
                node.children()
                    .iter()
                    .copied()
                    .filter(|c| self.nodes.get(c).map(|n| n.kind()) == Some(kind))
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `id` followed by all its descendants, pre-order.
    fn subtree(&self, id: NodeId) -> Result<Vec<NodeId>, HierarchyError> {
        self.get(id)?;
        let mut seen = HashSet::new();
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            if !seen.insert(current) {
                continue;
            }
            out.push(current);
            if let Some(node) = self.nodes.get(&current) {
                stack.extend(node.children().iter().rev().copied());
            }
        }
        Ok(out)
    }
}
