//! Comparison task generation.
//!
//! Pure functions from a hierarchy to the ordered list of scopes and tasks an
//! evaluator must work through. The order is a contract: evaluator UIs show
//! "comparison N of T" from it, and sessions index matrices by it.

use crate::domain::hierarchy::HierarchyModel;

use super::task::{pair_count, ComparisonKind, ComparisonScope, ComparisonTask};

/// Every scope of the hierarchy, breadth-first from the goal.
///
/// A node with at least one Criterion child yields a criteria scope over
/// those children; a leaf criterion yields an alternative scope over the
/// global alternative set. Single-item scopes are included (their only item
/// gets local weight 1) but produce no tasks.
pub fn comparison_scopes(hierarchy: &HierarchyModel) -> Vec<ComparisonScope> {
    let alternatives = hierarchy.alternatives();
    let mut scopes = Vec::new();
    for id in hierarchy.breadth_first() {
        let criteria = hierarchy.criteria_children(id);
        if !criteria.is_empty() {
            scopes.push(ComparisonScope {
                kind: ComparisonKind::CriteriaComparison,
                node: id,
                items: criteria,
            });
        } else if hierarchy.is_leaf_criterion(id) && !alternatives.is_empty() {
            scopes.push(ComparisonScope {
                kind: ComparisonKind::AlternativeComparison,
                node: id,
                items: alternatives.clone(),
            });
        }
    }
    scopes
}

/// All pairwise tasks: scopes breadth-first, pairs (i < j) in sibling order.
pub fn generate_tasks(hierarchy: &HierarchyModel) -> Vec<ComparisonTask> {
    comparison_scopes(hierarchy)
        .iter()
        .flat_map(scope_tasks)
        .collect()
}

/// The tasks of a single scope.
pub fn scope_tasks(scope: &ComparisonScope) -> Vec<ComparisonTask> {
    let mut tasks = Vec::with_capacity(scope.pair_count());
    for (i, left) in scope.items.iter().enumerate() {
        for right in &scope.items[i + 1..] {
            tasks.push(ComparisonTask::new(scope.kind, scope.node, *left, *right));
        }
    }
    tasks
}

/// Σ C(c(N), 2) over criteria scopes + k · C(m, 2), computed from the shape alone.
pub fn expected_task_count(hierarchy: &HierarchyModel) -> usize {
    let criteria: usize = hierarchy
        .nodes()
        .map(|n| pair_count(hierarchy.criteria_children(n.id()).len()))
        .sum();
    let leaves = hierarchy.leaf_criteria().len();
    criteria + leaves * pair_count(hierarchy.alternatives().len())
}
