//! Hierarchical composition of local weights into a final ranking.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::comparison::{comparison_scopes, ComparisonKind, MatrixError};
use crate::domain::foundation::NodeId;
use crate::domain::hierarchy::HierarchyModel;
use crate::domain::priority::PriorityResult;

/// A criterion's weight within its scope and relative to the goal.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CriterionWeight {
    pub criterion: NodeId,
    pub local: f64,
    pub global: f64,
}

/// One alternative in the final ranking.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedAlternative {
    /// 1-based position.
    pub rank: usize,
    pub alternative: NodeId,
    pub name: String,
    pub weight: f64,
}

/// Output of `synthesize`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Synthesis {
    /// Criteria in breadth-first order.
    pub criteria: Vec<CriterionWeight>,
    /// Alternatives sorted by weight, heaviest first.
    pub ranking: Vec<RankedAlternative>,
}

impl Synthesis {
    pub fn global_weight(&self, criterion: NodeId) -> Option<f64> {
        self.criteria
            .iter()
            .find(|c| c.criterion == criterion)
            .map(|c| c.global)
    }

    pub fn weight_of(&self, alternative: NodeId) -> Option<f64> {
        self.ranking
            .iter()
            .find(|r| r.alternative == alternative)
            .map(|r| r.weight)
    }
}

/// Composes scope results top-down from the goal.
///
/// A criterion's global weight is the product of local weights along its
/// path from the goal. An alternative's final weight is the sum, over leaf
/// criteria, of leaf global weight times its local weight under that leaf.
/// Single-item scopes need no result; their item gets local weight 1.
///
/// # Errors
///
/// - `EmptyInput` when the hierarchy has no criteria to compose over
/// - `MismatchedScopes` when a multi-item scope has no result, or the result
///   covers different items than the hierarchy
pub fn synthesize(
    hierarchy: &HierarchyModel,
    results: &HashMap<NodeId, PriorityResult>,
) -> Result<Synthesis, MatrixError> {
    if hierarchy.leaf_criteria().is_empty() {
        return Err(MatrixError::EmptyInput);
    }

    let mut global: HashMap<NodeId, f64> = HashMap::new();
    global.insert(hierarchy.goal_id(), 1.0);
    let mut criteria = Vec::new();
    let alternatives = hierarchy.alternatives();
    let mut alternative_weights = vec![0.0; alternatives.len()];

    // Scopes are breadth-first, so a parent's global weight is always known.
    for scope in comparison_scopes(hierarchy) {
        let parent_weight = global.get(&scope.node).copied().unwrap_or(0.0);
        let local = local_weights(&scope.items, scope.node, results)?;

        match scope.kind {
            ComparisonKind::CriteriaComparison => {
                for (item, l) in scope.items.iter().zip(local) {
                    let g = parent_weight * l;
                    global.insert(*item, g);
                    criteria.push(CriterionWeight {
                        criterion: *item,
                        local: l,
                        global: g,
                    });
                }
            }
            ComparisonKind::AlternativeComparison => {
                for (acc, l) in alternative_weights.iter_mut().zip(local) {
                    *acc += parent_weight * l;
                }
            }
        }
    }

    let mut ranking: Vec<RankedAlternative> = alternatives
        .iter()
        .zip(alternative_weights)
        .map(|(id, weight)| RankedAlternative {
            rank: 0,
            alternative: *id,
            name: hierarchy
                .node(*id)
                .map(|n| n.name().to_string())
                .unwrap_or_default(),
            weight,
        })
        .collect();
    // Stable sort keeps sibling order among ties.
    ranking.sort_by(|a, b| {
        b.weight
            .partial_cmp(&a.weight)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    for (i, r) in ranking.iter_mut().enumerate() {
        r.rank = i + 1;
    }

    Ok(Synthesis { criteria, ranking })
}

fn local_weights(
    items: &[NodeId],
    scope: NodeId,
    results: &HashMap<NodeId, PriorityResult>,
) -> Result<Vec<f64>, MatrixError> {
    if items.len() == 1 {
        return Ok(vec![1.0]);
    }
    let result = results
        .get(&scope)
        .ok_or_else(|| MatrixError::MismatchedScopes(format!("no result for scope {}", scope)))?;
    if result.items() != items {
        return Err(MatrixError::MismatchedScopes(format!(
            "result for scope {} covers different items",
            scope
        )));
    }
    Ok(result.vector())
}
