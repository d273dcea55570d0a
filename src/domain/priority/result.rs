//! Priority vectors and consistency measures.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::NodeId;

/// Local weight of one item within its scope.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ItemWeight {
    pub item: NodeId,
    pub weight: f64,
}

/// Derived from a complete matrix; never edited directly.
///
/// A CR above the threshold is reported through `consistent`, not refused.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriorityResult {
    pub scope: NodeId,
    /// Weights in the scope's sibling order, summing to 1.
    pub weights: Vec<ItemWeight>,
    pub lambda_max: f64,
    pub consistency_index: f64,
    pub consistency_ratio: f64,
    pub consistent: bool,
}

impl PriorityResult {
    /// Result for a scope holding a single item.
    pub fn single(scope: NodeId, item: NodeId) -> Self {
        Self {
            scope,
            weights: vec![ItemWeight { item, weight: 1.0 }],
            lambda_max: 1.0,
            consistency_index: 0.0,
            consistency_ratio: 0.0,
            consistent: true,
        }
    }

    pub fn items(&self) -> Vec<NodeId> {
        self.weights.iter().map(|w| w.item).collect()
    }

    pub fn weight_of(&self, item: NodeId) -> Option<f64> {
        self.weights.iter().find(|w| w.item == item).map(|w| w.weight)
    }

    pub fn vector(&self) -> Vec<f64> {
        self.weights.iter().map(|w| w.weight).collect()
    }
}

/// The judgment that strays furthest from the derived weights.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InconsistentJudgment {
    pub left: NodeId,
    pub right: NodeId,
    /// Value currently in the matrix at [left][right].
    pub current: f64,
    /// w_left / w_right, the value fully consistent with the weights.
    pub suggested: f64,
    /// max(e, 1/e) with e = a_ij * w_j / w_i; 1 means no deviation.
    pub deviation: f64,
}
