//! Group aggregation of one scope across evaluators.

use crate::domain::comparison::{MatrixError, PairwiseMatrix};
use crate::domain::foundation::{EvaluatorId, NodeId};
use crate::domain::priority::{ItemWeight, PriorityEngine, PriorityResult};

use super::{AggregationStrategy, EvaluatorWeights};

/// One evaluator's completed work on a scope.
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluatorInput {
    pub evaluator: EvaluatorId,
    pub matrix: PairwiseMatrix,
    pub result: PriorityResult,
}

/// Combines per-evaluator matrices or vectors with the configured strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct AggregationEngine {
    strategy: AggregationStrategy,
    priority: PriorityEngine,
}

impl AggregationEngine {
    pub fn new(strategy: AggregationStrategy, priority: PriorityEngine) -> Self {
        Self { strategy, priority }
    }

    pub fn strategy(&self) -> AggregationStrategy {
        self.strategy
    }

    /// Engine used for individual and matrix-aggregated results.
    pub fn priority(&self) -> &PriorityEngine {
        &self.priority
    }

    /// Group priority result for `scope`.
    ///
    /// # Errors
    ///
    /// - `EmptyInput` when no evaluator contributed
    /// - `MismatchedScopes` when inputs disagree on the compared items
    /// - `InvalidWeights` for unusable evaluator weights
    pub fn aggregate(
        &self,
        scope: NodeId,
        inputs: &[EvaluatorInput],
        weights: &EvaluatorWeights,
    ) -> Result<PriorityResult, MatrixError> {
        let evaluators: Vec<EvaluatorId> = inputs.iter().map(|i| i.evaluator.clone()).collect();
        let w = weights.normalized(&evaluators)?;

        match self.strategy {
            AggregationStrategy::Matrix => {
                let matrices: Vec<&PairwiseMatrix> = inputs.iter().map(|i| &i.matrix).collect();
                let combined = aggregate_matrices(&matrices, &w)?;
                self.priority.compute(scope, &combined)
            }
            AggregationStrategy::Vector => {
                let results: Vec<&PriorityResult> = inputs.iter().map(|i| &i.result).collect();
                aggregate_vectors(scope, &results, &w, self.priority.threshold())
            }
        }
    }
}

/// Element-wise weighted geometric mean: `a_ij = Π_k a_ij(k)^w_k`.
///
/// `weights` must already be normalised. The result stays reciprocal since
/// `Π (1/a)^w = 1 / Π a^w`.
pub fn aggregate_matrices(
    matrices: &[&PairwiseMatrix],
    weights: &[f64],
) -> Result<PairwiseMatrix, MatrixError> {
    let first = matrices.first().ok_or(MatrixError::EmptyInput)?;
    if matrices.len() != weights.len() {
        return Err(MatrixError::InvalidWeights(format!(
            "{} weights for {} matrices",
            weights.len(),
            matrices.len()
        )));
    }
    let items = first.items().to_vec();
    if matrices.iter().any(|m| m.items() != items.as_slice()) {
        return Err(MatrixError::MismatchedScopes(
            "matrices are indexed by different items".to_string(),
        ));
    }

    let dense = matrices
        .iter()
        .map(|m| m.to_dense())
        .collect::<Result<Vec<_>, _>>()?;

    let n = items.len();
    let mut values = vec![vec![1.0; n]; n];
    for i in 0..n {
        for j in (i + 1)..n {
            let log_mean: f64 = dense
                .iter()
                .zip(weights)
                .map(|(m, w)| w * m[i][j].ln())
                .sum();
            values[i][j] = log_mean.exp();
            values[j][i] = 1.0 / values[i][j];
        }
    }
    PairwiseMatrix::from_dense(items, &values)
}

/// Weighted arithmetic mean of priority vectors, renormalised to sum to 1.
///
/// λmax, CI and CR of the group are the same weighted means of the
/// individual measures.
pub fn aggregate_vectors(
    scope: NodeId,
    results: &[&PriorityResult],
    weights: &[f64],
    threshold: f64,
) -> Result<PriorityResult, MatrixError> {
    let first = results.first().ok_or(MatrixError::EmptyInput)?;
    if results.len() != weights.len() {
        return Err(MatrixError::InvalidWeights(format!(
            "{} weights for {} results",
            weights.len(),
            results.len()
        )));
    }
    let items = first.items();
    if results.iter().any(|r| r.items() != items) {
        return Err(MatrixError::MismatchedScopes(
            "priority vectors cover different items".to_string(),
        ));
    }

    let mut sums = vec![0.0; items.len()];
    for (result, w) in results.iter().zip(weights) {
        for (sum, item) in sums.iter_mut().zip(&result.weights) {
            *sum += w * item.weight;
        }
    }
    let total: f64 = sums.iter().sum();
    if total <= 0.0 {
        return Err(MatrixError::InvalidWeights("weighted vectors sum to zero".to_string()));
    }

    let mean = |f: fn(&PriorityResult) -> f64| -> f64 {
        results.iter().zip(weights).map(|(r, w)| w * f(r)).sum()
    };
    let consistency_ratio = mean(|r| r.consistency_ratio);

    Ok(PriorityResult {
        scope,
        weights: items
            .into_iter()
            .zip(sums)
            .map(|(item, s)| ItemWeight { item, weight: s / total })
            .collect(),
        lambda_max: mean(|r| r.lambda_max),
        consistency_index: mean(|r| r.consistency_index),
        consistency_ratio,
        consistent: consistency_ratio <= threshold,
    })
}
