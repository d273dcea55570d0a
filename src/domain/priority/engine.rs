//! Priority engine - row geometric mean weights and Saaty consistency.
//!
//! # Algorithm
//!
//! - `w_i = (Π_j a_ij)^(1/n)`, normalised so Σ w = 1
//! - `λmax = mean_i((A·w)_i / w_i)`
//! - `CI = (λmax − n) / (n − 1)`, zero for n ≤ 2
//! - `CR = CI / RI(n)`
//!
//! Closed form only: the same matrix always yields bit-identical weights.

use crate::domain::comparison::{MatrixError, PairwiseMatrix};
use crate::domain::foundation::NodeId;

use super::random_index::{random_index, MAX_MATRIX_SIZE};
use super::result::{InconsistentJudgment, ItemWeight, PriorityResult};

/// Accepted consistency ratio ceiling.
pub const DEFAULT_CONSISTENCY_THRESHOLD: f64 = 0.10;

/// Stateless apart from the configured CR threshold.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PriorityEngine {
    threshold: f64,
}

impl PriorityEngine {
    pub fn new(threshold: f64) -> Self {
        Self { threshold }
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Computes the priority vector and consistency of a complete matrix.
    ///
    /// # Errors
    ///
    /// - `IncompleteMatrix` if any pair is unanswered
    /// - `DegenerateMatrix` if an entry is not positive
    /// - `UnsupportedSize` for empty or larger than 15×15 matrices
    pub fn compute(&self, scope: NodeId, matrix: &PairwiseMatrix) -> Result<PriorityResult, MatrixError> {
        let dense = matrix.to_dense()?;
        self.compute_dense(scope, matrix.items(), &dense)
    }

    /// Same as `compute`, over already dense values.
    pub fn compute_dense(
        &self,
        scope: NodeId,
        items: &[NodeId],
        values: &[Vec<f64>],
    ) -> Result<PriorityResult, MatrixError> {
        let n = items.len();
        if n == 0 || n > MAX_MATRIX_SIZE {
            return Err(MatrixError::UnsupportedSize(n));
        }
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(MatrixError::MismatchedScopes(format!("expected a {}x{} matrix", n, n)));
        }
        for (i, row) in values.iter().enumerate() {
            for (j, v) in row.iter().enumerate() {
                if i != j && (!v.is_finite() || *v <= 0.0) {
                    return Err(MatrixError::DegenerateMatrix { row: i, col: j });
                }
            }
        }

        let weights = geometric_mean_weights(values);

        let (lambda_max, ci) = if n <= 2 {
            (n as f64, 0.0)
        } else {
            let lambda = values
                .iter()
                .zip(&weights)
                .map(|(row, w_i)| {
                    let aw: f64 = row.iter().zip(&weights).map(|(a, w)| a * w).sum();
                    aw / w_i
                })
                .sum::<f64>()
                / n as f64;
            (lambda, ((lambda - n as f64) / (n as f64 - 1.0)).max(0.0))
        };
        let cr = match random_index(n) {
            Some(ri) if ri > 0.0 => ci / ri,
            _ => 0.0,
        };

        Ok(PriorityResult {
            scope,
            weights: items
                .iter()
                .zip(weights)
                .map(|(item, weight)| ItemWeight { item: *item, weight })
                .collect(),
            lambda_max,
            consistency_index: ci,
            consistency_ratio: cr,
            consistent: cr <= self.threshold,
        })
    }

    /// Finds the judgment contributing most to inconsistency.
    ///
    /// Returns `None` for matrices of size 2 or less, which are always consistent.
    pub fn most_inconsistent_judgment(
        &self,
        matrix: &PairwiseMatrix,
        result: &PriorityResult,
    ) -> Result<Option<InconsistentJudgment>, MatrixError> {
        let dense = matrix.to_dense()?;
        let n = matrix.size();
        if n <= 2 {
            return Ok(None);
        }
        let weights = result.vector();
        if weights.len() != n {
            return Err(MatrixError::MismatchedScopes(
                "result does not belong to this matrix".to_string(),
            ));
        }

        let mut worst: Option<InconsistentJudgment> = None;
        for i in 0..n {
            for j in (i + 1)..n {
                let e = dense[i][j] * weights[j] / weights[i];
                let deviation = e.max(1.0 / e);
                if worst.map_or(true, |w| deviation > w.deviation) {
                    worst = Some(InconsistentJudgment {
                        left: matrix.items()[i],
                        right: matrix.items()[j],
                        current: dense[i][j],
                        suggested: weights[i] / weights[j],
                        deviation,
                    });
                }
            }
        }
        Ok(worst)
    }
}

impl Default for PriorityEngine {
    fn default() -> Self {
        Self::new(DEFAULT_CONSISTENCY_THRESHOLD)
    }
}

/// Normalised row geometric means.
fn geometric_mean_weights(values: &[Vec<f64>]) -> Vec<f64> {
    let n = values.len() as f64;
    let means: Vec<f64> = values
        .iter()
        .map(|row| row.iter().product::<f64>().powf(1.0 / n))
        .collect();
    let total: f64 = means.iter().sum();
    means.into_iter().map(|m| m / total).collect()
}
