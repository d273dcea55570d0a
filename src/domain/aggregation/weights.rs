//! Evaluator weights for group aggregation.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::domain::comparison::MatrixError;
use crate::domain::foundation::EvaluatorId;

/// Relative influence of each evaluator. Unlisted evaluators weigh 1.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EvaluatorWeights {
    weights: HashMap<EvaluatorId, f64>,
}

impl EvaluatorWeights {
    /// Every evaluator counts the same.
    pub fn equal() -> Self {
        Self::default()
    }

    pub fn with_weight(mut self, evaluator: EvaluatorId, weight: f64) -> Self {
        self.weights.insert(evaluator, weight);
        self
    }

    pub fn weight_for(&self, evaluator: &EvaluatorId) -> f64 {
        self.weights.get(evaluator).copied().unwrap_or(1.0)
    }

    /// Weights for `evaluators`, normalised to sum to 1.
    ///
    /// # Errors
    ///
    /// `InvalidWeights` if any weight is negative or not finite, or if they
    /// sum to zero. `EmptyInput` for an empty evaluator list.
    pub fn normalized(&self, evaluators: &[EvaluatorId]) -> Result<Vec<f64>, MatrixError> {
        if evaluators.is_empty() {
            return Err(MatrixError::EmptyInput);
        }
        let raw: Vec<f64> = evaluators.iter().map(|e| self.weight_for(e)).collect();
        if let Some((e, w)) = evaluators
            .iter()
            .zip(&raw)
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            return Err(MatrixError::InvalidWeights(format!(
                "weight {} for evaluator {} must be finite and non-negative",
                w, e
            )));
        }
        let total: f64 = raw.iter().sum();
        if total <= 0.0 {
            return Err(MatrixError::InvalidWeights(
                "at least one evaluator needs a positive weight".to_string(),
            ));
        }
        Ok(raw.into_iter().map(|w| w / total).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ev(id: &str) -> EvaluatorId {
        EvaluatorId::new(id).unwrap()
    }

    #[test]
    fn equal_weights_split_evenly() {
        let w = EvaluatorWeights::equal().normalized(&[ev("a"), ev("b"), ev("c"), ev("d")]).unwrap();
        assert_eq!(w, vec![0.25; 4]);
    }

    #[test]
    fn explicit_weights_are_normalised() {
        let weights = EvaluatorWeights::equal().with_weight(ev("lead"), 3.0);
        let w = weights.normalized(&[ev("lead"), ev("member")]).unwrap();
        assert_eq!(w, vec![0.75, 0.25]);
    }

    #[test]
    fn negative_and_zero_totals_are_rejected() {
        let negative = EvaluatorWeights::equal().with_weight(ev("a"), -1.0);
        assert!(matches!(negative.normalized(&[ev("a")]), Err(MatrixError::InvalidWeights(_))));

        let zero = EvaluatorWeights::equal().with_weight(ev("a"), 0.0);
        assert!(matches!(zero.normalized(&[ev("a")]), Err(MatrixError::InvalidWeights(_))));
    }

    #[test]
    fn empty_list_is_empty_input() {
        assert_eq!(EvaluatorWeights::equal().normalized(&[]), Err(MatrixError::EmptyInput));
    }
}
