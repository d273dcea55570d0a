//! Reciprocal pairwise comparison matrix over one scope.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::NodeId;

use super::{ComparisonScope, MatrixError};

/// Square reciprocal matrix indexed by the scope's sibling order.
///
/// Placing a value at `[i][j]` always places its reciprocal at `[j][i]`;
/// the diagonal is fixed at 1. Unanswered cells are `None`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairwiseMatrix {
    items: Vec<NodeId>,
    cells: Vec<Vec<Option<f64>>>,
}

impl PairwiseMatrix {
    /// An empty matrix: only the diagonal is filled.
    pub fn new(items: Vec<NodeId>) -> Self {
        let n = items.len();
        let cells = (0..n)
            .map(|i| (0..n).map(|j| if i == j { Some(1.0) } else { None }).collect())
            .collect();
        Self { items, cells }
    }

    /// Builds a matrix for `scope` from `(left, right, value)` judgments.
    pub fn for_scope<I>(scope: &ComparisonScope, judgments: I) -> Result<Self, MatrixError>
    where
        I: IntoIterator<Item = (NodeId, NodeId, f64)>,
    {
        let mut matrix = Self::new(scope.items.clone());
        for (left, right, value) in judgments {
            matrix.set(left, right, value)?;
        }
        Ok(matrix)
    }

    /// Builds a complete matrix from dense values, checking reciprocity inputs.
    ///
    /// Only the upper triangle is read; the lower one is derived from it.
    pub fn from_dense(items: Vec<NodeId>, values: &[Vec<f64>]) -> Result<Self, MatrixError> {
        let n = items.len();
        if values.len() != n || values.iter().any(|row| row.len() != n) {
            return Err(MatrixError::MismatchedScopes(format!(
                "expected a {}x{} matrix",
                n, n
            )));
        }
        let mut matrix = Self::new(items);
        for i in 0..n {
            for j in (i + 1)..n {
                matrix.set_index(i, j, values[i][j])?;
            }
        }
        Ok(matrix)
    }

    pub fn items(&self) -> &[NodeId] {
        &self.items
    }

    pub fn size(&self) -> usize {
        self.items.len()
    }

    pub fn index_of(&self, item: NodeId) -> Option<usize> {
        self.items.iter().position(|i| *i == item)
    }

    /// Records a judgment of `left` over `right` and its reciprocal.
    pub fn set(&mut self, left: NodeId, right: NodeId, value: f64) -> Result<(), MatrixError> {
        let i = self.index_of(left).ok_or(MatrixError::UnknownItem(left))?;
        let j = self.index_of(right).ok_or(MatrixError::UnknownItem(right))?;
        self.set_index(i, j, value)
    }

    fn set_index(&mut self, i: usize, j: usize, value: f64) -> Result<(), MatrixError> {
        if i == j {
            return Err(MatrixError::DegenerateMatrix { row: i, col: j });
        }
        if !value.is_finite() || value <= 0.0 {
            return Err(MatrixError::DegenerateMatrix { row: i, col: j });
        }
        self.cells[i][j] = Some(value);
        self.cells[j][i] = Some(1.0 / value);
        Ok(())
    }

    pub fn get(&self, i: usize, j: usize) -> Option<f64> {
        self.cells.get(i).and_then(|row| row.get(j)).copied().flatten()
    }

    /// Unanswered pairs (i < j), as item ids.
    pub fn missing_pairs(&self) -> Vec<(NodeId, NodeId)> {
        let n = self.size();
        let mut missing = Vec::new();
        for i in 0..n {
            for j in (i + 1)..n {
                if self.cells[i][j].is_none() {
                    missing.push((self.items[i], self.items[j]));
                }
            }
        }
        missing
    }

    pub fn is_complete(&self) -> bool {
        self.missing_pairs().is_empty()
    }

    /// Dense values; fails with `IncompleteMatrix` while any pair is unanswered.
    pub fn to_dense(&self) -> Result<Vec<Vec<f64>>, MatrixError> {
        let missing = self.missing_pairs().len();
        if missing > 0 {
            return Err(MatrixError::IncompleteMatrix { missing });
        }
        Ok(self
            .cells
            .iter()
            .map(|row| row.iter().map(|c| c.unwrap_or(1.0)).collect())
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::comparison::ComparisonKind;
    use proptest::prelude::*;

    fn ids(n: u64) -> Vec<NodeId> {
        (1..=n).map(NodeId::new).collect()
    }

    fn scope(n: u64) -> ComparisonScope {
        ComparisonScope {
            kind: ComparisonKind::CriteriaComparison,
            node: NodeId::new(0),
            items: ids(n),
        }
    }

    #[test]
    fn new_matrix_has_unit_diagonal_only() {
        let m = PairwiseMatrix::new(ids(3));
        for i in 0..3 {
            assert_eq!(m.get(i, i), Some(1.0));
        }
        assert_eq!(m.missing_pairs().len(), 3);
        assert!(!m.is_complete());
    }

    #[test]
    fn set_places_reciprocal() {
        let mut m = PairwiseMatrix::new(ids(2));
        m.set(NodeId::new(1), NodeId::new(2), 5.0).unwrap();
        assert_eq!(m.get(0, 1), Some(5.0));
        assert_eq!(m.get(1, 0), Some(0.2));
        assert!(m.is_complete());
    }

    #[test]
    fn set_in_reverse_orientation_fills_same_pair() {
        let mut m = PairwiseMatrix::new(ids(2));
        m.set(NodeId::new(2), NodeId::new(1), 3.0).unwrap();
        assert_eq!(m.get(0, 1), Some(1.0 / 3.0));
    }

    #[test]
    fn set_rejects_unknown_and_non_positive() {
        let mut m = PairwiseMatrix::new(ids(2));
        assert_eq!(
            m.set(NodeId::new(9), NodeId::new(1), 3.0),
            Err(MatrixError::UnknownItem(NodeId::new(9)))
        );
        assert!(matches!(
            m.set(NodeId::new(1), NodeId::new(2), 0.0),
            Err(MatrixError::DegenerateMatrix { .. })
        ));
        assert!(matches!(
            m.set(NodeId::new(1), NodeId::new(2), -1.0),
            Err(MatrixError::DegenerateMatrix { .. })
        ));
    }

    #[test]
    fn to_dense_reports_missing_count() {
        let mut m = PairwiseMatrix::new(ids(3));
        m.set(NodeId::new(1), NodeId::new(2), 3.0).unwrap();
        assert_eq!(m.to_dense(), Err(MatrixError::IncompleteMatrix { missing: 2 }));
    }

    #[test]
    fn for_scope_collects_judgments() {
        let m = PairwiseMatrix::for_scope(
            &scope(3),
            vec![
                (NodeId::new(1), NodeId::new(2), 3.0),
                (NodeId::new(1), NodeId::new(3), 5.0),
                (NodeId::new(2), NodeId::new(3), 2.0),
            ],
        )
        .unwrap();
        assert!(m.is_complete());
        assert_eq!(m.get(2, 1), Some(0.5));
    }

    #[test]
    fn from_dense_rejects_wrong_shape() {
        let result = PairwiseMatrix::from_dense(ids(2), &[vec![1.0, 2.0]]);
        assert!(matches!(result, Err(MatrixError::MismatchedScopes(_))));
    }

    proptest! {
        #[test]
        fn complete_matrices_are_reciprocal(
            values in proptest::collection::vec(
                proptest::sample::select(vec![1.0/9.0, 1.0/7.0, 1.0/5.0, 1.0/3.0, 1.0, 3.0, 5.0, 7.0, 9.0]),
                10
            )
        ) {
            // 5 items -> 10 pairs
            let items = ids(5);
            let mut m = PairwiseMatrix::new(items.clone());
            let mut k = 0;
            for i in 0..5 {
                for j in (i + 1)..5 {
                    m.set(items[i], items[j], values[k]).unwrap();
                    k += 1;
                }
            }
            let dense = m.to_dense().unwrap();
            for i in 0..5 {
                prop_assert_eq!(dense[i][i], 1.0);
                for j in 0..5 {
                    prop_assert!((dense[i][j] - 1.0 / dense[j][i]).abs() < 1e-12);
                }
            }
        }
    }
}
