//! Saaty's random consistency index.

/// RI(n) for n = 1..=15.
pub const RANDOM_INDEX: [f64; 15] = [
    0.0, 0.0, 0.58, 0.90, 1.12, 1.24, 1.32, 1.41, 1.45, 1.49, 1.51, 1.48, 1.56, 1.57, 1.59,
];

/// Largest matrix the consistency check supports.
pub const MAX_MATRIX_SIZE: usize = RANDOM_INDEX.len();

/// RI for an n×n matrix, or `None` outside the table.
pub fn random_index(n: usize) -> Option<f64> {
    n.checked_sub(1).and_then(|i| RANDOM_INDEX.get(i)).copied()
}
