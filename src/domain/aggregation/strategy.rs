//! How individual evaluators are combined into one group result.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Project-wide aggregation strategy.
///
/// Chosen once through configuration; mixing strategies within a project
/// makes group results incomparable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AggregationStrategy {
    /// Weighted geometric mean of judgment matrices, then one priority run.
    #[default]
    Matrix,
    /// Weighted arithmetic mean of individual priority vectors.
    Vector,
}

impl fmt::Display for AggregationStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AggregationStrategy::Matrix => write!(f, "matrix"),
            AggregationStrategy::Vector => write!(f, "vector"),
        }
    }
}

impl FromStr for AggregationStrategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "matrix" => Ok(AggregationStrategy::Matrix),
            "vector" => Ok(AggregationStrategy::Vector),
            other => Err(ValidationError::invalid_format(
                "aggregation",
                format!("'{}' is not one of: matrix, vector", other),
            )),
        }
    }
}
