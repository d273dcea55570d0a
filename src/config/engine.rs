//! Engine configuration

use serde::Deserialize;

use crate::domain::aggregation::{AggregationEngine, AggregationStrategy};
use crate::domain::comparison::JudgmentScale;
use crate::domain::priority::{PriorityEngine, DEFAULT_CONSISTENCY_THRESHOLD};

use super::error::ValidationError;

/// Numeric engine settings, fixed for the lifetime of a project
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct EngineConfig {
    /// Group aggregation strategy (`matrix` or `vector`)
    #[serde(default)]
    pub aggregation: AggregationStrategy,

    /// Highest CR still reported as consistent
    #[serde(default = "default_consistency_threshold")]
    pub consistency_threshold: f64,

    /// Admit 2, 4, 6, 8 and their reciprocals
    #[serde(default = "default_allow_intermediate")]
    pub allow_intermediate_values: bool,
}

fn default_consistency_threshold() -> f64 {
    DEFAULT_CONSISTENCY_THRESHOLD
}

fn default_allow_intermediate() -> bool {
    true
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            aggregation: AggregationStrategy::default(),
            consistency_threshold: default_consistency_threshold(),
            allow_intermediate_values: default_allow_intermediate(),
        }
    }
}

impl EngineConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        let t = self.consistency_threshold;
        if !(t > 0.0 && t <= 1.0) {
            return Err(ValidationError::InvalidConsistencyThreshold(t));
        }
        Ok(())
    }

    pub fn priority_engine(&self) -> PriorityEngine {
        PriorityEngine::new(self.consistency_threshold)
    }

    pub fn aggregation_engine(&self) -> AggregationEngine {
        AggregationEngine::new(self.aggregation, self.priority_engine())
    }

    pub fn judgment_scale(&self) -> JudgmentScale {
        JudgmentScale::new(self.allow_intermediate_values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = EngineConfig::default();
        assert_eq!(config.aggregation, AggregationStrategy::Matrix);
        assert_eq!(config.consistency_threshold, 0.10);
        assert!(config.judgment_scale().allows_intermediate());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn threshold_bounds() {
        for bad in [0.0, -0.1, 1.5, f64::NAN] {
            let config = EngineConfig {
                consistency_threshold: bad,
                ..EngineConfig::default()
            };
            assert!(config.validate().is_err(), "{} accepted", bad);
        }
        let edge = EngineConfig {
            consistency_threshold: 1.0,
            ..EngineConfig::default()
        };
        assert!(edge.validate().is_ok());
    }

    #[test]
    fn deserializes_with_partial_fields() {
        let config: EngineConfig = serde_json::from_str(r#"{"aggregation": "vector"}"#).unwrap();
        assert_eq!(config.aggregation, AggregationStrategy::Vector);
        assert!(config.allow_intermediate_values);
        assert_eq!(config.aggregation_engine().strategy(), AggregationStrategy::Vector);
    }
}
