use desc_core::DescResult;

use crate::config::{EvalConfig, DEFAULT_CONFIDENT_DISTANCE};
use crate::evaluator::MatchEvaluator;
use crate::tiers::{DistanceTiers, DEFAULT_TIERS};

/// Builder for creating a `MatchEvaluator`
#[derive(Debug, Clone)]
pub struct EvaluatorBuilder {
    tiers: Vec<f32>,
    confident_distance: f32,
    name: Option<String>,
}

impl Default for EvaluatorBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EvaluatorBuilder {
    /// Create a new builder with default settings
    pub fn new() -> Self {
        Self {
            tiers: DEFAULT_TIERS.to_vec(),
            confident_distance: DEFAULT_CONFIDENT_DISTANCE,
            name: None,
        }
    }

    /// Set the ascending distance thresholds
    pub fn tiers(mut self, tiers: Vec<f32>) -> Self {
        self.tiers = tiers;
        self
    }

    /// Set the high-confidence distance used for visualization
    pub fn confident_distance(mut self, distance: f32) -> Self {
        self.confident_distance = distance;
        self
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Build the `MatchEvaluator`, validating the settings
    pub fn build(self) -> DescResult<MatchEvaluator> {
        let config = self.to_config();
        config.validate()?;
        let tiers = DistanceTiers::new(config.tiers.clone())?;
        Ok(MatchEvaluator { tiers, config })
    }

    /// Generate a summary of the builder's configuration
    pub fn summary(&self) -> String {
        self.clone().to_config().summary()
    }

    /// Create a builder from an existing `EvalConfig`
    pub fn from_config(config: EvalConfig) -> Self {
        Self {
            tiers: config.tiers,
            confident_distance: config.confident_distance,
            name: config.name,
        }
    }

    /// Convert the builder into an `EvalConfig`
    pub fn to_config(self) -> EvalConfig {
        EvalConfig {
            tiers: self.tiers,
            confident_distance: self.confident_distance,
            name: self.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_build() {
        let evaluator = EvaluatorBuilder::new().build().unwrap();
        assert_eq!(evaluator.tiers().len(), 28);
        assert_eq!(evaluator.config().confident_distance, 275.0);
    }

    #[test]
    fn test_fluent_settings() {
        let evaluator = EvaluatorBuilder::new()
            .tiers(vec![1.0, 2.0, 3.0])
            .confident_distance(2.5)
            .name("tiny")
            .build()
            .unwrap();
        assert_eq!(evaluator.tiers().thresholds(), &[1.0, 2.0, 3.0]);
        assert_eq!(evaluator.config().name.as_deref(), Some("tiny"));
    }

    #[test]
    fn test_invalid_tiers_fail_build() {
        assert!(EvaluatorBuilder::new().tiers(vec![]).build().is_err());
        assert!(EvaluatorBuilder::new().tiers(vec![3.0, 1.0]).build().is_err());
    }

    #[test]
    fn test_config_round_trip() {
        let config = EvalConfig {
            tiers: vec![5.0, 10.0, 20.0],
            confident_distance: 12.5,
            name: Some("coarse".to_string()),
        };
        let back = EvaluatorBuilder::from_config(config.clone()).to_config();
        assert_eq!(back, config);
        assert_eq!(
            EvaluatorBuilder::new().tiers(vec![5.0, 10.0, 20.0]).confident_distance(12.5).summary(),
            EvalConfig { name: None, ..config }.summary()
        );
    }
}
