use desc_core::{DescError, DescResult};

use crate::builder::EvaluatorBuilder;
use crate::tiers::{DistanceTiers, DEFAULT_TIERS};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Descriptor distance below which a correct match is drawn as high-confidence
pub const DEFAULT_CONFIDENT_DISTANCE: f32 = 275.0;

/// Complete evaluator configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct EvalConfig {
    /// Ascending distance thresholds, one report line each
    pub tiers: Vec<f32>,
    /// Visualization-only threshold for the high-confidence subset
    pub confident_distance: f32,
    #[cfg_attr(feature = "serde", serde(skip_serializing_if = "Option::is_none"))]
    pub name: Option<String>,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            tiers: DEFAULT_TIERS.to_vec(),
            confident_distance: DEFAULT_CONFIDENT_DISTANCE,
            name: None,
        }
    }
}

impl EvalConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_name(mut self, name: &str) -> Self {
        self.name = Some(name.to_string());
        self
    }

    /// Convert to EvaluatorBuilder for further customization
    pub fn to_builder(self) -> EvaluatorBuilder {
        EvaluatorBuilder::from_config(self)
    }

    /// Generate human-readable summary
    pub fn summary(&self) -> String {
        format!(
            "EvalConfig{}: {} tiers [{}..{}], confident_distance={}",
            self.name.as_deref().map(|n| format!(" '{}'", n)).unwrap_or_default(),
            self.tiers.len(),
            self.tiers.first().copied().unwrap_or(f32::NAN),
            self.tiers.last().copied().unwrap_or(f32::NAN),
            self.confident_distance
        )
    }

    pub fn validate(&self) -> DescResult<()> {
        DistanceTiers::validate(&self.tiers)?;
        if !self.confident_distance.is_finite() || self.confident_distance < 0.0 {
            return Err(DescError::InvalidInput(format!(
                "confident distance must be finite and non-negative, got {}",
                self.confident_distance
            )));
        }
        Ok(())
    }

    /// Save configuration to JSON file
    #[cfg(feature = "serde")]
    pub fn save_json<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }

    /// Load configuration from JSON file
    #[cfg(feature = "serde")]
    pub fn load_json<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Save configuration to TOML file
    #[cfg(feature = "serde")]
    pub fn save_toml<P: AsRef<std::path::Path>>(&self, path: P) -> Result<(), Box<dyn std::error::Error>> {
        std::fs::write(path, self.to_toml()?)?;
        Ok(())
    }

    /// Load configuration from TOML file
    #[cfg(feature = "serde")]
    pub fn load_toml<P: AsRef<std::path::Path>>(path: P) -> Result<Self, Box<dyn std::error::Error>> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    #[cfg(feature = "serde")]
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_json(json: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    #[cfg(feature = "serde")]
    pub fn to_toml(&self) -> Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    #[cfg(feature = "serde")]
    pub fn from_toml(toml_str: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let config: Self = toml::from_str(toml_str)?;
        config.validate()?;
        Ok(config)
    }
}
