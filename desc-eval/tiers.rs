use desc_core::{DescError, DescResult};

use crate::types::VerifiedMatch;

/// Standard distance thresholds used for precision/recall tiers
pub const DEFAULT_TIERS: [f32; 28] = [
    10.0, 15.0, 20.0, 25.0, 30.0, 40.0, 50.0, 60.0, 75.0, 100.0, 125.0, 150.0, 175.0, 200.0,
    225.0, 250.0, 275.0, 300.0, 350.0, 400.0, 450.0, 500.0, 550.0, 600.0, 700.0, 800.0, 900.0,
    1000.0,
];

/// Cumulative counts for all matches with distance below `threshold`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TierCount {
    pub threshold: f32,
    pub correct: usize,
    pub total: usize,
}

impl TierCount {
    /// Fraction of counted matches that are correct, `None` for an empty tier
    pub fn precision(&self) -> Option<f64> {
        (self.total > 0).then(|| self.correct as f64 / self.total as f64)
    }
}

/// Strictly ascending, finite distance thresholds
#[derive(Debug, Clone, PartialEq)]
pub struct DistanceTiers(Vec<f32>);

impl DistanceTiers {
    pub fn new(thresholds: Vec<f32>) -> DescResult<Self> {
        Self::validate(&thresholds)?;
        Ok(Self(thresholds))
    }

    pub fn validate(thresholds: &[f32]) -> DescResult<()> {
        if thresholds.is_empty() {
            return Err(DescError::InvalidInput("tier list is empty".to_string()));
        }
        if let Some(t) = thresholds.iter().find(|t| !t.is_finite()) {
            return Err(DescError::InvalidInput(format!("tier threshold {} is not finite", t)));
        }
        if let Some(w) = thresholds.windows(2).find(|w| w[0] >= w[1]) {
            return Err(DescError::InvalidInput(format!(
                "tier thresholds must be strictly ascending ({} then {})",
                w[0], w[1]
            )));
        }
        Ok(())
    }

    pub fn thresholds(&self) -> &[f32] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sweeps distance-ranked matches once, emitting one cumulative count per tier.
    ///
    /// `ranked` must be sorted ascending by distance. Out-of-bounds matches count
    /// toward totals but are never correct.
    pub fn accumulate(&self, ranked: &[VerifiedMatch]) -> Vec<TierCount> {
        let mut correct = 0;
        let mut j = 0;
        self.0
            .iter()
            .map(|&threshold| {
                while j < ranked.len() && ranked[j].matched.distance < threshold {
                    if ranked[j].verdict.is_correct() {
                        correct += 1;
                    }
                    j += 1;
                }
                TierCount { threshold, correct, total: j }
            })
            .collect()
    }
}

impl Default for DistanceTiers {
    fn default() -> Self {
        Self(DEFAULT_TIERS.to_vec())
    }
}
