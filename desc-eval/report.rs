use std::fmt;
use std::io::Write;
use std::path::Path;

use desc_core::DescResult;

use crate::tiers::TierCount;

/// Tab-separated evaluation summary for one (image pair, descriptor type).
///
/// ```text
/// <totalMatches>\t<inBoundsKeypoints>
/// <correct_1>\t<total_1>
/// ...
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct EvaluationReport {
    pub total_matches: usize,
    /// Query keypoints minus matches whose projection left image B
    pub in_bounds_keypoints: usize,
    pub tiers: Vec<TierCount>,
}

impl EvaluationReport {
    pub fn write_to<W: Write>(&self, mut sink: W) -> std::io::Result<()> {
        write!(sink, "{}", self)?;
        sink.flush()
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> DescResult<()> {
        let file = std::fs::File::create(path)?;
        self.write_to(std::io::BufWriter::new(file))?;
        Ok(())
    }

    /// `(threshold, precision, recall)` per tier; recall is relative to in-bounds keypoints
    pub fn precision_recall(&self) -> Vec<(f32, Option<f64>, Option<f64>)> {
        self.tiers
            .iter()
            .map(|t| {
                let recall = (self.in_bounds_keypoints > 0)
                    .then(|| t.correct as f64 / self.in_bounds_keypoints as f64);
                (t.threshold, t.precision(), recall)
            })
            .collect()
    }
}

impl fmt::Display for EvaluationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}\t{}", self.total_matches, self.in_bounds_keypoints)?;
        for tier in &self.tiers {
            writeln!(f, "{}\t{}", tier.correct, tier.total)?;
        }
        Ok(())
    }
}
