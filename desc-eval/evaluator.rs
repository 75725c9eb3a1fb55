use desc_core::{DescError, DescResult};
use log::debug;

use crate::config::EvalConfig;
use crate::homography::Homography;
use crate::matcher::{match_nearest, rank_matches};
use crate::report::EvaluationReport;
use crate::tiers::DistanceTiers;
use crate::types::{FeatureView, Verdict, VerifiedMatch};
use crate::verify::verify_match;

/// Matches descriptors between two images and scores them against a homography.
///
/// Construct with [`crate::EvaluatorBuilder`] or [`MatchEvaluator::from_config`].
#[derive(Debug, Clone)]
pub struct MatchEvaluator {
    pub(crate) tiers: DistanceTiers,
    pub(crate) config: EvalConfig,
}

/// Result of one evaluation: verified matches in rank order plus the report
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub matches: Vec<VerifiedMatch>,
    pub report: EvaluationReport,
}

impl Evaluation {
    /// Correct matches with descriptor distance below `threshold`
    pub fn confident_matches(&self, threshold: f32) -> impl Iterator<Item = &VerifiedMatch> + '_ {
        self.matches
            .iter()
            .filter(move |m| m.verdict.is_correct() && m.matched.distance < threshold)
    }

    /// Matches with descriptor distance below `threshold` whose projection stayed inside image B
    pub fn overlay_matches(&self, threshold: f32) -> impl Iterator<Item = &VerifiedMatch> + '_ {
        self.matches
            .iter()
            .filter(move |m| m.verdict != Verdict::OutOfBounds && m.matched.distance < threshold)
    }

    pub fn count(&self, verdict: Verdict) -> usize {
        self.matches.iter().filter(|m| m.verdict == verdict).count()
    }
}

impl MatchEvaluator {
    pub fn from_config(config: EvalConfig) -> DescResult<Self> {
        config.to_builder().build()
    }

    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    pub fn tiers(&self) -> &DistanceTiers {
        &self.tiers
    }

    /// Evaluates query image `a` against reference image `b` under `h` (A → B).
    ///
    /// Each query descriptor is matched to its nearest reference descriptor, the
    /// matches are ranked by distance and verified geometrically, and the ranked
    /// list is swept into cumulative tier counts.
    pub fn evaluate(&self, a: FeatureView<'_>, b: FeatureView<'_>, h: &Homography) -> DescResult<Evaluation> {
        check_aligned(&a, "query descriptor rows vs keypoints")?;
        check_aligned(&b, "reference descriptor rows vs keypoints")?;

        let mut matches = match_nearest(a.descriptors, b.descriptors)?;
        rank_matches(&mut matches);

        let verified: Vec<VerifiedMatch> = matches
            .into_iter()
            .map(|m| VerifiedMatch {
                matched: m,
                verdict: verify_match(&a.keypoints[m.query_idx], &b.keypoints[m.train_idx], h, b.bounds),
            })
            .collect();

        let out_of_bounds = verified.iter().filter(|m| m.verdict == Verdict::OutOfBounds).count();
        let report = EvaluationReport {
            total_matches: verified.len(),
            in_bounds_keypoints: a.keypoints.len() - out_of_bounds,
            tiers: self.tiers.accumulate(&verified),
        };

        debug!(
            "evaluated {} matches: {} correct, {} out of bounds",
            report.total_matches,
            verified.iter().filter(|m| m.verdict.is_correct()).count(),
            out_of_bounds
        );

        Ok(Evaluation { matches: verified, report })
    }

    /// High-confidence subset using the configured distance
    pub fn confident<'e>(&self, evaluation: &'e Evaluation) -> Vec<&'e VerifiedMatch> {
        evaluation.confident_matches(self.config.confident_distance).collect()
    }

    /// Correct and incorrect matches below the configured distance, for drawing
    pub fn overlay<'e>(&self, evaluation: &'e Evaluation) -> Vec<&'e VerifiedMatch> {
        evaluation.overlay_matches(self.config.confident_distance).collect()
    }
}

fn check_aligned(view: &FeatureView<'_>, context: &'static str) -> DescResult<()> {
    if view.descriptors.len() != view.keypoints.len() {
        return Err(DescError::DimensionMismatch {
            context,
            expected: view.keypoints.len(),
            actual: view.descriptors.len(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::EvaluatorBuilder;
    use desc_core::{DescriptorSet, Keypoint};

    fn grid_keypoints(n: usize, size: f32) -> Vec<Keypoint> {
        (0..n).map(|i| Keypoint::new(10.0 + 10.0 * i as f32, 20.0, size)).collect()
    }

    fn one_hot(n: usize) -> DescriptorSet {
        let rows: Vec<Vec<f32>> = (0..n)
            .map(|i| (0..n).map(|j| if i == j { 100.0 } else { 0.0 }).collect())
            .collect();
        DescriptorSet::from_rows(n, &rows).unwrap()
    }

    #[test]
    fn test_identical_images_all_correct() {
        let kps = grid_keypoints(5, 3.0);
        let desc = one_hot(5);
        let view = FeatureView::new(&kps, &desc, 100, 100);

        let evaluator = EvaluatorBuilder::new().build().unwrap();
        let eval = evaluator.evaluate(view, view, &Homography::identity()).unwrap();

        assert_eq!(eval.report.total_matches, 5);
        assert_eq!(eval.report.in_bounds_keypoints, 5);
        assert_eq!(eval.count(Verdict::Correct), 5);
        assert!(eval.report.tiers.iter().all(|t| t.correct == 5 && t.total == 5));
        assert_eq!(evaluator.confident(&eval).len(), 5);
    }

    #[test]
    fn test_shuffled_reference_is_incorrect() {
        let kps_a = grid_keypoints(3, 1.0);
        let mut kps_b = kps_a.clone();
        kps_b.reverse();
        let desc = one_hot(3);

        let evaluator = EvaluatorBuilder::new().tiers(vec![1.0]).build().unwrap();
        let eval = evaluator
            .evaluate(
                FeatureView::new(&kps_a, &desc, 100, 100),
                FeatureView::new(&kps_b, &desc, 100, 100),
                &Homography::identity(),
            )
            .unwrap();

        // Only the middle keypoint lands on itself after the reversal
        assert_eq!(eval.report.tiers[0].correct, 1);
        assert_eq!(eval.report.tiers[0].total, 3);
        assert_eq!(evaluator.confident(&eval).len(), 1);
        assert_eq!(evaluator.overlay(&eval).len(), 3);
    }

    #[test]
    fn test_out_of_bounds_reduces_in_bounds_count() {
        let kps_a = grid_keypoints(4, 2.0);
        let desc = one_hot(4);
        // Shift everything right by 25 px; keypoints beyond x = 50 leave a 50 px wide image
        let h = Homography::from_row_slice(&[1.0, 0.0, 25.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
        let kps_b: Vec<Keypoint> = kps_a.iter().map(|k| Keypoint::new(k.x + 25.0, k.y, k.size)).collect();

        let evaluator = EvaluatorBuilder::new().build().unwrap();
        let eval = evaluator
            .evaluate(
                FeatureView::new(&kps_a, &desc, 100, 100),
                FeatureView::new(&kps_b, &desc, 50, 100),
                &h,
            )
            .unwrap();

        // x = 10, 20 project to 35, 45 (inside); 30, 40 project to 55, 65 (outside)
        assert_eq!(eval.report.total_matches, 4);
        assert_eq!(eval.report.in_bounds_keypoints, 2);
        assert_eq!(eval.count(Verdict::OutOfBounds), 2);
        assert!(evaluator.overlay(&eval).iter().all(|m| m.verdict == Verdict::Correct));
        assert_eq!(evaluator.overlay(&eval).len(), 2);
        let last = eval.report.tiers.last().unwrap();
        assert_eq!((last.correct, last.total), (2, 4));
    }

    #[test]
    fn test_empty_reference() {
        let kps = grid_keypoints(3, 1.0);
        let desc = one_hot(3);
        let empty = DescriptorSet::new(3);
        let evaluator = EvaluatorBuilder::new().build().unwrap();
        let eval = evaluator
            .evaluate(
                FeatureView::new(&kps, &desc, 100, 100),
                FeatureView::new(&[], &empty, 100, 100),
                &Homography::identity(),
            )
            .unwrap();
        assert_eq!(eval.report.total_matches, 0);
        assert_eq!(eval.report.tiers.len(), 28);
        assert!(eval.report.tiers.iter().all(|t| t.correct == 0 && t.total == 0));
    }

    #[test]
    fn test_misaligned_view_rejected() {
        let kps = grid_keypoints(3, 1.0);
        let desc = one_hot(2);
        let evaluator = EvaluatorBuilder::new().build().unwrap();
        let view = FeatureView::new(&kps, &desc, 100, 100);
        let result = evaluator.evaluate(view, view, &Homography::identity());
        assert!(matches!(result, Err(DescError::DimensionMismatch { expected: 3, actual: 2, .. })));
    }

    #[test]
    fn test_dimension_mismatch_between_sets() {
        let kps = grid_keypoints(2, 1.0);
        let a = one_hot(2);
        let b = DescriptorSet::from_rows(3, &[[0.0; 3], [1.0; 3]]).unwrap();
        let evaluator = EvaluatorBuilder::new().build().unwrap();
        let result = evaluator.evaluate(
            FeatureView::new(&kps, &a, 100, 100),
            FeatureView::new(&kps, &b, 100, 100),
            &Homography::identity(),
        );
        assert!(matches!(result, Err(DescError::DimensionMismatch { .. })));
    }

    #[test]
    fn test_from_config() {
        let config = EvalConfig { tiers: vec![5.0, 10.0], ..EvalConfig::default() };
        let evaluator = MatchEvaluator::from_config(config).unwrap();
        assert_eq!(evaluator.tiers().len(), 2);
        assert_eq!(evaluator.config().confident_distance, 275.0);
    }
}
