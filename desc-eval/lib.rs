//! Descriptor matching and ground-truth evaluation.
//!
//! Query descriptors from image A are matched to their nearest reference
//! descriptors in image B. Each match is checked by projecting the query
//! keypoint through the known A → B homography, and the distance-ranked
//! matches are swept into cumulative precision/recall tiers.

pub mod builder;
pub mod config;
pub mod evaluator;
pub mod homography;
pub mod matcher;
pub mod report;
pub mod tiers;
pub mod types;
pub mod verify;

pub use builder::EvaluatorBuilder;
pub use config::{EvalConfig, DEFAULT_CONFIDENT_DISTANCE};
pub use evaluator::{Evaluation, MatchEvaluator};
pub use homography::Homography;
pub use matcher::{match_nearest, rank_matches};
pub use report::EvaluationReport;
pub use tiers::{DistanceTiers, TierCount, DEFAULT_TIERS};
pub use types::{FeatureView, ImageBounds, Match, Verdict, VerifiedMatch};
pub use verify::verify_match;
