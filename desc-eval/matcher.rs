use desc_core::{DescError, DescResult, DescriptorSet};
use rayon::prelude::*;

use crate::types::Match;

#[inline]
fn squared_distance(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(x, y)| (x - y) * (x - y)).sum()
}

/// Brute-force nearest neighbor of every query row among the train rows.
///
/// Distance is Euclidean over the raw values; on ties the lowest train index
/// wins. Produces exactly `query.len()` matches in query order, or none when
/// either set is empty. Queries are searched in parallel.
pub fn match_nearest(query: &DescriptorSet, train: &DescriptorSet) -> DescResult<Vec<Match>> {
    if query.is_empty() || train.is_empty() {
        return Ok(Vec::new());
    }
    if query.dim() != train.dim() {
        return Err(DescError::DimensionMismatch {
            context: "query vs train descriptor width",
            expected: query.dim(),
            actual: train.dim(),
        });
    }

    let matches = (0..query.len())
        .into_par_iter()
        .map(|qi| {
            let q = query.row(qi);
            let mut best_idx = 0;
            let mut best = f32::INFINITY;
            for (ti, t) in train.rows().enumerate() {
                let d = squared_distance(q, t);
                // Strict comparison keeps the first of equal candidates
                if d < best {
                    best = d;
                    best_idx = ti;
                }
            }
            Match { query_idx: qi, train_idx: best_idx, distance: best.sqrt() }
        })
        .collect();

    Ok(matches)
}

/// Sorts ascending by distance, then by query index
pub fn rank_matches(matches: &mut [Match]) {
    matches.sort_by(|a, b| {
        a.distance
            .total_cmp(&b.distance)
            .then(a.query_idx.cmp(&b.query_idx))
    });
}
