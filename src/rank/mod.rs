use serde::Serialize;
use tracing::debug;

use crate::source::SearchResult;

/// Guard against a zero denominator when every price (or rating) is equal.
const EPSILON: f64 = 1e-6;

/// Weight on cheapness; price matters more than rating.
const PRICE_WEIGHT: f64 = 0.6;
const RATING_WEIGHT: f64 = 0.4;

/// A `SearchResult` augmented with its computed score.
///
/// Derived within a single ranking call and never persisted; scores are
/// recomputed fresh from the full result set every time.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedResult {
    #[serde(flatten)]
    pub result: SearchResult,
    pub score: f64,
}

/// Score every result with min-max normalization over the whole set.
///
/// `score = (1 - norm_price) * 0.6 + norm_rating * 0.4`: lower price and
/// higher rating both increase the score. Output order mirrors input order.
pub fn score_all(results: &[SearchResult]) -> Vec<RankedResult> {
    if results.is_empty() {
        return Vec::new();
    }

    let min_price = results.iter().map(|r| r.price).fold(f64::INFINITY, f64::min);
    let max_price = results.iter().map(|r| r.price).fold(f64::NEG_INFINITY, f64::max);
    let min_rating = results.iter().map(|r| r.rating).fold(f64::INFINITY, f64::min);
    let max_rating = results.iter().map(|r| r.rating).fold(f64::NEG_INFINITY, f64::max);

    results
        .iter()
        .map(|r| {
            let norm_price = (r.price - min_price) / (max_price - min_price + EPSILON);
            let norm_rating = (r.rating - min_rating) / (max_rating - min_rating + EPSILON);
            let score = (1.0 - norm_price) * PRICE_WEIGHT + norm_rating * RATING_WEIGHT;

            RankedResult {
                result: r.clone(),
                score,
            }
        })
        .collect()
}

/// Select the single best candidate by maximum score.
///
/// Empty input yields `None` (the "no suitable products" state). Ties are
/// broken by original iteration order: first seen wins.
pub fn rank(results: &[SearchResult]) -> Option<RankedResult> {
    let scored = score_all(results);

    let mut best: Option<RankedResult> = None;
    for candidate in scored {
        match &best {
            Some(current) if candidate.score <= current.score => {}
            _ => best = Some(candidate),
        }
    }

    if let Some(winner) = &best {
        debug!("Ranked {} results, best score {:.4}: {}", results.len(), winner.score, winner.result.name);
    }

    best
}
