use crate::core::distance_metric::DistanceMetric;
use crate::core::window::Window;
use crate::error::{DiscordError, Result};

/// Euclidean distance between two equal-length sequences.
///
/// Fails with `InvalidArgument` when the lengths differ. NaN and infinite
/// values are not sanitized and propagate into the result.
pub fn euclidean_distance(a: &[f64], b: &[f64]) -> Result<f64> {
    if a.len() != b.len() {
        return Err(DiscordError::invalid(
            "subsequence",
            format!("length mismatch: {} vs {}", a.len(), b.len()),
        ));
    }
    Ok(squared_distance(a, b).sqrt())
}

#[inline(always)]
fn squared_distance(a: &[f64], b: &[f64]) -> f64 {
    a.iter()
        .zip(b)
        .map(|(x, y)| {
            let d = x - y;
            d * d
        })
        .sum()
}

/// Raw (non-normalized) Euclidean distance metric.
///
/// Distance formula: `d(i,j) = sqrt(sum_k (ts[i+k] - ts[j+k])^2)` for `k < m`.
/// Amplitude and offset matter, so a flat window at level 9 is far from a flat
/// window at level 0.
#[derive(Debug, Clone)]
pub struct Euclidean;

impl DistanceMetric for Euclidean {
    type Context = ();

    fn precompute(_ts: &[f64], _m: usize) -> Self::Context {}

    #[inline(always)]
    fn distance(ts: &[f64], i: usize, j: usize, m: usize, _ctx: &Self::Context) -> f64 {
        let a = Window { start: i, len: m };
        let b = Window { start: j, len: m };
        squared_distance(a.slice(ts), b.slice(ts)).sqrt()
    }

    fn name() -> &'static str {
        "euclidean"
    }
}
