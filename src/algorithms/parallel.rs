use std::ops::Range;

use rayon::prelude::*;

use crate::algorithms::scan::{scan_block, PartialScan, ScanPlan};
use crate::core::distance_metric::DistanceMetric;
use crate::error::Result;

/// Minimum number of candidates before dispatching to the thread pool.
/// Below this, dispatch overhead exceeds the gain.
const MIN_PARALLEL_CANDIDATES: usize = 256;

/// Blocks per worker thread. More blocks than threads keeps workers busy when
/// pruning makes some blocks finish much earlier than others.
const BLOCKS_PER_THREAD: usize = 4;

/// Split `range` into at most `n_blocks` contiguous, non-empty, ordered blocks.
pub fn candidate_blocks(range: Range<usize>, n_blocks: usize) -> Vec<Range<usize>> {
    let len = range.len();
    if len == 0 || n_blocks == 0 {
        return vec![];
    }
    let n_blocks = n_blocks.min(len);
    let base = len / n_blocks;
    let extra = len % n_blocks;

    let mut blocks = Vec::with_capacity(n_blocks);
    let mut start = range.start;
    for b in 0..n_blocks {
        let size = base + usize::from(b < extra);
        blocks.push(start..start + size);
        start += size;
    }
    blocks
}

/// Scan candidates on the rayon thread pool.
///
/// Each block keeps its own best-so-far and prunes against it, which is a valid
/// lower bound for the global answer. Blocks are merged in position order with
/// the same strict-greater rule as the sequential scan, so ties still resolve to
/// the lowest position and the reported discord is identical. Only the counters
/// in `ScanStats` may differ.
pub(crate) fn scan_parallel<M: DistanceMetric>(
    ts: &[f64],
    ctx: &M::Context,
    plan: &ScanPlan<'_>,
    candidates: Range<usize>,
) -> Result<PartialScan> {
    if candidates.len() < MIN_PARALLEL_CANDIDATES {
        return scan_block::<M>(ts, ctx, plan, candidates);
    }

    let n_blocks = rayon::current_num_threads() * BLOCKS_PER_THREAD;
    let parts: Vec<PartialScan> = candidate_blocks(candidates, n_blocks)
        .into_par_iter()
        .map(|block| scan_block::<M>(ts, ctx, plan, block))
        .collect::<Result<_>>()?;

    let mut merged = PartialScan::default();
    for part in parts {
        merged.merge(part);
    }
    Ok(merged)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::algorithms::scan::scan_pass;
    use crate::core::discord::{BoundaryPolicy, DiscordConfig};
    use crate::metrics::euclidean::Euclidean;

    #[test]
    fn test_candidate_blocks_cover_range() {
        let blocks = candidate_blocks(3..20, 4);
        assert_eq!(blocks, vec![3..8, 8..12, 12..16, 16..20]);
    }

    #[test]
    fn test_candidate_blocks_more_blocks_than_items() {
        let blocks = candidate_blocks(0..3, 8);
        assert_eq!(blocks, vec![0..1, 1..2, 2..3]);
        assert!(candidate_blocks(5..5, 4).is_empty());
        assert!(candidate_blocks(0..5, 0).is_empty());
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let ts: Vec<f64> = (0..900)
            .map(|i| {
                let t = i as f64;
                let bump = if (400..420).contains(&i) { 1.5 } else { 0.0 };
                (t * 0.09).sin() + 0.2 * (t * 1.3).cos() + bump
            })
            .collect();
        for prune in [false, true] {
            let seq = DiscordConfig::new(24).with_boundary(BoundaryPolicy::Full);
            let par = seq.clone().with_parallel(true);
            let a = scan_pass::<Euclidean>(&ts, &(), &seq, &[], 0.0, prune).unwrap();
            let b = scan_pass::<Euclidean>(&ts, &(), &par, &[], 0.0, prune).unwrap();
            assert_eq!(a.discord, b.discord, "prune={prune}");
            assert_eq!(a.stats.candidates_scanned, b.stats.candidates_scanned);
        }
    }

    #[test]
    fn test_parallel_tie_break_lowest_position() {
        // A periodic signal where many positions share the same nearest-neighbor
        // distance; the reduction must keep the lowest one.
        let ts: Vec<f64> = (0..800).map(|i| (i % 10) as f64).collect();
        let seq = DiscordConfig::new(10).with_boundary(BoundaryPolicy::Full);
        let par = seq.clone().with_parallel(true);
        let a = scan_pass::<Euclidean>(&ts, &(), &seq, &[], 0.0, false).unwrap();
        let b = scan_pass::<Euclidean>(&ts, &(), &par, &[], 0.0, false).unwrap();
        assert_eq!(a.discord.unwrap().position, 0);
        assert_eq!(a.discord, b.discord);
    }
}
