use std::ops::Range;
use std::time::{Duration, Instant};

use tracing::{debug, trace, warn};

use crate::core::discord::{
    BestSoFar, Candidate, Discord, DiscordConfig, DiscordScan, FloorPolicy, ScanStats,
};
use crate::core::distance_metric::DistanceMetric;
use crate::core::window::is_trivial_match;
use crate::error::{DiscordError, Result};

/// Log progress every this many candidate positions.
const PROGRESS_INTERVAL: usize = 1000;

/// Pruning predicate evaluated after every distance of a candidate's inner loop.
///
/// Returns `false` once `dist` is strictly below `threshold`: the candidate's
/// nearest-neighbor distance is then at most `dist`, so it cannot beat a
/// discord whose distance is at least `threshold`. A NaN distance never stops
/// the scan.
#[inline(always)]
pub fn keep_scanning(dist: f64, threshold: f64) -> bool {
    !(dist < threshold)
}

/// Comparison positions `j` of `comparisons` that are not trivial matches of
/// candidate `i`, in ascending order.
///
/// Equivalent to filtering `comparisons` with `!is_trivial_match(i, j, m)`, but
/// splits the range around the excluded band instead of testing every `j`.
#[inline]
pub fn eligible_neighbors(
    i: usize,
    m: usize,
    comparisons: &Range<usize>,
) -> impl Iterator<Item = usize> {
    // j < i - m  <=>  i - j > m
    let left_end = i.saturating_sub(m).min(comparisons.end);
    let left = comparisons.start..left_end.max(comparisons.start);
    // j > i + m
    let right_start = (i + m + 1).max(comparisons.start);
    let right = right_start.min(comparisons.end)..comparisons.end;
    left.chain(right)
}

/// Everything a pass needs besides the series and the metric context.
#[derive(Debug, Clone)]
pub(crate) struct ScanPlan<'a> {
    pub window: usize,
    pub comparisons: Range<usize>,
    pub exclusions: &'a [Discord],
    pub floor: f64,
    pub prune: bool,
    pub track_exact: bool,
    pub deadline: Option<Duration>,
    pub started: Instant,
}

impl ScanPlan<'_> {
    #[inline]
    fn is_excluded(&self, i: usize) -> bool {
        self.exclusions
            .iter()
            .any(|e| is_trivial_match(i, e.position, self.window))
    }

    fn check_deadline(&self, position: usize) -> Result<()> {
        if let Some(limit) = self.deadline {
            let elapsed = self.started.elapsed();
            if elapsed > limit {
                warn!(
                    position,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "discord scan aborted: deadline exceeded"
                );
                return Err(DiscordError::DeadlineExceeded { elapsed, position });
            }
        }
        Ok(())
    }
}

/// Result of scanning a contiguous block of candidate positions.
#[derive(Debug, Default)]
pub(crate) struct PartialScan {
    pub best: BestSoFar,
    pub stats: ScanStats,
    /// Fully scanned candidates with their exact nearest-neighbor distance.
    /// Only filled when the plan asks for it.
    pub exact: Vec<Candidate>,
}

impl PartialScan {
    /// Fold in the result of the block that follows this one.
    pub fn merge(&mut self, other: PartialScan) {
        self.best.merge(&other.best);
        self.stats.merge(&other.stats);
        self.exact.extend(other.exact);
    }
}

/// Nearest-neighbor distance of candidate `i`, or `None` if it was pruned.
#[inline]
fn nearest_neighbor<M: DistanceMetric>(
    ts: &[f64],
    ctx: &M::Context,
    i: usize,
    plan: &ScanPlan<'_>,
    threshold: Option<f64>,
    stats: &mut ScanStats,
) -> Option<Candidate> {
    let m = plan.window;
    let mut candidate = Candidate::new(i);
    for j in eligible_neighbors(i, m, &plan.comparisons) {
        let dist = M::distance(ts, i, j, m, ctx);
        stats.distance_calls += 1;
        candidate.observe(dist);
        if let Some(t) = threshold {
            if !keep_scanning(dist, t) {
                stats.candidates_pruned += 1;
                return None;
            }
        }
    }
    Some(candidate)
}

/// Scan the candidate positions in `candidates` sequentially.
pub(crate) fn scan_block<M: DistanceMetric>(
    ts: &[f64],
    ctx: &M::Context,
    plan: &ScanPlan<'_>,
    candidates: Range<usize>,
) -> Result<PartialScan> {
    let mut part = PartialScan::default();

    for i in candidates {
        plan.check_deadline(i)?;
        if i % PROGRESS_INTERVAL == 0 {
            trace!(position = i, "discord scan progress");
        }
        if plan.is_excluded(i) {
            part.stats.candidates_excluded += 1;
            continue;
        }

        part.stats.candidates_scanned += 1;
        let threshold = plan.prune.then(|| part.best.threshold(plan.floor));
        let scanned = nearest_neighbor::<M>(ts, ctx, i, plan, threshold, &mut part.stats);
        if let Some(candidate) = scanned {
            if plan.track_exact && candidate.has_neighbor() {
                part.exact.push(candidate);
            }
            part.best.offer(candidate);
        }
    }

    Ok(part)
}

/// Run one discord-finding pass.
///
/// `exclusions` are previously found discords whose zones are barred from
/// candidacy; `floor` seeds the prune threshold and is only consulted when
/// `prune` is set. The caller has validated `config` against `ts`.
pub(crate) fn scan_pass<M: DistanceMetric>(
    ts: &[f64],
    ctx: &M::Context,
    config: &DiscordConfig,
    exclusions: &[Discord],
    floor: f64,
    prune: bool,
) -> Result<DiscordScan> {
    let n = ts.len();
    let m = config.window;
    let candidates = config.boundary.candidates(n, m);
    let plan = ScanPlan {
        window: m,
        comparisons: config.boundary.comparisons(n, m),
        exclusions,
        floor,
        prune,
        track_exact: config.floor_policy == FloorPolicy::Aggressive,
        deadline: config.deadline,
        started: Instant::now(),
    };

    debug!(
        metric = M::name(),
        n,
        window = m,
        candidates = candidates.len(),
        exclusions = exclusions.len(),
        floor,
        prune,
        parallel = config.parallel,
        "discord scan started"
    );

    let part = run_blocks::<M>(ts, ctx, &plan, candidates, config.parallel)?;

    let mut stats = part.stats;
    stats.elapsed = plan.started.elapsed();

    let discord = part
        .best
        .get()
        .map(|c| Discord::new(c.position, c.nn_distance).with_rank(exclusions.len() + 1));

    let next_floor = match discord {
        Some(d) => part
            .exact
            .iter()
            .filter(|c| !is_trivial_match(c.position, d.position, m))
            .map(|c| c.nn_distance)
            .fold(0.0, f64::max),
        None => 0.0,
    };

    match &discord {
        Some(d) => debug!(
            rank = d.rank,
            position = d.position,
            distance = d.distance,
            distance_calls = stats.distance_calls,
            pruned = stats.candidates_pruned,
            elapsed_ms = stats.elapsed.as_millis() as u64,
            "discord scan finished"
        ),
        None => debug!(
            distance_calls = stats.distance_calls,
            excluded = stats.candidates_excluded,
            "discord scan finished without an eligible candidate"
        ),
    }

    Ok(DiscordScan {
        discord,
        stats,
        next_floor,
    })
}

#[cfg(feature = "parallel")]
fn run_blocks<M: DistanceMetric>(
    ts: &[f64],
    ctx: &M::Context,
    plan: &ScanPlan<'_>,
    candidates: Range<usize>,
    parallel: bool,
) -> Result<PartialScan> {
    if parallel {
        crate::algorithms::parallel::scan_parallel::<M>(ts, ctx, plan, candidates)
    } else {
        scan_block::<M>(ts, ctx, plan, candidates)
    }
}

#[cfg(not(feature = "parallel"))]
fn run_blocks<M: DistanceMetric>(
    ts: &[f64],
    ctx: &M::Context,
    plan: &ScanPlan<'_>,
    candidates: Range<usize>,
    _parallel: bool,
) -> Result<PartialScan> {
    scan_block::<M>(ts, ctx, plan, candidates)
}
