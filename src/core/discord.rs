use std::ops::Range;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{DiscordError, Result};

/// Which positions take part in a scan.
///
/// `Legacy` reproduces the classic brute-force search bounds: candidates
/// are `[0, n - m)` and comparison windows are `[1, n - m - 1)`, so the first and
/// the last window of the series are never used as neighbors and the last window
/// is never a candidate. `Full` uses every window `[0, n - m]` for both roles.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum BoundaryPolicy {
    #[default]
    Legacy,
    Full,
}

impl BoundaryPolicy {
    /// Candidate start positions for a series of length `n` and window `m`.
    pub fn candidates(self, n: usize, m: usize) -> Range<usize> {
        match self {
            BoundaryPolicy::Legacy => 0..n.saturating_sub(m),
            BoundaryPolicy::Full => 0..(n + 1).saturating_sub(m),
        }
    }

    /// Comparison (neighbor) start positions for a series of length `n` and window `m`.
    pub fn comparisons(self, n: usize, m: usize) -> Range<usize> {
        match self {
            BoundaryPolicy::Legacy => 1..n.saturating_sub(m + 1).max(1),
            BoundaryPolicy::Full => 0..(n + 1).saturating_sub(m),
        }
    }
}

/// How the prune floor of each follow-up pass is seeded in a top-k search.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum FloorPolicy {
    /// Every follow-up pass starts from a floor of `0.0`.
    #[default]
    Conservative,
    /// Each pass reports the largest exact nearest-neighbor distance among
    /// candidates that stay eligible once its discord is excluded; the next
    /// pass starts from that value.
    Aggressive,
}

/// Configuration for discord discovery.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordConfig {
    /// Subsequence length.
    pub window: usize,
    /// Abandon a candidate in the first pass once it provably cannot beat the
    /// best discord so far. Off by default.
    pub early_abandon: bool,
    /// Abandon candidates in follow-up passes once they fall below the prune
    /// floor or the running best. On by default.
    pub prune_next: bool,
    /// Candidate and comparison ranges.
    pub boundary: BoundaryPolicy,
    /// Prune floor seeding between top-k passes.
    pub floor_policy: FloorPolicy,
    /// Scan candidates on the rayon thread pool. Needs the `parallel` feature;
    /// ignored otherwise.
    pub parallel: bool,
    /// Abort a pass that runs longer than this.
    pub deadline: Option<Duration>,
}

impl DiscordConfig {
    pub fn new(window: usize) -> Self {
        Self {
            window,
            early_abandon: false,
            prune_next: true,
            boundary: BoundaryPolicy::Legacy,
            floor_policy: FloorPolicy::Conservative,
            parallel: false,
            deadline: None,
        }
    }

    pub fn with_early_abandon(mut self, early_abandon: bool) -> Self {
        self.early_abandon = early_abandon;
        self
    }

    pub fn with_prune_next(mut self, prune_next: bool) -> Self {
        self.prune_next = prune_next;
        self
    }

    pub fn with_boundary(mut self, boundary: BoundaryPolicy) -> Self {
        self.boundary = boundary;
        self
    }

    pub fn with_floor_policy(mut self, floor_policy: FloorPolicy) -> Self {
        self.floor_policy = floor_policy;
        self
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    pub fn with_deadline(mut self, deadline: Duration) -> Self {
        self.deadline = Some(deadline);
        self
    }

    /// Check the configuration against a series of length `n`.
    pub fn validate(&self, n: usize) -> Result<()> {
        if n == 0 {
            return Err(DiscordError::EmptyInput);
        }
        if self.window == 0 {
            return Err(DiscordError::invalid("window", "must be greater than 0"));
        }
        if self.window >= n {
            return Err(DiscordError::invalid(
                "window",
                format!(
                    "must be smaller than the series length {n}, got {}",
                    self.window
                ),
            ));
        }
        Ok(())
    }
}

/// A subsequence start position and its nearest-neighbor distance so far.
///
/// `nn_distance` stays at `f64::INFINITY` until an eligible comparison window
/// is found.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Candidate {
    pub position: usize,
    pub nn_distance: f64,
}

impl Candidate {
    pub fn new(position: usize) -> Self {
        Self {
            position,
            nn_distance: f64::INFINITY,
        }
    }

    /// Lower the nearest-neighbor distance if `dist` is smaller.
    ///
    /// A NaN `dist` never lowers it.
    #[inline(always)]
    pub fn observe(&mut self, dist: f64) {
        if dist < self.nn_distance {
            self.nn_distance = dist;
        }
    }

    /// Whether at least one comparison produced a finite distance.
    #[inline]
    pub fn has_neighbor(&self) -> bool {
        self.nn_distance.is_finite()
    }
}

/// A discovered discord.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Discord {
    /// Start position of the anomalous subsequence.
    pub position: usize,
    /// Distance to its nearest non-trivial neighbor (high = anomalous).
    pub distance: f64,
    /// 1-based rank in discovery order.
    pub rank: usize,
}

impl Discord {
    pub fn new(position: usize, distance: f64) -> Self {
        Self {
            position,
            distance,
            rank: 1,
        }
    }

    pub(crate) fn with_rank(mut self, rank: usize) -> Self {
        self.rank = rank;
        self
    }
}

/// Running best-so-far for one scan pass (or one worker's share of it).
///
/// Updates on strictly greater distances only, so among equal distances the
/// first position offered wins.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct BestSoFar {
    best: Option<Candidate>,
}

impl BestSoFar {
    #[inline]
    pub fn offer(&mut self, candidate: Candidate) {
        if !candidate.has_neighbor() {
            return;
        }
        match self.best {
            Some(b) if !(candidate.nn_distance > b.nn_distance) => {}
            _ => self.best = Some(candidate),
        }
    }

    /// Distance a candidate must reach to stay in contention.
    #[inline]
    pub fn threshold(&self, floor: f64) -> f64 {
        match self.best {
            Some(b) if b.nn_distance > floor => b.nn_distance,
            _ => floor,
        }
    }

    pub fn get(&self) -> Option<Candidate> {
        self.best
    }

    /// Fold another partial result in. `self` must hold the lower positions.
    pub fn merge(&mut self, other: &BestSoFar) {
        if let Some(c) = other.best {
            self.offer(c);
        }
    }
}

/// Counters for one scan pass.
///
/// Informational only; they never influence which discord is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ScanStats {
    /// Number of distance evaluations.
    pub distance_calls: u64,
    /// Candidates whose comparison loop was entered.
    pub candidates_scanned: u64,
    /// Candidates skipped because they fall in an exclusion zone.
    pub candidates_excluded: u64,
    /// Candidates abandoned early by pruning.
    pub candidates_pruned: u64,
    /// Wall-clock time of the pass.
    pub elapsed: Duration,
}

impl ScanStats {
    pub fn merge(&mut self, other: &ScanStats) {
        self.distance_calls += other.distance_calls;
        self.candidates_scanned += other.candidates_scanned;
        self.candidates_excluded += other.candidates_excluded;
        self.candidates_pruned += other.candidates_pruned;
    }
}

/// The result of a single scan pass.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DiscordScan {
    /// The discord found, or `None` when no eligible candidate had a neighbor.
    pub discord: Option<Discord>,
    pub stats: ScanStats,
    /// Largest exact nearest-neighbor distance among fully scanned candidates
    /// that remain eligible once `discord` is excluded. A valid prune floor for
    /// the next pass. Zero when nothing qualifies.
    pub next_floor: f64,
}

/// Ranked discords from a top-k search.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiscordRecords {
    /// Discords in rank order (non-increasing distance).
    pub discords: Vec<Discord>,
    /// Statistics of each pass, in pass order.
    pub passes: Vec<ScanStats>,
}

impl DiscordRecords {
    pub fn len(&self) -> usize {
        self.discords.len()
    }

    pub fn is_empty(&self) -> bool {
        self.discords.is_empty()
    }

    /// Total distance evaluations across all passes.
    pub fn distance_calls(&self) -> u64 {
        self.passes.iter().map(|s| s.distance_calls).sum()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Discord> {
        self.discords.iter()
    }
}

impl std::fmt::Display for DiscordRecords {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        for d in &self.discords {
            writeln!(
                f,
                "#{}: position {}, distance {:.6}",
                d.rank, d.position, d.distance
            )?;
        }
        Ok(())
    }
}
