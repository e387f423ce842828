//! Brute-force discord discovery for a single time series.
//!
//! A discord is the subsequence whose distance to its nearest non-trivial
//! neighbor is largest. Two positions are trivial matches when their start
//! offsets differ by at most the window length.

pub mod algorithms;
pub mod core;
pub mod error;
pub mod metrics;

pub use crate::algorithms::brute_force::{
    best_discord, find_best_discord, find_next_discord, next_discord,
};
pub use crate::algorithms::scan::keep_scanning;
pub use crate::algorithms::top_k::find_top_k_discords;
pub use crate::core::discord::{
    BoundaryPolicy, Candidate, Discord, DiscordConfig, DiscordRecords, DiscordScan, FloorPolicy,
    ScanStats,
};
pub use crate::core::distance_metric::DistanceMetric;
pub use crate::core::window::{is_trivial_match, Window};
pub use crate::error::{DiscordError, Result};
pub use crate::metrics::euclidean::{euclidean_distance, Euclidean};
pub use crate::metrics::znormalized::ZNormalizedEuclidean;

/// High-level facade for discord discovery, generic over distance metric.
///
/// # Examples
///
/// ```
/// use discord_rs::{BruteForceEngine, DiscordConfig};
///
/// let mut ts: Vec<f64> = (0..80).map(|i| (i as f64 * 0.3).sin()).collect();
/// ts[40] = 5.0;
/// let engine = BruteForceEngine::new(DiscordConfig::new(6));
/// let records = engine.top_k(&ts, 2).unwrap();
/// assert_eq!(records.discords[0].rank, 1);
/// assert!((34..=40).contains(&records.discords[0].position));
/// ```
pub struct DiscordEngine<M: DistanceMetric> {
    config: DiscordConfig,
    _metric: std::marker::PhantomData<M>,
}

impl<M: DistanceMetric> DiscordEngine<M> {
    /// Create a new engine with the given configuration.
    pub fn new(config: DiscordConfig) -> Self {
        Self {
            config,
            _metric: std::marker::PhantomData,
        }
    }

    pub fn config(&self) -> &DiscordConfig {
        &self.config
    }

    /// Find the best discord.
    pub fn best(&self, ts: &[f64]) -> Result<DiscordScan> {
        best_discord::<M>(ts, &self.config)
    }

    /// Find the best discord outside the exclusion zones of `exclusions`.
    ///
    /// `prune_floor` must not exceed the distance of the discord being
    /// searched for; `0.0` is always safe.
    pub fn next(&self, ts: &[f64], exclusions: &[Discord], prune_floor: f64) -> Result<DiscordScan> {
        next_discord::<M>(ts, &self.config, exclusions, prune_floor)
    }

    /// Find up to `k` discords, ranked by distance.
    pub fn top_k(&self, ts: &[f64], k: usize) -> Result<DiscordRecords> {
        find_top_k_discords::<M>(ts, &self.config, k)
    }
}

/// Convenience type alias for raw Euclidean distance, the default.
pub type BruteForceEngine = DiscordEngine<Euclidean>;

/// Convenience type alias for z-normalized Euclidean distance.
pub type ZNormalizedEngine = DiscordEngine<ZNormalizedEuclidean>;
