use crate::algorithms::scan::scan_pass;
use crate::core::discord::{Discord, DiscordConfig, DiscordScan};
use crate::core::distance_metric::DistanceMetric;
use crate::error::{DiscordError, Result};
use crate::metrics::euclidean::Euclidean;

/// Find the most anomalous subsequence of length `window` in `ts`.
///
/// Uses raw Euclidean distance and the default [`DiscordConfig`]. Returns
/// `Ok(None)` when no candidate has an eligible neighbor. Under the default
/// [`BoundaryPolicy::Legacy`](crate::core::discord::BoundaryPolicy) bounds this
/// already happens for `n = 2 * window + 1` and `n = 2 * window + 2`: every
/// comparison window is then within `window` of every candidate.
///
/// # Examples
///
/// ```
/// use discord_rs::find_best_discord;
///
/// let mut ts: Vec<f64> = (0..60).map(|i| (i as f64 * 0.5).sin()).collect();
/// ts[30] = 6.0;
/// let discord = find_best_discord(&ts, 5).unwrap().unwrap();
/// assert!((25..=30).contains(&discord.position));
/// ```
pub fn find_best_discord(ts: &[f64], window: usize) -> Result<Option<Discord>> {
    best_discord::<Euclidean>(ts, &DiscordConfig::new(window)).map(|scan| scan.discord)
}

/// Find the next discord after `exclude`, skipping every candidate within
/// `window` positions of it.
///
/// `prune_floor` seeds the early-abandon threshold; `0.0` is always safe. Any
/// value at or below the true answer's distance gives the same result.
pub fn find_next_discord(
    ts: &[f64],
    window: usize,
    exclude: &Discord,
    prune_floor: f64,
) -> Result<Option<Discord>> {
    let scan = next_discord::<Euclidean>(
        ts,
        &DiscordConfig::new(window),
        std::slice::from_ref(exclude),
        prune_floor,
    )?;
    Ok(scan
        .discord
        .map(|d| d.with_rank(exclude.rank + 1)))
}

/// First discord pass, generic over the distance metric.
///
/// Pruning follows `config.early_abandon`; it only changes the counters in
/// the returned stats, never the discord.
pub fn best_discord<M: DistanceMetric>(ts: &[f64], config: &DiscordConfig) -> Result<DiscordScan> {
    config.validate(ts.len())?;
    let ctx = M::precompute(ts, config.window);
    scan_pass::<M>(ts, &ctx, config, &[], 0.0, config.early_abandon)
}

/// Follow-up discord pass, generic over the distance metric.
///
/// Candidates within `config.window` of any discord in `exclusions` are
/// skipped. Comparison windows are not restricted by the exclusions. Pruning
/// follows `config.prune_next`, starting from `prune_floor`.
pub fn next_discord<M: DistanceMetric>(
    ts: &[f64],
    config: &DiscordConfig,
    exclusions: &[Discord],
    prune_floor: f64,
) -> Result<DiscordScan> {
    config.validate(ts.len())?;
    check_floor(prune_floor)?;
    let ctx = M::precompute(ts, config.window);
    scan_pass::<M>(ts, &ctx, config, exclusions, prune_floor, config.prune_next)
}

pub(crate) fn check_floor(prune_floor: f64) -> Result<()> {
    if prune_floor.is_nan() {
        return Err(DiscordError::invalid("prune_floor", "must not be NaN"));
    }
    Ok(())
}
