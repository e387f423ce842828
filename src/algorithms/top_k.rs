use tracing::{debug, info};

use crate::algorithms::scan::scan_pass;
use crate::core::discord::{Discord, DiscordConfig, DiscordRecords, DiscordScan, FloorPolicy};
use crate::core::distance_metric::DistanceMetric;
use crate::error::{DiscordError, Result};

/// Find the top-k discords (most anomalous subsequences) by repeated scanning.
///
/// Greedy extraction: one full pass finds the best discord, then each further
/// pass excludes every candidate within `config.window` of any discord found
/// so far and finds the best of the rest. The metric context is computed once
/// and shared by all passes.
///
/// The first pass prunes only when `config.early_abandon` is set; follow-up
/// passes prune when `config.prune_next` is set, starting from a floor chosen
/// by `config.floor_policy`.
///
/// # Returns
/// Up to `k` discords in rank order (non-increasing distance), plus the stats
/// of every pass. Fewer than `k` are returned when no eligible candidate is
/// left.
pub fn find_top_k_discords<M: DistanceMetric>(
    ts: &[f64],
    config: &DiscordConfig,
    k: usize,
) -> Result<DiscordRecords> {
    if k == 0 {
        return Err(DiscordError::invalid("k", "must be greater than 0"));
    }
    config.validate(ts.len())?;
    let ctx = M::precompute(ts, config.window);

    let mut records = DiscordRecords::default();
    let mut scan = scan_pass::<M>(ts, &ctx, config, &[], 0.0, config.early_abandon)?;

    while let Some(discord) = record(&mut records, &scan) {
        if records.len() == k {
            break;
        }
        let floor = next_floor(config, &scan);
        debug!(
            rank = discord.rank,
            position = discord.position,
            floor,
            "seeding next discord pass"
        );
        scan = scan_pass::<M>(
            ts,
            &ctx,
            config,
            &records.discords,
            floor,
            config.prune_next,
        )?;
    }

    info!(
        metric = M::name(),
        window = config.window,
        requested = k,
        found = records.len(),
        distance_calls = records.distance_calls(),
        "top-k discord search finished"
    );
    Ok(records)
}

/// Append the pass result to `records`, returning the discord it found.
fn record(records: &mut DiscordRecords, scan: &DiscordScan) -> Option<Discord> {
    records.passes.push(scan.stats);
    let discord = scan.discord?;
    records.discords.push(discord);
    Some(discord)
}

fn next_floor(config: &DiscordConfig, scan: &DiscordScan) -> f64 {
    match config.floor_policy {
        FloorPolicy::Conservative => 0.0,
        FloorPolicy::Aggressive => scan.next_floor,
    }
}
