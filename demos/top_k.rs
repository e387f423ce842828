//! Top-k discords with pruned follow-up passes.
//!
//! Each pass excludes the zones of the discords already found. Compares the
//! two prune floor policies: both return the same discords, the aggressive one
//! usually with fewer distance computations.
//!
//! Run with: cargo run --release --example top_k

use discord_rs::{BoundaryPolicy, BruteForceEngine, DiscordConfig, FloorPolicy};

fn main() {
    let n = 2000;
    let m = 40;
    let k = 4;

    let mut ts: Vec<f64> = (0..n)
        .map(|i| {
            let t = i as f64;
            (t * std::f64::consts::TAU / 50.0).sin() + 0.1 * (t * 3.1).cos()
        })
        .collect();
    // Injected anomalies of decreasing severity
    for (at, level) in [(300, 3.0), (900, 2.0), (1500, 1.2)] {
        for v in &mut ts[at..at + 10] {
            *v += level;
        }
    }

    let base = DiscordConfig::new(m)
        .with_boundary(BoundaryPolicy::Full)
        .with_early_abandon(true);

    println!("Top-{k} discords (n={n}, m={m})");
    println!("================================");

    for policy in [FloorPolicy::Conservative, FloorPolicy::Aggressive] {
        let engine = BruteForceEngine::new(base.clone().with_floor_policy(policy));
        let records = match engine.top_k(&ts, k) {
            Ok(records) => records,
            Err(e) => {
                eprintln!("top-k search failed: {e}");
                std::process::exit(1);
            }
        };

        println!("\n{policy:?} floor:");
        print!("{records}");
        for (pass, stats) in records.passes.iter().enumerate() {
            println!(
                "  pass {}: {} distance calls, {} pruned, {} excluded, {:?}",
                pass + 1,
                stats.distance_calls,
                stats.candidates_pruned,
                stats.candidates_excluded,
                stats.elapsed
            );
        }
        println!("  total: {} distance calls", records.distance_calls());
    }
}
