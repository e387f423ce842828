//! Discords in a series loaded from a text file.
//!
//! The file holds whitespace-separated numbers, for example the classic
//! power demand dataset with one reading per line. Prints the discords and
//! their pass statistics as JSON.
//!
//! Run with:
//!   RUST_LOG=discord_rs=debug cargo run --release --example power_demand -- data.txt 750 -k 3

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use clap::Parser;
use discord_rs::{BruteForceEngine, DiscordConfig, Window};
use tracing_subscriber::EnvFilter;

/// Find the most anomalous subsequences of a time series file
#[derive(Parser)]
#[command(name = "power_demand")]
struct Args {
    /// Whitespace-separated series file
    path: PathBuf,

    /// Subsequence length
    window: usize,

    /// Number of discords to report
    #[arg(short, long, default_value_t = 1)]
    k: usize,

    /// Scan candidates sequentially
    #[arg(long)]
    sequential: bool,
}

fn load_series(path: &Path) -> Result<Vec<f64>> {
    let text = fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    text.split_whitespace()
        .enumerate()
        .map(|(idx, token)| {
            token.parse::<f64>().with_context(|| {
                format!("{}: value #{idx} is not a number: {token:?}", path.display())
            })
        })
        .collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("discord_rs=info")),
        )
        .init();

    let args = Args::parse();
    let ts = load_series(&args.path)?;
    tracing::info!(
        path = %args.path.display(),
        n = ts.len(),
        window = args.window,
        k = args.k,
        "series loaded"
    );

    let config = DiscordConfig::new(args.window)
        .with_early_abandon(true)
        .with_parallel(!args.sequential);
    let records = BruteForceEngine::new(config)
        .top_k(&ts, args.k)
        .context("discord search failed")?;

    print!("{records}");
    for d in records.iter() {
        let values = Window::new(d.position, args.window, ts.len())?.slice(&ts);
        let (lo, hi) = values
            .iter()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| {
                (lo.min(v), hi.max(v))
            });
        println!("  #{}: values in [{lo:.3}, {hi:.3}]", d.rank);
    }
    println!("{}", serde_json::to_string_pretty(&records)?);
    Ok(())
}
