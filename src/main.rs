//! perf_plot - main entry point
//!
//! Reads `performance_data.csv` from the working directory and writes the
//! append-performance charts under `docs/images/`. Behaviour can be adjusted
//! with an optional `perfplot.json` next to the CSV.

use anyhow::Context;
use perf_plot::config::{PlotConfig, CONFIG_FILE};
use perf_plot::pipeline;
use std::path::Path;

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    println!("perf_plot v{}", env!("CARGO_PKG_VERSION"));

    match run() {
        Ok(()) => {
            println!("\n✓ Charts generated successfully!");
        }
        Err(e) => {
            eprintln!("\n✗ Chart generation failed: {:#}", e);
            std::process::exit(1);
        }
    }
}

fn run() -> anyhow::Result<()> {
    let config = PlotConfig::load_or_default(Path::new(CONFIG_FILE))
        .context("Failed to load configuration")?;

    println!("Configuration:");
    println!("  Input: {}", config.input.display());
    println!("  Size: {}×{}", config.width, config.height);
    println!("  Palette: {}", config.palette);
    println!("  Charts: {}", config.charts.len());

    let results = pipeline::generate_charts(&config).context("Failed to generate charts")?;

    println!("\nWrote {} image(s):", results.len());
    for result in &results {
        println!("  {} ({} bytes)", result.path.display(), result.bytes);
    }

    Ok(())
}
