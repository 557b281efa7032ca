//! Export accumulation series for every saving product in a catalog
//!
//! Outputs one CSV with a row per product per month, for charting.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::Parser;
use rayon::prelude::*;
use savings_simulator::product::load_catalog;
use savings_simulator::simulation::{accumulate_with, AccumulationSeries, SeriesCsvWriter, SeriesSummary};
use savings_simulator::SimulationConfig;
use std::fs::File;
use std::io::BufWriter;
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "export_series", about = "Export savings series for a whole catalog")]
struct Args {
    /// Catalog file (.json or .csv)
    catalog: PathBuf,

    /// Output CSV path
    #[arg(default_value = "series_output.csv")]
    output: PathBuf,

    /// Monthly contribution applied to every product
    #[arg(long)]
    monthly: Option<f64>,

    /// First contribution date, used to label months
    #[arg(long)]
    start: Option<NaiveDate>,

    /// JSON file overriding simulation defaults
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();

    let config = SimulationConfig::load(args.config.as_deref()).context("Invalid simulation config")?;

    let start = Instant::now();
    let catalog = load_catalog(&args.catalog)
        .with_context(|| format!("Failed to load catalog {}", args.catalog.display()))?;
    let savings: Vec<_> = catalog.savings().collect();
    println!("Loaded {} saving products in {:?}", savings.len(), start.elapsed());

    // Run simulations in parallel
    let sim_start = Instant::now();
    let results: Vec<(&str, AccumulationSeries)> = savings
        .par_iter()
        .map(|product| (product.code.as_str(), accumulate_with(&config, product, args.monthly)))
        .collect();
    println!("Simulations complete in {:?}", sim_start.elapsed());

    let file = File::create(&args.output)
        .with_context(|| format!("Failed to create {}", args.output.display()))?;
    let mut writer = SeriesCsvWriter::new(BufWriter::new(file), args.start);
    for (code, series) in &results {
        writer.write_series(code, series)?;
    }
    writer.finish()?;
    println!("Series written to: {}", args.output.display());

    // Best maturity after tax, for a quick sanity check
    let best = results
        .iter()
        .map(|(code, series)| (*code, SeriesSummary::from_series(series, config.tax_rate)))
        .max_by(|a, b| a.1.total_after_tax.total_cmp(&b.1.total_after_tax));
    if let Some((code, summary)) = best {
        println!("\nBest after-tax maturity: {} ({:.0} over {} months)",
            code, summary.total_after_tax, summary.months);
    }

    Ok(())
}
