//! # Inspect Subcommand
//!
//! Runs discovery and prints a per-shape summary without writing files.

use std::fmt::Write as _;
use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use zonenest_partition::{DiscoveryDiagnostics, NestingSummary, Strategy};

use crate::config::NestingConfig;
use crate::discover::load_and_discover;

/// Arguments for `zonenest inspect`.
#[derive(Args, Debug)]
pub struct InspectArgs {
    /// Input table (.csv or .json).
    pub input: PathBuf,

    /// Discovery strategy (matrix-sort or union-find).
    #[arg(long)]
    pub strategy: Option<Strategy>,
}

/// Execute `zonenest inspect`.
pub fn run_inspect(args: &InspectArgs, config: &NestingConfig) -> Result<u8> {
    let mut config = config.clone();
    if let Some(strategy) = args.strategy {
        config.discovery.strategy = strategy;
    }
    let report = load_and_discover(&args.input, &config)?;
    print!("{}", render_summary(&report.summary(), &report.diagnostics));
    Ok(0)
}

/// Plain-text summary, one fact per line.
pub fn render_summary(summary: &NestingSummary, diagnostics: &DiscoveryDiagnostics) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "strategy:        {}", diagnostics.strategy);
    if let (Some(passes), Some(converged)) = (diagnostics.sort_passes, diagnostics.sort_converged) {
        let _ = writeln!(out, "sort passes:     {passes} (converged: {converged})");
    }
    let _ = writeln!(out, "input records:   {}", diagnostics.input_records);
    let _ = writeln!(out, "TAZs:            {}", summary.tazs);
    let _ = writeln!(out, "block groups:    {}", summary.block_groups);
    let _ = writeln!(out, "nestings:        {}", summary.nestings);
    for (shape, count) in &summary.by_shape {
        let _ = writeln!(out, "  {:<18} {count}", shape.label());
    }
    let _ = writeln!(
        out,
        "no population:   {} TAZ(s), {} block group(s)",
        summary.zero_population_tazs, summary.zero_population_block_groups
    );
    let _ = writeln!(out, "population:      {}", summary.total_population);
    out
}
