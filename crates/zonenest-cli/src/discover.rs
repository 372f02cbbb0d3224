//! # Discover Subcommand
//!
//! Reads an input table, runs nesting discovery, and writes the output
//! tables into a (by default timestamped) folder.
//!
//! ```bash
//! zonenest discover blocks.csv
//! zonenest discover blocks.csv --strategy union-find --output-dir runs --no-timestamp
//! ```

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Local;
use clap::Args;

use zonenest_partition::{discover, NestingReport, Strategy};

use crate::config::NestingConfig;
use crate::input::read_rows;
use crate::output::{output_folder, write_report};

/// Arguments for `zonenest discover`.
#[derive(Args, Debug)]
pub struct DiscoverArgs {
    /// Input table (.csv or .json).
    pub input: PathBuf,

    /// Base output directory. Overrides `output.directory`.
    #[arg(long)]
    pub output_dir: Option<PathBuf>,

    /// Discovery strategy (matrix-sort or union-find).
    #[arg(long)]
    pub strategy: Option<Strategy>,

    /// Sorter pass budget. Overrides `discovery.max_sort_passes`.
    #[arg(long)]
    pub max_sort_passes: Option<usize>,

    /// Write directly into the output directory instead of a
    /// `nesting_YYYYMMDD_HHMMSS` folder.
    #[arg(long)]
    pub no_timestamp: bool,
}

impl DiscoverArgs {
    /// Layer command-line overrides on top of the loaded config.
    pub fn apply(&self, config: &mut NestingConfig) {
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.clone();
        }
        if let Some(strategy) = self.strategy {
            config.discovery.strategy = strategy;
        }
        if let Some(passes) = self.max_sort_passes {
            config.discovery.max_sort_passes = passes;
        }
        if self.no_timestamp {
            config.output.timestamped = false;
        }
    }
}

/// Read `input` and run discovery with `config`.
pub fn load_and_discover(input: &Path, config: &NestingConfig) -> Result<NestingReport> {
    let rows = read_rows(input, &config.input)?;
    let options = config.discovery_options();
    tracing::info!(
        strategy = %options.strategy,
        max_sort_passes = options.max_sort_passes,
        "discovering nestings"
    );
    let report = discover(rows, &options)
        .with_context(|| format!("discovering nestings in {}", input.display()))?;
    Ok(report)
}

/// Execute `zonenest discover`. Prints the output folder on success.
pub fn run_discover(args: &DiscoverArgs, config: &NestingConfig) -> Result<u8> {
    let mut config = config.clone();
    args.apply(&mut config);

    let report = load_and_discover(&args.input, &config)?;

    let now = Local::now();
    let folder = output_folder(&config.output.directory, config.output.timestamped, now);
    write_report(&report, &folder, &config.output, &args.input, now)?;

    println!("{}", folder.display());
    Ok(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::output::{BLOCK_GROUP_TABLE_FILE, NESTINGS_FILE, SUMMARY_FILE, TAZ_TABLE_FILE};

    const TABLE: &str = "\
BLOCK,TAZ_10,BLKGRP10,POP10
b1,1,1,120
b2,2,2,80
b3,3,3,400
b4,3,4,150
b5,4,4,0
b6,5,5,0
";

    fn args(input: PathBuf, output_dir: PathBuf) -> DiscoverArgs {
        DiscoverArgs {
            input,
            output_dir: Some(output_dir),
            strategy: None,
            max_sort_passes: None,
            no_timestamp: true,
        }
    }

    #[test]
    fn overrides_replace_config_values() {
        let mut config = NestingConfig::default();
        let overrides = DiscoverArgs {
            input: PathBuf::from("in.csv"),
            output_dir: Some(PathBuf::from("runs")),
            strategy: Some(Strategy::UnionFind),
            max_sort_passes: Some(4),
            no_timestamp: true,
        };
        overrides.apply(&mut config);
        assert_eq!(config.output.directory, PathBuf::from("runs"));
        assert_eq!(config.discovery.strategy, Strategy::UnionFind);
        assert_eq!(config.discovery.max_sort_passes, 4);
        assert!(!config.output.timestamped);
    }

    #[test]
    fn absent_overrides_keep_config_values() {
        let mut config = NestingConfig::default();
        let overrides = DiscoverArgs {
            input: PathBuf::from("in.csv"),
            output_dir: None,
            strategy: None,
            max_sort_passes: None,
            no_timestamp: false,
        };
        overrides.apply(&mut config);
        assert_eq!(config, NestingConfig::default());
    }

    #[test]
    fn writes_all_outputs_for_csv_input() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blocks.csv");
        std::fs::write(&input, TABLE).unwrap();
        let out = dir.path().join("out");

        let code = run_discover(&args(input, out.clone()), &NestingConfig::default()).unwrap();
        assert_eq!(code, 0);
        for file in [TAZ_TABLE_FILE, BLOCK_GROUP_TABLE_FILE, NESTINGS_FILE, SUMMARY_FILE] {
            assert!(out.join(file).is_file(), "{file} missing");
        }

        let taz_table = std::fs::read_to_string(out.join(TAZ_TABLE_FILE)).unwrap();
        let lines: Vec<&str> = taz_table.lines().collect();
        assert_eq!(lines.len(), 6);
        assert_eq!(lines[3], "3,3,\"One TAZ, Many BGs\",550,<600,3,4");
        assert_eq!(lines[5], "5,0,No Population,0,0,,");
    }

    #[test]
    fn timestamped_run_creates_a_nested_folder() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("blocks.csv");
        std::fs::write(&input, TABLE).unwrap();
        let out = dir.path().join("out");
        let mut run_args = args(input, out.clone());
        run_args.no_timestamp = false;

        run_discover(&run_args, &NestingConfig::default()).unwrap();
        let entries: Vec<String> = std::fs::read_dir(&out)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(entries.len(), 1);
        assert!(entries[0].starts_with("nesting_"));
    }

    #[test]
    fn malformed_input_names_the_file_and_record() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("bad.csv");
        std::fs::write(&input, "TAZ_10,BLKGRP10,POP10\n1,1,5\n2,2,-3\n").unwrap();
        let out = dir.path().join("out");

        let err = run_discover(&args(input, out.clone()), &NestingConfig::default()).unwrap_err();
        let message = format!("{err:#}");
        assert!(message.contains("bad.csv"), "{message}");
        assert!(message.contains("record 2"), "{message}");
        assert!(!out.exists());
    }
}
