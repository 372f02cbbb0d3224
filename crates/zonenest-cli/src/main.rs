//! # zonenest CLI entry point
//!
//! Parses command-line arguments, installs logging, loads the optional
//! configuration file, and dispatches to subcommand handlers.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use zonenest_cli::config::NestingConfig;
use zonenest_cli::discover::{run_discover, DiscoverArgs};
use zonenest_cli::inspect::{run_inspect, InspectArgs};

/// TAZ / Block Group nesting discovery.
///
/// Groups Traffic Analysis Zones and census Block Groups into nestings:
/// maximal sets of zones that share population only with each other.
#[derive(Parser, Debug)]
#[command(name = "zonenest", version, about, long_about = None)]
struct Cli {
    /// Enable verbose output. Repeat for more verbosity (-v, -vv, -vvv).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Path to a YAML configuration file.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Emit logs as JSON lines.
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Discover nestings and write the output tables.
    Discover(DiscoverArgs),

    /// Discover nestings and print a summary without writing files.
    Inspect(InspectArgs),
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.log_json);

    tracing::debug!("zonenest v{} starting", env!("CARGO_PKG_VERSION"));

    let result = NestingConfig::load(cli.config.as_deref()).and_then(|config| match &cli.command {
        Commands::Discover(args) => run_discover(args, &config),
        Commands::Inspect(args) => run_inspect(args, &config),
    });

    match result {
        Ok(code) => ExitCode::from(code),
        Err(e) => {
            tracing::error!("{e:#}");
            ExitCode::from(1)
        }
    }
}

/// Verbosity picks the default filter; `RUST_LOG` wins when set.
fn init_tracing(verbose: u8, json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level(verbose)));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

fn level(verbose: u8) -> &'static str {
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cli_parse_discover_defaults() {
        let cli = Cli::try_parse_from(["zonenest", "discover", "blocks.csv"]).unwrap();
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover");
        };
        assert_eq!(args.input, PathBuf::from("blocks.csv"));
        assert!(args.output_dir.is_none());
        assert!(args.strategy.is_none());
        assert!(args.max_sort_passes.is_none());
        assert!(!args.no_timestamp);
    }

    #[test]
    fn cli_parse_discover_with_all_options() {
        let cli = Cli::try_parse_from([
            "zonenest",
            "discover",
            "blocks.csv",
            "--output-dir",
            "runs",
            "--strategy",
            "union-find",
            "--max-sort-passes",
            "25",
            "--no-timestamp",
        ])
        .unwrap();
        let Commands::Discover(args) = cli.command else {
            panic!("expected discover");
        };
        assert_eq!(args.output_dir, Some(PathBuf::from("runs")));
        assert_eq!(args.strategy, Some(zonenest_partition::Strategy::UnionFind));
        assert_eq!(args.max_sort_passes, Some(25));
        assert!(args.no_timestamp);
    }

    #[test]
    fn cli_parse_rejects_unknown_strategy() {
        let result =
            Cli::try_parse_from(["zonenest", "discover", "blocks.csv", "--strategy", "bfs"]);
        assert!(result.is_err());
    }

    #[test]
    fn cli_parse_inspect() {
        let cli = Cli::try_parse_from(["zonenest", "inspect", "rows.json"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect(_)));
    }

    #[test]
    fn cli_parse_global_flags() {
        let cli = Cli::try_parse_from([
            "zonenest",
            "-vv",
            "--config",
            "zonenest.yaml",
            "--log-json",
            "inspect",
            "rows.csv",
        ])
        .unwrap();
        assert_eq!(cli.verbose, 2);
        assert_eq!(cli.config, Some(PathBuf::from("zonenest.yaml")));
        assert!(cli.log_json);
    }

    #[test]
    fn cli_parse_no_subcommand_errors() {
        assert!(Cli::try_parse_from(["zonenest"]).is_err());
    }

    #[test]
    fn verbosity_levels() {
        assert_eq!(level(0), "warn");
        assert_eq!(level(1), "info");
        assert_eq!(level(2), "debug");
        assert_eq!(level(3), "trace");
        assert_eq!(level(9), "trace");
    }
}
