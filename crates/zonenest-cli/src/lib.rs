//! # zonenest-cli — Nesting Discovery Command-Line Interface
//!
//! Provides the `zonenest` binary around the `zonenest-partition` library:
//! configuration loading, input table reading, and output table writing.
//!
//! ## Subcommands
//!
//! - `zonenest discover`: run discovery and write the output tables.
//! - `zonenest inspect`: run discovery and print a per-shape summary.
//!
//! ```bash
//! zonenest -v --config zonenest.yaml discover blocks.csv
//! zonenest inspect blocks.json --strategy union-find
//! ```
//!
//! ## Crate Policy
//!
//! - CLI construction (argument parsing) is separated from business logic.
//! - Handlers delegate to `zonenest-partition`; no discovery logic here.
//! - Handlers return `anyhow::Result<u8>`; `main` maps errors to exit code 1.

pub mod config;
pub mod discover;
pub mod input;
pub mod inspect;
pub mod output;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn public_modules_are_accessible() {
        let _ = std::any::type_name::<config::NestingConfig>();
        let _ = std::any::type_name::<discover::DiscoverArgs>();
        let _ = std::any::type_name::<inspect::InspectArgs>();
        let _ = std::any::type_name::<input::InputError>();
    }
}
