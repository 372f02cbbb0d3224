//! # Discovery Pipeline
//!
//! Runs the stages end to end. Each stage takes immutable input and returns
//! a new structure; nothing is shared between runs.
//!
//! ```text
//! rows ─► Incidence ─► ShareMatrix ─► split_zero_population
//!                                        │
//!                     ┌──────────────────┴──────────────────┐
//!            MatrixSort: sort ─► extract         UnionFind: components
//!                     └──────────────────┬──────────────────┘
//!                                        ▼
//!                                 verify_partition ─► enrich ─► NestingReport
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use zonenest_core::{NestingError, ValidationError};

use crate::components::connected_components;
use crate::enrich::{enrich, NestingReport};
use crate::extract::{ComponentExtractor, DEFAULT_MAX_EXPANSION_ROUNDS};
use crate::filter::split_zero_population;
use crate::incidence::{Incidence, RawRow};
use crate::matrix::ShareMatrix;
use crate::sort::{MatrixSorter, DEFAULT_MAX_SORT_PASSES};
use crate::verify::verify_partition;

/// How nestings are discovered from the active matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Strategy {
    /// Alternating matrix sort followed by diagonal block extraction.
    #[default]
    MatrixSort,
    /// Union-find over the edge list.
    UnionFind,
}

impl Strategy {
    /// Kebab-case name, as used in configuration.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::MatrixSort => "matrix-sort",
            Self::UnionFind => "union-find",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Strategy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "matrix-sort" => Ok(Self::MatrixSort),
            "union-find" => Ok(Self::UnionFind),
            other => Err(ValidationError::UnknownLabel {
                kind: "strategy",
                value: other.to_string(),
            }),
        }
    }
}

/// Tuning for one discovery run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DiscoveryOptions {
    /// Which discovery strategy to run.
    pub strategy: Strategy,
    /// Sorter pass budget (full row + column cycles).
    pub max_sort_passes: usize,
    /// Treat an exhausted sort budget as a failure instead of a warning.
    pub require_sort_convergence: bool,
    /// Expansion round cap per extracted block.
    pub max_expansion_rounds: usize,
}

impl Default for DiscoveryOptions {
    fn default() -> Self {
        Self {
            strategy: Strategy::default(),
            max_sort_passes: DEFAULT_MAX_SORT_PASSES,
            require_sort_convergence: false,
            max_expansion_rounds: DEFAULT_MAX_EXPANSION_ROUNDS,
        }
    }
}

/// How a run went, carried in the report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct DiscoveryDiagnostics {
    /// Strategy that produced the partition.
    pub strategy: Strategy,
    /// Number of input rows summed.
    pub input_records: usize,
    /// Sorter passes run; `None` for union-find.
    pub sort_passes: Option<usize>,
    /// Whether the sorter reached a fixed point; `None` for union-find.
    pub sort_converged: Option<bool>,
}

/// Discover nestings from raw rows.
///
/// # Errors
///
/// - [`NestingError::MalformedRow`] for invalid input.
/// - [`NestingError::PopulationOverflow`] when the population total does not fit.
/// - [`NestingError::NotConverged`] when a bounded stage gives up.
/// - [`NestingError::PartitionViolation`] when the partition fails verification.
pub fn discover<I>(rows: I, options: &DiscoveryOptions) -> Result<NestingReport, NestingError>
where
    I: IntoIterator<Item = RawRow>,
{
    tracing::info!("building incidence");
    let incidence = Incidence::from_rows(rows)?;
    discover_from_incidence(&incidence, options)
}

/// Discover nestings from already-summed population totals.
///
/// # Errors
///
/// As [`discover`], minus input validation.
pub fn discover_from_incidence(
    incidence: &Incidence,
    options: &DiscoveryOptions,
) -> Result<NestingReport, NestingError> {
    let matrix = ShareMatrix::from_incidence(incidence);
    tracing::info!(
        tazs = matrix.n_rows(),
        block_groups = matrix.n_cols(),
        edges = matrix.edge_count(),
        "built share matrix"
    );

    let filtered = split_zero_population(&matrix);

    let (groups, sort_passes, sort_converged) = match options.strategy {
        Strategy::MatrixSort => {
            let sorter = MatrixSorter {
                max_passes: options.max_sort_passes,
                require_convergence: options.require_sort_convergence,
            };
            let sorted = sorter.sort(&filtered.active)?;
            let groups =
                ComponentExtractor::new(options.max_expansion_rounds).extract(&sorted)?;
            (groups, Some(sorted.passes_run()), Some(sorted.converged()))
        }
        Strategy::UnionFind => (connected_components(&filtered.active), None, None),
    };

    verify_partition(&filtered.active, &groups)?;

    let diagnostics = DiscoveryDiagnostics {
        strategy: options.strategy,
        input_records: incidence.record_count(),
        sort_passes,
        sort_converged,
    };
    enrich(incidence, &filtered, &groups, diagnostics)
}
