//! # zonenest-partition — Nesting Discovery
//!
//! Partitions two overlapping zoning systems (TAZs and Block Groups) into
//! nestings: maximal groups whose members share population only with each
//! other.
//!
//! ## Pipeline
//!
//! 1. **Incidence** (`incidence.rs`): sums raw `(taz, block_group, population)`
//!    rows into per-zone and per-pair totals.
//! 2. **Share matrix** (`matrix.rs`): boolean TAZ × Block Group relation,
//!    `true` where a pair shares population.
//! 3. **Zero-population filter** (`filter.rs`): removes zones with no edge
//!    and hands them straight to the sentinel group.
//! 4. **Sorter** (`sort.rs`): alternating column/row reordering that pulls
//!    each nesting into a contiguous block.
//! 5. **Extractor** (`extract.rs`): walks the sorted matrix diagonally and
//!    grows each candidate block to a fixed point.
//! 6. **Verifier** (`verify.rs`): rejects any partition with cross edges,
//!    disconnected groups, or unassigned zones.
//! 7. **Enricher** (`enrich.rs`): shape classification, population buckets,
//!    and the TAZ / Block Group cross-reference tables.
//!
//! Steps 4 and 5 can be replaced by union-find over the edge list
//! (`components.rs`) via [`Strategy::UnionFind`]. Both strategies are
//! verified against the same reference.
//!
//! ## Mathematical Definition
//!
//! Let G = (T ∪ B, E) be the bipartite graph with an edge (t, b) whenever
//! TAZ t and Block Group b share positive population. Nestings are the
//! connected components of G restricted to vertices of positive degree.

pub mod components;
pub mod enrich;
pub mod extract;
pub mod filter;
pub mod incidence;
pub mod matrix;
pub mod pipeline;
pub mod sort;
pub mod verify;

#[cfg(test)]
pub(crate) mod fixtures;

pub use components::connected_components;
pub use enrich::{
    BlockGroupTable, Nesting, NestingReport, NestingSummary, TazTable, ZoneRecord, ZoneTable,
};
pub use extract::ComponentExtractor;
pub use filter::{split_zero_population, ActiveMatrix, FilteredMatrix};
pub use incidence::{Incidence, RawRow};
pub use matrix::{ShareMatrix, ZoneGroup};
pub use pipeline::{
    discover, discover_from_incidence, DiscoveryDiagnostics, DiscoveryOptions, Strategy,
};
pub use sort::{MatrixSorter, SortedMatrix};
pub use verify::verify_partition;
