//! # Classifier & Enricher
//!
//! Turns verified [`ZoneGroup`]s into reportable nestings and builds the two
//! cross-reference tables: one row per TAZ listing its sibling Block Groups,
//! one row per Block Group listing its sibling TAZs.
//!
//! Sibling lists stay variable-length here. Padding to a common width is a
//! presentation concern; [`ZoneTable::max_siblings`] gives writers the width.

use std::collections::BTreeMap;

use serde::Serialize;
use zonenest_core::{
    BlockGroupId, NestingError, NestingId, NestingShape, Population, PopulationBucket, TazId,
    ZoneClassification,
};

use crate::filter::FilteredMatrix;
use crate::incidence::Incidence;
use crate::matrix::ZoneGroup;
use crate::pipeline::DiscoveryDiagnostics;

/// A maximal group of TAZs and Block Groups sharing population only with
/// each other. Members are ascending by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Nesting {
    /// Ordinal in discovery order, starting at 1.
    pub id: NestingId,
    /// Alignment shape derived from the member counts.
    pub shape: NestingShape,
    /// Member TAZs.
    pub tazs: Vec<TazId>,
    /// Member Block Groups.
    pub block_groups: Vec<BlockGroupId>,
    /// Total population of the nesting.
    pub population: Population,
}

impl Nesting {
    /// Number of member TAZs.
    pub fn taz_count(&self) -> usize {
        self.tazs.len()
    }

    /// Number of member Block Groups.
    pub fn block_group_count(&self) -> usize {
        self.block_groups.len()
    }
}

/// One output row: a zone, its nesting, and its siblings on the other axis.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ZoneRecord<Z, S> {
    /// The zone this row describes.
    pub id: Z,
    /// Owning nesting, or [`NestingId::NO_POPULATION`].
    pub nesting: NestingId,
    /// Shape of the owning nesting, or "No Population".
    pub classification: ZoneClassification,
    /// The zone's own total population.
    pub population: Population,
    /// Bucket of `population`.
    pub bucket: PopulationBucket,
    /// Zones on the other axis in the same nesting, ascending by id.
    pub siblings: Vec<S>,
}

/// Output table keyed by zone id, rows ascending by id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ZoneTable<Z, S> {
    records: Vec<ZoneRecord<Z, S>>,
}

/// TAZ → sibling Block Groups.
pub type TazTable = ZoneTable<TazId, BlockGroupId>;

/// Block Group → sibling TAZs.
pub type BlockGroupTable = ZoneTable<BlockGroupId, TazId>;

impl<Z: Ord, S> ZoneTable<Z, S> {
    fn from_records(mut records: Vec<ZoneRecord<Z, S>>) -> Self {
        records.sort_by(|a, b| a.id.cmp(&b.id));
        Self { records }
    }

    /// All rows, ascending by id.
    pub fn records(&self) -> &[ZoneRecord<Z, S>] {
        &self.records
    }

    /// Look up the row for one zone.
    pub fn get(&self, id: &Z) -> Option<&ZoneRecord<Z, S>> {
        self.records
            .binary_search_by(|record| record.id.cmp(id))
            .ok()
            .map(|index| &self.records[index])
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the table has no rows.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Longest sibling list; the pad width for fixed-width output.
    pub fn max_siblings(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.siblings.len())
            .max()
            .unwrap_or(0)
    }
}

/// Everything one discovery run produces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestingReport {
    /// Nestings in discovery order.
    pub nestings: Vec<Nesting>,
    /// One row per TAZ.
    pub tazs: TazTable,
    /// One row per Block Group.
    pub block_groups: BlockGroupTable,
    /// How the run went.
    pub diagnostics: DiscoveryDiagnostics,
}

/// Run-level counts for logs and `summary.json`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NestingSummary {
    /// Number of nestings found.
    pub nestings: usize,
    /// Nestings per shape, every shape present.
    pub by_shape: BTreeMap<NestingShape, usize>,
    /// TAZs in the input.
    pub tazs: usize,
    /// Block Groups in the input.
    pub block_groups: usize,
    /// TAZs in the "No Population" group.
    pub zero_population_tazs: usize,
    /// Block Groups in the "No Population" group.
    pub zero_population_block_groups: usize,
    /// Population across all nestings.
    pub total_population: Population,
}

impl NestingReport {
    /// The nesting a TAZ belongs to, `None` for unknown ids.
    pub fn nesting_of_taz(&self, taz: &TazId) -> Option<NestingId> {
        self.tazs.get(taz).map(|record| record.nesting)
    }

    /// The nesting a Block Group belongs to, `None` for unknown ids.
    pub fn nesting_of_block_group(&self, block_group: &BlockGroupId) -> Option<NestingId> {
        self.block_groups.get(block_group).map(|record| record.nesting)
    }

    /// Nestings of one shape, in discovery order.
    pub fn nestings_of_shape(&self, shape: NestingShape) -> impl Iterator<Item = &Nesting> + '_ {
        self.nestings.iter().filter(move |n| n.shape == shape)
    }

    /// Aggregate counts.
    pub fn summary(&self) -> NestingSummary {
        let mut by_shape: BTreeMap<NestingShape, usize> =
            NestingShape::all().iter().map(|&shape| (shape, 0)).collect();
        for nesting in &self.nestings {
            *by_shape.entry(nesting.shape).or_default() += 1;
        }
        let unnested = |classification: &ZoneClassification| {
            *classification == ZoneClassification::NoPopulation
        };
        NestingSummary {
            nestings: self.nestings.len(),
            by_shape,
            tazs: self.tazs.len(),
            block_groups: self.block_groups.len(),
            zero_population_tazs: self
                .tazs
                .records()
                .iter()
                .filter(|r| unnested(&r.classification))
                .count(),
            zero_population_block_groups: self
                .block_groups
                .records()
                .iter()
                .filter(|r| unnested(&r.classification))
                .count(),
            // Nestings are disjoint, so this is bounded by the incidence total.
            total_population: self.nestings.iter().map(|n| n.population).sum(),
        }
    }
}

/// Classify verified groups and assemble the report.
///
/// # Errors
///
/// Returns [`NestingError::Validation`] if a group is empty on either axis,
/// which a verified partition of an active matrix never produces.
pub fn enrich(
    incidence: &Incidence,
    filtered: &FilteredMatrix,
    groups: &[ZoneGroup],
    diagnostics: DiscoveryDiagnostics,
) -> Result<NestingReport, NestingError> {
    let matrix = filtered.active.matrix();
    let mut nestings = Vec::with_capacity(groups.len());
    let mut taz_records = Vec::with_capacity(matrix.n_rows() + filtered.empty_tazs.len());
    let mut bg_records =
        Vec::with_capacity(matrix.n_cols() + filtered.empty_block_groups.len());

    let mut id = NestingId::first();
    for group in groups {
        let mut rows = group.rows.clone();
        rows.sort_unstable();
        let mut cols = group.cols.clone();
        cols.sort_unstable();

        let tazs: Vec<TazId> = rows.iter().map(|&r| matrix.tazs()[r].clone()).collect();
        let block_groups: Vec<BlockGroupId> = cols
            .iter()
            .map(|&c| matrix.block_groups()[c].clone())
            .collect();
        let shape = NestingShape::classify(tazs.len(), block_groups.len())?;
        // Bounded by `Incidence::total_population`, which is overflow-checked.
        let population: Population = tazs.iter().map(|t| incidence.population_of_taz(t)).sum();

        for taz in &tazs {
            let own = incidence.population_of_taz(taz);
            taz_records.push(ZoneRecord {
                id: taz.clone(),
                nesting: id,
                classification: shape.into(),
                population: own,
                bucket: PopulationBucket::of(own),
                siblings: block_groups.clone(),
            });
        }
        for block_group in &block_groups {
            let own = incidence.population_of_block_group(block_group);
            bg_records.push(ZoneRecord {
                id: block_group.clone(),
                nesting: id,
                classification: shape.into(),
                population: own,
                bucket: PopulationBucket::of(own),
                siblings: tazs.clone(),
            });
        }

        tracing::debug!(
            nesting = %id,
            shape = %shape,
            tazs = tazs.len(),
            block_groups = block_groups.len(),
            "classified nesting"
        );
        nestings.push(Nesting {
            id,
            shape,
            tazs,
            block_groups,
            population,
        });
        id = id.next();
    }

    for taz in &filtered.empty_tazs {
        taz_records.push(no_population_record(
            taz.clone(),
            incidence.population_of_taz(taz),
        ));
    }
    for block_group in &filtered.empty_block_groups {
        bg_records.push(no_population_record(
            block_group.clone(),
            incidence.population_of_block_group(block_group),
        ));
    }

    let report = NestingReport {
        nestings,
        tazs: ZoneTable::from_records(taz_records),
        block_groups: ZoneTable::from_records(bg_records),
        diagnostics,
    };
    tracing::info!(
        nestings = report.nestings.len(),
        tazs = report.tazs.len(),
        block_groups = report.block_groups.len(),
        "classified nestings"
    );
    Ok(report)
}

fn no_population_record<Z, S>(id: Z, population: Population) -> ZoneRecord<Z, S> {
    ZoneRecord {
        id,
        nesting: NestingId::NO_POPULATION,
        classification: ZoneClassification::NoPopulation,
        population,
        bucket: PopulationBucket::Zero,
        siblings: Vec::new(),
    }
}
