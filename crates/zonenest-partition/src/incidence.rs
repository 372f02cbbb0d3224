//! # Incidence Builder
//!
//! Aggregates raw input rows into population totals per TAZ, per Block
//! Group, and per (TAZ, Block Group) pair. Rows may arrive in any order;
//! totals are plain sums.
//!
//! Malformed rows abort the build. There is no best-effort ingestion: the
//! first missing identifier or negative population is reported with its
//! 1-based record number.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use zonenest_core::{BlockGroupId, MalformedRowReason, NestingError, Population, TazId};

/// One row of the raw join table: a fine-grained unit (typically a census
/// block) that lies in exactly one TAZ and one Block Group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawRow {
    /// TAZ identifier, absent when the source cell was empty.
    #[serde(default)]
    pub taz: Option<String>,
    /// Block Group identifier, absent when the source cell was empty.
    #[serde(default)]
    pub block_group: Option<String>,
    /// Population of the unit.
    pub population: i64,
}

impl RawRow {
    /// Convenience constructor for a fully populated row.
    pub fn new(taz: impl Into<String>, block_group: impl Into<String>, population: i64) -> Self {
        Self {
            taz: Some(taz.into()),
            block_group: Some(block_group.into()),
            population,
        }
    }

    /// Validate the row into typed identifiers and a non-negative population.
    fn validate(&self, record: usize) -> Result<(TazId, BlockGroupId, Population), NestingError> {
        let malformed = |reason| NestingError::MalformedRow { record, reason };

        let taz = self
            .taz
            .as_deref()
            .and_then(|raw| TazId::new(raw).ok())
            .ok_or_else(|| malformed(MalformedRowReason::MissingTaz))?;
        let block_group = self
            .block_group
            .as_deref()
            .and_then(|raw| BlockGroupId::new(raw).ok())
            .ok_or_else(|| malformed(MalformedRowReason::MissingBlockGroup))?;
        let population = Population::try_from(self.population)
            .map_err(|_| malformed(MalformedRowReason::NegativePopulation(self.population)))?;

        Ok((taz, block_group, population))
    }
}

/// Population totals derived from the raw rows.
///
/// Every zone named by any row is present, including zones whose rows all
/// carry zero population. Maps iterate in ascending zone-id order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Incidence {
    taz_population: BTreeMap<TazId, Population>,
    block_group_population: BTreeMap<BlockGroupId, Population>,
    pair_population: BTreeMap<(TazId, BlockGroupId), Population>,
    total_population: Population,
    records: usize,
}

impl Incidence {
    /// Sum a sequence of raw rows.
    ///
    /// # Errors
    ///
    /// - [`NestingError::MalformedRow`] for the first row with a missing
    ///   identifier or a negative population.
    /// - [`NestingError::PopulationOverflow`] for the first row that pushes
    ///   the grand total past [`Population::MAX`].
    pub fn from_rows<I>(rows: I) -> Result<Self, NestingError>
    where
        I: IntoIterator<Item = RawRow>,
    {
        let mut incidence = Self::default();
        for (index, row) in rows.into_iter().enumerate() {
            let record = index + 1;
            let (taz, block_group, population) = row.validate(record)?;
            incidence.accumulate(record, taz, block_group, population)?;
        }
        tracing::debug!(
            records = incidence.records,
            tazs = incidence.taz_population.len(),
            block_groups = incidence.block_group_population.len(),
            pairs = incidence.pair_population.len(),
            "incidence built"
        );
        Ok(incidence)
    }

    /// Add one row. Every zone and pair total is bounded by the grand
    /// total, so checking that one sum covers them all.
    fn accumulate(
        &mut self,
        record: usize,
        taz: TazId,
        block_group: BlockGroupId,
        population: Population,
    ) -> Result<(), NestingError> {
        self.total_population = self
            .total_population
            .checked_add(population)
            .ok_or(NestingError::PopulationOverflow { record })?;
        self.records += 1;
        *self.taz_population.entry(taz.clone()).or_default() += population;
        *self
            .block_group_population
            .entry(block_group.clone())
            .or_default() += population;
        *self
            .pair_population
            .entry((taz, block_group))
            .or_default() += population;
        Ok(())
    }

    /// Population across all rows. Any sum of zone populations is at most this.
    pub fn total_population(&self) -> Population {
        self.total_population
    }

    /// Number of rows that were summed.
    pub fn record_count(&self) -> usize {
        self.records
    }

    /// Total population per TAZ, ascending by id.
    pub fn taz_population(&self) -> &BTreeMap<TazId, Population> {
        &self.taz_population
    }

    /// Total population per Block Group, ascending by id.
    pub fn block_group_population(&self) -> &BTreeMap<BlockGroupId, Population> {
        &self.block_group_population
    }

    /// Population of a single TAZ; zero for unknown ids.
    pub fn population_of_taz(&self, taz: &TazId) -> Population {
        self.taz_population.get(taz).copied().unwrap_or(0)
    }

    /// Population of a single Block Group; zero for unknown ids.
    pub fn population_of_block_group(&self, block_group: &BlockGroupId) -> Population {
        self.block_group_population
            .get(block_group)
            .copied()
            .unwrap_or(0)
    }

    /// Population shared by a (TAZ, Block Group) pair; zero when they do not meet.
    pub fn shared_population(&self, taz: &TazId, block_group: &BlockGroupId) -> Population {
        self.pair_population
            .get(&(taz.clone(), block_group.clone()))
            .copied()
            .unwrap_or(0)
    }

    /// Edges: pairs with positive shared population.
    pub fn edges(&self) -> impl Iterator<Item = (&TazId, &BlockGroupId, Population)> + '_ {
        self.pair_population
            .iter()
            .filter(|(_, population)| **population > 0)
            .map(|((taz, block_group), &population)| (taz, block_group, population))
    }
}
