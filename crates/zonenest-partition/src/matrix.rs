//! # Share Matrix
//!
//! The boolean TAZ × Block Group relation: entry (i, j) is `true` iff TAZ i
//! and Block Group j share positive population.
//!
//! Stored sparsely in both orientations. Row `i` lists the column indices
//! of its `true` entries and column `j` lists its row indices, both in
//! ascending order. Row and column indices follow ascending zone-id order,
//! so index order and id order agree.

use zonenest_core::{BlockGroupId, TazId};

use crate::incidence::Incidence;

/// Sparse boolean incidence between TAZs (rows) and Block Groups (columns).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShareMatrix {
    tazs: Vec<TazId>,
    block_groups: Vec<BlockGroupId>,
    rows: Vec<Vec<usize>>,
    cols: Vec<Vec<usize>>,
}

/// A group of zones, by row and column index into a [`ShareMatrix`].
///
/// Both strategies (sort + extract, union-find) produce a list of these;
/// the verifier and enricher consume them.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ZoneGroup {
    /// Row (TAZ) indices in the group.
    pub rows: Vec<usize>,
    /// Column (Block Group) indices in the group.
    pub cols: Vec<usize>,
}

impl ShareMatrix {
    /// Build the matrix from population totals.
    ///
    /// Every zone in the incidence becomes a row or column, including zones
    /// without any edge; those are removed later by the zero-population
    /// filter.
    pub fn from_incidence(incidence: &Incidence) -> Self {
        let tazs: Vec<TazId> = incidence.taz_population().keys().cloned().collect();
        let block_groups: Vec<BlockGroupId> = incidence
            .block_group_population()
            .keys()
            .cloned()
            .collect();

        // Both key lists are sorted, so binary search recovers indices.
        let edges = incidence.edges().filter_map(|(taz, block_group, _)| {
            let row = tazs.binary_search(taz).ok()?;
            let col = block_groups.binary_search(block_group).ok()?;
            Some((row, col))
        });
        let edges: Vec<(usize, usize)> = edges.collect();

        Self::from_edges(tazs, block_groups, edges)
    }

    /// Build the matrix from labels and (row, col) index pairs.
    ///
    /// Out-of-range pairs are ignored; duplicates collapse.
    pub(crate) fn from_edges(
        tazs: Vec<TazId>,
        block_groups: Vec<BlockGroupId>,
        edges: impl IntoIterator<Item = (usize, usize)>,
    ) -> Self {
        let mut rows = vec![Vec::new(); tazs.len()];
        let mut cols = vec![Vec::new(); block_groups.len()];
        for (row, col) in edges {
            if row < rows.len() && col < cols.len() {
                rows[row].push(col);
                cols[col].push(row);
            }
        }
        for adjacency in rows.iter_mut().chain(cols.iter_mut()) {
            adjacency.sort_unstable();
            adjacency.dedup();
        }
        Self {
            tazs,
            block_groups,
            rows,
            cols,
        }
    }

    /// Number of rows (TAZs).
    pub fn n_rows(&self) -> usize {
        self.tazs.len()
    }

    /// Number of columns (Block Groups).
    pub fn n_cols(&self) -> usize {
        self.block_groups.len()
    }

    /// Number of `true` entries.
    pub fn edge_count(&self) -> usize {
        self.rows.iter().map(Vec::len).sum()
    }

    /// TAZ labels in row order.
    pub fn tazs(&self) -> &[TazId] {
        &self.tazs
    }

    /// Block Group labels in column order.
    pub fn block_groups(&self) -> &[BlockGroupId] {
        &self.block_groups
    }

    /// Column indices of the `true` entries in `row`.
    pub fn row(&self, row: usize) -> &[usize] {
        self.rows.get(row).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Row indices of the `true` entries in `col`.
    pub fn col(&self, col: usize) -> &[usize] {
        self.cols.get(col).map(Vec::as_slice).unwrap_or(&[])
    }

    /// All row adjacency lists.
    pub fn rows(&self) -> &[Vec<usize>] {
        &self.rows
    }

    /// All column adjacency lists.
    pub fn cols(&self) -> &[Vec<usize>] {
        &self.cols
    }

    /// Whether entry (row, col) is `true`.
    pub fn contains(&self, row: usize, col: usize) -> bool {
        self.row(row).binary_search(&col).is_ok()
    }

    /// Number of `true` entries in `row`.
    pub fn row_sum(&self, row: usize) -> usize {
        self.row(row).len()
    }

    /// Number of `true` entries in `col`.
    pub fn col_sum(&self, col: usize) -> usize {
        self.col(col).len()
    }

    /// All `true` entries as (row, col) pairs, row-major.
    pub fn edges(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        self.rows
            .iter()
            .enumerate()
            .flat_map(|(row, cols)| cols.iter().map(move |&col| (row, col)))
    }

    /// Keep only the given rows and columns, re-indexing densely.
    ///
    /// `keep_rows` and `keep_cols` must be ascending; edges touching a
    /// dropped row or column are discarded.
    pub(crate) fn restrict(&self, keep_rows: &[usize], keep_cols: &[usize]) -> Self {
        let mut row_map = vec![None; self.n_rows()];
        for (new, &old) in keep_rows.iter().enumerate() {
            row_map[old] = Some(new);
        }
        let mut col_map = vec![None; self.n_cols()];
        for (new, &old) in keep_cols.iter().enumerate() {
            col_map[old] = Some(new);
        }

        let tazs = keep_rows.iter().map(|&r| self.tazs[r].clone()).collect();
        let block_groups = keep_cols
            .iter()
            .map(|&c| self.block_groups[c].clone())
            .collect();
        let edges: Vec<(usize, usize)> = self
            .edges()
            .filter_map(|(row, col)| Some((row_map[row]?, col_map[col]?)))
            .collect();

        Self::from_edges(tazs, block_groups, edges)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incidence::RawRow;

    fn sample() -> ShareMatrix {
        let incidence = Incidence::from_rows(vec![
            RawRow::new("1", "1", 10),
            RawRow::new("1", "2", 5),
            RawRow::new("2", "2", 8),
            RawRow::new("3", "2", 0),
            RawRow::new("10", "1", 3),
        ])
        .unwrap();
        ShareMatrix::from_incidence(&incidence)
    }

    #[test]
    fn rows_and_columns_follow_id_order() {
        let m = sample();
        let tazs: Vec<&str> = m.tazs().iter().map(TazId::as_str).collect();
        assert_eq!(tazs, vec!["1", "2", "3", "10"]);
        assert_eq!(m.n_cols(), 2);
    }

    #[test]
    fn entries_mark_positive_shared_population() {
        let m = sample();
        assert!(m.contains(0, 0));
        assert!(m.contains(0, 1));
        assert!(m.contains(1, 1));
        assert!(!m.contains(2, 1), "zero population pair is not an edge");
        assert!(m.contains(3, 0));
        assert_eq!(m.edge_count(), 4);
    }

    #[test]
    fn sums_count_true_entries() {
        let m = sample();
        assert_eq!(m.row_sum(0), 2);
        assert_eq!(m.row_sum(2), 0);
        assert_eq!(m.col_sum(0), 2);
        assert_eq!(m.col_sum(1), 2);
        assert_eq!(m.col(0), &[0, 3]);
    }

    #[test]
    fn out_of_range_lookups_are_empty() {
        let m = sample();
        assert!(m.row(99).is_empty());
        assert!(m.col(99).is_empty());
        assert!(!m.contains(99, 0));
    }

    #[test]
    fn from_edges_dedups_and_ignores_out_of_range() {
        let m = ShareMatrix::from_edges(
            vec![TazId::new("1").unwrap()],
            vec![BlockGroupId::new("1").unwrap()],
            vec![(0, 0), (0, 0), (5, 0), (0, 7)],
        );
        assert_eq!(m.edge_count(), 1);
    }

    #[test]
    fn restrict_reindexes() {
        let m = sample();
        let r = m.restrict(&[0, 3], &[0]);
        assert_eq!(r.n_rows(), 2);
        assert_eq!(r.n_cols(), 1);
        assert_eq!(r.tazs()[1].as_str(), "10");
        assert!(r.contains(0, 0));
        assert!(r.contains(1, 0));
        assert_eq!(r.edge_count(), 2);
    }
}
