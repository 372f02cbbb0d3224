//! # Zero-Population Filter
//!
//! Separates zones whose share-matrix row (TAZ) or column (Block Group) is
//! empty. Those zones never reach the sorter or extractor; they go straight
//! to the sentinel "No Population" group.
//!
//! The surviving matrix is wrapped in [`ActiveMatrix`], which guarantees
//! every row and every column has at least one `true` entry. The sorter's
//! first-entry keys and the extractor's anchor counts rely on that.

use zonenest_core::{BlockGroupId, TazId};

use crate::matrix::ShareMatrix;

/// A share matrix with no empty rows or columns.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActiveMatrix(ShareMatrix);

impl ActiveMatrix {
    /// Access the underlying matrix.
    pub fn matrix(&self) -> &ShareMatrix {
        &self.0
    }

    /// Whether the matrix has no zones at all.
    pub fn is_empty(&self) -> bool {
        self.0.n_rows() == 0
    }
}

impl std::ops::Deref for ActiveMatrix {
    type Target = ShareMatrix;

    fn deref(&self) -> &ShareMatrix {
        &self.0
    }
}

/// Result of filtering: the active matrix plus the zones set aside.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilteredMatrix {
    /// Zones with at least one edge.
    pub active: ActiveMatrix,
    /// TAZs sharing population with no Block Group, ascending by id.
    pub empty_tazs: Vec<TazId>,
    /// Block Groups sharing population with no TAZ, ascending by id.
    pub empty_block_groups: Vec<BlockGroupId>,
}

/// Split off zones with an all-`false` row or column.
pub fn split_zero_population(matrix: &ShareMatrix) -> FilteredMatrix {
    let (keep_rows, empty_rows): (Vec<usize>, Vec<usize>) =
        (0..matrix.n_rows()).partition(|&row| matrix.row_sum(row) > 0);
    let (keep_cols, empty_cols): (Vec<usize>, Vec<usize>) =
        (0..matrix.n_cols()).partition(|&col| matrix.col_sum(col) > 0);

    let empty_tazs: Vec<TazId> = empty_rows
        .iter()
        .map(|&row| matrix.tazs()[row].clone())
        .collect();
    let empty_block_groups: Vec<BlockGroupId> = empty_cols
        .iter()
        .map(|&col| matrix.block_groups()[col].clone())
        .collect();

    tracing::info!(
        active_tazs = keep_rows.len(),
        active_block_groups = keep_cols.len(),
        empty_tazs = empty_tazs.len(),
        empty_block_groups = empty_block_groups.len(),
        "filtered zero-population zones"
    );

    FilteredMatrix {
        active: ActiveMatrix(matrix.restrict(&keep_rows, &keep_cols)),
        empty_tazs,
        empty_block_groups,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::incidence::{Incidence, RawRow};

    #[test]
    fn empty_rows_and_columns_are_set_aside() {
        let incidence = Incidence::from_rows(vec![
            RawRow::new("1", "1", 10),
            RawRow::new("2", "1", 4),
            RawRow::new("3", "2", 0),
            RawRow::new("2", "3", 0),
        ])
        .unwrap();
        let filtered = split_zero_population(&ShareMatrix::from_incidence(&incidence));

        assert_eq!(filtered.empty_tazs, vec![TazId::new("3").unwrap()]);
        let empty_bgs: Vec<&str> = filtered
            .empty_block_groups
            .iter()
            .map(BlockGroupId::as_str)
            .collect();
        assert_eq!(empty_bgs, vec!["2", "3"]);

        let active = &filtered.active;
        assert_eq!(active.n_rows(), 2);
        assert_eq!(active.n_cols(), 1);
        assert_eq!(active.edge_count(), 2);
        for row in 0..active.n_rows() {
            assert!(active.row_sum(row) > 0);
        }
    }

    #[test]
    fn fully_connected_input_keeps_everything() {
        let incidence =
            Incidence::from_rows(vec![RawRow::new("1", "1", 1), RawRow::new("2", "2", 1)])
                .unwrap();
        let matrix = ShareMatrix::from_incidence(&incidence);
        let filtered = split_zero_population(&matrix);
        assert!(filtered.empty_tazs.is_empty());
        assert!(filtered.empty_block_groups.is_empty());
        assert_eq!(filtered.active.matrix(), &matrix);
    }

    #[test]
    fn all_zero_input_leaves_empty_active_matrix() {
        let incidence = Incidence::from_rows(vec![RawRow::new("1", "1", 0)]).unwrap();
        let filtered = split_zero_population(&ShareMatrix::from_incidence(&incidence));
        assert!(filtered.active.is_empty());
        assert_eq!(filtered.empty_tazs.len(), 1);
        assert_eq!(filtered.empty_block_groups.len(), 1);
    }
}
