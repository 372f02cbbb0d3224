//! # Component Extractor
//!
//! Walks a [`SortedMatrix`] from the top-left corner, cutting it into
//! blocks that no edge leaves.
//!
//! ## Algorithm
//!
//! Row and column cursors start at 0. At each step:
//!
//! 1. The anchor TAZ is the row at the row cursor and the anchor Block Group
//!    is the column at the column cursor. The candidate block spans as many
//!    columns as the anchor row has entries and as many rows as the anchor
//!    column has entries.
//! 2. Fixed-point expansion: any row inside the block with an entry right of
//!    it widens the block to that column; any column inside the block with
//!    an entry below it deepens the block to that row. Repeat until one full
//!    round adds nothing.
//! 3. The block is one nesting. Both cursors advance past it.
//!
//! Both cursors are checked before every step, so the loop guard never
//! reads a block size that has not been computed yet.
//!
//! The extractor assumes the sorter achieved contiguity. It never grows a
//! block backwards; an entry left of or above the cursor is left for the
//! verifier to report.

use zonenest_core::{ConvergenceStage, NestingError, PartitionViolation};

use crate::matrix::ZoneGroup;
use crate::sort::SortedMatrix;

/// Default cap on expansion rounds per block.
pub const DEFAULT_MAX_EXPANSION_ROUNDS: usize = 1000;

/// Diagonal block extractor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ComponentExtractor {
    /// Upper bound on expansion rounds for a single block.
    pub max_expansion_rounds: usize,
}

impl Default for ComponentExtractor {
    fn default() -> Self {
        Self {
            max_expansion_rounds: DEFAULT_MAX_EXPANSION_ROUNDS,
        }
    }
}

/// Per-position entry counts and furthest extents of a sorted matrix.
struct Spans {
    row_count: Vec<usize>,
    row_reach: Vec<usize>,
    col_count: Vec<usize>,
    col_reach: Vec<usize>,
}

impl Spans {
    /// For each sorted row, its entry count and one past its last column
    /// position; likewise for columns.
    fn of(sorted: &SortedMatrix<'_>) -> Self {
        let matrix = sorted.matrix();
        let mut row_count = Vec::with_capacity(matrix.n_rows());
        let mut row_reach = Vec::with_capacity(matrix.n_rows());
        for (pos, &row) in sorted.row_order().iter().enumerate() {
            let entries = matrix.row(row);
            row_count.push(entries.len());
            let reach = entries
                .iter()
                .map(|&col| sorted.col_position(col) + 1)
                .max()
                .unwrap_or(pos);
            row_reach.push(reach);
        }

        let mut col_count = Vec::with_capacity(matrix.n_cols());
        let mut col_reach = Vec::with_capacity(matrix.n_cols());
        for (pos, &col) in sorted.col_order().iter().enumerate() {
            let entries = matrix.col(col);
            col_count.push(entries.len());
            let reach = entries
                .iter()
                .map(|&row| sorted.row_position(row) + 1)
                .max()
                .unwrap_or(pos);
            col_reach.push(reach);
        }

        Self {
            row_count,
            row_reach,
            col_count,
            col_reach,
        }
    }
}

impl ComponentExtractor {
    /// Create an extractor with the given expansion cap.
    pub fn new(max_expansion_rounds: usize) -> Self {
        Self {
            max_expansion_rounds,
        }
    }

    /// Cut the sorted matrix into blocks.
    ///
    /// Groups are returned in diagonal order; member indices refer to the
    /// original (unsorted) matrix and are listed in sorted order.
    ///
    /// # Errors
    ///
    /// - [`NestingError::NotConverged`] when a block needs more than
    ///   `max_expansion_rounds` rounds.
    /// - [`PartitionViolation::Unassigned`] when one axis runs out before
    ///   the other.
    pub fn extract(&self, sorted: &SortedMatrix<'_>) -> Result<Vec<ZoneGroup>, NestingError> {
        let n_rows = sorted.matrix().n_rows();
        let n_cols = sorted.matrix().n_cols();
        let spans = Spans::of(sorted);

        let mut groups = Vec::new();
        let mut row_cursor = 0;
        let mut col_cursor = 0;

        while row_cursor < n_rows && col_cursor < n_cols {
            let (taz_count, bg_count) = self.expand(&spans, row_cursor, col_cursor, n_rows, n_cols)?;

            let group = ZoneGroup {
                rows: sorted.row_order()[row_cursor..row_cursor + taz_count].to_vec(),
                cols: sorted.col_order()[col_cursor..col_cursor + bg_count].to_vec(),
            };
            tracing::debug!(
                nesting = groups.len() + 1,
                tazs = taz_count,
                block_groups = bg_count,
                "extracted block"
            );
            groups.push(group);

            row_cursor += taz_count;
            col_cursor += bg_count;
        }

        if row_cursor < n_rows || col_cursor < n_cols {
            return Err(PartitionViolation::Unassigned {
                tazs: n_rows - row_cursor,
                block_groups: n_cols - col_cursor,
            }
            .into());
        }

        tracing::info!(nestings = groups.len(), "extracted nestings");
        Ok(groups)
    }

    /// Grow the block anchored at (row, col) to a fixed point.
    ///
    /// Returns the (row count, column count) of the settled block.
    fn expand(
        &self,
        spans: &Spans,
        row: usize,
        col: usize,
        n_rows: usize,
        n_cols: usize,
    ) -> Result<(usize, usize), NestingError> {
        let mut taz_count = spans.col_count[col].clamp(1, n_rows - row);
        let mut bg_count = spans.row_count[row].clamp(1, n_cols - col);

        let mut rounds = 0;
        loop {
            if rounds >= self.max_expansion_rounds {
                return Err(NestingError::NotConverged {
                    stage: ConvergenceStage::Expansion,
                    limit: self.max_expansion_rounds,
                });
            }
            rounds += 1;

            let mut grew = false;

            let col_end = col + bg_count;
            let needed_col_end = spans.row_reach[row..row + taz_count]
                .iter()
                .copied()
                .max()
                .unwrap_or(col_end);
            if needed_col_end > col_end {
                bg_count = needed_col_end - col;
                grew = true;
            }

            let row_end = row + taz_count;
            let needed_row_end = spans.col_reach[col..col + bg_count]
                .iter()
                .copied()
                .max()
                .unwrap_or(row_end);
            if needed_row_end > row_end {
                taz_count = needed_row_end - row;
                grew = true;
            }

            if !grew {
                return Ok((taz_count, bg_count));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::filter::ActiveMatrix;
    use crate::fixtures::{active, ten_by_ten_rows};
    use crate::incidence::RawRow;
    use crate::sort::MatrixSorter;

    fn labelled(matrix: &ActiveMatrix, groups: &[ZoneGroup]) -> Vec<(Vec<String>, Vec<String>)> {
        groups
            .iter()
            .map(|g| {
                (
                    g.rows.iter().map(|&r| matrix.tazs()[r].to_string()).collect(),
                    g.cols
                        .iter()
                        .map(|&c| matrix.block_groups()[c].to_string())
                        .collect(),
                )
            })
            .collect()
    }

    fn strings(ids: &[&str]) -> Vec<String> {
        ids.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn ten_by_ten_yields_six_blocks() {
        let matrix = active(ten_by_ten_rows());
        let sorted = MatrixSorter::default().sort(&matrix).unwrap();
        let groups = ComponentExtractor::default().extract(&sorted).unwrap();
        assert_eq!(
            labelled(&matrix, &groups),
            vec![
                (strings(&["1"]), strings(&["1"])),
                (strings(&["2"]), strings(&["2"])),
                (strings(&["3"]), strings(&["3", "4", "5"])),
                (strings(&["4", "5"]), strings(&["6"])),
                (strings(&["6", "7"]), strings(&["7", "8", "9"])),
                (strings(&["8", "9", "10"]), strings(&["10"])),
            ]
        );
    }

    #[test]
    fn blocks_follow_sorted_order() {
        let matrix = active(vec![
            RawRow::new("1", "1", 5),
            RawRow::new("3", "1", 5),
            RawRow::new("2", "2", 5),
            RawRow::new("2", "3", 5),
        ]);
        let sorted = MatrixSorter::default().sort(&matrix).unwrap();
        let groups = ComponentExtractor::default().extract(&sorted).unwrap();
        assert_eq!(
            labelled(&matrix, &groups),
            vec![
                (strings(&["1", "3"]), strings(&["1"])),
                (strings(&["2"]), strings(&["2", "3"])),
            ]
        );
    }

    #[test]
    fn expansion_cap_surfaces_non_convergence() {
        // The {6,7}-{7,8,9} block needs a second round to settle.
        let matrix = active(ten_by_ten_rows());
        let sorted = MatrixSorter::default().sort(&matrix).unwrap();
        assert_eq!(
            ComponentExtractor::new(1).extract(&sorted),
            Err(NestingError::NotConverged {
                stage: ConvergenceStage::Expansion,
                limit: 1
            })
        );
        assert!(ComponentExtractor::new(2).extract(&sorted).is_ok());
    }

    #[test]
    fn unsorted_interleaving_is_not_silently_accepted() {
        // Without sorting, TAZ 2 sits between TAZ 1 and TAZ 3, which share BG 1.
        let matrix = active(vec![
            RawRow::new("1", "1", 5),
            RawRow::new("3", "1", 5),
            RawRow::new("2", "2", 5),
        ]);
        let unsorted = SortedMatrix::identity(&matrix);
        let groups = ComponentExtractor::default().extract(&unsorted).unwrap();
        // The block swallows TAZ 2 and BG 2 together with TAZ 1 / TAZ 3,
        // which the verifier must reject as disconnected.
        assert_eq!(groups.len(), 1);
        assert_eq!(groups[0].rows, vec![0, 1, 2]);
        assert!(crate::verify::verify_partition(&matrix, &groups).is_err());
    }

    #[test]
    fn empty_matrix_yields_no_blocks() {
        let matrix = active(vec![RawRow::new("1", "1", 0)]);
        let sorted = MatrixSorter::default().sort(&matrix).unwrap();
        assert_eq!(ComponentExtractor::default().extract(&sorted), Ok(Vec::new()));
    }
}
