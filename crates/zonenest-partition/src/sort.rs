//! # Matrix Sorter
//!
//! Reorders the rows and columns of an [`ActiveMatrix`] so that each
//! nesting's members occupy a contiguous block along both axes.
//!
//! ## Algorithm
//!
//! One pass is a full row + column cycle:
//!
//! 1. For each column, find the position of its first `true` entry under
//!    the current row order. Stable-sort columns ascending by that key.
//! 2. Transpose: do the same for rows under the new column order.
//!
//! Passes repeat up to `max_passes` times and stop early once a pass leaves
//! both orders unchanged. This is a heuristic relaxation. It relies on real
//! zone adjacency being sparse and locally clustered and does not guarantee
//! block-diagonal form for adversarial inputs, which is why every result is
//! verified afterwards.
//!
//! Complexity is O(passes × (E + n log n)) for E edges and n zones.

use zonenest_core::{ConvergenceStage, NestingError};

use crate::filter::ActiveMatrix;

/// Default number of full row + column cycles.
pub const DEFAULT_MAX_SORT_PASSES: usize = 10;

/// Alternating first-entry sorter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatrixSorter {
    /// Upper bound on full row + column cycles.
    pub max_passes: usize,
    /// Fail with [`NestingError::NotConverged`] instead of warning when the
    /// pass budget runs out before a fixed point.
    pub require_convergence: bool,
}

impl Default for MatrixSorter {
    fn default() -> Self {
        Self {
            max_passes: DEFAULT_MAX_SORT_PASSES,
            require_convergence: false,
        }
    }
}

/// An [`ActiveMatrix`] viewed under a row and column permutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedMatrix<'a> {
    matrix: &'a ActiveMatrix,
    row_order: Vec<usize>,
    col_order: Vec<usize>,
    row_pos: Vec<usize>,
    col_pos: Vec<usize>,
    passes_run: usize,
    converged: bool,
}

impl<'a> SortedMatrix<'a> {
    /// The identity view: rows and columns in id order.
    pub fn identity(matrix: &'a ActiveMatrix) -> Self {
        let row_order: Vec<usize> = (0..matrix.n_rows()).collect();
        let col_order: Vec<usize> = (0..matrix.n_cols()).collect();
        Self {
            matrix,
            row_pos: row_order.clone(),
            col_pos: col_order.clone(),
            row_order,
            col_order,
            passes_run: 0,
            converged: false,
        }
    }

    /// The matrix being viewed.
    pub fn matrix(&self) -> &'a ActiveMatrix {
        self.matrix
    }

    /// Original row index at each sorted position.
    pub fn row_order(&self) -> &[usize] {
        &self.row_order
    }

    /// Original column index at each sorted position.
    pub fn col_order(&self) -> &[usize] {
        &self.col_order
    }

    /// Sorted position of each original row.
    pub fn row_position(&self, row: usize) -> usize {
        self.row_pos[row]
    }

    /// Sorted position of each original column.
    pub fn col_position(&self, col: usize) -> usize {
        self.col_pos[col]
    }

    /// Number of full passes that ran.
    pub fn passes_run(&self) -> usize {
        self.passes_run
    }

    /// Whether the last pass left both orders unchanged.
    pub fn converged(&self) -> bool {
        self.converged
    }

    /// Run one full cycle. Returns `true` when either order changed.
    fn pass(&mut self) -> bool {
        let cols_changed = reorder(&mut self.col_order, self.matrix.cols(), &self.row_pos);
        self.col_pos = positions(&self.col_order);
        let rows_changed = reorder(&mut self.row_order, self.matrix.rows(), &self.col_pos);
        self.row_pos = positions(&self.row_order);
        cols_changed || rows_changed
    }
}

impl MatrixSorter {
    /// Create a sorter with the given pass budget.
    pub fn new(max_passes: usize) -> Self {
        Self {
            max_passes,
            ..Self::default()
        }
    }

    /// Sort the matrix.
    ///
    /// # Errors
    ///
    /// Returns [`NestingError::NotConverged`] only when `require_convergence`
    /// is set and no fixed point is reached within `max_passes`.
    pub fn sort<'a>(&self, matrix: &'a ActiveMatrix) -> Result<SortedMatrix<'a>, NestingError> {
        let mut sorted = SortedMatrix::identity(matrix);
        // Nothing to order: the identity is already the fixed point.
        sorted.converged = matrix.is_empty();
        for pass in 1..=self.max_passes {
            if sorted.converged {
                break;
            }
            let changed = sorted.pass();
            sorted.passes_run = pass;
            tracing::debug!(pass, changed, "sort pass");
            if !changed {
                sorted.converged = true;
                break;
            }
        }

        if !sorted.converged {
            if self.require_convergence {
                return Err(NestingError::NotConverged {
                    stage: ConvergenceStage::Sorting,
                    limit: self.max_passes,
                });
            }
            tracing::warn!(
                max_passes = self.max_passes,
                "matrix sort did not reach a fixed point; relying on verification"
            );
        }

        tracing::info!(
            passes = sorted.passes_run,
            converged = sorted.converged,
            "sorted share matrix"
        );
        Ok(sorted)
    }
}

/// Stable-sort `order` by each item's first entry under `other_pos`.
///
/// Items with no entries sort last. Returns whether the order changed.
fn reorder(order: &mut Vec<usize>, adjacency: &[Vec<usize>], other_pos: &[usize]) -> bool {
    let keys: Vec<usize> = adjacency
        .iter()
        .map(|entries| {
            entries
                .iter()
                .map(|&other| other_pos[other])
                .min()
                .unwrap_or(usize::MAX)
        })
        .collect();
    let before = order.clone();
    order.sort_by_key(|&item| keys[item]);
    *order != before
}

/// Invert a permutation: `positions(order)[order[p]] == p`.
fn positions(order: &[usize]) -> Vec<usize> {
    let mut pos = vec![0; order.len()];
    for (p, &item) in order.iter().enumerate() {
        pos[item] = p;
    }
    pos
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fixtures::{active, ten_by_ten_rows};
    use crate::incidence::RawRow;

    #[test]
    fn block_diagonal_input_is_already_a_fixed_point() {
        let matrix = active(ten_by_ten_rows());
        let sorted = MatrixSorter::default().sort(&matrix).unwrap();
        assert!(sorted.converged());
        assert_eq!(sorted.passes_run(), 1);
        assert_eq!(sorted.row_order(), (0..10).collect::<Vec<_>>().as_slice());
        assert_eq!(sorted.col_order(), (0..10).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn interleaved_rows_are_pulled_together() {
        // TAZ 1 and TAZ 3 share BG 1; TAZ 2 sits between them in id order.
        let matrix = active(vec![
            RawRow::new("1", "1", 5),
            RawRow::new("3", "1", 5),
            RawRow::new("2", "2", 5),
            RawRow::new("2", "3", 5),
        ]);
        let sorted = MatrixSorter::default().sort(&matrix).unwrap();
        assert!(sorted.converged());
        assert_eq!(sorted.passes_run(), 2);
        assert_eq!(sorted.row_order(), &[0, 2, 1]);
        assert_eq!(sorted.col_order(), &[0, 1, 2]);
        assert_eq!(sorted.row_position(1), 2);
        assert_eq!(sorted.col_position(2), 2);
    }

    #[test]
    fn zero_pass_budget_leaves_identity_unconverged() {
        let matrix = active(ten_by_ten_rows());
        let sorted = MatrixSorter::new(0).sort(&matrix).unwrap();
        assert!(!sorted.converged());
        assert_eq!(sorted.passes_run(), 0);
        assert_eq!(sorted.row_order(), SortedMatrix::identity(&matrix).row_order());
    }

    #[test]
    fn empty_matrix_converges_without_passes() {
        let matrix = active(vec![RawRow::new("1", "1", 0), RawRow::new("2", "2", 0)]);
        assert!(matrix.is_empty());
        let sorter = MatrixSorter {
            max_passes: 0,
            require_convergence: true,
        };
        let sorted = sorter.sort(&matrix).unwrap();
        assert!(sorted.converged());
        assert_eq!(sorted.passes_run(), 0);

        let sorted = MatrixSorter::default().sort(&matrix).unwrap();
        assert!(sorted.converged());
        assert_eq!(sorted.passes_run(), 0);
    }

    #[test]
    fn required_convergence_fails_when_budget_runs_out() {
        let matrix = active(vec![
            RawRow::new("1", "1", 5),
            RawRow::new("3", "1", 5),
            RawRow::new("2", "2", 5),
        ]);
        let sorter = MatrixSorter {
            max_passes: 1,
            require_convergence: true,
        };
        assert_eq!(
            sorter.sort(&matrix),
            Err(NestingError::NotConverged {
                stage: ConvergenceStage::Sorting,
                limit: 1
            })
        );
    }

    #[test]
    fn extra_passes_after_convergence_change_nothing() {
        let matrix = active(vec![
            RawRow::new("1", "1", 5),
            RawRow::new("3", "1", 5),
            RawRow::new("2", "2", 5),
            RawRow::new("2", "3", 5),
        ]);
        let short = MatrixSorter::new(2).sort(&matrix).unwrap();
        let long = MatrixSorter::new(50).sort(&matrix).unwrap();
        assert_eq!(short.row_order(), long.row_order());
        assert_eq!(short.col_order(), long.col_order());
    }

    #[test]
    fn positions_inverts_order() {
        let order = vec![2, 0, 1];
        let pos = positions(&order);
        assert_eq!(pos, vec![1, 2, 0]);
    }

    #[test]
    fn reorder_is_stable_and_puts_empty_last() {
        let mut order = vec![0, 1, 2, 3];
        let adjacency = vec![vec![1], vec![], vec![0], vec![1]];
        let changed = reorder(&mut order, &adjacency, &[0, 1]);
        assert!(changed);
        assert_eq!(order, vec![2, 0, 3, 1]);
    }
}
