//! # Partition Verification
//!
//! Checks a list of [`ZoneGroup`]s against the share matrix before anything
//! is reported. A partition passes only if:
//!
//! - every row and column is assigned to exactly one group,
//! - no edge joins two different groups, and
//! - every group is a single connected component.
//!
//! Together these make the groups exactly the connected components of the
//! bipartite share graph, whichever strategy produced them. Nesting numbers
//! in violations are 1-based group positions.

use zonenest_core::PartitionViolation;

use crate::components::zone_forest;
use crate::filter::ActiveMatrix;
use crate::matrix::ZoneGroup;

/// Verify that `groups` partition `matrix` into its connected components.
///
/// # Errors
///
/// Returns the first [`PartitionViolation`] found, checking assignment,
/// then cross edges, then connectivity.
pub fn verify_partition(
    matrix: &ActiveMatrix,
    groups: &[ZoneGroup],
) -> Result<(), PartitionViolation> {
    let (row_group, col_group) = assignments(matrix, groups)?;

    for (row, col) in matrix.edges() {
        if row_group[row] != col_group[col] {
            return Err(PartitionViolation::CrossEdge {
                taz: matrix.tazs()[row].to_string(),
                block_group: matrix.block_groups()[col].to_string(),
                taz_nesting: nesting_number(row_group[row]),
                block_group_nesting: nesting_number(col_group[col]),
            });
        }
    }

    let n_rows = matrix.n_rows();
    let mut forest = zone_forest(matrix);
    for (index, group) in groups.iter().enumerate() {
        let mut members = group
            .rows
            .iter()
            .copied()
            .chain(group.cols.iter().map(|&col| n_rows + col));
        let Some(first) = members.next() else {
            continue;
        };
        let root = forest.find(first);
        if members.any(|node| forest.find(node) != root) {
            return Err(PartitionViolation::Disconnected {
                nesting: nesting_number(index),
            });
        }
    }

    tracing::info!(nestings = groups.len(), "verified partition");
    Ok(())
}

/// Map every row and column to its group index.
fn assignments(
    matrix: &ActiveMatrix,
    groups: &[ZoneGroup],
) -> Result<(Vec<usize>, Vec<usize>), PartitionViolation> {
    let mut row_group: Vec<Option<usize>> = vec![None; matrix.n_rows()];
    let mut col_group: Vec<Option<usize>> = vec![None; matrix.n_cols()];

    for (index, group) in groups.iter().enumerate() {
        for &row in &group.rows {
            let slot = row_group.get_mut(row).ok_or_else(|| PartitionViolation::Overlapping {
                zone: format!("row {row}"),
            })?;
            if slot.replace(index).is_some() {
                return Err(PartitionViolation::Overlapping {
                    zone: format!("TAZ {}", matrix.tazs()[row]),
                });
            }
        }
        for &col in &group.cols {
            let slot = col_group.get_mut(col).ok_or_else(|| PartitionViolation::Overlapping {
                zone: format!("column {col}"),
            })?;
            if slot.replace(index).is_some() {
                return Err(PartitionViolation::Overlapping {
                    zone: format!("block group {}", matrix.block_groups()[col]),
                });
            }
        }
    }

    let unassigned_rows = row_group.iter().filter(|g| g.is_none()).count();
    let unassigned_cols = col_group.iter().filter(|g| g.is_none()).count();
    if unassigned_rows > 0 || unassigned_cols > 0 {
        return Err(PartitionViolation::Unassigned {
            tazs: unassigned_rows,
            block_groups: unassigned_cols,
        });
    }

    Ok((
        row_group.into_iter().flatten().collect(),
        col_group.into_iter().flatten().collect(),
    ))
}

fn nesting_number(index: usize) -> u32 {
    u32::try_from(index + 1).unwrap_or(u32::MAX)
}
