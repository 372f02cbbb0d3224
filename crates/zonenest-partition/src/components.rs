//! # Bipartite Connected Components
//!
//! Union-find over the share matrix's edge list. TAZ row `i` is node `i`
//! and Block Group column `j` is node `n_rows + j`; every edge merges its
//! two endpoints.
//!
//! This is the provably correct counterpart to sort + extract. It serves
//! both as a discovery strategy in its own right and as the reference the
//! verifier checks every partition against.

use std::collections::BTreeMap;

use crate::filter::ActiveMatrix;
use crate::matrix::ZoneGroup;

/// Disjoint-set forest with path compression and union by rank.
#[derive(Clone, Debug)]
pub(crate) struct DisjointSet {
    parent: Vec<usize>,
    rank: Vec<u8>,
}

impl DisjointSet {
    pub(crate) fn new(n: usize) -> Self {
        Self {
            parent: (0..n).collect(),
            rank: vec![0; n],
        }
    }

    pub(crate) fn find(&mut self, mut node: usize) -> usize {
        let mut root = node;
        while self.parent[root] != root {
            root = self.parent[root];
        }

        while self.parent[node] != node {
            let parent = self.parent[node];
            self.parent[node] = root;
            node = parent;
        }

        root
    }

    pub(crate) fn union(&mut self, left: usize, right: usize) -> usize {
        let mut left = self.find(left);
        let mut right = self.find(right);
        if left == right {
            return left;
        }
        let left_rank = self.rank[left];
        let right_rank = self.rank[right];
        if left_rank < right_rank {
            std::mem::swap(&mut left, &mut right);
        }
        self.parent[right] = left;
        if left_rank == right_rank {
            self.rank[left] = left_rank.saturating_add(1);
        }
        left
    }
}

/// Union-find forest over the rows and columns of a matrix.
pub(crate) fn zone_forest(matrix: &ActiveMatrix) -> DisjointSet {
    let n_rows = matrix.n_rows();
    let mut forest = DisjointSet::new(n_rows + matrix.n_cols());
    for (row, col) in matrix.edges() {
        forest.union(row, n_rows + col);
    }
    forest
}

/// Connected components of the bipartite share graph.
///
/// Groups are ordered by their lowest row index (lowest TAZ id), and
/// members within a group are ascending. Every group has at least one row
/// and one column because the matrix has no empty rows or columns.
pub fn connected_components(matrix: &ActiveMatrix) -> Vec<ZoneGroup> {
    let n_rows = matrix.n_rows();
    let mut forest = zone_forest(matrix);

    // Rows are visited in ascending order, so the first row seen for a
    // root fixes that component's rank in the output.
    let mut slot_of_root: BTreeMap<usize, usize> = BTreeMap::new();
    let mut groups: Vec<ZoneGroup> = Vec::new();
    for row in 0..n_rows {
        let root = forest.find(row);
        let slot = *slot_of_root.entry(root).or_insert_with(|| {
            groups.push(ZoneGroup::default());
            groups.len() - 1
        });
        groups[slot].rows.push(row);
    }
    for col in 0..matrix.n_cols() {
        let root = forest.find(n_rows + col);
        if let Some(&slot) = slot_of_root.get(&root) {
            groups[slot].cols.push(col);
        }
    }

    tracing::info!(nestings = groups.len(), "union-find components");
    groups
}
