//! Shared test inputs.

use crate::filter::{split_zero_population, ActiveMatrix};
use crate::incidence::{Incidence, RawRow};
use crate::matrix::ShareMatrix;

/// Edges of the documented 10 × 10 example, one row per edge.
pub(crate) const TEN_BY_TEN_EDGES: &[(&str, &str)] = &[
    ("1", "1"),
    ("2", "2"),
    ("3", "3"),
    ("3", "4"),
    ("3", "5"),
    ("4", "6"),
    ("5", "6"),
    ("6", "7"),
    ("6", "8"),
    ("7", "7"),
    ("7", "8"),
    ("7", "9"),
    ("8", "10"),
    ("9", "10"),
    ("10", "10"),
];

pub(crate) fn ten_by_ten_rows() -> Vec<RawRow> {
    TEN_BY_TEN_EDGES
        .iter()
        .map(|(taz, bg)| RawRow::new(*taz, *bg, 100))
        .collect()
}

pub(crate) fn active(rows: Vec<RawRow>) -> ActiveMatrix {
    let incidence = Incidence::from_rows(rows).unwrap();
    split_zero_population(&ShareMatrix::from_incidence(&incidence)).active
}
