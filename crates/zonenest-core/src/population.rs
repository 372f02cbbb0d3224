//! # Population Buckets
//!
//! Coarse population-size categories used when reporting zones. Bucket
//! boundaries are inclusive on both ends of the middle band:
//!
//! ```text
//! 0            → "0"
//! 1 ..= 599    → "<600"
//! 600 ..= 3000 → "600-3000"
//! 3001 ..      → ">3000"
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Population count of a zone or of a (TAZ, Block Group) intersection.
pub type Population = u64;

/// Lower bound of the middle bucket.
pub const MIDDLE_BUCKET_MIN: Population = 600;

/// Upper bound (inclusive) of the middle bucket.
pub const MIDDLE_BUCKET_MAX: Population = 3000;

/// Population-size category for reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum PopulationBucket {
    /// The zone has no population at all.
    #[serde(rename = "0")]
    Zero,
    /// Fewer than 600 people.
    #[serde(rename = "<600")]
    Under600,
    /// Between 600 and 3000 people, inclusive.
    #[serde(rename = "600-3000")]
    From600To3000,
    /// More than 3000 people.
    #[serde(rename = ">3000")]
    Over3000,
}

impl PopulationBucket {
    /// Bucket a zone's total population.
    pub fn of(population: Population) -> Self {
        match population {
            0 => Self::Zero,
            p if p < MIDDLE_BUCKET_MIN => Self::Under600,
            p if p <= MIDDLE_BUCKET_MAX => Self::From600To3000,
            _ => Self::Over3000,
        }
    }

    /// All buckets in ascending order.
    pub fn all() -> &'static [PopulationBucket] {
        &[
            Self::Zero,
            Self::Under600,
            Self::From600To3000,
            Self::Over3000,
        ]
    }

    /// Label used in output tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Zero => "0",
            Self::Under600 => "<600",
            Self::From600To3000 => "600-3000",
            Self::Over3000 => ">3000",
        }
    }
}

impl fmt::Display for PopulationBucket {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for PopulationBucket {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|bucket| bucket.label() == s)
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "population bucket",
                value: s.to_string(),
            })
    }
}
