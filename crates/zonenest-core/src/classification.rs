//! # Nesting Shape Classification
//!
//! Defines how two zoning systems align inside one nesting. The shape is a
//! pure function of the nesting's (TAZ count, Block Group count):
//!
//! | TAZs | BGs | Shape |
//! |------|-----|-------|
//! | 1 | 1 | `OneToOne` |
//! | 1 | n > 1 | `OneTazManyBg` |
//! | n > 1 | 1 | `ManyTazOneBg` |
//! | n > 1 | m > 1 | `ManyToMany` |
//!
//! Zones without population never enter a nesting; they are labelled
//! [`ZoneClassification::NoPopulation`] instead.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// How the TAZs and Block Groups of one nesting align.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum NestingShape {
    /// Exactly one TAZ coincides with exactly one Block Group.
    #[serde(rename = "One-to-One")]
    OneToOne,
    /// Several Block Groups nest inside a single TAZ.
    #[serde(rename = "One TAZ, Many BGs")]
    OneTazManyBg,
    /// Several TAZs nest inside a single Block Group.
    #[serde(rename = "Many TAZs, One BG")]
    ManyTazOneBg,
    /// Several TAZs and several Block Groups overlap each other.
    #[serde(rename = "Many-to-Many")]
    ManyToMany,
}

impl NestingShape {
    /// Classify a nesting from its member counts.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::EmptyNesting`] when either count is zero.
    pub fn classify(taz_count: usize, block_group_count: usize) -> Result<Self, ValidationError> {
        match (taz_count, block_group_count) {
            (0, _) | (_, 0) => Err(ValidationError::EmptyNesting {
                tazs: taz_count,
                block_groups: block_group_count,
            }),
            (1, 1) => Ok(Self::OneToOne),
            (1, _) => Ok(Self::OneTazManyBg),
            (_, 1) => Ok(Self::ManyTazOneBg),
            _ => Ok(Self::ManyToMany),
        }
    }

    /// All shapes in report order.
    pub fn all() -> &'static [NestingShape] {
        &[
            Self::OneToOne,
            Self::OneTazManyBg,
            Self::ManyTazOneBg,
            Self::ManyToMany,
        ]
    }

    /// Human-readable label used in output tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::OneToOne => "One-to-One",
            Self::OneTazManyBg => "One TAZ, Many BGs",
            Self::ManyTazOneBg => "Many TAZs, One BG",
            Self::ManyToMany => "Many-to-Many",
        }
    }
}

impl fmt::Display for NestingShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for NestingShape {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::all()
            .iter()
            .copied()
            .find(|shape| shape.label() == s)
            .ok_or_else(|| ValidationError::UnknownLabel {
                kind: "nesting shape",
                value: s.to_string(),
            })
    }
}

/// Classification attached to a single zone in the output tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ZoneClassification {
    /// The zone belongs to a nesting of the given shape.
    Nested(NestingShape),
    /// The zone shares no population with any zone on the other axis.
    NoPopulation,
}

impl ZoneClassification {
    /// Label for the zero-population sentinel group.
    pub const NO_POPULATION_LABEL: &'static str = "No Population";

    /// Human-readable label used in output tables.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Nested(shape) => shape.label(),
            Self::NoPopulation => Self::NO_POPULATION_LABEL,
        }
    }

    /// The nesting shape, if the zone is nested at all.
    pub fn shape(&self) -> Option<NestingShape> {
        match self {
            Self::Nested(shape) => Some(*shape),
            Self::NoPopulation => None,
        }
    }
}

impl From<NestingShape> for ZoneClassification {
    fn from(shape: NestingShape) -> Self {
        Self::Nested(shape)
    }
}

impl fmt::Display for ZoneClassification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for ZoneClassification {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == Self::NO_POPULATION_LABEL {
            return Ok(Self::NoPopulation);
        }
        s.parse::<NestingShape>()
            .map(Self::Nested)
            .map_err(|_| ValidationError::UnknownLabel {
                kind: "zone classification",
                value: s.to_string(),
            })
    }
}

impl Serialize for ZoneClassification {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.label())
    }
}

impl<'de> Deserialize<'de> for ZoneClassification {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_follows_count_rule() {
        assert_eq!(NestingShape::classify(1, 1), Ok(NestingShape::OneToOne));
        assert_eq!(NestingShape::classify(1, 3), Ok(NestingShape::OneTazManyBg));
        assert_eq!(NestingShape::classify(2, 1), Ok(NestingShape::ManyTazOneBg));
        assert_eq!(NestingShape::classify(2, 3), Ok(NestingShape::ManyToMany));
        assert_eq!(NestingShape::classify(5, 2), Ok(NestingShape::ManyToMany));
    }

    #[test]
    fn classify_rejects_empty_axes() {
        assert_eq!(
            NestingShape::classify(0, 2),
            Err(ValidationError::EmptyNesting {
                tazs: 0,
                block_groups: 2
            })
        );
        assert!(NestingShape::classify(3, 0).is_err());
        assert!(NestingShape::classify(0, 0).is_err());
    }

    #[test]
    fn labels_are_unique_and_parse_back() {
        let mut seen = std::collections::HashSet::new();
        for shape in NestingShape::all() {
            assert!(seen.insert(shape.label()), "duplicate label {shape}");
            assert_eq!(shape.label().parse::<NestingShape>(), Ok(*shape));
        }
        assert!("one-to-one".parse::<NestingShape>().is_err());
    }

    #[test]
    fn shape_serializes_as_label() {
        let json = serde_json::to_string(&NestingShape::OneTazManyBg).unwrap();
        assert_eq!(json, "\"One TAZ, Many BGs\"");
    }

    #[test]
    fn zone_classification_labels() {
        assert_eq!(ZoneClassification::NoPopulation.label(), "No Population");
        assert_eq!(
            ZoneClassification::from(NestingShape::ManyToMany).to_string(),
            "Many-to-Many"
        );
        assert_eq!(ZoneClassification::NoPopulation.shape(), None);
        assert_eq!(
            ZoneClassification::Nested(NestingShape::OneToOne).shape(),
            Some(NestingShape::OneToOne)
        );
    }

    #[test]
    fn zone_classification_serde_uses_labels() {
        let json = serde_json::to_string(&ZoneClassification::NoPopulation).unwrap();
        assert_eq!(json, "\"No Population\"");
        let parsed: ZoneClassification = serde_json::from_str("\"Many TAZs, One BG\"").unwrap();
        assert_eq!(parsed, ZoneClassification::Nested(NestingShape::ManyTazOneBg));
        assert!(serde_json::from_str::<ZoneClassification>("\"Sideways\"").is_err());
    }
}
