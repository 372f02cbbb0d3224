//! # Zone Identity Newtypes
//!
//! Newtype wrappers for the identifiers of the two zoning systems being
//! compared. These prevent accidental axis confusion: you cannot pass a
//! `BlockGroupId` where a `TazId` is expected.
//!
//! ## Ordering
//!
//! Identifiers are opaque text, but in practice they are integers (TAZ
//! numbers, 12-digit census Block Group GEOIDs). [`ZoneKey`] compares two
//! all-digit keys by numeric value of any length, falls back to lexical
//! order otherwise, and sorts numeric keys before non-numeric ones. Keys
//! that are numerically equal but differ in leading zeros are tie-broken
//! lexically so that `Ord` agrees with `Eq`.

use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Helper macro to implement `Deserialize` for string newtypes that must
/// validate their contents. Deserializes as a plain `String`, then routes
/// through the type's `new()` constructor so that blank ids are rejected
/// at deserialization time.
macro_rules! impl_validating_deserialize {
    ($ty:ident) => {
        impl<'de> Deserialize<'de> for $ty {
            fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
            where
                D: serde::Deserializer<'de>,
            {
                let raw = String::deserialize(deserializer)?;
                Self::new(raw).map_err(serde::de::Error::custom)
            }
        }
    };
}

// ---------------------------------------------------------------------------
// ZoneKey
// ---------------------------------------------------------------------------

/// A validated, trimmed, non-blank zone identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct ZoneKey(String);

impl_validating_deserialize!(ZoneKey);

impl ZoneKey {
    /// Create a key from text, trimming surrounding whitespace.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::BlankZoneKey`] if nothing remains after trimming.
    pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
        let raw = value.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(ValidationError::BlankZoneKey);
        }
        if trimmed.len() == raw.len() {
            Ok(Self(raw))
        } else {
            Ok(Self(trimmed.to_string()))
        }
    }

    /// Access the key text.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The significant digits of an all-digit key, or `None` for other keys.
    fn numeric_digits(&self) -> Option<&str> {
        if !self.0.bytes().all(|b| b.is_ascii_digit()) {
            return None;
        }
        let stripped = self.0.trim_start_matches('0');
        Some(if stripped.is_empty() { "0" } else { stripped })
    }
}

impl Ord for ZoneKey {
    fn cmp(&self, other: &Self) -> Ordering {
        match (self.numeric_digits(), other.numeric_digits()) {
            (Some(a), Some(b)) => a
                .len()
                .cmp(&b.len())
                .then_with(|| a.cmp(b))
                .then_with(|| self.0.cmp(&other.0)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => self.0.cmp(&other.0),
        }
    }
}

impl PartialOrd for ZoneKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for ZoneKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ---------------------------------------------------------------------------
// Axis identifiers
// ---------------------------------------------------------------------------

macro_rules! zone_id {
    ($(#[$meta:meta])* $ty:ident) => {
        $(#[$meta])*
        #[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $ty(ZoneKey);

        impl $ty {
            /// Create an identifier from text, trimming surrounding whitespace.
            ///
            /// # Errors
            ///
            /// Returns [`ValidationError::BlankZoneKey`] for blank text.
            pub fn new(value: impl Into<String>) -> Result<Self, ValidationError> {
                ZoneKey::new(value).map(Self)
            }

            /// Access the identifier text.
            pub fn as_str(&self) -> &str {
                self.0.as_str()
            }

            /// Access the underlying key.
            pub fn key(&self) -> &ZoneKey {
                &self.0
            }
        }

        impl From<ZoneKey> for $ty {
            fn from(key: ZoneKey) -> Self {
                Self(key)
            }
        }

        impl FromStr for $ty {
            type Err = ValidationError;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Self::new(s)
            }
        }

        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                fmt::Display::fmt(&self.0, f)
            }
        }
    };
}

zone_id!(
    /// Identifier of a Traffic Analysis Zone, the first zoning system.
    TazId
);

zone_id!(
    /// Identifier of a census Block Group, the second zoning system.
    BlockGroupId
);

// ---------------------------------------------------------------------------
// NestingId
// ---------------------------------------------------------------------------

/// Ordinal of a discovered nesting.
///
/// Real nestings are numbered from 1 in discovery order. Zero is reserved
/// for the sentinel group holding zones without population.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NestingId(u32);

impl NestingId {
    /// Sentinel id shared by every zero-population zone.
    pub const NO_POPULATION: NestingId = NestingId(0);

    /// The id of the first discovered nesting.
    pub fn first() -> Self {
        Self(1)
    }

    /// The id following this one.
    pub fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }

    /// Whether this is the zero-population sentinel.
    pub fn is_sentinel(self) -> bool {
        self == Self::NO_POPULATION
    }

    /// The raw ordinal.
    pub fn get(self) -> u32 {
        self.0
    }
}

impl fmt::Display for NestingId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_keys_are_rejected() {
        assert_eq!(ZoneKey::new(""), Err(ValidationError::BlankZoneKey));
        assert_eq!(ZoneKey::new("   \t"), Err(ValidationError::BlankZoneKey));
        assert!(TazId::new(" ").is_err());
        assert!(BlockGroupId::new("").is_err());
    }

    #[test]
    fn keys_are_trimmed() {
        let key = ZoneKey::new("  42 ").unwrap();
        assert_eq!(key.as_str(), "42");
    }

    #[test]
    fn numeric_keys_order_by_value() {
        let mut ids: Vec<TazId> = ["10", "9", "100", "1"]
            .iter()
            .map(|s| TazId::new(*s).unwrap())
            .collect();
        ids.sort();
        let rendered: Vec<&str> = ids.iter().map(TazId::as_str).collect();
        assert_eq!(rendered, vec!["1", "9", "10", "100"]);
    }

    #[test]
    fn long_geoids_order_numerically() {
        let a = BlockGroupId::new("530330001001").unwrap();
        let b = BlockGroupId::new("530330001002").unwrap();
        let c = BlockGroupId::new("99").unwrap();
        assert!(a < b);
        assert!(c < a);
    }

    #[test]
    fn numeric_keys_sort_before_text_keys() {
        let n = ZoneKey::new("500").unwrap();
        let t = ZoneKey::new("A1").unwrap();
        assert!(n < t);
        assert!(ZoneKey::new("A1").unwrap() < ZoneKey::new("B0").unwrap());
    }

    #[test]
    fn leading_zeros_tie_break_consistently_with_eq() {
        let a = ZoneKey::new("007").unwrap();
        let b = ZoneKey::new("7").unwrap();
        assert_ne!(a, b);
        assert_ne!(a.cmp(&b), Ordering::Equal);
        assert!(ZoneKey::new("0").unwrap() < ZoneKey::new("1").unwrap());
        assert!(ZoneKey::new("000").unwrap() < ZoneKey::new("1").unwrap());
    }

    #[test]
    fn serde_is_transparent_and_validating() {
        let id = TazId::new("17").unwrap();
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"17\"");
        let parsed: TazId = serde_json::from_str("\"17\"").unwrap();
        assert_eq!(parsed, id);
        assert!(serde_json::from_str::<TazId>("\"  \"").is_err());
    }

    #[test]
    fn nesting_id_sentinel_and_sequence() {
        assert!(NestingId::NO_POPULATION.is_sentinel());
        let first = NestingId::first();
        assert!(!first.is_sentinel());
        assert_eq!(first.get(), 1);
        assert_eq!(first.next().get(), 2);
        assert_eq!(first.next().to_string(), "2");
    }
}
