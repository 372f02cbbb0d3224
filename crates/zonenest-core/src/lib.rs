//! # zonenest-core — Foundational Types for Nesting Discovery
//!
//! This crate defines the type-system primitives shared by every other
//! crate in the workspace. It depends on nothing internal.
//!
//! ## Key Design Principles
//!
//! 1. **Newtype wrappers for zone identifiers.** `TazId` and `BlockGroupId`
//!    are distinct types over a validated `ZoneKey`. A TAZ id cannot be
//!    passed where a Block Group id is expected.
//!
//! 2. **Numeric-aware ordering.** Zone ids are usually integers stored as
//!    text. `ZoneKey` orders `"9"` before `"10"` so that "ascending zone id"
//!    means what a planner expects.
//!
//! 3. **Single classification enums.** `NestingShape`, `ZoneClassification`
//!    and `PopulationBucket` are each defined once, with exhaustive `match`
//!    everywhere they are rendered.
//!
//! ## Crate Policy
//!
//! - No dependencies on other `zonenest-*` crates (this is the leaf of the DAG).
//! - No `unsafe` code.
//! - No `panic!()` or `.unwrap()` outside tests.

pub mod classification;
pub mod error;
pub mod identity;
pub mod population;

// Re-export primary types for ergonomic imports.
pub use classification::{NestingShape, ZoneClassification};
pub use error::{
    ConvergenceStage, MalformedRowReason, NestingError, PartitionViolation, ValidationError,
};
pub use identity::{BlockGroupId, NestingId, TazId, ZoneKey};
pub use population::{Population, PopulationBucket};
