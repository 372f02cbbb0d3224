//! # Error Types — Structured Error Hierarchy
//!
//! Defines the error types used throughout nesting discovery. All errors use
//! `thiserror` for derive-based `Display` and `Error` implementations.
//!
//! ## Design
//!
//! - Every error is fatal for the current run. Discovery is a deterministic
//!   batch computation, so nothing is retried.
//! - Input errors carry the 1-based record number of the offending row.
//! - Internal-consistency faults name the zones and nestings involved.

use thiserror::Error;

/// Top-level error type for nesting discovery.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum NestingError {
    /// An input row is missing an identifier or carries a negative population.
    #[error("malformed input record {record}: {reason}")]
    MalformedRow {
        /// 1-based record number within the input sequence.
        record: usize,
        /// What is wrong with the record.
        reason: MalformedRowReason,
    },

    /// A bounded iterative stage hit its limit without reaching a fixed point.
    #[error("nesting discovery failed to converge: {stage} did not stabilise within {limit} iterations")]
    NotConverged {
        /// The stage that gave up.
        stage: ConvergenceStage,
        /// The iteration cap that was reached.
        limit: usize,
    },

    /// Population totals no longer fit in a [`crate::Population`].
    #[error("population total overflows at input record {record}")]
    PopulationOverflow {
        /// 1-based record number whose population could not be added.
        record: usize,
    },

    /// The discovered partition is inconsistent with the share matrix.
    #[error("partition violation: {0}")]
    PartitionViolation(#[from] PartitionViolation),

    /// A value failed validation at construction.
    #[error("validation error: {0}")]
    Validation(#[from] ValidationError),
}

/// Reason an input row was rejected.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MalformedRowReason {
    /// The TAZ identifier is absent or blank.
    #[error("missing TAZ identifier")]
    MissingTaz,

    /// The Block Group identifier is absent or blank.
    #[error("missing block group identifier")]
    MissingBlockGroup,

    /// Population counts must be non-negative.
    #[error("negative population {0}")]
    NegativePopulation(i64),
}

/// Iterative stage named by [`NestingError::NotConverged`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConvergenceStage {
    /// Alternating row/column reordering of the share matrix.
    Sorting,
    /// Fixed-point growth of a candidate nesting block.
    Expansion,
}

impl std::fmt::Display for ConvergenceStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Sorting => f.write_str("matrix sort"),
            Self::Expansion => f.write_str("block expansion"),
        }
    }
}

/// Internal-consistency fault found while verifying a partition.
///
/// Any of these means the heuristic ordering failed to bring a nesting
/// into contiguous form. Identifiers are rendered as text so the fault
/// can be reported without the original matrix.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PartitionViolation {
    /// A shared-population edge joins two different nestings.
    #[error("TAZ {taz} (nesting {taz_nesting}) shares population with block group {block_group} (nesting {block_group_nesting})")]
    CrossEdge {
        /// TAZ end of the edge.
        taz: String,
        /// Block Group end of the edge.
        block_group: String,
        /// Nesting the TAZ was assigned to.
        taz_nesting: u32,
        /// Nesting the Block Group was assigned to.
        block_group_nesting: u32,
    },

    /// A nesting spans more than one connected component.
    #[error("nesting {nesting} is not connected")]
    Disconnected {
        /// The offending nesting ordinal.
        nesting: u32,
    },

    /// A zone was assigned to more than one nesting.
    #[error("zone {zone} assigned to more than one nesting")]
    Overlapping {
        /// The doubly-assigned zone, rendered as text.
        zone: String,
    },

    /// Some zones were never assigned to a nesting.
    #[error("{tazs} TAZ(s) and {block_groups} block group(s) left unassigned")]
    Unassigned {
        /// Number of unassigned TAZs.
        tazs: usize,
        /// Number of unassigned Block Groups.
        block_groups: usize,
    },
}

/// Error constructing a validated value.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ValidationError {
    /// Zone identifiers must contain at least one non-whitespace character.
    #[error("zone identifier must not be blank")]
    BlankZoneKey,

    /// A nesting must contain at least one zone on each axis.
    #[error("nesting must contain at least one TAZ and one block group (got {tazs} TAZ(s), {block_groups} block group(s))")]
    EmptyNesting {
        /// TAZ count supplied.
        tazs: usize,
        /// Block Group count supplied.
        block_groups: usize,
    },

    /// Unrecognised label text.
    #[error("unknown {kind} label: {value:?}")]
    UnknownLabel {
        /// What was being parsed.
        kind: &'static str,
        /// The rejected text.
        value: String,
    },
}
