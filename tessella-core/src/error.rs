//! Error types for the tessella core library.
//!
//! Defines error enums exposed by the public API and a convenient result alias.

use std::fmt;

use thiserror::Error;

use crate::{pattern::PatternId, wfc::CellId};

/// Stable codes describing [`CellError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum CellErrorCode {
    /// A mutation was attempted on a cell that is already collapsed.
    AlreadyCollapsed,
    /// A collapsed-only accessor was used on an uncollapsed cell.
    NotCollapsed,
    /// A collapse targeted a pattern outside the cell's domain.
    NotInDomain,
}

impl CellErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::AlreadyCollapsed => "CELL_ALREADY_COLLAPSED",
            Self::NotCollapsed => "CELL_NOT_COLLAPSED",
            Self::NotInDomain => "CELL_PATTERN_NOT_IN_DOMAIN",
        }
    }
}

impl fmt::Display for CellErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A cell-lifecycle violation. These are programming errors, not recoverable
/// generation states, and callers are expected to propagate them as aborts.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum CellError {
    /// A mutation was attempted on a cell that is already collapsed.
    #[error("cell is already collapsed")]
    AlreadyCollapsed,
    /// A collapsed-only accessor was used on an uncollapsed cell.
    #[error("cell is not yet collapsed")]
    NotCollapsed,
    /// A collapse targeted a pattern outside the cell's domain.
    #[error("pattern {pid} is not in the cell's domain")]
    NotInDomain {
        /// Pattern identifier the collapse requested.
        pid: PatternId,
    },
}

impl CellError {
    /// Retrieve the stable [`CellErrorCode`] for this error.
    pub const fn code(&self) -> CellErrorCode {
        match self {
            Self::AlreadyCollapsed => CellErrorCode::AlreadyCollapsed,
            Self::NotCollapsed => CellErrorCode::NotCollapsed,
            Self::NotInDomain { .. } => CellErrorCode::NotInDomain,
        }
    }
}

/// Stable codes describing [`SynthesisError`] variants.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[non_exhaustive]
pub enum SynthesisErrorCode {
    /// The configured radius was below 1.
    InvalidRadius,
    /// The configured size factor was below 1.
    InvalidSizeFactor,
    /// The configured lower cap was outside `(0, 1]`.
    InvalidLowerCap,
    /// The configured upper cap was below 1.
    InvalidUpperCap,
    /// The configured expansion percentile was outside `[0, 1]`.
    InvalidPercentile,
    /// The configured expansion slack was below 1.
    InvalidSlack,
    /// The training graph contained no nodes.
    EmptyTrainingGraph,
    /// Constraint propagation emptied a cell's domain.
    Contradiction,
    /// A cell-lifecycle invariant was violated.
    CellLifecycle,
}

impl SynthesisErrorCode {
    /// Return the stable machine-readable representation of this error code.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::InvalidRadius => "SYNTH_INVALID_RADIUS",
            Self::InvalidSizeFactor => "SYNTH_INVALID_SIZE_FACTOR",
            Self::InvalidLowerCap => "SYNTH_INVALID_LOWER_CAP",
            Self::InvalidUpperCap => "SYNTH_INVALID_UPPER_CAP",
            Self::InvalidPercentile => "SYNTH_INVALID_PERCENTILE",
            Self::InvalidSlack => "SYNTH_INVALID_SLACK",
            Self::EmptyTrainingGraph => "SYNTH_EMPTY_TRAINING_GRAPH",
            Self::Contradiction => "SYNTH_CONTRADICTION",
            Self::CellLifecycle => "SYNTH_CELL_LIFECYCLE",
        }
    }
}

impl fmt::Display for SynthesisErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error type produced when configuring or running a synthesis.
///
/// `Contradiction` is an expected, recoverable outcome of constraint
/// propagation; the engine consumes it internally and only surfaces it from
/// the lower-level propagation entry points. Every other variant aborts the
/// operation that raised it.
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SynthesisError {
    /// The configured radius was below 1.
    #[error("radius must be at least 1 (got {got})")]
    InvalidRadius {
        /// Value the caller supplied.
        got: usize,
    },
    /// The configured size factor was below 1.
    #[error("size_factor must be at least 1 (got {got})")]
    InvalidSizeFactor {
        /// Value the caller supplied.
        got: usize,
    },
    /// The configured lower cap was outside `(0, 1]`.
    #[error("lower_cap must be in (0, 1] (got {got})")]
    InvalidLowerCap {
        /// Value the caller supplied.
        got: f64,
    },
    /// The configured upper cap was below 1.
    #[error("upper_cap must be at least 1 (got {got})")]
    InvalidUpperCap {
        /// Value the caller supplied.
        got: f64,
    },
    /// The configured expansion percentile was outside `[0, 1]`.
    #[error("expansion_percentile must be in [0, 1] (got {got})")]
    InvalidPercentile {
        /// Value the caller supplied.
        got: f64,
    },
    /// The configured expansion slack was below 1.
    #[error("expansion_slack must be at least 1 (got {got})")]
    InvalidSlack {
        /// Value the caller supplied.
        got: f64,
    },
    /// The training graph contained no nodes.
    #[error("training graph contains no nodes")]
    EmptyTrainingGraph,
    /// Constraint propagation emptied a cell's domain.
    #[error("propagation emptied the domain of cell {cell}")]
    Contradiction {
        /// Cell whose domain became empty.
        cell: CellId,
    },
    /// A cell-lifecycle invariant was violated.
    #[error("cell lifecycle violation: {source}")]
    Cell {
        /// Underlying lifecycle error.
        #[from]
        source: CellError,
    },
}

impl SynthesisError {
    /// Retrieve the stable [`SynthesisErrorCode`] for this error.
    pub const fn code(&self) -> SynthesisErrorCode {
        match self {
            Self::InvalidRadius { .. } => SynthesisErrorCode::InvalidRadius,
            Self::InvalidSizeFactor { .. } => SynthesisErrorCode::InvalidSizeFactor,
            Self::InvalidLowerCap { .. } => SynthesisErrorCode::InvalidLowerCap,
            Self::InvalidUpperCap { .. } => SynthesisErrorCode::InvalidUpperCap,
            Self::InvalidPercentile { .. } => SynthesisErrorCode::InvalidPercentile,
            Self::InvalidSlack { .. } => SynthesisErrorCode::InvalidSlack,
            Self::EmptyTrainingGraph => SynthesisErrorCode::EmptyTrainingGraph,
            Self::Contradiction { .. } => SynthesisErrorCode::Contradiction,
            Self::Cell { .. } => SynthesisErrorCode::CellLifecycle,
        }
    }

    /// Retrieve the inner [`CellErrorCode`] when the error originated in a cell.
    pub const fn cell_code(&self) -> Option<CellErrorCode> {
        match self {
            Self::Cell { source } => Some(source.code()),
            _ => None,
        }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SynthesisError>;
