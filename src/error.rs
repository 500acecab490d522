//! # Error
//!
//! Errors raised while extracting methylation patterns. Invalid inputs are
//! detected before any scanning starts; cancellation is reported as a distinct
//! [`PatternError::Aborted`] outcome. Calls that cannot be encoded are not
//! errors: they are recorded on the resulting table instead.

use std::fmt;

use polars::prelude::PolarsError;
use thiserror::Error;

use crate::data_structs::typedef::{
    ChrIdType,
    PosType,
    TemplateIdType,
};

/// Scan pass in which an operation was running.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPass {
    /// First pass, building the position histogram.
    Selection,
    /// Second pass, building pattern rows.
    Extraction,
}

impl fmt::Display for ScanPass {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        match self {
            ScanPass::Selection => write!(f, "position selection"),
            ScanPass::Extraction => write!(f, "pattern extraction"),
        }
    }
}

#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PatternError {
    /// Read columns have different lengths
    #[error("read column '{column}' has {found} values, expected {expected}")]
    ColumnLengthMismatch {
        column:   &'static str,
        expected: usize,
        found:    usize,
    },

    /// Read refers to a template missing from the store
    #[error("read {read} refers to template {templid}, but the store holds {n_templates} templates")]
    TemplateOutOfRange {
        read:        usize,
        templid:     TemplateIdType,
        n_templates: usize,
    },

    /// Call and sequence arrays of the template store differ in length
    #[error("template store holds {calls} call strings but {seqs} sequences")]
    TemplateStoreMismatch { calls: usize, seqs: usize },

    /// Read extends past the last representable position
    #[error("read {read} starting at {start} with {len} calls ends past position {}", PosType::MAX)]
    ReadOutOfBounds {
        read:  usize,
        start: PosType,
        len:   usize,
    },

    /// Target window ends before it starts
    #[error("malformed target window: end {end} < start {start}")]
    MalformedTarget { start: PosType, end: PosType },

    /// Context frequency threshold is not a fraction
    #[error("minimum context frequency must be within [0, 1], got {0}")]
    InvalidFrequency(f64),

    /// Highlight coordinates are not sorted and unique
    #[error("highlight positions must be sorted and unique: {prev} is followed by {next}")]
    UnsortedHighlights { prev: PosType, next: PosType },

    /// Chromosome identifier has no label
    #[error("chromosome {0} has no label among the supplied levels")]
    UnknownChromosome(ChrIdType),

    /// Scan was cancelled by the caller
    #[error("{pass} aborted after {reads_scanned} reads")]
    Aborted {
        pass:          ScanPass,
        reads_scanned: usize,
    },

    /// Failure while building a data frame
    #[error(transparent)]
    Polars(#[from] PolarsError),
}

impl PatternError {
    /// Returns true if the error was caused by a cancellation request.
    pub fn is_aborted(&self) -> bool {
        matches!(self, PatternError::Aborted { .. })
    }

    /// Returns true if the error was caused by inconsistent inputs, detected
    /// before scanning.
    pub fn is_invalid_input(&self) -> bool {
        !matches!(
            self,
            PatternError::Aborted { .. }
                | PatternError::Polars(_)
                | PatternError::UnknownChromosome(_)
        )
    }
}
