//! Error types for yeastwig
//!
//! Defines all error types used throughout the library.

use crate::formats::wig::WigParseError;
use thiserror::Error;

/// Main error type for yeastwig operations
#[derive(Debug, Error)]
pub enum YeastWigError {
    /// Signal extraction and aggregation errors
    #[error("Signal error: {0}")]
    Signal(#[from] SignalError),

    /// Wiggle parsing errors
    #[error("Wiggle parse error: {0}")]
    Parse(#[from] WigParseError),

    /// Malformed anchor or summit table
    #[error("Invalid table at line {line}: {message}")]
    InvalidTable { line: usize, message: String },

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Which side of a target coordinate a position lookup resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    /// Greatest position at or below the target
    Floor,
    /// Least position at or above the target
    Ceiling,
}

impl std::fmt::Display for Bound {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Bound::Floor => write!(f, "floor"),
            Bound::Ceiling => write!(f, "ceiling"),
        }
    }
}

/// Errors raised by the signal extraction core
///
/// All of these are deterministic data-shape failures: callers should stop the
/// analysis and report them instead of retrying.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SignalError {
    /// Chromosome labels match neither or both supported naming schemes
    #[error("Unrecognized genome: {0}")]
    UnrecognizedGenome(String),

    /// Anchor table has no record for the chromosome
    #[error("Chromosome not found in {scheme} anchor table: {chrom}")]
    UnknownChromosome { scheme: String, chrom: String },

    /// A detected scheme is missing one of its chromosomes
    #[error("Track set has no entry for chromosome {0}")]
    MissingChromosome(String),

    /// No row satisfies a floor/ceiling lookup
    #[error("No {bound} position for target {target} (track spans {first:?}..={last:?})")]
    OutOfRange {
        target: u64,
        bound: Bound,
        first: Option<u64>,
        last: Option<u64>,
    },

    /// Extraction window has no overlap with the track, or exceeds the chromosome
    #[error("Window {start}..={end} on {chrom} is outside the available range")]
    WindowOutOfBounds { chrom: String, start: i64, end: i64 },

    /// Aggregation over nothing
    #[error("Cannot aggregate empty input: {0}")]
    EmptyInput(String),

    /// Track positions are not strictly increasing
    #[error("Track positions must be strictly increasing: {previous} followed by {next}")]
    UnsortedTrack { previous: u64, next: u64 },

    /// Two rows share one position
    #[error("Duplicate position {0} in track")]
    DuplicatePosition(u64),

    /// Anchor record violates 0 < midpoint < length
    #[error("Invalid anchor for {chrom}: centromere {centromere} not within length {length}")]
    InvalidAnchor {
        chrom: String,
        length: u64,
        centromere: u64,
    },

    /// Window length or bandwidth out of range
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),
}

/// Result type alias for yeastwig operations
pub type Result<T> = std::result::Result<T, YeastWigError>;

/// Result type alias for signal operations
pub type SignalResult<T> = std::result::Result<T, SignalError>;
