//! Error types for kwseval-core.
//!
//! Matching and assessment never fail: degenerate inputs (no references, no
//! hypotheses, zero-area boxes) have defined fallback values. The errors below
//! cover the remaining concerns: reading event files, loading query groups,
//! resampling, and invariant violations detected by the orchestration layer.

use thiserror::Error;

/// Errors that can occur while reading event files.
#[derive(Debug, Error)]
pub enum ReaderError {
    /// Underlying I/O failure (missing file, unreadable stream)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A line could not be parsed into an event
    #[error("Failed to read event from line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// What was wrong with the line
        message: String,
    },
}

/// Errors that can occur while parsing a location from text tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseLocationError {
    /// Wrong number of tokens for this location kind
    #[error("expected {expected} location fields, found {found}")]
    FieldCount {
        /// Number of tokens the location needs
        expected: usize,
        /// Number of tokens available
        found: usize,
    },
    /// A numeric field was not a valid unsigned integer
    #[error("invalid coordinate {0:?}")]
    InvalidCoordinate(String),
}

/// Configuration errors raised while loading query sets or query groups.
#[derive(Debug, Error)]
pub enum QueryGroupError {
    /// The file could not be read
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// A query-groups row has fewer than two fields
    #[error("Query groups row {line} has a wrong format: expected `group query [query ...]`")]
    MalformedRow {
        /// 1-based line number
        line: usize,
    },
}

/// Errors that can occur while computing bootstrap confidence intervals.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum BootstrapError {
    /// At least one repetition is needed to build the interval
    #[error("Bootstrap needs at least one repetition")]
    NoRepetitions,
    /// Alpha must be a probability
    #[error("Invalid alpha {0}: must be within [0, 1]")]
    InvalidAlpha(f64),
    /// Cannot draw with replacement from an empty collection
    #[error("Cannot resample an empty collection")]
    EmptySample,
}

/// Invariant violations detected while evaluating a submission.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EvaluationError {
    /// The matches account for more hypotheses than were submitted
    #[error(
        "Effective number of hypotheses ({effective}) is greater than the original number ({original})"
    )]
    EffectiveHypothesesExceeded {
        /// Sum of matched hypothesis counts over all matches
        effective: usize,
        /// Number of hypotheses given to the matcher
        original: usize,
    },
}
