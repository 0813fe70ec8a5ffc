//! Match outcomes and their fractional errors.

use crate::event::{Event, ScoredEvent};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::{Add, AddAssign};

/// Read access to the error mass of one or more matches.
///
/// Implemented by [`MatchError`] (a single pairing) and
/// [`MatchErrorCounts`] (several pairings collapsed into one curve point), so
/// the curve computations accept either.
pub trait ErrorCounts {
    /// Fractional false-positive mass
    fn false_positives(&self) -> f64;
    /// Fractional false-negative mass
    fn false_negatives(&self) -> f64;
    /// Number of hypotheses accounted for
    fn hypotheses(&self) -> usize;
    /// Number of references accounted for
    fn references(&self) -> usize;
}

/// Fractional false-positive and false-negative rates of one pairing.
///
/// Both rates are in `[0, 1]`. A perfect hit is `{0, 0}`, an unmatched
/// hypothesis `{1, 0}` and a missed reference `{0, 1}`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchError {
    pub fp: f64,
    #[serde(rename = "fn")]
    pub fn_: f64,
}

impl MatchError {
    /// Perfect hit.
    pub const PERFECT: Self = Self::new(0.0, 0.0);
    /// Scorer verdict for a pairing that is not a match.
    pub const REJECTED: Self = Self::new(1.0, 1.0);
    /// Hypothesis without any reference.
    pub const FALSE_POSITIVE: Self = Self::new(1.0, 0.0);
    /// Reference without any hypothesis.
    pub const FALSE_NEGATIVE: Self = Self::new(0.0, 1.0);

    pub const fn new(fp: f64, fn_: f64) -> Self {
        Self { fp, fn_ }
    }

    /// True when a scorer accepted the pairing as (at least partially) correct.
    pub fn is_accepted(&self) -> bool {
        self.fp < 1.0
    }
}

impl ErrorCounts for MatchError {
    fn false_positives(&self) -> f64 {
        self.fp
    }

    fn false_negatives(&self) -> f64 {
        self.fn_
    }

    /// 1, except for a pure false negative, which has no hypothesis.
    fn hypotheses(&self) -> usize {
        usize::from(self.fp > 0.0 || self.fn_ < 1.0)
    }

    /// 1, except for a pure false positive, which has no reference.
    fn references(&self) -> usize {
        usize::from(self.fp < 1.0 || self.fn_ > 0.0)
    }
}

impl fmt::Display for MatchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MatchError[fp={}, fn={}, nh={}, nr={}]",
            self.fp,
            self.fn_,
            self.hypotheses(),
            self.references()
        )
    }
}

/// Accumulated error mass with explicit hypothesis/reference counts.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct MatchErrorCounts {
    pub fp: f64,
    #[serde(rename = "fn")]
    pub fn_: f64,
    pub nh: usize,
    pub nr: usize,
}

impl MatchErrorCounts {
    pub fn new(fp: f64, fn_: f64, nh: usize, nr: usize) -> Self {
        Self { fp, fn_, nh, nr }
    }
}

impl From<MatchError> for MatchErrorCounts {
    fn from(error: MatchError) -> Self {
        Self::new(error.fp, error.fn_, error.hypotheses(), error.references())
    }
}

impl ErrorCounts for MatchErrorCounts {
    fn false_positives(&self) -> f64 {
        self.fp
    }

    fn false_negatives(&self) -> f64 {
        self.fn_
    }

    fn hypotheses(&self) -> usize {
        self.nh
    }

    fn references(&self) -> usize {
        self.nr
    }
}

impl Add for MatchErrorCounts {
    type Output = Self;

    fn add(self, other: Self) -> Self {
        Self::new(
            self.fp + other.fp,
            self.fn_ + other.fn_,
            self.nh + other.nh,
            self.nr + other.nr,
        )
    }
}

impl AddAssign<MatchError> for MatchErrorCounts {
    fn add_assign(&mut self, error: MatchError) {
        *self = *self + Self::from(error);
    }
}

impl AddAssign for MatchErrorCounts {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl fmt::Display for MatchErrorCounts {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "MatchErrorCounts[fp={}, fn={}, nh={}, nr={}]",
            self.fp, self.fn_, self.nh, self.nr
        )
    }
}

/// Outcome of evaluating one hypothesis or one reference.
///
/// A match always holds at least one event: a reference/hypothesis pair with
/// the scorer's error, a lone hypothesis (false positive) or a lone reference
/// (false negative).
#[derive(Debug, Clone)]
pub enum Match<L> {
    /// Hypothesis accepted against a reference
    Paired {
        reference: Event<L>,
        hypothesis: ScoredEvent<L>,
        error: MatchError,
    },
    /// Hypothesis that matched no reference
    FalsePositive { hypothesis: ScoredEvent<L> },
    /// Reference that no hypothesis matched
    FalseNegative { reference: Event<L> },
}

impl<L> Match<L> {
    pub fn paired(reference: Event<L>, hypothesis: ScoredEvent<L>, error: MatchError) -> Self {
        Self::Paired {
            reference,
            hypothesis,
            error,
        }
    }

    pub fn false_positive(hypothesis: ScoredEvent<L>) -> Self {
        Self::FalsePositive { hypothesis }
    }

    pub fn false_negative(reference: Event<L>) -> Self {
        Self::FalseNegative { reference }
    }

    pub fn error(&self) -> MatchError {
        match self {
            Self::Paired { error, .. } => *error,
            Self::FalsePositive { .. } => MatchError::FALSE_POSITIVE,
            Self::FalseNegative { .. } => MatchError::FALSE_NEGATIVE,
        }
    }

    pub fn reference(&self) -> Option<&Event<L>> {
        match self {
            Self::Paired { reference, .. } | Self::FalseNegative { reference } => Some(reference),
            Self::FalsePositive { .. } => None,
        }
    }

    pub fn hypothesis(&self) -> Option<&ScoredEvent<L>> {
        match self {
            Self::Paired { hypothesis, .. } | Self::FalsePositive { hypothesis } => Some(hypothesis),
            Self::FalseNegative { .. } => None,
        }
    }

    /// Hypothesis score, or negative infinity for a missed reference.
    pub fn score(&self) -> f64 {
        self.hypothesis()
            .map_or(f64::NEG_INFINITY, |hypothesis| hypothesis.score)
    }

    /// Query of the match, taken from the reference when there is one.
    pub fn query(&self) -> &str {
        match self {
            Self::Paired { reference, .. } | Self::FalseNegative { reference } => &reference.query,
            Self::FalsePositive { hypothesis } => hypothesis.query(),
        }
    }
}

/// Equal when the variant, both endpoints and the error are equal.
impl<L: Ord> PartialEq for Match<L> {
    fn eq(&self, other: &Self) -> bool {
        self.error() == other.error()
            && self.reference() == other.reference()
            && self.hypothesis() == other.hypothesis()
    }
}

impl<L: fmt::Display> fmt::Display for Match<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("Match[")?;
        if let Some(hypothesis) = self.hypothesis() {
            write!(f, "Hyp={}, ", hypothesis)?;
        }
        if let Some(reference) = self.reference() {
            write!(f, "Ref={}, ", reference)?;
        }
        write!(f, "Error={}]", self.error())
    }
}
