//! Precision/recall curves, Average Precision and NDCG over match outcomes.
//!
//! All functions are pure transforms over sequences already ordered by
//! decreasing hypothesis score (false negatives last, with score `-inf`).
//! They accept either raw per-match [`MatchError`]s or collapsed
//! [`MatchErrorCounts`] through the [`ErrorCounts`] trait.
//!
//! Degenerate inputs have defined values instead of errors:
//!
//! | Case | Value |
//! |------|-------|
//! | no hypothesis seen yet | precision 1 |
//! | no references at all | recall 1, NDCG 0, AP-from-errors 0 |
//!
//! # References
//!
//! - Järvelin & Kekäläinen (2002). "Cumulated gain-based evaluation of IR techniques"
//! - Manning, Raghavan & Schütze (2008). "Introduction to Information Retrieval", ch. 8

use crate::config::{DEFAULT_COLLAPSE_MATCHES, DEFAULT_INTERPOLATE_PRECISION, DEFAULT_TRAPEZOID_INTEGRAL};
use crate::matching::{ErrorCounts, Match, MatchError, MatchErrorCounts};
use serde::{Deserialize, Serialize};

/// How a match sequence is turned into a precision/recall curve.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurveOptions {
    /// Merge matches sharing a hypothesis score into one curve point
    pub collapse_matches: bool,
    /// Replace each precision by the maximum precision to its right
    pub interpolate_precision: bool,
    /// Integrate with the trapezoid rule instead of rectangles
    pub trapezoid_integral: bool,
}

impl Default for CurveOptions {
    fn default() -> Self {
        Self {
            collapse_matches: DEFAULT_COLLAPSE_MATCHES,
            interpolate_precision: DEFAULT_INTERPOLATE_PRECISION,
            trapezoid_integral: DEFAULT_TRAPEZOID_INTEGRAL,
        }
    }
}

/// Precision and recall at every point of an error sequence.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PrecisionRecall {
    pub precision: Vec<f64>,
    pub recall: Vec<f64>,
}

impl PrecisionRecall {
    pub fn len(&self) -> usize {
        self.precision.len()
    }

    pub fn is_empty(&self) -> bool {
        self.precision.is_empty()
    }
}

// ============================================================================
// Match sequences
// ============================================================================

/// Collapses consecutive matches sharing a score into single curve points.
///
/// False negatives have score `-inf`, so a trailing block of misses becomes
/// one point as well.
///
/// ```text
/// fp=0 fn=0 score=0.9
/// fp=1 fn=0 score=0.9      ->  fp=1 fn=0 nh=2 nr=1
/// fp=0 fn=1 score=-inf
/// fp=0 fn=1 score=-inf     ->  fp=0 fn=2 nh=0 nr=2
/// ```
pub fn collapse_matches<L>(matches: &[Match<L>]) -> Vec<MatchErrorCounts> {
    let mut collapsed: Vec<(MatchErrorCounts, f64)> = Vec::new();
    for m in matches {
        let score = m.score();
        if let Some((counts, last_score)) = collapsed.last_mut() {
            if *last_score == score {
                *counts += m.error();
                continue;
            }
        }
        collapsed.push((MatchErrorCounts::from(m.error()), score));
    }
    collapsed.into_iter().map(|(counts, _)| counts).collect()
}

/// Errors of each match, without collapsing.
pub fn match_errors<L>(matches: &[Match<L>]) -> Vec<MatchError> {
    matches.iter().map(Match::error).collect()
}

/// Total number of references accounted for by a sequence.
pub fn total_references<E: ErrorCounts>(errors: &[E]) -> usize {
    errors.iter().map(ErrorCounts::references).sum()
}

// ============================================================================
// Precision / Recall
// ============================================================================

/// Computes the precision/recall curve of an ordered error sequence.
///
/// # Formula
///
/// ```text
/// precision[i] = 1 - ΣFP / ΣNH          (1 when ΣNH = 0)
/// recall[i]    = (ΣNR - ΣFN) / TR       (1 when TR = 0)
/// ```
///
/// where the sums run over points `0..=i` and `TR` is the total number of
/// references in the sequence.
///
/// # Arguments
///
/// * `errors` - Error points ordered by decreasing score
/// * `interpolate` - Make precision monotone by taking the running maximum
///   from the right
pub fn precision_recall_curve<E: ErrorCounts>(errors: &[E], interpolate: bool) -> PrecisionRecall {
    let total_refs = total_references(errors) as f64;

    let mut precision = Vec::with_capacity(errors.len());
    let mut recall = Vec::with_capacity(errors.len());

    let (mut sum_nh, mut sum_nr) = (0usize, 0usize);
    let (mut sum_fp, mut sum_fn) = (0.0f64, 0.0f64);
    for e in errors {
        sum_nh += e.hypotheses();
        sum_nr += e.references();
        sum_fp += e.false_positives();
        sum_fn += e.false_negatives();

        precision.push(if sum_nh > 0 {
            1.0 - sum_fp / sum_nh as f64
        } else {
            1.0
        });
        recall.push(if total_refs > 0.0 {
            (sum_nr as f64 - sum_fn) / total_refs
        } else {
            1.0
        });
    }

    if interpolate {
        for i in (1..precision.len()).rev() {
            precision[i - 1] = precision[i - 1].max(precision[i]);
        }
    }

    PrecisionRecall { precision, recall }
}

/// Precision weight of point `i`, averaged with the previous point under the
/// trapezoid rule.
fn precision_weight(precision: &[f64], i: usize, trapezoid: bool) -> f64 {
    if trapezoid && i > 0 {
        0.5 * (precision[i] + precision[i - 1])
    } else {
        precision[i]
    }
}

// ============================================================================
// Average Precision
// ============================================================================

/// Computes Average Precision from a precision/recall curve.
///
/// # Formula
///
/// ```text
/// AP = Σ pr[i] · (rc[i] - rc[i-1]),   rc[-1] = 0
///    = Σ pr[i] · rc[i] - Σ pr[i] · rc[i-1]
/// ```
///
/// With `trapezoid`, `pr[i]` (for `i > 0`) is replaced by the mean of
/// `pr[i]` and `pr[i-1]`.
pub fn average_precision(precision: &[f64], recall: &[f64], trapezoid: bool) -> f64 {
    debug_assert_eq!(precision.len(), recall.len());
    let n = precision.len().min(recall.len());

    let ap1: f64 = (0..n)
        .map(|i| recall[i] * precision_weight(precision, i, trapezoid))
        .sum();
    let ap2: f64 = (1..n)
        .map(|i| recall[i - 1] * precision_weight(precision, i, trapezoid))
        .sum();
    ap1 - ap2
}

/// Computes Average Precision directly from the error points.
///
/// # Formula
///
/// ```text
/// AP = 1/TR · Σ (NH[i] - FP[i]) · pr[i]
/// ```
///
/// Matches [`average_precision`] whenever every point loses the same
/// fractional mass on both sides (hard decisions). Returns 0 without
/// references.
pub fn average_precision_from_errors<E: ErrorCounts>(
    errors: &[E],
    precision: &[f64],
    trapezoid: bool,
) -> f64 {
    debug_assert_eq!(errors.len(), precision.len());
    let total_refs = total_references(errors);
    if total_refs == 0 {
        return 0.0;
    }

    let sum: f64 = errors
        .iter()
        .zip(0..precision.len())
        .map(|(e, i)| {
            let tp = e.hypotheses() as f64 - e.false_positives();
            tp * precision_weight(precision, i, trapezoid)
        })
        .sum();
    sum / total_refs as f64
}

// ============================================================================
// NDCG
// ============================================================================

/// Discount of the hypothesis at 1-based `rank`.
fn discount(rank: usize) -> f64 {
    1.0 / (rank as f64 + 1.0).log2()
}

/// Computes the Normalized Discounted Cumulative Gain of an error sequence.
///
/// Each of a point's `NH` hypotheses takes the next rank and gains
/// `2^((NH - FP) / NH) - 1`. The ideal ranking puts all `TR` references
/// first with unit gain.
///
/// # Formula
///
/// ```text
/// DCG  = Σ_points Σ_{k=1..NH} (2^((NH-FP)/NH) - 1) / log₂(rank + 1)
/// Z    = Σ_{j=1..TR} 1 / log₂(j + 1)
/// NDCG = DCG / Z                       (0 when TR = 0)
/// ```
pub fn ndcg<E: ErrorCounts>(errors: &[E]) -> f64 {
    let total_refs = total_references(errors);
    if total_refs == 0 {
        return 0.0;
    }

    let mut dcg = 0.0;
    let mut rank = 0;
    for e in errors {
        let nh = e.hypotheses();
        if nh == 0 {
            continue;
        }
        let gain = 2f64.powf((nh as f64 - e.false_positives()) / nh as f64) - 1.0;
        for _ in 0..nh {
            rank += 1;
            dcg += gain * discount(rank);
        }
    }

    let ideal: f64 = (1..=total_refs).map(discount).sum();
    dcg / ideal
}

// ============================================================================
// Single-list statistics
// ============================================================================

/// Precision/recall curve of an ordered match list under the given options.
pub fn match_precision_recall<L>(matches: &[Match<L>], options: &CurveOptions) -> PrecisionRecall {
    if options.collapse_matches {
        precision_recall_curve(&collapse_matches(matches), options.interpolate_precision)
    } else {
        precision_recall_curve(&match_errors(matches), options.interpolate_precision)
    }
}

/// Average Precision of one match list already ordered by decreasing score.
pub fn global_average_precision<L>(matches: &[Match<L>], options: &CurveOptions) -> f64 {
    let curve = match_precision_recall(matches, options);
    average_precision(&curve.precision, &curve.recall, options.trapezoid_integral)
}

/// NDCG of one match list already ordered by decreasing score.
pub fn global_ndcg<L>(matches: &[Match<L>], collapse: bool) -> f64 {
    if collapse {
        ndcg(&collapse_matches(matches))
    } else {
        ndcg(&match_errors(matches))
    }
}
