//! Pairing strategies between a reference and a hypothesis.
//!
//! A scorer decides how wrong a hypothesis is with respect to one reference,
//! expressed as a [`MatchError`]. An error with `fp >= 1` means the pair is
//! rejected and the matcher moves on to the next candidate.
//!
//! | Variant | Accepts when | Error when accepted |
//! |---------|--------------|---------------------|
//! | [`ScorerKind::IntersectionOverHypothesisArea`] | `∩ / area(hyp) >= t` | `{0, 0}` |
//! | [`ScorerKind::IntersectionOverUnion`] | `∩ / ∪ >= t` | `{0, 0}` |
//! | [`ScorerKind::SoftIntersectionOverHypothesisArea`] | any overlap | `{1 - ∩/area(hyp), 1 - ∩/area(ref)}` |
//! | [`ScorerKind::SoftIntersectionOverUnion`] | `∩ / ∪ >= t` | `{1 - ∩/area(hyp), 1 - ∩/area(ref)}` |
//! | [`ScorerKind::Identity`] | same location | `{0, 0}` |
//!
//! Every variant rejects pairs with different queries. Closures with the
//! signature `Fn(&Event<L>, &ScoredEvent<L>) -> MatchError` are scorers too.

use super::types::MatchError;
use crate::config::DEFAULT_OVERLAP_THRESHOLD;
use crate::event::{Event, Location, ScoredEvent};
use serde::{Deserialize, Serialize};

/// Computes the error of pairing a hypothesis with a reference.
pub trait Scorer<L> {
    fn score(&self, reference: &Event<L>, hypothesis: &ScoredEvent<L>) -> MatchError;
}

impl<L, F> Scorer<L> for F
where
    F: Fn(&Event<L>, &ScoredEvent<L>) -> MatchError,
{
    fn score(&self, reference: &Event<L>, hypothesis: &ScoredEvent<L>) -> MatchError {
        self(reference, hypothesis)
    }
}

/// Built-in scoring strategies.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScorerKind {
    /// Hard decision on the fraction of the hypothesis covered by the reference
    IntersectionOverHypothesisArea { threshold: f64 },
    /// Hard decision on intersection over union
    IntersectionOverUnion { threshold: f64 },
    /// Fractional errors from the covered fractions of both events
    SoftIntersectionOverHypothesisArea,
    /// Fractional errors, only for pairs whose IoU reaches the threshold
    SoftIntersectionOverUnion { threshold: f64 },
    /// Exact location equality
    Identity,
}

impl Default for ScorerKind {
    fn default() -> Self {
        Self::IntersectionOverHypothesisArea {
            threshold: DEFAULT_OVERLAP_THRESHOLD,
        }
    }
}

impl ScorerKind {
    /// Short name used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::IntersectionOverHypothesisArea { .. } => "IoHA",
            Self::IntersectionOverUnion { .. } => "IoU",
            Self::SoftIntersectionOverHypothesisArea => "SoftIoHA",
            Self::SoftIntersectionOverUnion { .. } => "SoftIoU",
            Self::Identity => "Identity",
        }
    }
}

/// Fraction `num / den`, or `None` if the denominator is not positive.
fn ratio(num: f64, den: f64) -> Option<f64> {
    (den > 0.0).then(|| num / den)
}

fn hard_decision(ratio: Option<f64>, threshold: f64) -> MatchError {
    match ratio {
        Some(r) if r >= threshold => MatchError::PERFECT,
        _ => MatchError::REJECTED,
    }
}

/// Soft error from the uncovered fractions of the hypothesis and reference.
fn soft_error<L: Location>(reference: &Event<L>, hypothesis: &ScoredEvent<L>, intersection: f64) -> MatchError {
    let fp = ratio(intersection, hypothesis.area()).map_or(1.0, |r| 1.0 - r);
    let fn_ = ratio(intersection, reference.area()).map_or(1.0, |r| 1.0 - r);
    MatchError::new(fp, fn_)
}

impl<L: Location> Scorer<L> for ScorerKind {
    fn score(&self, reference: &Event<L>, hypothesis: &ScoredEvent<L>) -> MatchError {
        if reference.query != hypothesis.query() {
            return MatchError::REJECTED;
        }

        let reference_location = &reference.location;
        let hypothesis_location = hypothesis.location();

        match *self {
            Self::IntersectionOverHypothesisArea { threshold } => {
                let intersection = reference_location.intersection_area(hypothesis_location);
                hard_decision(ratio(intersection, hypothesis.area()), threshold)
            }
            Self::IntersectionOverUnion { threshold } => {
                let intersection = reference_location.intersection_area(hypothesis_location);
                let union = reference_location.union_area(hypothesis_location);
                hard_decision(ratio(intersection, union), threshold)
            }
            Self::SoftIntersectionOverHypothesisArea => {
                let intersection = reference_location.intersection_area(hypothesis_location);
                soft_error(reference, hypothesis, intersection)
            }
            Self::SoftIntersectionOverUnion { threshold } => {
                let intersection = reference_location.intersection_area(hypothesis_location);
                let union = reference_location.union_area(hypothesis_location);
                match ratio(intersection, union) {
                    Some(iou) if iou >= threshold => soft_error(reference, hypothesis, intersection),
                    _ => MatchError::REJECTED,
                }
            }
            Self::Identity => {
                if reference_location == hypothesis_location {
                    MatchError::PERFECT
                } else {
                    MatchError::REJECTED
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{BoundingBox, IdentityLocation};

    fn reference(query: &str, x: u32, y: u32, w: u32, h: u32) -> Event<BoundingBox> {
        Event::new(query, BoundingBox::new(x, y, w, h))
    }

    fn hypothesis(query: &str, x: u32, y: u32, w: u32, h: u32) -> ScoredEvent<BoundingBox> {
        ScoredEvent::new(query, BoundingBox::new(x, y, w, h), 1.0)
    }

    fn assert_error_eq(actual: MatchError, fp: f64, fn_: f64) {
        assert!(
            (actual.fp - fp).abs() < 1e-12 && (actual.fn_ - fn_).abs() < 1e-12,
            "expected fp={fp} fn={fn_}, got {actual}"
        );
    }

    #[test]
    fn test_ioha_threshold() {
        let scorer = ScorerKind::IntersectionOverHypothesisArea { threshold: 0.5 };
        let r = reference("q", 0, 0, 10, 10);

        // Hypothesis half inside the reference
        assert_eq!(scorer.score(&r, &hypothesis("q", 5, 0, 10, 10)), MatchError::PERFECT);
        // Less than half inside
        assert_eq!(scorer.score(&r, &hypothesis("q", 6, 0, 10, 10)), MatchError::REJECTED);
        // Small hypothesis fully inside a large reference
        assert_eq!(scorer.score(&r, &hypothesis("q", 2, 2, 1, 1)), MatchError::PERFECT);
    }

    #[test]
    fn test_ioha_rejects_zero_area_hypothesis() {
        let scorer = ScorerKind::IntersectionOverHypothesisArea { threshold: 0.0 };
        let r = reference("q", 0, 0, 10, 10);
        assert_eq!(scorer.score(&r, &hypothesis("q", 2, 2, 0, 0)), MatchError::REJECTED);
    }

    #[test]
    fn test_iou_threshold() {
        let scorer = ScorerKind::IntersectionOverUnion { threshold: 0.5 };
        let r = reference("q", 0, 0, 10, 10);

        // Fully contained small box has a low IoU even though IoHA is 1
        assert_eq!(scorer.score(&r, &hypothesis("q", 2, 2, 1, 1)), MatchError::REJECTED);
        // Identical boxes
        assert_eq!(scorer.score(&r, &hypothesis("q", 0, 0, 10, 10)), MatchError::PERFECT);
        // 80 / 120 overlap
        assert_eq!(scorer.score(&r, &hypothesis("q", 2, 0, 10, 10)), MatchError::PERFECT);
    }

    #[test]
    fn test_query_mismatch_is_rejected() {
        let r = reference("cat", 0, 0, 10, 10);
        let h = hypothesis("dog", 0, 0, 10, 10);
        for scorer in [
            ScorerKind::IntersectionOverHypothesisArea { threshold: 0.5 },
            ScorerKind::IntersectionOverUnion { threshold: 0.5 },
            ScorerKind::SoftIntersectionOverHypothesisArea,
            ScorerKind::SoftIntersectionOverUnion { threshold: 0.0 },
            ScorerKind::Identity,
        ] {
            assert_eq!(scorer.score(&r, &h), MatchError::REJECTED, "{}", scorer.name());
        }
    }

    #[test]
    fn test_soft_ioha() {
        let scorer = ScorerKind::SoftIntersectionOverHypothesisArea;
        let r = reference("q", 0, 0, 10, 10);

        // Overlap 50: half of the hypothesis (area 100) and half of the reference
        assert_error_eq(scorer.score(&r, &hypothesis("q", 5, 0, 10, 10)), 0.5, 0.5);
        // Hypothesis inside the reference: no false-positive mass
        assert_error_eq(scorer.score(&r, &hypothesis("q", 0, 0, 5, 10)), 0.0, 0.5);
        // Disjoint boxes are fully rejected
        assert_error_eq(scorer.score(&r, &hypothesis("q", 50, 50, 5, 5)), 1.0, 1.0);
    }

    #[test]
    fn test_soft_ioha_zero_area_reference() {
        let scorer = ScorerKind::SoftIntersectionOverHypothesisArea;
        let r = reference("q", 0, 0, 0, 0);
        assert_error_eq(scorer.score(&r, &hypothesis("q", 0, 0, 5, 5)), 1.0, 1.0);
    }

    #[test]
    fn test_soft_iou_applies_threshold() {
        let scorer = ScorerKind::SoftIntersectionOverUnion { threshold: 0.5 };
        let r = reference("q", 0, 0, 10, 10);

        // IoU = 80 / 120 passes; soft errors are 0.2 each
        assert_error_eq(scorer.score(&r, &hypothesis("q", 2, 0, 10, 10)), 0.2, 0.2);
        // IoU = 50 / 150 fails
        assert_eq!(scorer.score(&r, &hypothesis("q", 5, 0, 10, 10)), MatchError::REJECTED);
    }

    #[test]
    fn test_identity_scorer() {
        let scorer = ScorerKind::Identity;
        let r = Event::new("q", IdentityLocation::new("seg1"));
        let same = ScoredEvent::new("q", IdentityLocation::new("seg1"), 0.3);
        let other = ScoredEvent::new("q", IdentityLocation::new("seg2"), 0.3);
        assert_eq!(scorer.score(&r, &same), MatchError::PERFECT);
        assert_eq!(scorer.score(&r, &other), MatchError::REJECTED);
    }

    #[test]
    fn test_closure_scorer() {
        let always = |_: &Event<BoundingBox>, _: &ScoredEvent<BoundingBox>| MatchError::new(0.25, 0.75);
        let r = reference("a", 0, 0, 1, 1);
        let h = hypothesis("b", 9, 9, 1, 1);
        assert_eq!(always.score(&r, &h), MatchError::new(0.25, 0.75));
    }

    #[test]
    fn test_default_scorer() {
        assert_eq!(
            ScorerKind::default(),
            ScorerKind::IntersectionOverHypothesisArea { threshold: 0.5 }
        );
        assert_eq!(ScorerKind::default().name(), "IoHA");
    }
}
