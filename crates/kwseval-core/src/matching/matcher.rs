//! Greedy one-pass assignment of hypotheses to references.
//!
//! Hypotheses are visited in the order given (callers sort them by
//! decreasing score, see [`sort_hypotheses`](crate::event::sort_hypotheses)).
//! Each hypothesis is paired with the best-overlapping reference the scorer
//! accepts:
//!
//! - if that reference is still unmatched, a [`Match::Paired`] is emitted;
//! - if it was already claimed by a higher-scored hypothesis, the pairing is
//!   recorded as a *repeated match* and nothing is emitted, so the hypothesis
//!   is neither a hit nor a false positive;
//! - if no candidate is accepted, a [`Match::FalsePositive`] is emitted.
//!
//! Finally every reference nobody claimed becomes a [`Match::FalseNegative`].
//!
//! Repeated matches only serve diagnostics; they are available through
//! [`SimpleMatcher::repeated_matches`] until the next run.

use super::index::EventIndex;
use super::scorer::Scorer;
use super::types::{ErrorCounts, Match};
use crate::error::EvaluationError;
use crate::event::{Event, Location, ScoredEvent};
use std::collections::BTreeSet;
use tracing::{debug, info, instrument};

/// Greedy matcher over a single scorer.
#[derive(Debug)]
pub struct SimpleMatcher<L, S> {
    scorer: S,
    index: EventIndex<L>,
    repeated: Vec<Match<L>>,
}

impl<L: Location, S: Scorer<L>> SimpleMatcher<L, S> {
    pub fn new(scorer: S) -> Self {
        Self {
            scorer,
            index: EventIndex::new(),
            repeated: Vec::new(),
        }
    }

    pub fn scorer(&self) -> &S {
        &self.scorer
    }

    /// Pairings dropped during the last run because their reference was
    /// already matched.
    pub fn repeated_matches(&self) -> &[Match<L>] {
        &self.repeated
    }

    /// Matches hypotheses against references.
    ///
    /// # Arguments
    ///
    /// * `references` - Ground-truth events; duplicates count once
    /// * `hypotheses` - Scored detections, in decreasing score order
    ///
    /// # Returns
    ///
    /// Paired matches and false positives in hypothesis order, followed by
    /// the false negatives in event order.
    #[instrument(skip_all, fields(references = references.len(), hypotheses = hypotheses.len()))]
    pub fn match_events(
        &mut self,
        references: &[Event<L>],
        hypotheses: &[ScoredEvent<L>],
    ) -> Vec<Match<L>> {
        self.index.clear();
        self.repeated.clear();

        let mut unmatched = BTreeSet::new();
        for reference in references {
            if self.index.insert(reference.clone()) {
                unmatched.insert(reference.clone());
            }
        }

        let mut matches = Vec::with_capacity(hypotheses.len() + unmatched.len());
        for hypothesis in hypotheses {
            let accepted = self
                .index
                .find_overlapping(&hypothesis.event)
                .into_iter()
                .map(|reference| (reference, self.scorer.score(reference, hypothesis)))
                .find(|(_, error)| error.is_accepted());

            match accepted {
                Some((reference, error)) => {
                    let paired = Match::paired(reference.clone(), hypothesis.clone(), error);
                    if unmatched.remove(reference) {
                        matches.push(paired);
                    } else {
                        self.repeated.push(paired);
                    }
                }
                None => matches.push(Match::false_positive(hypothesis.clone())),
            }
        }

        let paired = matches.len();
        matches.extend(unmatched.into_iter().map(Match::false_negative));

        debug!(
            paired_or_fp = paired,
            false_negatives = matches.len() - paired,
            repeated = self.repeated.len(),
            "Matching finished"
        );
        matches
    }
}

/// Checks that the matches do not account for more hypotheses than were
/// submitted.
///
/// Returns the effective number of hypotheses (`Σ NH`). A smaller count is
/// expected when repeated matches were dropped and is only logged.
pub fn check_effective_hypotheses<L>(
    matches: &[Match<L>],
    original: usize,
) -> Result<usize, EvaluationError> {
    let effective: usize = matches.iter().map(|m| m.error().hypotheses()).sum();
    if effective > original {
        return Err(EvaluationError::EffectiveHypothesesExceeded {
            effective,
            original,
        });
    }
    if effective < original {
        info!(
            "Effective number of hypotheses ({}) is smaller than the original number ({}); repeated matches are ignored",
            effective, original
        );
    }
    Ok(effective)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{DocumentBoundingBox, IdentityLocation};
    use crate::matching::{MatchError, ScorerKind};

    fn reference(doc: &str, x: u32, y: u32, w: u32, h: u32) -> Event<DocumentBoundingBox> {
        Event::new("q", DocumentBoundingBox::new(doc, x, y, w, h))
    }

    fn hypothesis(doc: &str, x: u32, y: u32, w: u32, h: u32, score: f64) -> ScoredEvent<DocumentBoundingBox> {
        ScoredEvent::new("q", DocumentBoundingBox::new(doc, x, y, w, h), score)
    }

    fn ioha() -> ScorerKind {
        ScorerKind::IntersectionOverHypothesisArea { threshold: 0.5 }
    }

    #[test]
    fn test_perfect_and_false_positive() {
        let refs = vec![reference("p1", 0, 0, 10, 10)];
        let hyps = vec![
            hypothesis("p1", 0, 0, 10, 10, 0.9),
            hypothesis("p1", 100, 100, 10, 10, 0.5),
        ];

        let mut matcher = SimpleMatcher::new(ioha());
        let matches = matcher.match_events(&refs, &hyps);

        assert_eq!(
            matches,
            vec![
                Match::paired(refs[0].clone(), hyps[0].clone(), MatchError::PERFECT),
                Match::false_positive(hyps[1].clone()),
            ]
        );
        assert!(matcher.repeated_matches().is_empty());
    }

    #[test]
    fn test_repeated_match_is_dropped() {
        let refs = vec![reference("p1", 0, 0, 10, 10)];
        let hyps = vec![
            hypothesis("p1", 0, 0, 10, 10, 0.9),
            hypothesis("p1", 1, 1, 9, 9, 0.8),
        ];

        let mut matcher = SimpleMatcher::new(ioha());
        let matches = matcher.match_events(&refs, &hyps);

        // The second hypothesis is neither a hit nor a false positive
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].error(), MatchError::PERFECT);

        let repeated = matcher.repeated_matches();
        assert_eq!(repeated.len(), 1);
        assert_eq!(repeated[0].hypothesis(), Some(&hyps[1]));
        assert_eq!(repeated[0].reference(), Some(&refs[0]));
    }

    #[test]
    fn test_unmatched_references_become_false_negatives() {
        let refs = vec![
            reference("p2", 0, 0, 10, 10),
            reference("p1", 50, 50, 10, 10),
            reference("p1", 0, 0, 10, 10),
        ];
        let hyps = vec![hypothesis("p1", 50, 50, 10, 10, 0.7)];

        let mut matcher = SimpleMatcher::new(ioha());
        let matches = matcher.match_events(&refs, &hyps);

        assert_eq!(matches.len(), 3);
        assert_eq!(matches[0].error(), MatchError::PERFECT);
        // False negatives come last, in event order
        assert_eq!(
            matches[1..].to_vec(),
            vec![
                Match::false_negative(refs[2].clone()),
                Match::false_negative(refs[0].clone()),
            ]
        );
    }

    #[test]
    fn test_prefers_largest_overlap() {
        let refs = vec![reference("p1", 0, 0, 10, 10), reference("p1", 6, 0, 10, 10)];
        // Overlaps the second reference more than the first
        let hyps = vec![hypothesis("p1", 5, 0, 10, 10, 0.9)];

        let mut matcher = SimpleMatcher::new(ioha());
        let matches = matcher.match_events(&refs, &hyps);

        assert_eq!(matches[0].reference(), Some(&refs[1]));
        assert_eq!(matches[1], Match::false_negative(refs[0].clone()));
    }

    #[test]
    fn test_skips_rejected_candidates() {
        let refs = vec![reference("p1", 0, 0, 20, 20), reference("p1", 0, 0, 8, 10)];
        let hyps = vec![hypothesis("p1", 0, 0, 10, 10, 0.9)];

        // The large reference overlaps most but has IoU 0.25; the small one has 0.8
        let mut matcher = SimpleMatcher::new(ScorerKind::IntersectionOverUnion { threshold: 0.5 });
        let matches = matcher.match_events(&refs, &hyps);

        assert_eq!(matches[0].reference(), Some(&refs[1]));
        assert_eq!(matches[0].error(), MatchError::PERFECT);
    }

    #[test]
    fn test_duplicate_references_count_once() {
        let refs = vec![reference("p1", 0, 0, 10, 10), reference("p1", 0, 0, 10, 10)];
        let mut matcher = SimpleMatcher::new(ioha());
        let matches = matcher.match_events(&refs, &[]);
        assert_eq!(matches, vec![Match::false_negative(refs[0].clone())]);
    }

    #[test]
    fn test_empty_inputs() {
        let mut matcher = SimpleMatcher::new(ioha());
        assert!(matcher.match_events(&[], &[]).is_empty());

        let hyps = vec![hypothesis("p1", 0, 0, 1, 1, 0.1)];
        let matches = matcher.match_events(&[], &hyps);
        assert_eq!(matches, vec![Match::false_positive(hyps[0].clone())]);
    }

    #[test]
    fn test_runs_are_independent_and_deterministic() {
        let refs = vec![reference("p1", 0, 0, 10, 10), reference("p2", 0, 0, 10, 10)];
        let hyps = vec![
            hypothesis("p1", 0, 0, 10, 10, 0.9),
            hypothesis("p1", 0, 0, 10, 10, 0.8),
            hypothesis("p3", 0, 0, 10, 10, 0.1),
        ];

        let mut matcher = SimpleMatcher::new(ioha());
        let first = matcher.match_events(&refs, &hyps);
        let first_repeated = matcher.repeated_matches().to_vec();
        let second = matcher.match_events(&refs, &hyps);

        assert_eq!(first, second);
        assert_eq!(first_repeated, matcher.repeated_matches().to_vec());
        assert_eq!(matcher.repeated_matches().len(), 1);
    }

    #[test]
    fn test_closure_scorer_drives_matching() {
        let refs = vec![Event::new("q", IdentityLocation::new("a"))];
        let hyps = vec![ScoredEvent::new("q", IdentityLocation::new("a"), 1.0)];
        let soft = |_: &Event<IdentityLocation>, _: &ScoredEvent<IdentityLocation>| MatchError::new(0.3, 0.6);

        let mut matcher = SimpleMatcher::new(soft);
        let matches = matcher.match_events(&refs, &hyps);
        assert_eq!(matches[0].error(), MatchError::new(0.3, 0.6));
    }

    #[test]
    fn test_check_effective_hypotheses() {
        let refs = vec![reference("p1", 0, 0, 10, 10)];
        let hyps = vec![
            hypothesis("p1", 0, 0, 10, 10, 0.9),
            hypothesis("p1", 0, 0, 10, 10, 0.8),
            hypothesis("p9", 0, 0, 10, 10, 0.1),
        ];
        let mut matcher = SimpleMatcher::new(ioha());
        let matches = matcher.match_events(&refs, &hyps);

        // One hit, one false positive; the repeated match is not counted
        assert_eq!(check_effective_hypotheses(&matches, hyps.len()), Ok(2));
        assert_eq!(
            check_effective_hypotheses(&matches, 1),
            Err(EvaluationError::EffectiveHypothesesExceeded {
                effective: 2,
                original: 1
            })
        );
    }
}
