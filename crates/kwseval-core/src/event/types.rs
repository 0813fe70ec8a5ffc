//! Reference and hypothesis events.

use super::location::Location;
use std::cmp::Ordering;
use std::fmt;

/// A located occurrence of a query.
///
/// References (ground truth) are plain events; hypotheses are
/// [`ScoredEvent`]s. Events order lexicographically by query, then location.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Event<L> {
    /// Query (keyword) identifier
    pub query: String,
    /// Where the occurrence is
    pub location: L,
}

impl<L> Event<L> {
    pub fn new(query: impl Into<String>, location: L) -> Self {
        Self {
            query: query.into(),
            location,
        }
    }

    /// Attaches a confidence score, turning the event into a hypothesis.
    pub fn with_score(self, score: f64) -> ScoredEvent<L> {
        ScoredEvent { event: self, score }
    }
}

impl<L: Location> Event<L> {
    /// Area of the event's location.
    pub fn area(&self) -> f64 {
        self.location.area()
    }
}

impl<L: fmt::Display> fmt::Display for Event<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.query, self.location)
    }
}

/// An event with a detection confidence.
///
/// Ordering is by score first (using the IEEE total order, so NaN scores
/// still sort deterministically) and falls back to the event ordering on ties.
#[derive(Debug, Clone)]
pub struct ScoredEvent<L> {
    pub event: Event<L>,
    pub score: f64,
}

impl<L> ScoredEvent<L> {
    pub fn new(query: impl Into<String>, location: L, score: f64) -> Self {
        Event::new(query, location).with_score(score)
    }

    pub fn query(&self) -> &str {
        &self.event.query
    }

    pub fn location(&self) -> &L {
        &self.event.location
    }
}

impl<L: Location> ScoredEvent<L> {
    pub fn area(&self) -> f64 {
        self.event.area()
    }
}

impl<L: Ord> Ord for ScoredEvent<L> {
    fn cmp(&self, other: &Self) -> Ordering {
        self.score
            .total_cmp(&other.score)
            .then_with(|| self.event.cmp(&other.event))
    }
}

impl<L: Ord> PartialOrd for ScoredEvent<L> {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl<L: Ord> PartialEq for ScoredEvent<L> {
    fn eq(&self, other: &Self) -> bool {
        self.cmp(other) == Ordering::Equal
    }
}

impl<L: Ord> Eq for ScoredEvent<L> {}

impl<L: fmt::Display> fmt::Display for ScoredEvent<L> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.event, self.score)
    }
}

/// Access to the query an item is tagged with.
pub trait HasQuery {
    fn query(&self) -> &str;
}

impl<L> HasQuery for Event<L> {
    fn query(&self) -> &str {
        &self.query
    }
}

impl<L> HasQuery for ScoredEvent<L> {
    fn query(&self) -> &str {
        &self.event.query
    }
}

/// Sorts hypotheses by decreasing score, the order the matcher expects.
///
/// Ties are broken by decreasing event order so the result does not depend
/// on the input order.
pub fn sort_hypotheses<L: Ord>(hypotheses: &mut [ScoredEvent<L>]) {
    hypotheses.sort_by(|a, b| b.cmp(a));
}
