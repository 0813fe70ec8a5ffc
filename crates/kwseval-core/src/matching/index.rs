//! Reference index for overlap queries.
//!
//! Matching is never allowed across queries, and document-scoped locations
//! never overlap across documents. The index therefore buckets events by
//! query and then by document, so an overlap query only scans the handful of
//! references that could possibly intersect the probe.
//!
//! # Usage
//!
//! ```
//! use kwseval_core::event::{DocumentBoundingBox, Event};
//! use kwseval_core::matching::EventIndex;
//!
//! let mut index = EventIndex::new();
//! index.insert(Event::new("cat", DocumentBoundingBox::new("p1", 0, 0, 10, 10)));
//! index.insert(Event::new("cat", DocumentBoundingBox::new("p2", 0, 0, 10, 10)));
//!
//! let probe = Event::new("cat", DocumentBoundingBox::new("p1", 5, 5, 10, 10));
//! assert_eq!(index.find_overlapping(&probe).len(), 1);
//! ```

use crate::event::{Event, Location};
use std::collections::HashMap;

/// Events of one (query, document) pair, in insertion order.
type Bucket<L> = Vec<Event<L>>;

/// Index over reference events keyed by query and document.
///
/// Duplicate events are stored once. Within a bucket events keep their
/// insertion order, which is the tie-break for equal overlaps.
#[derive(Debug, Clone)]
pub struct EventIndex<L> {
    buckets: HashMap<String, HashMap<Option<String>, Bucket<L>>>,
    len: usize,
}

impl<L> Default for EventIndex<L> {
    fn default() -> Self {
        Self {
            buckets: HashMap::new(),
            len: 0,
        }
    }
}

impl<L: Location> EventIndex<L> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an event. Returns false if an equal event was already indexed.
    pub fn insert(&mut self, event: Event<L>) -> bool {
        let document = event.location.document().map(str::to_string);
        let bucket = self
            .buckets
            .entry(event.query.clone())
            .or_default()
            .entry(document)
            .or_default();

        if bucket.contains(&event) {
            return false;
        }
        bucket.push(event);
        self.len += 1;
        true
    }

    /// Removes an event. Returns false if it was not indexed.
    pub fn remove(&mut self, event: &Event<L>) -> bool {
        let Some(bucket) = self.bucket_mut(event) else {
            return false;
        };
        match bucket.iter().position(|e| e == event) {
            Some(pos) => {
                bucket.remove(pos);
                self.len -= 1;
                true
            }
            None => false,
        }
    }

    /// Removes every event.
    pub fn clear(&mut self) {
        self.buckets.clear();
        self.len = 0;
    }

    /// Number of indexed events.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Finds indexed events that share the probe's query (and document) and
    /// intersect it with a strictly positive area.
    ///
    /// Results are ordered by decreasing intersection area; events with equal
    /// overlap keep their insertion order.
    pub fn find_overlapping(&self, probe: &Event<L>) -> Vec<&Event<L>> {
        let Some(bucket) = self.bucket(probe) else {
            return Vec::new();
        };

        let mut overlapping: Vec<(f64, &Event<L>)> = bucket
            .iter()
            .filter_map(|event| {
                let area = event.location.intersection_area(&probe.location);
                (area > 0.0).then_some((area, event))
            })
            .collect();

        // Stable sort keeps insertion order among equal areas
        overlapping.sort_by(|a, b| b.0.total_cmp(&a.0));
        overlapping.into_iter().map(|(_, event)| event).collect()
    }

    fn bucket(&self, event: &Event<L>) -> Option<&Bucket<L>> {
        let document = event.location.document().map(str::to_string);
        self.buckets.get(&event.query)?.get(&document)
    }

    fn bucket_mut(&mut self, event: &Event<L>) -> Option<&mut Bucket<L>> {
        let document = event.location.document().map(str::to_string);
        self.buckets.get_mut(&event.query)?.get_mut(&document)
    }
}

impl<L: Location> FromIterator<Event<L>> for EventIndex<L> {
    fn from_iter<I: IntoIterator<Item = Event<L>>>(iter: I) -> Self {
        let mut index = Self::new();
        for event in iter {
            index.insert(event);
        }
        index
    }
}
