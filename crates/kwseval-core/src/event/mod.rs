//! Events and their locations.
//!
//! An [`Event`] is a query occurrence at a [`Location`]. Ground-truth
//! references are plain events, submitted detections are [`ScoredEvent`]s.

pub mod location;
pub mod types;

pub use location::{BoundingBox, DocumentBoundingBox, IdentityLocation, Location};
pub use types::{sort_hypotheses, Event, HasQuery, ScoredEvent};
