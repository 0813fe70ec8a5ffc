//! Matching engine: pairs hypotheses to references.
//!
//! - [`EventIndex`] - references bucketed by query and document
//! - [`Scorer`] / [`ScorerKind`] - per-pair error strategies
//! - [`SimpleMatcher`] - greedy one-pass assignment producing [`Match`]es

pub mod index;
pub mod matcher;
pub mod scorer;
pub mod types;

pub use index::EventIndex;
pub use matcher::{check_effective_hypotheses, SimpleMatcher};
pub use scorer::{Scorer, ScorerKind};
pub use types::{ErrorCounts, Match, MatchError, MatchErrorCounts};
