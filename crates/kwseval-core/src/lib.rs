//! # kwseval Core
//!
//! Matching and assessment engine for keyword-spotting evaluation.
//!
//! Given ground-truth reference events and a scored list of hypothesis
//! detections, this crate pairs hypotheses with references under spatial or
//! identity overlap constraints and turns the resulting matches into
//! retrieval-quality figures (Average Precision, mean AP, NDCG) with optional
//! bootstrap confidence intervals.
//!
//! ## Modules
//!
//! - [`event`] - Events, scored events and their locations
//! - [`matching`] - Event index, scorers and the greedy matcher
//! - [`evaluation`] - Precision/recall, AP, NDCG, grouping and bootstrap
//! - [`io`] - Plain-text readers, query groups and match dumps
//! - [`config`] - Default evaluation configuration
//! - [`error`] - Error types for readers, query groups and bootstrapping
//!
//! ## Pipeline
//!
//! ```text
//! read -> index -> match -> score -> aggregate -> (optional) resample
//! ```

pub mod config;
pub mod error;
pub mod evaluation;
pub mod event;
pub mod io;
pub mod matching;
