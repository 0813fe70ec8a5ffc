//! Assessment of match outcomes.
//!
//! This module turns the [`Match`](crate::matching::Match) sequences produced
//! by the matcher into retrieval-quality figures:
//!
//! - **Curves**: collapsing equal-score matches, precision/recall points
//! - **Average Precision**: curve-based and error-based formulations
//! - **NDCG**: rank-discounted gain of the hypotheses
//! - **Grouping**: global (pooled) and mean (per query group) statistics
//! - **Statistical rigor**: reversed-percentile bootstrap confidence intervals
//!
//! # Example
//!
//! ```
//! use kwseval_core::event::{BoundingBox, Event, ScoredEvent};
//! use kwseval_core::evaluation::{global_average_precision, CurveOptions};
//! use kwseval_core::matching::{ScorerKind, SimpleMatcher};
//!
//! let references = vec![Event::new("q1", BoundingBox::new(0, 0, 2, 2))];
//! let hypotheses = vec![ScoredEvent::new("q1", BoundingBox::new(0, 0, 2, 2), 0.9)];
//!
//! let mut matcher = SimpleMatcher::new(ScorerKind::default());
//! let matches = matcher.match_events(&references, &hypotheses);
//! assert_eq!(global_average_precision(&matches, &CurveOptions::default()), 1.0);
//! ```
//!
//! # Metrics Reference
//!
//! | Metric | Description | Pooling |
//! |--------|-------------|---------|
//! | gAP | Average Precision | all query groups in one ranking |
//! | mAP | Mean Average Precision | mean over query groups |
//! | gNDCG | Normalized Discounted Cumulative Gain | all query groups in one ranking |
//! | mNDCG | Mean NDCG | mean over query groups |

pub mod grouping;
pub mod metrics;
pub mod statistic;
pub mod stats;

// Curves and single-list metrics
pub use metrics::{
    average_precision, average_precision_from_errors, collapse_matches, global_average_precision,
    global_ndcg, match_errors, match_precision_recall, ndcg, precision_recall_curve,
    total_references, CurveOptions, PrecisionRecall,
};
// Grouped statistics
pub use grouping::{
    group_matches_by_query_group, grouped_global_average_precision, grouped_global_ndcg,
    mean_average_precision, mean_ndcg, sort_matches_by_score,
};
pub use statistic::Statistic;
// Bootstrap
#[cfg(feature = "parallel")]
pub use stats::par_percentile_bootstrap_ci;
pub use stats::{percentile_bootstrap_ci, BootstrapResult, GroupedMatchesSampler, MatchesSampler, Sampler};
