//! The four grouped statistics reported by the evaluator.

use super::grouping::{grouped_global_average_precision, grouped_global_ndcg, mean_average_precision, mean_ndcg};
use super::metrics::CurveOptions;
use crate::matching::Match;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Statistic computed over matches grouped by query group.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Statistic {
    /// Average Precision of all groups pooled together
    #[serde(rename = "gAP")]
    GlobalAp,
    /// Mean of per-group Average Precision
    #[serde(rename = "mAP")]
    MeanAp,
    /// NDCG of all groups pooled together
    #[serde(rename = "gNDCG")]
    GlobalNdcg,
    /// Mean of per-group NDCG
    #[serde(rename = "mNDCG")]
    MeanNdcg,
}

impl Statistic {
    pub const ALL: [Statistic; 4] = [
        Statistic::GlobalAp,
        Statistic::MeanAp,
        Statistic::GlobalNdcg,
        Statistic::MeanNdcg,
    ];

    /// Short name used in reports.
    pub fn name(&self) -> &'static str {
        match self {
            Self::GlobalAp => "gAP",
            Self::MeanAp => "mAP",
            Self::GlobalNdcg => "gNDCG",
            Self::MeanNdcg => "mNDCG",
        }
    }

    /// Evaluates the statistic.
    ///
    /// NDCG variants only look at `options.collapse_matches`. With `sort`,
    /// matches are reordered by decreasing score before scoring, which is
    /// needed after pooling or resampling.
    pub fn evaluate<L: Clone>(&self, groups: &[Vec<Match<L>>], options: &CurveOptions, sort: bool) -> f64 {
        match self {
            Self::GlobalAp => grouped_global_average_precision(groups, options, sort),
            Self::MeanAp => mean_average_precision(groups, options, sort),
            Self::GlobalNdcg => grouped_global_ndcg(groups, options.collapse_matches, sort),
            Self::MeanNdcg => mean_ndcg(groups, options.collapse_matches, sort),
        }
    }
}

impl fmt::Display for Statistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
