//! Input loading and evaluation settings for the CLI.
//!
//! Maps command-line choices onto core types and wraps the core readers with
//! `anyhow` context so failures name the offending file.

use anyhow::{Context, Result};
use clap::ValueEnum;
use kwseval_core::event::{Event, Location, ScoredEvent};
use kwseval_core::io::{
    read_hypotheses, read_hypotheses_from_reader, read_references, QueryGroups,
};
use kwseval_core::matching::ScorerKind;
use std::io;
use std::path::Path;
use tracing::info;

/// Kind of location carried by every event in the input files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LocationKind {
    /// `query document x y w h`
    DocumentBox,
    /// `query x y w h`
    Box,
    /// `query label`
    Identity,
}

impl LocationKind {
    /// Name as spelled on the command line.
    pub fn name(self) -> String {
        self.to_possible_value()
            .map(|v| v.get_name().to_string())
            .unwrap_or_default()
    }
}

/// Scoring strategy used to pair hypotheses with references.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScorerChoice {
    /// Intersection over hypothesis area, thresholded
    Overlap,
    /// Intersection over union, thresholded
    Iou,
    /// Fractional errors from intersection over hypothesis area
    SoftOverlap,
    /// Fractional errors, only for pairs passing the IoU threshold
    SoftIou,
    /// Exact location equality
    Identity,
}

impl ScorerChoice {
    /// Builds the core scorer, applying `threshold` where it is used.
    pub fn to_kind(self, threshold: f64) -> ScorerKind {
        match self {
            Self::Overlap => ScorerKind::IntersectionOverHypothesisArea { threshold },
            Self::Iou => ScorerKind::IntersectionOverUnion { threshold },
            Self::SoftOverlap => ScorerKind::SoftIntersectionOverHypothesisArea,
            Self::SoftIou => ScorerKind::SoftIntersectionOverUnion { threshold },
            Self::Identity => ScorerKind::Identity,
        }
    }
}

/// Reads the reference file.
pub fn load_references<L: Location>(path: &Path) -> Result<Vec<Event<L>>> {
    read_references(path)
        .with_context(|| format!("Failed to read references: {}", path.display()))
}

/// Reads hypotheses from `path`, or from stdin when no path is given.
pub fn load_hypotheses<L: Location>(path: Option<&Path>) -> Result<Vec<ScoredEvent<L>>> {
    match path {
        Some(path) => read_hypotheses(path)
            .with_context(|| format!("Failed to read hypotheses: {}", path.display())),
        None => read_hypotheses_from_reader(io::stdin().lock())
            .context("Failed to read hypotheses from stdin"),
    }
}

/// Loads the query filter.
///
/// A query groups file supersedes a query set file. Returns `None` when
/// neither is given, in which case every query forms its own group.
pub fn load_query_groups(
    query_set: Option<&Path>,
    query_groups: Option<&Path>,
) -> Result<Option<QueryGroups>> {
    if let Some(path) = query_groups {
        if query_set.is_some() {
            info!("Query groups given, ignoring the query set");
        }
        let groups = QueryGroups::read_query_groups(path)
            .with_context(|| format!("Failed to read query groups: {}", path.display()))?;
        return Ok(Some(groups));
    }

    query_set
        .map(|path| {
            QueryGroups::read_query_set(path)
                .with_context(|| format!("Failed to read query set: {}", path.display()))
        })
        .transpose()
}
