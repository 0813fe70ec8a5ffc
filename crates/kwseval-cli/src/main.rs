//! kws-eval - Command-line keyword-spotting evaluation.
//!
//! # Usage
//!
//! ```bash
//! # Evaluate a submission against ground truth
//! kws-eval refs.txt hyps.txt
//!
//! # Hypotheses from stdin, IoU matching, grouped queries
//! cat hyps.txt | kws-eval refs.txt --scorer iou --query-groups groups.txt
//!
//! # Confidence intervals and NDCG, as JSON
//! kws-eval refs.txt hyps.txt --bootstrap-ci-map --ndcg --json
//!
//! # Show help
//! kws-eval --help
//! ```

mod config;
mod output;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use config::{LocationKind, ScorerChoice};
use kwseval_core::config::{
    DEFAULT_BOOTSTRAP_ALPHA, DEFAULT_BOOTSTRAP_SAMPLES, DEFAULT_BOOTSTRAP_SEED,
    DEFAULT_COLLAPSE_MATCHES, DEFAULT_INTERPOLATE_PRECISION, DEFAULT_OVERLAP_THRESHOLD,
    DEFAULT_TRAPEZOID_INTEGRAL,
};
use kwseval_core::evaluation::{
    global_average_precision, group_matches_by_query_group, CurveOptions, GroupedMatchesSampler,
    Statistic,
};
use kwseval_core::event::{sort_hypotheses, BoundingBox, DocumentBoundingBox, IdentityLocation, Location};
use kwseval_core::io::dump_matches;
use kwseval_core::matching::{check_effective_hypotheses, Match, SimpleMatcher};
use output::{RunSummary, StatisticReport};
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[cfg(feature = "parallel")]
use kwseval_core::evaluation::par_percentile_bootstrap_ci as bootstrap_ci;
#[cfg(not(feature = "parallel"))]
use kwseval_core::evaluation::percentile_bootstrap_ci as bootstrap_ci;

/// Keyword-spotting evaluation.
///
/// Matches scored detections against ground-truth references and reports
/// global and mean Average Precision, optionally with NDCG and bootstrap
/// confidence intervals.
#[derive(Parser)]
#[command(name = "kws-eval", version, about)]
struct Cli {
    /// Reference (ground-truth) events file
    references: PathBuf,

    /// Hypothesis (detection) events file; read from stdin if omitted
    hypotheses: Option<PathBuf>,

    /// Location format of the events
    #[arg(long, value_enum, default_value_t = LocationKind::DocumentBox)]
    location: LocationKind,

    /// Scoring strategy used to match hypotheses with references
    #[arg(long, value_enum, default_value_t = ScorerChoice::Overlap)]
    scorer: ScorerChoice,

    /// Overlap threshold for the thresholded scorers
    #[arg(long, default_value_t = DEFAULT_OVERLAP_THRESHOLD)]
    threshold: f64,

    /// Collapse matches with the same score into a single curve point
    #[arg(long, default_value_t = DEFAULT_COLLAPSE_MATCHES, action = ArgAction::Set)]
    collapse_matches: bool,

    /// Use interpolated precision
    #[arg(long, default_value_t = DEFAULT_INTERPOLATE_PRECISION, action = ArgAction::Set)]
    interpolated_precision: bool,

    /// Integrate the precision/recall curve with the trapezoid rule
    #[arg(long, default_value_t = DEFAULT_TRAPEZOID_INTEGRAL, action = ArgAction::Set)]
    trapezoid_integral: bool,

    /// File with the set of queries to evaluate
    #[arg(long)]
    query_set: Option<PathBuf>,

    /// File with `group query [query ...]` rows; supersedes --query-set
    #[arg(long)]
    query_groups: Option<PathBuf>,

    /// Write every match (and the repeated matches) to this file
    #[arg(long)]
    dump_matches: Option<PathBuf>,

    /// Bootstrap a confidence interval for the global AP
    #[arg(long)]
    bootstrap_ci_gap: bool,

    /// Bootstrap a confidence interval for the mean AP
    #[arg(long)]
    bootstrap_ci_map: bool,

    /// Bootstrap a confidence interval for the global NDCG
    #[arg(long)]
    bootstrap_ci_gndcg: bool,

    /// Bootstrap a confidence interval for the mean NDCG
    #[arg(long)]
    bootstrap_ci_mndcg: bool,

    /// Number of bootstrap repetitions
    #[arg(long, default_value_t = DEFAULT_BOOTSTRAP_SAMPLES)]
    bootstrap_samples: usize,

    /// Seed for the bootstrap resampling
    #[arg(long, default_value_t = DEFAULT_BOOTSTRAP_SEED)]
    bootstrap_seed: u64,

    /// Significance level of the confidence intervals
    #[arg(long, default_value_t = DEFAULT_BOOTSTRAP_ALPHA)]
    bootstrap_alpha: f64,

    /// Also report global and mean NDCG
    #[arg(long)]
    ndcg: bool,

    /// Output results as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    fn curve_options(&self) -> CurveOptions {
        CurveOptions {
            collapse_matches: self.collapse_matches,
            interpolate_precision: self.interpolated_precision,
            trapezoid_integral: self.trapezoid_integral,
        }
    }

    fn bootstrap_requested(&self, statistic: Statistic) -> bool {
        match statistic {
            Statistic::GlobalAp => self.bootstrap_ci_gap,
            Statistic::MeanAp => self.bootstrap_ci_map,
            Statistic::GlobalNdcg => self.bootstrap_ci_gndcg,
            Statistic::MeanNdcg => self.bootstrap_ci_mndcg,
        }
    }

    /// Statistics to report: AP always, NDCG when asked for.
    fn statistics(&self) -> Vec<Statistic> {
        Statistic::ALL
            .into_iter()
            .filter(|s| match s {
                Statistic::GlobalAp | Statistic::MeanAp => true,
                Statistic::GlobalNdcg | Statistic::MeanNdcg => {
                    self.ndcg || self.bootstrap_requested(*s)
                }
            })
            .collect()
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Logs go to stderr so stdout only carries the report
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::new("warn")
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let (summary, reports) = match cli.location {
        LocationKind::DocumentBox => run::<DocumentBoundingBox>(&cli)?,
        LocationKind::Box => run::<BoundingBox>(&cli)?,
        LocationKind::Identity => run::<IdentityLocation>(&cli)?,
    };

    let output = if cli.json {
        output::format_json(&summary, &reports)
    } else {
        output::format_human(&reports)
    };
    println!("{}", output);

    Ok(())
}

/// Runs the evaluation for one location type.
///
/// This function:
/// 1. Reads references and hypotheses
/// 2. Filters both by the query set or query groups
/// 3. Sorts hypotheses by decreasing score and matches them
/// 4. Optionally dumps the matches
/// 5. Checks the effective number of hypotheses
/// 6. Groups matches and computes every requested statistic
fn run<L>(cli: &Cli) -> Result<(RunSummary, Vec<StatisticReport>)>
where
    L: Location + Send + Sync,
{
    // 1. Read
    let mut references = config::load_references::<L>(&cli.references)?;
    let mut hypotheses = config::load_hypotheses::<L>(cli.hypotheses.as_deref())?;
    info!(
        references = references.len(),
        hypotheses = hypotheses.len(),
        "Read events"
    );

    // 2. Filter
    let groups = config::load_query_groups(cli.query_set.as_deref(), cli.query_groups.as_deref())?;
    if let Some(groups) = &groups {
        let dropped_refs = groups.filter_events(&mut references);
        let dropped_hyps = groups.filter_events(&mut hypotheses);
        info!(
            queries = groups.len(),
            groups = groups.num_groups(),
            dropped_refs,
            dropped_hyps,
            "Filtered events by query"
        );
    }

    // 3. Match
    sort_hypotheses(&mut hypotheses);
    let scorer = cli.scorer.to_kind(cli.threshold);
    let mut matcher = SimpleMatcher::new(scorer);
    let matches = matcher.match_events(&references, &hypotheses);

    // 4. Dump
    if let Some(path) = &cli.dump_matches {
        dump_matches(path, &matches, matcher.repeated_matches())
            .with_context(|| format!("Failed to write match dump: {}", path.display()))?;
        info!("Wrote matches to {}", path.display());
    }

    // 5. Sanity check
    let effective = check_effective_hypotheses(&matches, hypotheses.len())
        .context("Matching produced more hypotheses than were submitted")?;

    // 6. Assess
    let empty: HashMap<String, String> = HashMap::new();
    let mapping = groups.as_ref().map_or(&empty, |g| g.mapping());
    let grouped = group_matches_by_query_group(&matches, mapping);
    let options = cli.curve_options();
    let sampler = GroupedMatchesSampler::new(cli.bootstrap_seed);

    let mut reports = Vec::new();
    for statistic in cli.statistics() {
        let report = if cli.bootstrap_requested(statistic) {
            let result = bootstrap_ci(
                &grouped,
                cli.bootstrap_samples,
                cli.bootstrap_alpha,
                |g: &Vec<Vec<Match<L>>>| statistic.evaluate(g, &options, true),
                &sampler,
            )
            .with_context(|| format!("Bootstrap of {} failed", statistic))?;
            StatisticReport::interval(statistic, result)
        } else if statistic == Statistic::GlobalAp {
            // Matcher order already ranks by decreasing score
            StatisticReport::point(statistic, global_average_precision(&matches, &options))
        } else {
            StatisticReport::point(statistic, statistic.evaluate(&grouped, &options, true))
        };
        reports.push(report);
    }

    let summary = RunSummary {
        location: cli.location.name(),
        scorer: scorer.name(),
        references: references.len(),
        hypotheses: hypotheses.len(),
        effective_hypotheses: effective,
        repeated_matches: matcher.repeated_matches().len(),
        groups: grouped.len(),
    };

    Ok((summary, reports))
}
