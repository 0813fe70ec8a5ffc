//! Bootstrap confidence intervals for evaluation statistics.
//!
//! The interval is the reversed ("basic") percentile bootstrap: the spread of
//! the resampled statistics around the observed value is mirrored around the
//! observed value.
//!
//! Every repetition draws from its own ChaCha8 stream derived from the
//! sampler seed and the repetition number. Results are therefore reproducible
//! and identical whether repetitions run sequentially or in parallel.
//!
//! # References
//!
//! - Efron & Tibshirani (1993). "An Introduction to the Bootstrap"
//! - Davison & Hinkley (1997). "Bootstrap Methods and their Application", ch. 5

use crate::error::BootstrapError;
use crate::matching::Match;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Result of bootstrap confidence interval computation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BootstrapResult {
    /// Statistic of the original sample
    pub observed: f64,
    /// Lower bound of confidence interval
    pub lower: f64,
    /// Upper bound of confidence interval
    pub upper: f64,
}

impl BootstrapResult {
    /// Formats the result as "observed [lower, upper]".
    pub fn format(&self, precision: usize) -> String {
        format!(
            "{:.prec$} [{:.prec$}, {:.prec$}]",
            self.observed,
            self.lower,
            self.upper,
            prec = precision
        )
    }
}

// ============================================================================
// Samplers
// ============================================================================

/// Draws a bootstrap resample of a collection.
///
/// `repetition` selects the random stream, so the same repetition always
/// yields the same resample.
pub trait Sampler<C> {
    fn sample(&self, original: &C, repetition: u64) -> Result<C, BootstrapError>;
}

fn stream(seed: u64, repetition: u64) -> ChaCha8Rng {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    rng.set_stream(repetition);
    rng
}

fn draw_with_replacement<T: Clone>(items: &[T], rng: &mut ChaCha8Rng) -> Vec<T> {
    (0..items.len())
        .map(|_| items[rng.gen_range(0..items.len())].clone())
        .collect()
}

/// Resamples a flat list of matches with replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchesSampler {
    seed: u64,
}

impl MatchesSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl<L: Clone> Sampler<Vec<Match<L>>> for MatchesSampler {
    fn sample(&self, original: &Vec<Match<L>>, repetition: u64) -> Result<Vec<Match<L>>, BootstrapError> {
        if original.is_empty() {
            return Err(BootstrapError::EmptySample);
        }
        let mut rng = stream(self.seed, repetition);
        Ok(draw_with_replacement(original, &mut rng))
    }
}

/// Two-level resampler for matches grouped by query group.
///
/// Groups are drawn with replacement, then the matches of each drawn group
/// are drawn with replacement. The resample has as many groups as the
/// original, and each drawn group keeps its size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupedMatchesSampler {
    seed: u64,
}

impl GroupedMatchesSampler {
    pub fn new(seed: u64) -> Self {
        Self { seed }
    }
}

impl<L: Clone> Sampler<Vec<Vec<Match<L>>>> for GroupedMatchesSampler {
    fn sample(
        &self,
        original: &Vec<Vec<Match<L>>>,
        repetition: u64,
    ) -> Result<Vec<Vec<Match<L>>>, BootstrapError> {
        if original.is_empty() {
            return Err(BootstrapError::EmptySample);
        }
        let mut rng = stream(self.seed, repetition);
        let resampled = (0..original.len())
            .map(|_| {
                let group = &original[rng.gen_range(0..original.len())];
                draw_with_replacement(group, &mut rng)
            })
            .collect();
        Ok(resampled)
    }
}

// ============================================================================
// Percentile bootstrap
// ============================================================================

fn validate(repetitions: usize, alpha: f64) -> Result<(), BootstrapError> {
    if repetitions == 0 {
        return Err(BootstrapError::NoRepetitions);
    }
    if !(0.0..=1.0).contains(&alpha) {
        return Err(BootstrapError::InvalidAlpha(alpha));
    }
    Ok(())
}

/// Mirrors the sorted differences around the observed statistic.
fn interval(observed: f64, mut diffs: Vec<f64>, alpha: f64) -> BootstrapResult {
    diffs.sort_by(f64::total_cmp);

    let n = diffs.len();
    let last = n - 1;
    let lower_idx = (((1.0 - alpha * 0.5) * n as f64) as usize).min(last);
    let upper_idx = (((alpha * 0.5) * n as f64) as usize).min(last);

    BootstrapResult {
        observed,
        lower: observed - diffs[lower_idx],
        upper: observed - diffs[upper_idx],
    }
}

/// Computes a reversed-percentile bootstrap confidence interval.
///
/// Bootstrap resampling estimates the sampling distribution of a statistic:
/// 1. Compute the observed statistic on the original sample
/// 2. For each repetition, resample and store `statistic(resample) - observed`
/// 3. Sort the differences and mirror the `1 - α/2` and `α/2` percentiles
///    around the observed value
///
/// # Arguments
///
/// * `samples` - Original sample (e.g. matches grouped by query group)
/// * `repetitions` - Number of bootstrap resamples (typically 1000-10000)
/// * `alpha` - Significance level; the interval covers `1 - alpha`
/// * `statistic` - Pure function of a sample
/// * `sampler` - Reproducible resampler
///
/// # Returns
///
/// `BootstrapResult` with the observed statistic and the interval bounds.
///
/// # Errors
///
/// Fails without computing anything when `repetitions` is 0 or `alpha` is
/// outside `[0, 1]`, and with the sampler's error if a resample fails.
///
/// # Example
///
/// ```
/// use kwseval_core::evaluation::{percentile_bootstrap_ci, Sampler};
/// use kwseval_core::error::BootstrapError;
///
/// struct Identity;
/// impl Sampler<Vec<f64>> for Identity {
///     fn sample(&self, original: &Vec<f64>, _: u64) -> Result<Vec<f64>, BootstrapError> {
///         Ok(original.clone())
///     }
/// }
///
/// let values = vec![0.5, 0.7];
/// let mean = |v: &Vec<f64>| v.iter().sum::<f64>() / v.len() as f64;
/// let result = percentile_bootstrap_ci(&values, 10, 0.05, mean, &Identity).unwrap();
/// assert_eq!(result.format(2), "0.60 [0.60, 0.60]");
/// ```
pub fn percentile_bootstrap_ci<C, F, S>(
    samples: &C,
    repetitions: usize,
    alpha: f64,
    statistic: F,
    sampler: &S,
) -> Result<BootstrapResult, BootstrapError>
where
    F: Fn(&C) -> f64,
    S: Sampler<C>,
{
    validate(repetitions, alpha)?;

    let observed = statistic(samples);
    let diffs = (0..repetitions as u64)
        .map(|r| sampler.sample(samples, r).map(|s| statistic(&s) - observed))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(interval(observed, diffs, alpha))
}

/// Parallel version of [`percentile_bootstrap_ci`].
///
/// Repetitions run on the rayon thread pool. The result is identical to the
/// sequential computation.
#[cfg(feature = "parallel")]
pub fn par_percentile_bootstrap_ci<C, F, S>(
    samples: &C,
    repetitions: usize,
    alpha: f64,
    statistic: F,
    sampler: &S,
) -> Result<BootstrapResult, BootstrapError>
where
    C: Sync,
    F: Fn(&C) -> f64 + Sync,
    S: Sampler<C> + Sync,
{
    validate(repetitions, alpha)?;

    let observed = statistic(samples);
    let diffs = (0..repetitions as u64)
        .into_par_iter()
        .map(|r| sampler.sample(samples, r).map(|s| statistic(&s) - observed))
        .collect::<Result<Vec<f64>, _>>()?;

    Ok(interval(observed, diffs, alpha))
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::{Event, IdentityLocation, ScoredEvent};
    use crate::evaluation::{CurveOptions, Statistic};
    use crate::matching::MatchError;

    type M = Match<IdentityLocation>;

    fn hit(query: &str, label: &str, score: f64) -> M {
        Match::paired(
            Event::new(query, IdentityLocation::new(label)),
            ScoredEvent::new(query, IdentityLocation::new(label), score),
            MatchError::PERFECT,
        )
    }

    fn false_positive(query: &str, label: &str, score: f64) -> M {
        Match::false_positive(ScoredEvent::new(query, IdentityLocation::new(label), score))
    }

    fn sample_groups() -> Vec<Vec<M>> {
        vec![
            vec![hit("q1", "a", 0.9), false_positive("q1", "b", 0.3)],
            vec![false_positive("q2", "c", 0.8), hit("q2", "d", 0.6)],
            vec![hit("q3", "e", 0.7)],
            vec![false_positive("q4", "f", 0.95), hit("q4", "g", 0.2), hit("q4", "h", 0.1)],
        ]
    }

    #[test]
    fn test_constant_statistic_single_repetition() {
        let groups = sample_groups();
        let sampler = GroupedMatchesSampler::new(7);
        let result = percentile_bootstrap_ci(&groups, 1, 0.05, |_| 0.42, &sampler).unwrap();
        assert_eq!(result.observed, 0.42);
        assert_eq!(result.lower, 0.42);
        assert_eq!(result.upper, 0.42);
    }

    #[test]
    fn test_interval_brackets_observed_map() {
        let groups = sample_groups();
        let options = CurveOptions::default();
        let statistic = |g: &Vec<Vec<M>>| Statistic::MeanAp.evaluate(g, &options, true);

        let result =
            percentile_bootstrap_ci(&groups, 500, 0.05, statistic, &GroupedMatchesSampler::new(0x12345))
                .unwrap();

        assert!((result.observed - statistic(&groups)).abs() < 1e-12);
        assert!(result.lower <= result.upper);
        assert!(result.lower >= -1.0 && result.upper <= 2.0);
    }

    #[test]
    fn test_reproducible_with_same_seed() {
        let groups = sample_groups();
        let options = CurveOptions::default();
        let statistic = |g: &Vec<Vec<M>>| Statistic::GlobalAp.evaluate(g, &options, true);

        let a = percentile_bootstrap_ci(&groups, 200, 0.1, statistic, &GroupedMatchesSampler::new(1)).unwrap();
        let b = percentile_bootstrap_ci(&groups, 200, 0.1, statistic, &GroupedMatchesSampler::new(1)).unwrap();
        assert_eq!(a, b);
    }

    #[cfg(feature = "parallel")]
    #[test]
    fn test_parallel_matches_sequential() {
        let groups = sample_groups();
        let options = CurveOptions::default();
        let statistic = |g: &Vec<Vec<M>>| Statistic::MeanNdcg.evaluate(g, &options, true);
        let sampler = GroupedMatchesSampler::new(99);

        let sequential = percentile_bootstrap_ci(&groups, 300, 0.05, statistic, &sampler).unwrap();
        let parallel = par_percentile_bootstrap_ci(&groups, 300, 0.05, statistic, &sampler).unwrap();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_invalid_arguments() {
        let groups = sample_groups();
        let sampler = GroupedMatchesSampler::new(0);
        assert_eq!(
            percentile_bootstrap_ci(&groups, 0, 0.05, |_| 0.0, &sampler),
            Err(BootstrapError::NoRepetitions)
        );
        assert_eq!(
            percentile_bootstrap_ci(&groups, 10, 1.5, |_| 0.0, &sampler),
            Err(BootstrapError::InvalidAlpha(1.5))
        );
    }

    #[test]
    fn test_empty_sample_fails() {
        let groups: Vec<Vec<M>> = Vec::new();
        assert_eq!(
            percentile_bootstrap_ci(&groups, 10, 0.05, |_| 0.0, &GroupedMatchesSampler::new(0)),
            Err(BootstrapError::EmptySample)
        );
        let flat: Vec<M> = Vec::new();
        assert_eq!(
            percentile_bootstrap_ci(&flat, 10, 0.05, |_| 0.0, &MatchesSampler::new(0)),
            Err(BootstrapError::EmptySample)
        );
    }

    #[test]
    fn test_grouped_sampler_shape() {
        let groups = sample_groups();
        let sampler = GroupedMatchesSampler::new(3);
        for repetition in 0..20 {
            let resampled = sampler.sample(&groups, repetition).unwrap();
            assert_eq!(resampled.len(), groups.len());
            for group in &resampled {
                // Every resampled group is drawn from a single original group
                let query = group[0].query();
                assert!(group.iter().all(|m| m.query() == query));
                let original = groups.iter().find(|g| g[0].query() == query).unwrap();
                assert_eq!(group.len(), original.len());
            }
        }
    }

    #[test]
    fn test_grouped_sampler_keeps_empty_groups_empty() {
        let groups: Vec<Vec<M>> = vec![Vec::new()];
        let resampled = GroupedMatchesSampler::new(5).sample(&groups, 0).unwrap();
        assert_eq!(resampled, vec![Vec::<M>::new()]);
    }

    #[test]
    fn test_matches_sampler_draws_from_original() {
        let matches = vec![hit("q", "a", 0.9), false_positive("q", "b", 0.5)];
        let sampler = MatchesSampler::new(11);
        let first = sampler.sample(&matches, 4).unwrap();
        assert_eq!(first.len(), 2);
        assert!(first.iter().all(|m| matches.contains(m)));
        // Same repetition, same stream
        assert_eq!(first, sampler.sample(&matches, 4).unwrap());
    }

    #[test]
    fn test_format() {
        let result = BootstrapResult {
            observed: 0.5,
            lower: 0.41234,
            upper: 0.6,
        };
        assert_eq!(result.format(3), "0.500 [0.412, 0.600]");
    }

    #[test]
    fn test_interval_indices() {
        // Differences -2..=2, alpha 0.4: lower uses index 4, upper index 1
        let result = interval(10.0, vec![2.0, -1.0, 0.0, 1.0, -2.0], 0.4);
        assert_eq!(result.lower, 8.0);
        assert_eq!(result.upper, 11.0);

        // alpha 0 clamps the lower index to the last difference
        let result = interval(10.0, vec![1.0], 0.0);
        assert_eq!(result.lower, 9.0);
        assert_eq!(result.upper, 9.0);
    }
}
