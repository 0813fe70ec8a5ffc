//! Default evaluation configuration.
//!
//! These constants define the defaults used by the `kws-eval` tool and by the
//! [`CurveOptions`](crate::evaluation::CurveOptions) default. Keeping them here
//! lets benchmarks, tests and the CLI agree on a single configuration.
//!
//! # Usage
//!
//! ```
//! use kwseval_core::config::{DEFAULT_BOOTSTRAP_ALPHA, DEFAULT_BOOTSTRAP_SAMPLES};
//!
//! let repetitions = DEFAULT_BOOTSTRAP_SAMPLES;
//! let confidence = 1.0 - DEFAULT_BOOTSTRAP_ALPHA;
//! assert!(repetitions > 0 && confidence > 0.9);
//! ```

// =============================================================================
// Matching
// =============================================================================

/// Minimum overlap ratio accepted by the thresholded scorers.
///
/// A hypothesis must cover at least half of its own area (or half of the
/// union, for IoU) with a reference to count as a hit.
pub const DEFAULT_OVERLAP_THRESHOLD: f64 = 0.5;

// =============================================================================
// Precision / Recall Curves
// =============================================================================

/// Collapse matches sharing a hypothesis score into one curve point.
pub const DEFAULT_COLLAPSE_MATCHES: bool = true;

/// Use interpolated (monotone) precision.
pub const DEFAULT_INTERPOLATE_PRECISION: bool = true;

/// Integrate the precision/recall curve with the trapezoid rule.
pub const DEFAULT_TRAPEZOID_INTEGRAL: bool = true;

// =============================================================================
// Bootstrap
// =============================================================================

/// Number of bootstrap repetitions.
pub const DEFAULT_BOOTSTRAP_SAMPLES: usize = 10_000;

/// Seed for the bootstrap random streams.
pub const DEFAULT_BOOTSTRAP_SEED: u64 = 0x12345;

/// Significance level; the interval covers `1 - alpha`.
pub const DEFAULT_BOOTSTRAP_ALPHA: f64 = 0.05;
