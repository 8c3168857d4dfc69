//! Error metrics for depth prediction evaluation.
//!
//! This module provides the per-pair error formulas comparing a predicted
//! depth array against a ground-truth array. Supported metrics:
//!
//! | Metric | Formula | Range |
//! |--------|---------|-------|
//! | MSE    | `mean((P - G)^2)` | `[0, inf)`, 0 = identical |
//! | RMSE   | `sqrt(MSE)` | `[0, inf)` |
//! | MARE   | `mean(\|P - G\| / G)` | `[0, inf)` |
//! | MRSE   | `mean(((P - G) / G)^2)` | `[0, inf)` |
//! | accval | fraction of samples with `max(P/G, G/P)` below a tolerance | `[0, 1]`, 1 = identical |
//!
//! The relative metrics divide by ground-truth values; callers must
//! exclude arrays containing zeros beforehand (the evaluator's skip rule
//! guarantees this).

use serde::{Deserialize, Serialize};

/// Default accuracy-value ratio tolerance.
///
/// 1.25 is the customary delta-1 threshold in depth estimation
/// benchmarks; pass a different value through
/// [`MetricConfig::accuracy_ratio`] to match another convention.
pub const DEFAULT_ACCURACY_RATIO: f64 = 1.25;

/// Configuration for metric computation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct MetricConfig {
    /// Ratio tolerance for [`accuracy_value`]: a sample counts as
    /// accurate when `max(P/G, G/P)` is strictly below this value.
    pub accuracy_ratio: f64,
}

impl Default for MetricConfig {
    fn default() -> Self {
        Self {
            accuracy_ratio: DEFAULT_ACCURACY_RATIO,
        }
    }
}

/// Error metrics for one prediction/ground-truth pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PairMetrics {
    /// Mean squared error.
    pub mse: f64,
    /// Root mean squared error.
    pub rmse: f64,
    /// Mean absolute relative error.
    pub mare: f64,
    /// Mean relative squared error.
    pub mrse: f64,
    /// Accuracy value: fraction of samples within the ratio tolerance.
    pub accval: f64,
}

impl PairMetrics {
    /// Compute all metrics for a reconciled sample pair.
    ///
    /// `rmse` is derived as `sqrt(mse)` rather than recomputed from the
    /// samples.
    ///
    /// # Panics
    ///
    /// Panics if the slices differ in length or are empty.
    #[must_use]
    pub fn compute(prediction: &[f32], ground_truth: &[f32], config: &MetricConfig) -> Self {
        assert_eq!(prediction.len(), ground_truth.len());
        assert!(!prediction.is_empty());

        let mse = mean_squared_error(prediction, ground_truth);
        Self {
            mse,
            rmse: mse.sqrt(),
            mare: mean_absolute_relative_error(prediction, ground_truth),
            mrse: mean_relative_squared_error(prediction, ground_truth),
            accval: accuracy_value(prediction, ground_truth, config.accuracy_ratio),
        }
    }
}

/// Mean squared error: `mean((P - G)^2)`.
#[must_use]
pub fn mean_squared_error(prediction: &[f32], ground_truth: &[f32]) -> f64 {
    assert_eq!(prediction.len(), ground_truth.len());

    let sum: f64 = prediction
        .iter()
        .zip(ground_truth.iter())
        .map(|(&p, &g)| {
            let diff = f64::from(p) - f64::from(g);
            diff * diff
        })
        .sum();
    sum / prediction.len() as f64
}

/// Mean absolute relative error: `mean(|P - G| / G)`.
///
/// Requires every ground-truth sample to be nonzero.
#[must_use]
pub fn mean_absolute_relative_error(prediction: &[f32], ground_truth: &[f32]) -> f64 {
    assert_eq!(prediction.len(), ground_truth.len());

    let sum: f64 = prediction
        .iter()
        .zip(ground_truth.iter())
        .map(|(&p, &g)| ((f64::from(p) - f64::from(g)) / f64::from(g)).abs())
        .sum();
    sum / prediction.len() as f64
}

/// Mean relative squared error: `mean(((P - G) / G)^2)`.
///
/// Requires every ground-truth sample to be nonzero.
#[must_use]
pub fn mean_relative_squared_error(prediction: &[f32], ground_truth: &[f32]) -> f64 {
    assert_eq!(prediction.len(), ground_truth.len());

    let sum: f64 = prediction
        .iter()
        .zip(ground_truth.iter())
        .map(|(&p, &g)| {
            let rel = (f64::from(p) - f64::from(g)) / f64::from(g);
            rel * rel
        })
        .sum();
    sum / prediction.len() as f64
}

/// Accuracy value: fraction of samples whose prediction/ground-truth
/// ratio `max(P/G, G/P)` is strictly below `ratio`.
///
/// Bounded in `[0, 1]`; identical arrays score 1.0 for any tolerance
/// above 1.0. Requires every ground-truth sample to be nonzero.
#[must_use]
pub fn accuracy_value(prediction: &[f32], ground_truth: &[f32], ratio: f64) -> f64 {
    assert_eq!(prediction.len(), ground_truth.len());

    let within: usize = prediction
        .iter()
        .zip(ground_truth.iter())
        .filter(|&(&p, &g)| {
            let p = f64::from(p);
            let g = f64::from(g);
            (p / g).max(g / p) < ratio
        })
        .count();
    within as f64 / prediction.len() as f64
}
