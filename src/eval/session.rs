//! Dataset evaluator with an observer-based progress interface.
//!
//! This module provides [`Evaluator`], the main entry point for dataset
//! evaluation. Callers hand over two ordered path lists (predictions and
//! ground truths, index `i` of each forming a pair); the evaluator
//! validates them, loads each pair at native bit depth, reconciles
//! dimensions, computes error metrics, and aggregates everything into a
//! [`SummaryReport`] and a [`DetailReport`].
//!
//! Progress and skip events go to an optional observer callback, keeping
//! reporting decoupled from computation.

use std::path::{Path, PathBuf};

use crate::decode::decode_depth;
use crate::depth::DepthMap;
use crate::error::{Error, Result};
use crate::eval::report::{DetailReport, PairRecord, SummaryReport};
use crate::metrics::{MetricConfig, PairMetrics};
use crate::resample::{resize_to_common, ResampleFilter};

/// Why a pair was excluded from the reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The ground truth contains at least one zero sample.
    IncompleteGroundTruth,
    /// One of the two images failed to decode.
    LoadFailed,
    /// The pair could not be reconciled (channel mismatch).
    ShapeIncompatible,
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::IncompleteGroundTruth => write!(f, "incomplete ground truth"),
            Self::LoadFailed => write!(f, "load failed"),
            Self::ShapeIncompatible => write!(f, "shape incompatible"),
        }
    }
}

/// Observational events emitted while a dataset is evaluated.
///
/// Events never affect the returned reports.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvalEvent {
    /// Evaluation is starting over `total` pairs.
    Started {
        /// Number of listed pairs.
        total: usize,
    },
    /// Periodic progress, every [`EvalConfig::progress_interval`] pairs.
    Progress {
        /// Zero-based index of the pair about to be processed.
        current: usize,
        /// Number of listed pairs.
        total: usize,
    },
    /// A pair was excluded from both reports.
    PairSkipped {
        /// Pair identifier (prediction file name).
        name: String,
        /// Why it was excluded.
        reason: SkipReason,
    },
    /// Evaluation finished.
    Finished {
        /// Pairs that contributed to the reports.
        evaluated: usize,
        /// Pairs excluded by the skip rule.
        skipped: usize,
    },
}

/// Observer callback type.
pub type ObserverFn = Box<dyn Fn(&EvalEvent) + Send + Sync>;

/// Configuration for a dataset evaluation.
#[derive(Debug, Clone)]
pub struct EvalConfig {
    /// Metric formula configuration.
    pub metrics: MetricConfig,

    /// Filter used for dimension reconciliation.
    pub filter: ResampleFilter,

    /// Emit a `Progress` event every this many pairs.
    pub progress_interval: usize,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            metrics: MetricConfig::default(),
            filter: ResampleFilter::default(),
            progress_interval: 10,
        }
    }
}

impl EvalConfig {
    /// Create a new configuration builder.
    #[must_use]
    pub fn builder() -> EvalConfigBuilder {
        EvalConfigBuilder::default()
    }
}

/// Builder for [`EvalConfig`].
#[derive(Debug, Default)]
pub struct EvalConfigBuilder {
    metrics: Option<MetricConfig>,
    filter: Option<ResampleFilter>,
    progress_interval: Option<usize>,
}

impl EvalConfigBuilder {
    /// Set the metric configuration.
    #[must_use]
    pub fn metrics(mut self, metrics: MetricConfig) -> Self {
        self.metrics = Some(metrics);
        self
    }

    /// Set the reconciliation filter.
    #[must_use]
    pub fn filter(mut self, filter: ResampleFilter) -> Self {
        self.filter = Some(filter);
        self
    }

    /// Set the progress reporting interval.
    #[must_use]
    pub fn progress_interval(mut self, interval: usize) -> Self {
        self.progress_interval = Some(interval.max(1));
        self
    }

    /// Build the configuration.
    #[must_use]
    pub fn build(self) -> EvalConfig {
        let defaults = EvalConfig::default();
        EvalConfig {
            metrics: self.metrics.unwrap_or(defaults.metrics),
            filter: self.filter.unwrap_or(defaults.filter),
            progress_interval: self.progress_interval.unwrap_or(defaults.progress_interval),
        }
    }
}

/// Dataset evaluator.
///
/// # Example
///
/// ```rust,ignore
/// use depth_eval::{EvalConfig, Evaluator};
///
/// let mut evaluator = Evaluator::new(EvalConfig::default());
/// evaluator.set_observer(Box::new(|event| println!("{event:?}")));
///
/// let (summary, detail) = evaluator.evaluate(&predictions, &ground_truths)?;
/// println!("mse_mean = {:?}", summary.mse_mean);
/// ```
pub struct Evaluator {
    config: EvalConfig,
    observer: Option<ObserverFn>,
}

impl Evaluator {
    /// Create a new evaluator.
    #[must_use]
    pub fn new(config: EvalConfig) -> Self {
        Self {
            config,
            observer: None,
        }
    }

    /// Install an observer for progress and skip events.
    pub fn set_observer(&mut self, observer: ObserverFn) -> &mut Self {
        self.observer = Some(observer);
        self
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &EvalConfig {
        &self.config
    }

    /// Evaluate a dataset of prediction/ground-truth pairs.
    ///
    /// Both path lists are validated before any image is decoded: every
    /// path must exist ([`Error::FileNotFound`]) and the lists must have
    /// equal length ([`Error::LengthMismatch`]). Pairs whose ground truth
    /// contains a zero sample, or that fail to decode or reconcile, are
    /// skipped and excluded from both reports.
    pub fn evaluate(
        &self,
        predictions: &[PathBuf],
        ground_truths: &[PathBuf],
    ) -> Result<(SummaryReport, DetailReport)> {
        self.check_dataset(predictions, ground_truths)?;

        let total = predictions.len();
        log::info!("Evaluation for {total} img pairs ...");
        self.notify(&EvalEvent::Started { total });

        let mut best: Option<(f64, String)> = None;
        let mut worst: Option<(f64, String)> = None;
        let mut detail = DetailReport::new();
        let mut skipped = 0usize;

        for (index, (pred_path, gt_path)) in
            predictions.iter().zip(ground_truths.iter()).enumerate()
        {
            if self.config.progress_interval > 0 && index % self.config.progress_interval == 0 {
                log::debug!("{index}/{total}");
                self.notify(&EvalEvent::Progress {
                    current: index,
                    total,
                });
            }

            let name = pair_name(pred_path);

            let loaded = decode_depth(pred_path).and_then(|pred| {
                decode_depth(gt_path).map(|ground_truth| (pred, ground_truth))
            });
            let (prediction, ground_truth) = match loaded {
                Ok(pair) => pair,
                Err(e) => {
                    log::warn!("Skipping pair {name}: {e}");
                    skipped += 1;
                    self.notify(&EvalEvent::PairSkipped {
                        name,
                        reason: SkipReason::LoadFailed,
                    });
                    continue;
                }
            };

            // Zero samples mean the ground truth is incomplete; tested on
            // the raw array, before any resampling can smear the holes.
            if ground_truth.has_zero() {
                log::debug!("Skipping pair {name}: ground truth incomplete");
                skipped += 1;
                self.notify(&EvalEvent::PairSkipped {
                    name,
                    reason: SkipReason::IncompleteGroundTruth,
                });
                continue;
            }

            let metrics = match self.evaluate_pair(&prediction, &ground_truth) {
                Ok(metrics) => metrics,
                Err(e) => {
                    log::warn!("Skipping pair {name}: {e}");
                    skipped += 1;
                    self.notify(&EvalEvent::PairSkipped {
                        name,
                        reason: SkipReason::ShapeIncompatible,
                    });
                    continue;
                }
            };

            if best.as_ref().is_none_or(|(mse, _)| metrics.mse < *mse) {
                best = Some((metrics.mse, name.clone()));
            }
            if worst.as_ref().is_none_or(|(mse, _)| metrics.mse > *mse) {
                worst = Some((metrics.mse, name.clone()));
            }

            detail.records.push(PairRecord { name, metrics });
        }

        let evaluated = detail.len();
        log::info!("Evaluation done ({evaluated} evaluated, {skipped} skipped).");
        self.notify(&EvalEvent::Finished { evaluated, skipped });

        let (best_mse, best_img) = split_extreme(best);
        let (worst_mse, worst_img) = split_extreme(worst);

        let summary = SummaryReport {
            mse_mean: column_mean(&detail, |m| m.mse),
            rmse_mean: column_mean(&detail, |m| m.rmse),
            mare_mean: column_mean(&detail, |m| m.mare),
            mrse_mean: column_mean(&detail, |m| m.mrse),
            accval_mean: column_mean(&detail, |m| m.accval),
            best_mse,
            best_img,
            worst_mse,
            worst_img,
            evaluated,
            skipped,
            timestamp: chrono::Utc::now(),
        };

        Ok((summary, detail))
    }

    /// Compute metrics for one already-loaded pair.
    ///
    /// Reconciles dimensions first when the shapes differ. The caller is
    /// responsible for the zero-sample skip rule; this function assumes
    /// the ground truth is complete.
    pub fn evaluate_pair(
        &self,
        prediction: &DepthMap,
        ground_truth: &DepthMap,
    ) -> Result<PairMetrics> {
        let metrics = if prediction.shape() == ground_truth.shape()
            && prediction.channels() == ground_truth.channels()
        {
            PairMetrics::compute(
                prediction.samples(),
                ground_truth.samples(),
                &self.config.metrics,
            )
        } else {
            let (pred, gt) = resize_to_common(prediction, ground_truth, self.config.filter)?;
            PairMetrics::compute(pred.samples(), gt.samples(), &self.config.metrics)
        };
        Ok(metrics)
    }

    /// Validate both path lists before any image I/O.
    fn check_dataset(&self, predictions: &[PathBuf], ground_truths: &[PathBuf]) -> Result<()> {
        for path in predictions.iter().chain(ground_truths.iter()) {
            if !path.exists() {
                log::error!("File {} does not exist!", path.display());
                return Err(Error::FileNotFound { path: path.clone() });
            }
        }

        if predictions.len() != ground_truths.len() {
            log::error!(
                "Prediction paths number ({}) should match ground truth paths number ({})!",
                predictions.len(),
                ground_truths.len()
            );
            return Err(Error::LengthMismatch {
                predictions: predictions.len(),
                ground_truths: ground_truths.len(),
            });
        }

        Ok(())
    }

    fn notify(&self, event: &EvalEvent) {
        if let Some(observer) = &self.observer {
            observer(event);
        }
    }
}

/// Pair identifier: the prediction file name.
fn pair_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn split_extreme(extreme: Option<(f64, String)>) -> (Option<f64>, Option<String>) {
    match extreme {
        Some((mse, name)) => (Some(mse), Some(name)),
        None => (None, None),
    }
}

fn column_mean(detail: &DetailReport, select: impl Fn(&PairMetrics) -> f64) -> Option<f64> {
    if detail.is_empty() {
        return None;
    }
    let column = detail.metric_column(select);
    Some(column.iter().sum::<f64>() / column.len() as f64)
}
