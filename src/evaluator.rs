//! Evaluator
//!
//! The windowed retrain-and-score engine. The capture is partitioned into
//! windows, a fresh model is fit and applied on each one, its predictions
//! land in the window's own range of a preallocated buffer, and the buffer
//! is scored once every window is done.
use crate::config::EvalConfig;
use crate::data::Dataset;
use crate::errors::EvalError;
use crate::latency::{median_latency, window_latency};
use crate::metric::{binary_auc, entropy_drift, imbalance_ratio, ConfusionMatrix};
use crate::report::{Metrics, MetricsReport};
use crate::trainer::{fit_predict, threshold};
use crate::window::{Partition, Window};
use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Corpus wide predictions, one slot per record.
///
/// Slots start out as NaN and each is written once, by the window that owns
/// its index.
#[derive(Debug, Clone)]
pub struct PredictionBuffer {
    probabilities: Vec<f64>,
    predictions: Vec<f64>,
}

impl PredictionBuffer {
    fn new(n: usize) -> Self {
        PredictionBuffer {
            probabilities: vec![f64::NAN; n],
            predictions: vec![f64::NAN; n],
        }
    }

    /// Thresholded 0/1 predictions.
    pub fn predictions(&self) -> &[f64] {
        &self.predictions
    }

    /// Positive class probabilities.
    pub fn probabilities(&self) -> &[f64] {
        &self.probabilities
    }

    pub fn len(&self) -> usize {
        self.predictions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.predictions.is_empty()
    }

    /// True when no slot was left unwritten.
    pub fn is_complete(&self) -> bool {
        !self.predictions.iter().any(|v| v.is_nan()) && !self.probabilities.iter().any(|v| v.is_nan())
    }
}

/// What happened in one window.
#[derive(Debug, Clone, PartialEq)]
pub struct WindowOutcome {
    pub index: usize,
    pub start: usize,
    pub stop: usize,
    /// Attack records in the window.
    pub positives: usize,
    /// Records predicted as attacks.
    pub predicted_positives: usize,
    /// Detection latency sample, `None` without a true positive.
    pub latency_ms: Option<f64>,
}

/// Full result of a run.
#[derive(Debug, Clone)]
pub struct Evaluation {
    pub predictions: PredictionBuffer,
    pub windows: Vec<WindowOutcome>,
    pub metrics: Metrics,
    pub report: MetricsReport,
}

pub struct Evaluator {
    cfg: EvalConfig,
    cancel: Option<Arc<AtomicBool>>,
}

impl Evaluator {
    pub fn new(cfg: EvalConfig) -> Result<Self, EvalError> {
        cfg.validate()?;
        Ok(Evaluator { cfg, cancel: None })
    }

    /// Abort between windows once `flag` is set.
    pub fn with_cancel_flag(mut self, flag: Arc<AtomicBool>) -> Self {
        self.cancel = Some(flag);
        self
    }

    pub fn config(&self) -> &EvalConfig {
        &self.cfg
    }

    /// Run every window over the dataset and score the result.
    ///
    /// Any window failure aborts the whole run; no partial report is produced.
    pub fn evaluate(&self, data: &Dataset) -> Result<Evaluation, EvalError> {
        let start = Instant::now();
        if data.cols() != self.cfg.vector_size {
            return Err(EvalError::DimensionMismatch(self.cfg.vector_size, data.cols()));
        }

        let partition = Partition::new(data.rows(), self.cfg.window)?;
        let windows: Vec<Window> = partition.iter().collect();
        info!(
            "Evaluating {} records in {} windows of {} (seed {}, parallel {}).",
            data.rows(),
            windows.len(),
            self.cfg.window,
            self.cfg.seed,
            self.cfg.parallel
        );

        let mut buffer = PredictionBuffer::new(data.rows());
        let outcomes = if self.cfg.parallel {
            self.score_parallel(data, &windows, &mut buffer)?
        } else {
            self.score_sequential(data, &windows, &mut buffer)?
        };
        debug_assert!(buffer.is_complete());

        let latencies: Vec<Option<f64>> = outcomes.iter().map(|o| o.latency_ms).collect();
        let metrics = aggregate(data, buffer.predictions(), &latencies);
        let report = MetricsReport::new(&metrics, start.elapsed());
        info!("Evaluation finished in {:.2}s.", report.runtime_sec);

        Ok(Evaluation {
            predictions: buffer,
            windows: outcomes,
            metrics,
            report,
        })
    }

    fn score_sequential(
        &self,
        data: &Dataset,
        windows: &[Window],
        buffer: &mut PredictionBuffer,
    ) -> Result<Vec<WindowOutcome>, EvalError> {
        windows
            .iter()
            .map(|w| {
                let probabilities = &mut buffer.probabilities[w.range()];
                let predictions = &mut buffer.predictions[w.range()];
                self.score_window(data, w, probabilities, predictions)
            })
            .collect()
    }

    fn score_parallel(
        &self,
        data: &Dataset,
        windows: &[Window],
        buffer: &mut PredictionBuffer,
    ) -> Result<Vec<WindowOutcome>, EvalError> {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.cfg.num_threads.unwrap_or(0))
            .build()
            .map_err(|e| EvalError::ThreadPool(e.to_string()))?;
        let size = self.cfg.window;
        // Chunks of the window size line up one to one with the partition.
        pool.install(|| {
            buffer
                .probabilities
                .par_chunks_mut(size)
                .zip(buffer.predictions.par_chunks_mut(size))
                .zip(windows.par_iter())
                .map(|((probabilities, predictions), w)| self.score_window(data, w, probabilities, predictions))
                .collect()
        })
    }

    fn score_window(
        &self,
        data: &Dataset,
        w: &Window,
        probabilities_out: &mut [f64],
        predictions_out: &mut [f64],
    ) -> Result<WindowOutcome, EvalError> {
        if self.is_cancelled() {
            return Err(EvalError::Cancelled(w.index));
        }
        let x = data.matrix().slice_rows(w.start, w.stop);
        let y = &data.labels()[w.range()];

        let probabilities = fit_predict(&x, y, &self.cfg)?;
        let predictions = threshold(&probabilities);
        probabilities_out.copy_from_slice(&probabilities);
        predictions_out.copy_from_slice(&predictions);

        let latency_ms = window_latency(y, &predictions, self.cfg.window);
        let outcome = WindowOutcome {
            index: w.index,
            start: w.start,
            stop: w.stop,
            positives: y.iter().filter(|v| **v == 1.0).count(),
            predicted_positives: predictions.iter().filter(|v| **v == 1.0).count(),
            latency_ms,
        };
        debug!(
            "Window {} [{}, {}): {} positive, {} predicted, latency {:?}.",
            outcome.index, outcome.start, outcome.stop, outcome.positives, outcome.predicted_positives, latency_ms
        );
        Ok(outcome)
    }

    fn is_cancelled(&self) -> bool {
        self.cancel.as_ref().is_some_and(|f| f.load(Ordering::Relaxed))
    }
}

/// Corpus level statistics from the finished prediction buffer.
///
/// * `data` - The evaluated dataset.
/// * `predictions` - One 0/1 prediction per record.
/// * `latencies` - One optional latency sample per window.
pub fn aggregate(data: &Dataset, predictions: &[f64], latencies: &[Option<f64>]) -> Metrics {
    let y = data.labels();
    let cm = ConfusionMatrix::new(y, predictions);

    let fpr = cm.false_positive_rate();
    if fpr.is_none() {
        warn!("No benign records, false positive rate is undefined.");
    }
    let auc = binary_auc(y, predictions);
    if auc.is_none() {
        warn!("Only one class present, AUC is undefined.");
    }
    let median_latency_ms = median_latency(latencies);
    if median_latency_ms.is_none() {
        warn!("No window produced a true positive, latency is undefined.");
    }

    Metrics {
        accuracy: cm.accuracy(),
        fpr,
        auc,
        median_latency_ms,
        delta_h_bits: entropy_drift(data.sources(), y),
        imbalance_ratio: imbalance_ratio(y),
    }
}
