//! Metrics report
//!
//! The terminal output of an evaluation: a fixed set of named statistics,
//! rounded for presentation, with JSON persistence.
use crate::constants::{COARSE_PRECISION, RATE_PRECISION};
use crate::errors::EvalError;
use crate::utils::precision_round;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::time::Duration;

/// Unrounded corpus level statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Metrics {
    pub accuracy: Option<f64>,
    pub fpr: Option<f64>,
    pub auc: Option<f64>,
    pub median_latency_ms: Option<f64>,
    pub delta_h_bits: f64,
    pub imbalance_ratio: f64,
}

/// Rounded statistics, serialized with this exact key order.
/// Undefined values serialize as `null`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricsReport {
    pub accuracy: Option<f64>,
    pub fpr: Option<f64>,
    pub auc: Option<f64>,
    pub median_latency_ms: Option<u64>,
    pub delta_h_bits: f64,
    pub imbalance_ratio: f64,
    pub runtime_sec: f64,
}

// Adding zero turns a rounded -0.0 into 0.0.
fn round(v: f64, precision: i32) -> f64 {
    precision_round(v, precision) + 0.0
}

impl MetricsReport {
    pub fn new(metrics: &Metrics, runtime: Duration) -> Self {
        MetricsReport {
            accuracy: metrics.accuracy.map(|v| round(v, RATE_PRECISION)),
            fpr: metrics.fpr.map(|v| round(v, RATE_PRECISION)),
            auc: metrics.auc.map(|v| round(v, RATE_PRECISION)),
            median_latency_ms: metrics.median_latency_ms.map(|v| v.round() as u64),
            delta_h_bits: round(metrics.delta_h_bits, RATE_PRECISION),
            imbalance_ratio: round(metrics.imbalance_ratio, COARSE_PRECISION),
            runtime_sec: round(runtime.as_secs_f64(), COARSE_PRECISION),
        }
    }

    /// Replace the runtime, e.g. with an end to end measurement.
    pub fn set_runtime(&mut self, runtime: Duration) {
        self.runtime_sec = round(runtime.as_secs_f64(), COARSE_PRECISION);
    }

    /// Dump the report as pretty printed json.
    pub fn json_dump(&self) -> Result<String, EvalError> {
        serde_json::to_string_pretty(self).map_err(|e| EvalError::UnableToWrite(e.to_string()))
    }

    /// Load a report from a json string.
    pub fn from_json(json_str: &str) -> Result<Self, EvalError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| EvalError::UnableToRead(e.to_string()))
    }

    /// Write the report, creating missing parent directories. On failure
    /// the report is untouched and the write may be retried.
    ///
    /// * `path` - Path to save the report to.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EvalError> {
        let path = path.as_ref();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(|e| EvalError::UnableToWrite(e.to_string()))?;
            }
        }
        fs::write(path, self.json_dump()?).map_err(|e| EvalError::UnableToWrite(e.to_string()))
    }

    /// Load a report from a path to a json file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, EvalError> {
        let json_str = fs::read_to_string(path).map_err(|e| EvalError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

fn fmt_opt<T: fmt::Display>(v: Option<T>) -> String {
    match v {
        Some(v) => v.to_string(),
        None => "null".to_string(),
    }
}

impl fmt::Display for MetricsReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{:>20}: {}", "accuracy", fmt_opt(self.accuracy))?;
        writeln!(f, "{:>20}: {}", "fpr", fmt_opt(self.fpr))?;
        writeln!(f, "{:>20}: {}", "auc", fmt_opt(self.auc))?;
        writeln!(f, "{:>20}: {}", "median_latency_ms", fmt_opt(self.median_latency_ms))?;
        writeln!(f, "{:>20}: {}", "delta_h_bits", self.delta_h_bits)?;
        writeln!(f, "{:>20}: {}", "imbalance_ratio", self.imbalance_ratio)?;
        write!(f, "{:>20}: {}", "runtime_sec", self.runtime_sec)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn metrics() -> Metrics {
        Metrics {
            accuracy: Some(0.987654),
            fpr: None,
            auc: Some(0.5),
            median_latency_ms: Some(3.5),
            delta_h_bits: -1.0e-12,
            imbalance_ratio: 1.0 / 3.0,
        }
    }

    #[test]
    fn test_rounding() {
        let report = MetricsReport::new(&metrics(), Duration::from_millis(1234));
        assert_eq!(report.accuracy, Some(0.9877));
        assert_eq!(report.fpr, None);
        assert_eq!(report.median_latency_ms, Some(4));
        assert_eq!(report.delta_h_bits, 0.0);
        assert!(report.delta_h_bits.is_sign_positive());
        assert_eq!(report.imbalance_ratio, 0.33);
        assert_eq!(report.runtime_sec, 1.23);
    }

    #[test]
    fn test_json_keys_in_order() {
        let report = MetricsReport::new(&metrics(), Duration::ZERO);
        let json = report.json_dump().unwrap();
        let keys = [
            "accuracy",
            "fpr",
            "auc",
            "median_latency_ms",
            "delta_h_bits",
            "imbalance_ratio",
            "runtime_sec",
        ];
        let positions: Vec<usize> = keys.iter().map(|k| json.find(&format!("\"{}\"", k)).unwrap()).collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert!(json.contains("\"fpr\": null"));
        assert!(json.contains("\"median_latency_ms\": 4"));
    }

    #[test]
    fn test_save_and_load() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("results").join("metrics.json");
        let report = MetricsReport::new(&metrics(), Duration::from_secs(2));
        report.save(&path).unwrap();
        assert_eq!(MetricsReport::load(&path).unwrap(), report);
    }

    #[test]
    fn test_failed_write_keeps_report() {
        let dir = tempdir().unwrap();
        let blocker = dir.path().join("file");
        fs::write(&blocker, "x").unwrap();
        let report = MetricsReport::new(&metrics(), Duration::ZERO);
        let res = report.save(blocker.join("metrics.json"));
        assert!(matches!(res, Err(EvalError::UnableToWrite(_))));
        let retry = dir.path().join("metrics.json");
        report.save(&retry).unwrap();
        assert_eq!(MetricsReport::load(&retry).unwrap().accuracy, Some(0.9877));
    }

    #[test]
    fn test_display() {
        let report = MetricsReport::new(&metrics(), Duration::ZERO);
        let text = report.to_string();
        assert_eq!(text.lines().count(), 7);
        assert!(text.lines().any(|l| l == "                 fpr: null"));
    }
}
