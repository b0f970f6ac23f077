//! Evaluation Configuration
//!
//! Options recognised by the evaluator and the record reader, with JSON
//! persistence.
use crate::constants::{
    DEFAULT_BATCH_SIZE, DEFAULT_C, DEFAULT_LEARNING_RATE, DEFAULT_MAX_ITER, DEFAULT_POSITIVE_LABEL, DEFAULT_TOL,
    DEFAULT_VECTOR_SIZE, DEFAULT_WINDOW, SEED,
};
use crate::errors::EvalError;
use crate::utils::{
    validate_float_parameter, validate_positive_float_parameter, validate_positive_int_parameter,
};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Zero based column positions of the fields read from each source row.
///
/// Defaults follow the CIC-DDoS2019 flow layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnLayout {
    pub src_ip: usize,
    pub src_port: usize,
    pub dst_ip: usize,
    pub dst_port: usize,
    pub label: usize,
}

impl ColumnLayout {
    /// Minimum number of fields a row must carry.
    pub fn min_fields(&self) -> usize {
        [self.src_ip, self.src_port, self.dst_ip, self.dst_port, self.label]
            .into_iter()
            .max()
            .unwrap_or(0)
            + 1
    }
}

impl Default for ColumnLayout {
    fn default() -> Self {
        ColumnLayout {
            src_ip: 2,
            src_port: 3,
            dst_ip: 4,
            dst_port: 5,
            label: 87,
        }
    }
}

fn default_window() -> usize {
    DEFAULT_WINDOW
}
fn default_vector_size() -> usize {
    DEFAULT_VECTOR_SIZE
}
fn default_seed() -> u64 {
    SEED
}
fn default_max_iter() -> usize {
    DEFAULT_MAX_ITER
}
fn default_learning_rate() -> f64 {
    DEFAULT_LEARNING_RATE
}
fn default_batch_size() -> usize {
    DEFAULT_BATCH_SIZE
}
fn default_c() -> f64 {
    DEFAULT_C
}
fn default_tol() -> f64 {
    DEFAULT_TOL
}
fn default_positive_label() -> String {
    DEFAULT_POSITIVE_LABEL.to_string()
}

/// Configuration for the `Evaluator`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    /// Records per window.
    #[serde(default = "default_window")]
    pub window: usize,
    /// Width of each encoded feature vector.
    #[serde(default = "default_vector_size")]
    pub vector_size: usize,
    /// Seed handed to every window's fit.
    #[serde(default = "default_seed")]
    pub seed: u64,
    /// Training epochs per window.
    #[serde(default = "default_max_iter")]
    pub max_iter: usize,
    /// Base step size, scaled down by the largest squared row norm of the window.
    #[serde(default = "default_learning_rate")]
    pub learning_rate: f64,
    /// Rows per gradient step.
    #[serde(default = "default_batch_size")]
    pub batch_size: usize,
    /// Inverse L2 regularisation strength.
    #[serde(default = "default_c")]
    pub c: f64,
    /// Stop training once the epoch loss changes by less than this.
    #[serde(default = "default_tol")]
    pub tol: f64,
    /// Score windows concurrently.
    #[serde(default)]
    pub parallel: bool,
    /// Number of threads for parallel scoring, all available if `None`.
    #[serde(default)]
    pub num_threads: Option<usize>,
    /// Raw label value marking an attack record.
    #[serde(default = "default_positive_label")]
    pub positive_label: String,
    /// Where to find the identity and label fields in a source row.
    #[serde(default)]
    pub layout: ColumnLayout,
    /// Skip the first row of the source file.
    #[serde(default)]
    pub has_headers: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        EvalConfig {
            window: DEFAULT_WINDOW,
            vector_size: DEFAULT_VECTOR_SIZE,
            seed: SEED,
            max_iter: DEFAULT_MAX_ITER,
            learning_rate: DEFAULT_LEARNING_RATE,
            batch_size: DEFAULT_BATCH_SIZE,
            c: DEFAULT_C,
            tol: DEFAULT_TOL,
            parallel: false,
            num_threads: None,
            positive_label: DEFAULT_POSITIVE_LABEL.to_string(),
            layout: ColumnLayout::default(),
            has_headers: false,
        }
    }
}

impl EvalConfig {
    pub fn validate(&self) -> Result<(), EvalError> {
        validate_positive_int_parameter(self.window, "window")?;
        validate_positive_int_parameter(self.vector_size, "vector_size")?;
        validate_positive_int_parameter(self.max_iter, "max_iter")?;
        validate_positive_int_parameter(self.batch_size, "batch_size")?;
        validate_positive_float_parameter(self.learning_rate, "learning_rate")?;
        validate_positive_float_parameter(self.c, "c")?;
        validate_float_parameter(self.tol, 0.0, f64::INFINITY, "tol")?;
        if let Some(n) = self.num_threads {
            validate_positive_int_parameter(n, "num_threads")?;
        }
        if self.positive_label.trim().is_empty() {
            return Err(EvalError::InvalidParameter(
                "positive_label".to_string(),
                "a non empty label".to_string(),
                format!("{:?}", self.positive_label),
            ));
        }
        Ok(())
    }

    /// Set the window size.
    pub fn set_window(mut self, window: usize) -> Self {
        self.window = window;
        self
    }

    /// Set the feature vector width.
    pub fn set_vector_size(mut self, vector_size: usize) -> Self {
        self.vector_size = vector_size;
        self
    }

    /// Set the seed shared by every window's fit.
    pub fn set_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    /// Set whether windows are scored concurrently.
    /// * `num_threads` - Pool size, all available cores if `None`.
    pub fn set_parallel(mut self, parallel: bool, num_threads: Option<usize>) -> Self {
        self.parallel = parallel;
        self.num_threads = num_threads;
        self
    }
}

/// IO
pub trait ConfigIO: Serialize + DeserializeOwned + Sized {
    /// Save as a json object to a file.
    ///
    /// * `path` - Path to save to.
    fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), EvalError> {
        fs::write(path, self.json_dump()?).map_err(|e| EvalError::UnableToWrite(e.to_string()))
    }

    /// Dump as a pretty printed json object.
    fn json_dump(&self) -> Result<String, EvalError> {
        serde_json::to_string_pretty(self).map_err(|e| EvalError::UnableToWrite(e.to_string()))
    }

    /// Load from a json string.
    fn from_json(json_str: &str) -> Result<Self, EvalError> {
        serde_json::from_str::<Self>(json_str).map_err(|e| EvalError::UnableToRead(e.to_string()))
    }

    /// Load from a path to a json object.
    fn load<P: AsRef<Path>>(path: P) -> Result<Self, EvalError> {
        let json_str = fs::read_to_string(path).map_err(|e| EvalError::UnableToRead(e.to_string()))?;
        Self::from_json(&json_str)
    }
}

impl ConfigIO for EvalConfig {}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_config_default() {
        let config = EvalConfig::default();
        assert_eq!(config.window, 500);
        assert_eq!(config.vector_size, 256);
        assert_eq!(config.seed, 42);
        assert_eq!(config.layout.label, 87);
        assert_eq!(config.layout.min_fields(), 88);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_config_validate() {
        assert!(EvalConfig::default().set_window(0).validate().is_err());
        assert!(EvalConfig::default().set_vector_size(0).validate().is_err());
        assert!(EvalConfig::default().set_parallel(true, Some(0)).validate().is_err());
        let mut config = EvalConfig::default();
        config.c = -1.0;
        assert!(matches!(config.validate(), Err(EvalError::InvalidParameter(..))));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let json = r#"{"window": 100, "layout": {"src_ip": 0, "src_port": 1, "dst_ip": 2, "dst_port": 3, "label": 4}}"#;
        let config = EvalConfig::from_json(json).unwrap();
        assert_eq!(config.window, 100);
        assert_eq!(config.vector_size, 256);
        assert_eq!(config.positive_label, "SYN");
        assert_eq!(config.layout.min_fields(), 5);
    }

    #[test]
    fn test_config_io_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("config.json");
        let config = EvalConfig::default().set_window(64).set_seed(7);
        config.save(&file_path).unwrap();
        let config2 = EvalConfig::load(&file_path).unwrap();
        assert_eq!(config, config2);
    }

    #[test]
    fn test_config_load_missing_file() {
        let dir = tempdir().unwrap();
        let res = EvalConfig::load(dir.path().join("nope.json"));
        assert!(matches!(res, Err(EvalError::UnableToRead(_))));
    }
}
