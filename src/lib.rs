//! Windowed retrain-and-score evaluation of a SYN flood detector.
//!
//! A labeled capture is split into fixed-size windows, a fresh classifier is
//! fit on every window, and the stitched together predictions are scored
//! into a [`MetricsReport`].

// Modules
pub mod classifier;
pub mod config;
pub mod constants;
pub mod data;
pub mod encoder;
pub mod errors;
pub mod evaluator;
pub mod latency;
pub mod metric;
pub mod objective;
pub mod reader;
pub mod report;
pub mod sampler;
pub mod trainer;
pub mod utils;
pub mod window;

// Individual classes, and functions
pub use config::{ColumnLayout, ConfigIO, EvalConfig};
pub use data::{Dataset, Matrix};
pub use encoder::{encode_dataset, OneHotEncoder};
pub use errors::EvalError;
pub use evaluator::{Evaluation, Evaluator};
pub use reader::{read_records, RawRecord};
pub use report::MetricsReport;
pub use window::{sliding_windows, Partition, Window};
