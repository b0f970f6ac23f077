//! Errors
//!
//! Custom error types used throughout the `synflood` crate.
use thiserror::Error;

/// Errors that can occur while loading, encoding or evaluating a capture.
#[derive(Debug, Error)]
pub enum EvalError {
    /// First value is the name of the parameter, second is expected, third is what was passed.
    #[error("Invalid parameter value passed for {0}, expected {1} but {2} provided.")]
    InvalidParameter(String, String, String),
    /// A source row is missing required fields.
    #[error("Malformed record at row {0}: {1}")]
    MalformedRecord(usize, String),
    /// Feature width of the corpus disagrees with the configured vector size.
    #[error("Feature dimension mismatch, configured vector_size is {0} but the data has {1} columns.")]
    DimensionMismatch(usize, usize),
    /// Lengths of parallel buffers disagree.
    #[error("Shape mismatch for {0}, expected {1} but found {2}.")]
    ShapeMismatch(String, usize, usize),
    /// A ground truth value that is neither 0 nor 1.
    #[error("Label at row {0} must be 0 or 1, found {1}.")]
    InvalidLabel(usize, f64),
    /// Unable to read an input file.
    #[error("Unable to read from a file {0}")]
    UnableToRead(String),
    /// Unable to write the report or configuration.
    #[error("Unable to write to file: {0}")]
    UnableToWrite(String),
    /// The worker pool could not be created.
    #[error("Unable to build thread pool: {0}")]
    ThreadPool(String),
    /// The run was cancelled before the given window was trained.
    #[error("Evaluation cancelled before window {0}.")]
    Cancelled(usize),
}
