/// Seed shared by every window's fit.
pub const SEED: u64 = 42;
/// `predicted = 1` iff probability >= this value.
pub const DECISION_THRESHOLD: f64 = 0.5;
/// Added to each category frequency before `log2`.
pub const ENTROPY_EPS: f64 = 1e-12;
/// Latency is reported as the in-window fraction times this scale.
pub const LATENCY_SCALE: f64 = 1000.0;

pub const DEFAULT_WINDOW: usize = 500;
pub const DEFAULT_VECTOR_SIZE: usize = 256;
pub const DEFAULT_MAX_ITER: usize = 200;
pub const DEFAULT_BATCH_SIZE: usize = 32;
pub const DEFAULT_LEARNING_RATE: f64 = 1.0;
pub const DEFAULT_C: f64 = 1.0;
pub const DEFAULT_TOL: f64 = 1e-4;
pub const DEFAULT_POSITIVE_LABEL: &str = "SYN";

/// Decimal places for rates and ratios in the report.
pub const RATE_PRECISION: i32 = 4;
/// Decimal places for the imbalance ratio and runtime.
pub const COARSE_PRECISION: i32 = 2;
