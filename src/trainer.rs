//! Per-window trainer
//!
//! Every window is scored by a model fit on that window alone. Nothing
//! survives from one call to the next: the model is built, fit and dropped
//! inside `fit_predict`, and the random generator is rebuilt from the
//! shared seed each time.
use crate::classifier::LogisticRegression;
use crate::config::EvalConfig;
use crate::constants::DECISION_THRESHOLD;
use crate::data::Matrix;
use crate::errors::EvalError;
use log::warn;
use rand::rngs::StdRng;
use rand::SeedableRng;

/// Fit a fresh classifier on the window and return the positive class
/// probability of each of its records.
///
/// * `x` - Features of the window's records.
/// * `y` - Labels of the window's records.
/// * `cfg` - Classifier settings and the shared seed.
pub fn fit_predict(x: &Matrix<f64>, y: &[f64], cfg: &EvalConfig) -> Result<Vec<f64>, EvalError> {
    let positives = y.iter().filter(|v| **v == 1.0).count();
    if positives == 0 || positives == y.len() {
        warn!(
            "Window of {} records has a single class ({} positive), fitting anyway.",
            y.len(),
            positives
        );
    }
    let mut rng = StdRng::seed_from_u64(cfg.seed);
    let mut model = LogisticRegression::from_config(cfg);
    model.fit(x, y, &mut rng)?;
    Ok(model.predict_proba(x))
}

/// Binary predictions, 1.0 iff the probability reaches the decision threshold.
pub fn threshold(probabilities: &[f64]) -> Vec<f64> {
    probabilities
        .iter()
        .map(|p| if *p >= DECISION_THRESHOLD { 1.0 } else { 0.0 })
        .collect()
}
