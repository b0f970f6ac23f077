//! Logistic regression
//!
//! L2 regularised binary logistic regression fit by seeded mini-batch
//! gradient descent on the log loss. The intercept is not penalised.
use crate::config::EvalConfig;
use crate::data::Matrix;
use crate::errors::EvalError;
use crate::objective::{sigmoid, LogLoss};
use crate::sampler::{MiniBatchSampler, Sampler};
use log::debug;
use rand::rngs::StdRng;

#[derive(Debug, Clone)]
pub struct LogisticRegression {
    /// Maximum number of passes over the data.
    pub max_iter: usize,
    /// Base step size, divided by the smoothness bound of the window.
    pub learning_rate: f64,
    /// Records per gradient step.
    pub batch_size: usize,
    /// Inverse regularisation strength.
    pub c: f64,
    /// Stop once the epoch loss changes by less than this.
    pub tol: f64,
    pub weights: Vec<f64>,
    pub intercept: f64,
}

impl LogisticRegression {
    pub fn new(max_iter: usize, learning_rate: f64, batch_size: usize, c: f64, tol: f64) -> Self {
        LogisticRegression {
            max_iter,
            learning_rate,
            batch_size,
            c,
            tol,
            weights: Vec::new(),
            intercept: 0.0,
        }
    }

    pub fn from_config(cfg: &EvalConfig) -> Self {
        Self::new(cfg.max_iter, cfg.learning_rate, cfg.batch_size, cfg.c, cfg.tol)
    }

    /// Fit the model from scratch, returning the number of epochs run.
    ///
    /// A single class in `y` is accepted; the model then leans entirely on
    /// the intercept and predicts that class.
    ///
    /// * `x` - Training features.
    /// * `y` - Labels, 0 or 1, one per row of `x`.
    /// * `rng` - Source of the mini-batch ordering.
    pub fn fit(&mut self, x: &Matrix<f64>, y: &[f64], rng: &mut StdRng) -> Result<usize, EvalError> {
        if y.len() != x.rows {
            return Err(EvalError::ShapeMismatch("labels".to_string(), x.rows, y.len()));
        }
        self.weights = vec![0.0; x.cols];
        self.intercept = LogLoss::calc_init(y);
        if x.rows == 0 {
            return Ok(0);
        }

        let n = x.rows as f64;
        let reg = 1.0 / (self.c * n);
        // The log loss gradient is (max ||x||^2 / 4)-Lipschitz, intercept included.
        let max_sq_norm = (0..x.rows)
            .map(|i| x.get_row(i).iter().map(|v| v * v).sum::<f64>() + 1.0)
            .fold(0.0, f64::max);
        let step = self.learning_rate / (0.25 * max_sq_norm + reg);

        let index: Vec<usize> = (0..x.rows).collect();
        let mut sampler = MiniBatchSampler::new(self.batch_size);
        let mut grad_w = vec![0.0; x.cols];
        let mut prev_loss = self.objective(x, y, reg);
        let mut epochs = 0;
        let mut converged = false;

        while epochs < self.max_iter {
            for batch in sampler.sample(rng, &index) {
                let yhat: Vec<f64> = batch.iter().map(|&i| self.decision_function(x.get_row(i))).collect();
                let y_batch: Vec<f64> = batch.iter().map(|&i| y[i]).collect();
                let grad = LogLoss::calc_grad(&y_batch, &yhat);
                let b = batch.len() as f64;

                grad_w.iter_mut().zip(&self.weights).for_each(|(g, w)| *g = reg * w);
                let mut grad_b = 0.0;
                for (&i, g) in batch.iter().zip(&grad) {
                    grad_b += g / b;
                    for (gw, xv) in grad_w.iter_mut().zip(x.get_row(i)) {
                        if *xv != 0.0 {
                            *gw += g * xv / b;
                        }
                    }
                }

                self.weights.iter_mut().zip(&grad_w).for_each(|(w, g)| *w -= step * g);
                self.intercept -= step * grad_b;
            }
            epochs += 1;

            let loss = self.objective(x, y, reg);
            if (prev_loss - loss).abs() < self.tol {
                converged = true;
                break;
            }
            prev_loss = loss;
        }

        if !converged {
            debug!(
                "Logistic regression reached max_iter {} before the loss settled within {}.",
                self.max_iter, self.tol
            );
        }
        Ok(epochs)
    }

    /// Raw log-odds for a single record.
    #[inline]
    pub fn decision_function(&self, row: &[f64]) -> f64 {
        self.intercept + row.iter().zip(&self.weights).map(|(x, w)| x * w).sum::<f64>()
    }

    /// Probability of the positive class for every row of `x`.
    pub fn predict_proba(&self, x: &Matrix<f64>) -> Vec<f64> {
        (0..x.rows).map(|i| sigmoid(self.decision_function(x.get_row(i)))).collect()
    }

    fn objective(&self, x: &Matrix<f64>, y: &[f64], reg: f64) -> f64 {
        let yhat: Vec<f64> = (0..x.rows).map(|i| self.decision_function(x.get_row(i))).collect();
        let penalty = 0.5 * reg * self.weights.iter().map(|w| w * w).sum::<f64>();
        LogLoss::calc_loss(y, &yhat) + penalty
    }
}
