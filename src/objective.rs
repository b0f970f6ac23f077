//! Log loss
//!
//! Loss, gradient and starting value of the binary cross entropy on raw
//! log-odds predictions.

#[inline]
pub fn sigmoid(v: f64) -> f64 {
    1.0 / (1.0 + (-v).exp())
}

#[derive(Default)]
pub struct LogLoss {}

impl LogLoss {
    /// Mean loss of the log-odds `yhat` against `y`.
    #[inline]
    pub fn calc_loss(y: &[f64], yhat: &[f64]) -> f64 {
        if y.is_empty() {
            return 0.0;
        }
        let total = y
            .iter()
            .zip(yhat)
            .map(|(y_, yhat_)| {
                // log(1 + e^z) - y z, written to stay finite for large |z|
                let z = *yhat_;
                let softplus = if z > 0.0 { z + (-z).exp().ln_1p() } else { z.exp().ln_1p() };
                softplus - *y_ * z
            })
            .sum::<f64>();
        total / y.len() as f64
    }

    /// Per record gradient of the loss with respect to the log-odds.
    #[inline]
    pub fn calc_grad(y: &[f64], yhat: &[f64]) -> Vec<f64> {
        y.iter().zip(yhat).map(|(y_, yhat_)| sigmoid(*yhat_) - *y_).collect()
    }

    /// Smoothed log-odds of the positive rate. Finite even when only one
    /// class is present.
    pub fn calc_init(y: &[f64]) -> f64 {
        let ytot = y.iter().sum::<f64>();
        let ntot = y.len() as f64;
        f64::ln((ytot + 0.5) / (ntot - ytot + 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::precision_round;

    #[test]
    fn test_log_loss() {
        let y = vec![1., 0., 1., 0.];
        let yhat = vec![0.0, 0.0, 2.0, -2.0];
        let res = LogLoss::calc_loss(&y, &yhat);
        // (2 * ln 2 + 2 * ln(1 + e^-2)) / 4
        assert_eq!(precision_round(res, 5), 0.41004);
    }

    #[test]
    fn test_log_loss_extreme_logits() {
        let res = LogLoss::calc_loss(&[1., 0.], &[800., -800.]);
        assert!(res.is_finite());
        assert_eq!(res, 0.0);
    }

    #[test]
    fn test_grad() {
        let g = LogLoss::calc_grad(&[1., 0.], &[0., 0.]);
        assert_eq!(g, vec![-0.5, 0.5]);
    }

    #[test]
    fn test_init_single_class() {
        assert!(LogLoss::calc_init(&[0.; 10]) < 0.0);
        assert!(LogLoss::calc_init(&[1.; 10]) > 0.0);
        assert_eq!(LogLoss::calc_init(&[0., 1.]), 0.0);
        assert!(LogLoss::calc_init(&[]).is_finite());
    }
}
