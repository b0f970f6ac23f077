use crate::constants::ENTROPY_EPS;
use hashbrown::HashMap;

/// Counts of the 2x2 confusion matrix of binary predictions.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ConfusionMatrix {
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
    pub true_positive: usize,
}

impl ConfusionMatrix {
    pub fn new(y: &[f64], yhat: &[f64]) -> Self {
        let mut cm = ConfusionMatrix::default();
        for (y_, yhat_) in y.iter().zip(yhat) {
            match (*y_ == 1.0, *yhat_ == 1.0) {
                (false, false) => cm.true_negative += 1,
                (false, true) => cm.false_positive += 1,
                (true, false) => cm.false_negative += 1,
                (true, true) => cm.true_positive += 1,
            }
        }
        cm
    }

    pub fn total(&self) -> usize {
        self.true_negative + self.false_positive + self.false_negative + self.true_positive
    }

    /// `FP / (FP + TN)`, undefined without negative ground truth.
    pub fn false_positive_rate(&self) -> Option<f64> {
        let negatives = self.false_positive + self.true_negative;
        if negatives == 0 {
            None
        } else {
            Some(self.false_positive as f64 / negatives as f64)
        }
    }

    /// Fraction of correct predictions, undefined for an empty corpus.
    pub fn accuracy(&self) -> Option<f64> {
        let total = self.total();
        if total == 0 {
            None
        } else {
            Some((self.true_negative + self.true_positive) as f64 / total as f64)
        }
    }
}

fn trapezoid_area(x0: f64, x1: f64, y0: f64, y1: f64) -> f64 {
    (x0 - x1).abs() * (y0 + y1) * 0.5
}

/// Weighted ROC AUC of the scores `yhat`. NaN when either class is absent.
pub fn roc_auc_score(y: &[f64], yhat: &[f64], sample_weight: &[f64]) -> f64 {
    if y.is_empty() {
        return f64::NAN;
    }
    let mut indices = (0..y.len()).collect::<Vec<_>>();
    indices.sort_unstable_by(|&a, &b| yhat[b].total_cmp(&yhat[a]));
    let mut auc: f64 = 0.0;

    let mut label = y[indices[0]];
    let mut w = sample_weight[indices[0]];
    let mut fp = (1.0 - label) * w;
    let mut tp: f64 = label * w;
    let mut tp_prev: f64 = 0.0;
    let mut fp_prev: f64 = 0.0;

    for i in 1..indices.len() {
        if yhat[indices[i]] != yhat[indices[i - 1]] {
            auc += trapezoid_area(fp_prev, fp, tp_prev, tp);
            tp_prev = tp;
            fp_prev = fp;
        }
        label = y[indices[i]];
        w = sample_weight[indices[i]];
        fp += (1.0 - label) * w;
        tp += label * w;
    }

    auc += trapezoid_area(fp_prev, fp, tp_prev, tp);
    if fp <= 0.0 || tp <= 0.0 {
        auc = 0.0;
        fp = 0.0;
        tp = 0.0;
    }

    auc / (tp * fp)
}

/// AUC of thresholded 0/1 predictions against the ground truth.
///
/// The predictions are used as the ranking score directly, so the curve has
/// a single interior point and the result is `(TPR + 1 - FPR) / 2`.
/// `None` when only one class is present.
pub fn binary_auc(y: &[f64], predictions: &[f64]) -> Option<f64> {
    let sample_weight = vec![1.0; y.len()];
    let auc = roc_auc_score(y, predictions, &sample_weight);
    if auc.is_nan() {
        None
    } else {
        Some(auc)
    }
}

/// Shannon entropy in bits of the empirical distribution of `values`.
///
/// Frequencies are offset by a small constant inside the logarithm. An
/// empty input has zero entropy.
pub fn shannon_entropy<'a, I>(values: I) -> f64
where
    I: IntoIterator<Item = &'a str>,
{
    let mut counts: HashMap<&str, usize> = HashMap::new();
    let mut total = 0usize;
    for v in values {
        *counts.entry(v).or_insert(0) += 1;
        total += 1;
    }
    if total == 0 {
        return 0.0;
    }
    // Sum in a fixed order so repeated runs agree to the bit.
    let mut freqs: Vec<usize> = counts.into_values().collect();
    freqs.sort_unstable();
    -freqs
        .into_iter()
        .map(|c| {
            let p = c as f64 / total as f64;
            p * (p + ENTROPY_EPS).log2()
        })
        .sum::<f64>()
}

/// Entropy of the attack records' sources minus entropy of all sources.
/// Negative when attack traffic concentrates on fewer sources.
pub fn entropy_drift(sources: &[String], y: &[f64]) -> f64 {
    let h_all = shannon_entropy(sources.iter().map(String::as_str));
    let h_attack = shannon_entropy(
        sources
            .iter()
            .zip(y)
            .filter(|(_, y_)| **y_ == 1.0)
            .map(|(s, _)| s.as_str()),
    );
    h_attack - h_all
}

/// Attack records per benign record, the denominator floored at 1.
pub fn imbalance_ratio(y: &[f64]) -> f64 {
    let positives = y.iter().filter(|v| **v == 1.0).count();
    let negatives = y.len() - positives;
    positives as f64 / usize::max(negatives, 1) as f64
}
