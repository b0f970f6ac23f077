//! Feature Encoder
//!
//! Turns raw flow rows into fixed width numeric vectors and binary labels.
//! Each identity field (source address, destination address, source port,
//! destination port) is one-hot encoded over its distinct values in sorted
//! order, the blocks are concatenated, and the result is zero padded or
//! truncated to the configured width.
use crate::config::EvalConfig;
use crate::data::Dataset;
use crate::errors::EvalError;
use crate::reader::RawRecord;
use hashbrown::HashMap;
use log::{debug, warn};
use std::collections::BTreeSet;

const N_IDENTITY_FIELDS: usize = 4;

/// Category vocabulary learned from a capture.
#[derive(Debug, Clone, Default)]
pub struct OneHotEncoder {
    /// Per field, category to position within that field's block.
    vocab: Vec<HashMap<String, usize>>,
    /// Start of each field's block in the full one-hot vector.
    offsets: Vec<usize>,
    /// Total one-hot width before padding or truncation.
    width: usize,
}

impl OneHotEncoder {
    /// Learn the sorted distinct values of every identity field.
    pub fn fit(records: &[RawRecord]) -> Self {
        let mut categories: Vec<BTreeSet<&str>> = vec![BTreeSet::new(); N_IDENTITY_FIELDS];
        for r in records {
            for (set, v) in categories.iter_mut().zip(r.identity()) {
                set.insert(v);
            }
        }

        let mut vocab: Vec<HashMap<String, usize>> = Vec::with_capacity(N_IDENTITY_FIELDS);
        let mut offsets = Vec::with_capacity(N_IDENTITY_FIELDS);
        let mut width = 0;
        for set in categories {
            offsets.push(width);
            width += set.len();
            vocab.push(set.into_iter().enumerate().map(|(i, v)| (v.to_string(), i)).collect());
        }
        debug!("One-hot width {} from {} records.", width, records.len());

        OneHotEncoder { vocab, offsets, width }
    }

    /// One-hot width before padding or truncation.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Encode the records into a row major `records.len() x vector_size` buffer.
    /// Values not seen at fit time leave their block empty.
    pub fn transform(&self, records: &[RawRecord], vector_size: usize) -> Vec<f64> {
        if self.width > vector_size {
            warn!(
                "One-hot width {} exceeds vector_size {}, truncating.",
                self.width, vector_size
            );
        }
        let mut out = vec![0.0; records.len() * vector_size];
        for (row, r) in out.chunks_mut(vector_size.max(1)).zip(records) {
            for ((field_vocab, offset), v) in self.vocab.iter().zip(&self.offsets).zip(r.identity()) {
                if let Some(pos) = field_vocab.get(v) {
                    let col = offset + pos;
                    if col < vector_size {
                        row[col] = 1.0;
                    }
                }
            }
        }
        out
    }
}

/// 1.0 when the label names the attack class, ignoring case and surrounding whitespace.
pub fn encode_label(raw: &str, positive_label: &str) -> f64 {
    if raw.trim().eq_ignore_ascii_case(positive_label.trim()) {
        1.0
    } else {
        0.0
    }
}

/// Encode a capture into a `Dataset` of width `cfg.vector_size`.
pub fn encode_dataset(records: &[RawRecord], cfg: &EvalConfig) -> Result<Dataset, EvalError> {
    cfg.validate()?;
    let encoder = OneHotEncoder::fit(records);
    let features = encoder.transform(records, cfg.vector_size);
    let labels = records
        .iter()
        .map(|r| encode_label(&r.label, &cfg.positive_label))
        .collect();
    let sources = records.iter().map(|r| r.src_ip.clone()).collect();
    Dataset::new(features, records.len(), cfg.vector_size, labels, sources)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rec(src: &str, sport: &str, dst: &str, dport: &str, label: &str) -> RawRecord {
        RawRecord {
            src_ip: src.to_string(),
            src_port: sport.to_string(),
            dst_ip: dst.to_string(),
            dst_port: dport.to_string(),
            label: label.to_string(),
        }
    }

    fn records() -> Vec<RawRecord> {
        vec![
            rec("10.0.0.2", "80", "1.1.1.1", "443", "Syn"),
            rec("10.0.0.1", "80", "1.1.1.1", "53", "BENIGN"),
            rec("10.0.0.2", "81", "1.1.1.1", "443", " syn "),
        ]
    }

    #[test]
    fn test_fit_layout() {
        let enc = OneHotEncoder::fit(&records());
        // src_ip: 2, dst_ip: 1, src_port: 2, dst_port: 2
        assert_eq!(enc.width(), 7);
        assert_eq!(enc.offsets, vec![0, 2, 3, 5]);
    }

    #[test]
    fn test_transform_padded() {
        let recs = records();
        let enc = OneHotEncoder::fit(&recs);
        let x = enc.transform(&recs, 10);
        assert_eq!(x.len(), 30);
        // 10.0.0.2 sorts after 10.0.0.1, "443" sorts before "53".
        assert_eq!(&x[0..10], &[0., 1., 1., 1., 0., 1., 0., 0., 0., 0.]);
        assert_eq!(&x[10..20], &[1., 0., 1., 1., 0., 0., 1., 0., 0., 0.]);
        assert_eq!(x[20..30].iter().sum::<f64>(), 4.0);
    }

    #[test]
    fn test_transform_truncated() {
        let recs = records();
        let enc = OneHotEncoder::fit(&recs);
        let x = enc.transform(&recs, 3);
        assert_eq!(x.len(), 9);
        assert_eq!(&x[0..3], &[0., 1., 1.]);
    }

    #[test]
    fn test_unseen_values_encode_empty() {
        let enc = OneHotEncoder::fit(&records());
        let x = enc.transform(&[rec("9.9.9.9", "1", "8.8.8.8", "2", "Syn")], 7);
        assert!(x.iter().all(|v| *v == 0.0));
    }

    #[test]
    fn test_encode_label() {
        assert_eq!(encode_label("Syn", "SYN"), 1.0);
        assert_eq!(encode_label(" syn ", "SYN"), 1.0);
        assert_eq!(encode_label("BENIGN", "SYN"), 0.0);
        assert_eq!(encode_label("SYN-ACK", "SYN"), 0.0);
    }

    #[test]
    fn test_encode_dataset() {
        let cfg = EvalConfig::default().set_vector_size(16);
        let d = encode_dataset(&records(), &cfg).unwrap();
        assert_eq!(d.rows(), 3);
        assert_eq!(d.cols(), 16);
        assert_eq!(d.labels(), &[1., 0., 1.]);
        assert_eq!(d.sources()[1], "10.0.0.1");
    }
}
