//! Data
//!
//! In-memory containers for the encoded capture.
use crate::errors::EvalError;

/// Contiguous row major matrix view.
///
/// Rows of the capture are stored back to back, so the records of a window
/// are a single contiguous sub-slice of the corpus buffer.
///
/// # Type Parameters
/// * `T` - The numeric type of the data (e.g., `f32`, `f64`).
#[derive(Debug, Clone, Copy)]
pub struct Matrix<'a, T> {
    /// The raw data stored in a single slice.
    pub data: &'a [T],
    /// Number of rows in the matrix.
    pub rows: usize,
    /// Number of columns in the matrix.
    pub cols: usize,
}

impl<'a, T> Matrix<'a, T> {
    /// Create a new Matrix.
    pub fn new(data: &'a [T], rows: usize, cols: usize) -> Self {
        Matrix { data, rows, cols }
    }

    /// Get a single reference to an item in the matrix.
    ///
    /// * `i` - The ith row of the data to get.
    /// * `j` - the jth column of the data to get.
    pub fn get(&self, i: usize, j: usize) -> &T {
        &self.data[i * self.cols + j]
    }

    /// Get a row of the matrix as a slice.
    pub fn get_row(&self, row: usize) -> &'a [T] {
        let start = row * self.cols;
        &self.data[start..start + self.cols]
    }

    /// View of the rows `[start, stop)`.
    pub fn slice_rows(&self, start: usize, stop: usize) -> Matrix<'a, T> {
        Matrix {
            data: &self.data[start * self.cols..stop * self.cols],
            rows: stop - start,
            cols: self.cols,
        }
    }
}

/// The encoded capture, resident in memory and immutable once built.
///
/// Row `i` of `features`, `labels[i]` and `sources[i]` describe the same
/// record. Row order is the order latency is measured against.
#[derive(Debug, Clone)]
pub struct Dataset {
    features: Vec<f64>,
    labels: Vec<f64>,
    sources: Vec<String>,
    rows: usize,
    cols: usize,
}

impl Dataset {
    /// Build a dataset from a row major feature buffer.
    ///
    /// * `features` - `rows * cols` values, row major.
    /// * `labels` - One ground truth value per row, 0 or 1.
    /// * `sources` - Source identity of each row, used for entropy.
    pub fn new(
        features: Vec<f64>,
        rows: usize,
        cols: usize,
        labels: Vec<f64>,
        sources: Vec<String>,
    ) -> Result<Self, EvalError> {
        if features.len() != rows * cols {
            return Err(EvalError::ShapeMismatch(
                "features".to_string(),
                rows * cols,
                features.len(),
            ));
        }
        if labels.len() != rows {
            return Err(EvalError::ShapeMismatch("labels".to_string(), rows, labels.len()));
        }
        if sources.len() != rows {
            return Err(EvalError::ShapeMismatch("sources".to_string(), rows, sources.len()));
        }
        if let Some((row, v)) = labels.iter().enumerate().find(|(_, v)| **v != 0.0 && **v != 1.0) {
            return Err(EvalError::InvalidLabel(row, *v));
        }
        Ok(Dataset {
            features,
            labels,
            sources,
            rows,
            cols,
        })
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Full feature matrix.
    pub fn matrix(&self) -> Matrix<'_, f64> {
        Matrix::new(&self.features, self.rows, self.cols)
    }

    pub fn labels(&self) -> &[f64] {
        &self.labels
    }

    pub fn sources(&self) -> &[String] {
        &self.sources
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_matrix_rows() {
        let v = vec![1., 2., 3., 4., 5., 6.];
        let m = Matrix::new(&v, 3, 2);
        assert_eq!(m.get_row(1), &[3., 4.]);
        assert_eq!(*m.get(2, 1), 6.);
        let s = m.slice_rows(1, 3);
        assert_eq!(s.rows, 2);
        assert_eq!(s.get_row(0), &[3., 4.]);
        assert_eq!(*s.get(1, 0), 5.);
    }

    #[test]
    fn test_dataset_shape_checks() {
        let srcs = vec!["a".to_string(), "b".to_string()];
        assert!(Dataset::new(vec![0.; 4], 2, 2, vec![0., 1.], srcs.clone()).is_ok());
        assert!(matches!(
            Dataset::new(vec![0.; 3], 2, 2, vec![0., 1.], srcs.clone()),
            Err(EvalError::ShapeMismatch(_, 4, 3))
        ));
        assert!(matches!(
            Dataset::new(vec![0.; 4], 2, 2, vec![0.], srcs.clone()),
            Err(EvalError::ShapeMismatch(_, 2, 1))
        ));
        assert!(matches!(
            Dataset::new(vec![0.; 4], 2, 2, vec![0., 2.], srcs),
            Err(EvalError::InvalidLabel(1, _))
        ));
    }

    #[test]
    fn test_empty_dataset() {
        let d = Dataset::new(Vec::new(), 0, 8, Vec::new(), Vec::new()).unwrap();
        assert!(d.is_empty());
        assert_eq!(d.cols(), 8);
    }
}
