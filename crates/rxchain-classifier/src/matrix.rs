//! # Feature Matrix
//!
//! Dense, row-major `f64` matrix of samples. Shape is fixed at construction
//! and every entry is finite.

use serde::Serialize;

use crate::error::ClassifierError;

/// Row-major matrix of finite feature values.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeatureMatrix {
    rows: usize,
    cols: usize,
    data: Vec<f64>,
}

impl FeatureMatrix {
    /// Build a matrix from rows of equal, non-zero width.
    ///
    /// An empty row list yields a `0 x 0` matrix.
    ///
    /// # Errors
    ///
    /// `InvalidInput` for ragged rows, zero-width rows, or non-finite values.
    pub fn from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ClassifierError> {
        let cols = rows.first().map_or(0, |r| r.as_ref().len());
        if !rows.is_empty() && cols == 0 {
            return Err(ClassifierError::InvalidInput("rows must have at least one column".into()));
        }

        let mut data = Vec::with_capacity(rows.len() * cols);
        for (i, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != cols {
                return Err(ClassifierError::InvalidInput(format!(
                    "row {i} has {} columns, expected {cols}",
                    row.len()
                )));
            }
            if let Some(j) = row.iter().position(|v| !v.is_finite()) {
                return Err(ClassifierError::InvalidInput(format!(
                    "non-finite value at row {i}, column {j}"
                )));
            }
            data.extend_from_slice(row);
        }

        Ok(Self {
            rows: rows.len(),
            cols,
            data,
        })
    }

    /// Number of samples.
    pub fn rows(&self) -> usize {
        self.rows
    }

    /// Number of features per sample.
    pub fn cols(&self) -> usize {
        self.cols
    }

    /// Returns true if the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows == 0
    }

    /// Borrow row `i`.
    pub fn row(&self, i: usize) -> Option<&[f64]> {
        if i < self.rows {
            Some(&self.data[i * self.cols..(i + 1) * self.cols])
        } else {
            None
        }
    }

    /// Iterate rows in order.
    pub fn iter_rows(&self) -> impl Iterator<Item = &[f64]> {
        // max(1) keeps chunks() well-defined for the 0 x 0 matrix.
        self.data.chunks(self.cols.max(1))
    }

    /// New matrix holding the given rows, in the given order.
    pub(crate) fn select(&self, indices: &[usize]) -> Self {
        let mut data = Vec::with_capacity(indices.len() * self.cols);
        for &i in indices {
            data.extend_from_slice(&self.data[i * self.cols..(i + 1) * self.cols]);
        }
        Self {
            rows: indices.len(),
            cols: self.cols,
            data,
        }
    }

    /// Require exactly `expected` columns.
    pub fn ensure_cols(&self, expected: usize) -> Result<(), ClassifierError> {
        if self.cols != expected && !self.is_empty() {
            return Err(ClassifierError::InvalidInput(format!(
                "expected {expected} feature columns, got {}",
                self.cols
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_rows_shape() {
        let m = FeatureMatrix::from_rows(&[[6.0, 15.0], [8.0, 22.0], [4.0, 10.0]]).unwrap();
        assert_eq!(m.rows(), 3);
        assert_eq!(m.cols(), 2);
        assert_eq!(m.row(1), Some(&[8.0, 22.0][..]));
        assert_eq!(m.row(3), None);
        assert_eq!(m.iter_rows().count(), 3);
    }

    #[test]
    fn empty_input() {
        let m = FeatureMatrix::from_rows::<[f64; 2]>(&[]).unwrap();
        assert!(m.is_empty());
        assert_eq!(m.iter_rows().count(), 0);
        assert!(m.ensure_cols(2).is_ok());
    }

    #[test]
    fn ragged_rows_rejected() {
        let rows = vec![vec![1.0, 2.0], vec![3.0]];
        let err = FeatureMatrix::from_rows(&rows).unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidInput(_)));
    }

    #[test]
    fn zero_width_rejected() {
        let rows: Vec<Vec<f64>> = vec![vec![]];
        assert!(FeatureMatrix::from_rows(&rows).is_err());
    }

    #[test]
    fn non_finite_rejected() {
        assert!(FeatureMatrix::from_rows(&[[1.0, f64::NAN]]).is_err());
        assert!(FeatureMatrix::from_rows(&[[f64::INFINITY, 1.0]]).is_err());
    }

    #[test]
    fn ensure_cols_mismatch() {
        let m = FeatureMatrix::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
        assert!(m.ensure_cols(3).is_ok());
        assert!(matches!(m.ensure_cols(2), Err(ClassifierError::InvalidInput(_))));
    }

    #[test]
    fn select_reorders() {
        let m = FeatureMatrix::from_rows(&[[1.0], [2.0], [3.0]]).unwrap();
        let s = m.select(&[2, 0]);
        assert_eq!(s.rows(), 2);
        assert_eq!(s.row(0), Some(&[3.0][..]));
        assert_eq!(s.row(1), Some(&[1.0][..]));
    }
}
