//! # Labeled Datasets
//!
//! A [`Dataset`] pairs a [`FeatureMatrix`] with one [`Label`] per row.
//! [`train_test_split`] holds out a seeded random subset for evaluation.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;
use crate::matrix::FeatureMatrix;

/// Binary class of a prescription sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum Label {
    /// Class 0: ordinary use.
    Legitimate = 0,
    /// Class 1: potential misuse.
    Misuse = 1,
}

impl Label {
    /// Numeric class value.
    pub fn as_u8(self) -> u8 {
        self as u8
    }

    /// Parse a numeric class value.
    pub fn from_u8(value: u8) -> Result<Self, ClassifierError> {
        match value {
            0 => Ok(Self::Legitimate),
            1 => Ok(Self::Misuse),
            other => Err(ClassifierError::InvalidInput(format!(
                "label must be 0 or 1, got {other}"
            ))),
        }
    }
}

/// Features and their labels.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Dataset {
    features: FeatureMatrix,
    labels: Vec<Label>,
}

impl Dataset {
    /// Pair a matrix with its labels.
    ///
    /// # Errors
    ///
    /// `InvalidInput` if the label count differs from the row count.
    pub fn new(features: FeatureMatrix, labels: Vec<Label>) -> Result<Self, ClassifierError> {
        if features.rows() != labels.len() {
            return Err(ClassifierError::InvalidInput(format!(
                "{} feature rows but {} labels",
                features.rows(),
                labels.len()
            )));
        }
        Ok(Self { features, labels })
    }

    /// Build from rows whose last column is the label (0.0 or 1.0).
    pub fn from_labeled_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self, ClassifierError> {
        let mut features = Vec::with_capacity(rows.len());
        let mut labels = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let (label, feats) = row.as_ref().split_last().ok_or_else(|| {
                ClassifierError::InvalidInput(format!("row {i} is empty"))
            })?;
            let label = match *label {
                l if l == 0.0 => Label::Legitimate,
                l if l == 1.0 => Label::Misuse,
                l => {
                    return Err(ClassifierError::InvalidInput(format!(
                        "row {i}: label must be 0 or 1, got {l}"
                    )))
                }
            };
            features.push(feats);
            labels.push(label);
        }
        Self::new(FeatureMatrix::from_rows(&features)?, labels)
    }

    /// The fixed synthetic training set.
    ///
    /// Columns: `[number_of_prescriptions, dosage, misuse_label]`.
    pub fn synthetic_prescriptions() -> Result<Self, ClassifierError> {
        const ROWS: [[f64; 3]; 8] = [
            [5.0, 10.0, 0.0],
            [3.0, 5.0, 0.0],
            [8.0, 20.0, 1.0],
            [4.0, 15.0, 0.0],
            [6.0, 18.0, 1.0],
            [7.0, 25.0, 1.0],
            [2.0, 5.0, 0.0],
            [9.0, 30.0, 1.0],
        ];
        Self::from_labeled_rows(&ROWS)
    }

    /// The feature matrix.
    pub fn features(&self) -> &FeatureMatrix {
        &self.features
    }

    /// One label per feature row.
    pub fn labels(&self) -> &[Label] {
        &self.labels
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.labels.len()
    }

    /// Returns true if the dataset has no samples.
    pub fn is_empty(&self) -> bool {
        self.labels.is_empty()
    }

    /// Count of samples in `label`'s class.
    pub fn count(&self, label: Label) -> usize {
        self.labels.iter().filter(|&&l| l == label).count()
    }

    fn select(&self, indices: &[usize]) -> Self {
        Self {
            features: self.features.select(indices),
            labels: indices.iter().map(|&i| self.labels[i]).collect(),
        }
    }
}

/// The two halves of a train/test split.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Split {
    /// Rows to fit on.
    pub train: Dataset,
    /// Held-out rows.
    pub test: Dataset,
}

/// Shuffle row indices with a seeded RNG and hold out
/// `ceil(len * test_fraction)` rows.
///
/// The same `(dataset, test_fraction, seed)` always yields the same split.
///
/// # Errors
///
/// `InvalidInput` if `test_fraction` is not strictly between 0 and 1, or if
/// either side of the split would be empty.
pub fn train_test_split(
    dataset: &Dataset,
    test_fraction: f64,
    seed: u64,
) -> Result<Split, ClassifierError> {
    if !(test_fraction > 0.0 && test_fraction < 1.0) {
        return Err(ClassifierError::InvalidInput(format!(
            "test fraction must be in (0, 1), got {test_fraction}"
        )));
    }

    let n = dataset.len();
    let test_len = (n as f64 * test_fraction).ceil() as usize;
    if test_len == 0 || test_len >= n {
        return Err(ClassifierError::InvalidInput(format!(
            "cannot split {n} rows with test fraction {test_fraction}"
        )));
    }

    let mut indices: Vec<usize> = (0..n).collect();
    let mut rng = StdRng::seed_from_u64(seed);
    indices.shuffle(&mut rng);

    let (test_idx, train_idx) = indices.split_at(test_len);
    Ok(Split {
        train: dataset.select(train_idx),
        test: dataset.select(test_idx),
    })
}
