//! # Logistic Regression
//!
//! Binary logistic regression fit by full-batch gradient descent on the
//! L2-regularized mean log-loss:
//!
//! ```text
//! J(w, b) = (1/n) * sum(logloss(sigmoid(w.x_i + b), y_i)) + (l2 / 2n) * |w|^2
//! ```
//!
//! Features are standardized with the training split's mean and population
//! standard deviation. A constant column gets a scale of 1. The bias is not
//! penalized. A sample is `Misuse` iff its probability is at least 0.5.

use serde::{Deserialize, Serialize};

use crate::config::TrainingConfig;
use crate::dataset::{train_test_split, Dataset, Label};
use crate::error::ClassifierError;
use crate::matrix::FeatureMatrix;
use crate::traits::Classifier;

/// Decision threshold on the predicted probability.
pub const DECISION_THRESHOLD: f64 = 0.5;

/// Logistic regression trainer.
#[derive(Debug, Clone, Default)]
pub struct LogisticRegression {
    config: TrainingConfig,
}

impl LogisticRegression {
    /// Trainer with the given hyperparameters.
    pub fn new(config: TrainingConfig) -> Self {
        Self { config }
    }
}

/// Fitted parameters, in standardized feature space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogisticModel {
    weights: Vec<f64>,
    bias: f64,
    means: Vec<f64>,
    scales: Vec<f64>,
    holdout_accuracy: f64,
}

impl LogisticModel {
    /// One weight per feature, applied to standardized values.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// Intercept.
    pub fn bias(&self) -> f64 {
        self.bias
    }

    /// Fraction of held-out rows classified correctly.
    pub fn holdout_accuracy(&self) -> f64 {
        self.holdout_accuracy
    }

    /// Number of features the model expects.
    pub fn feature_count(&self) -> usize {
        self.weights.len()
    }

    /// Probability that `row` is `Misuse`.
    pub fn probability(&self, row: &[f64]) -> Result<f64, ClassifierError> {
        if row.len() != self.feature_count() {
            return Err(ClassifierError::InvalidInput(format!(
                "expected {} features, got {}",
                self.feature_count(),
                row.len()
            )));
        }
        Ok(self.score(row))
    }

    /// Label for `row`, which must already have the right width.
    fn classify(&self, row: &[f64]) -> Label {
        if self.score(row) >= DECISION_THRESHOLD {
            Label::Misuse
        } else {
            Label::Legitimate
        }
    }

    fn score(&self, row: &[f64]) -> f64 {
        let z = row
            .iter()
            .zip(&self.means)
            .zip(&self.scales)
            .zip(&self.weights)
            .map(|(((x, m), s), w)| w * (x - m) / s)
            .sum::<f64>()
            + self.bias;
        sigmoid(z)
    }
}

impl Classifier for LogisticRegression {
    type Model = LogisticModel;

    /// Split `dataset` per the config, fit on the training side, and measure
    /// accuracy on the held-out side.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` for out-of-range hyperparameters. `InvalidInput` if
    /// the split fails or the training side has only one class.
    fn train(&self, dataset: &Dataset) -> Result<LogisticModel, ClassifierError> {
        self.config.validate()?;
        let split = train_test_split(dataset, self.config.test_fraction, self.config.seed)?;
        let train = &split.train;
        if train.count(Label::Legitimate) == 0 || train.count(Label::Misuse) == 0 {
            return Err(ClassifierError::InvalidInput(
                "training split must contain both classes".into(),
            ));
        }

        let (means, scales) = standardization(train.features());
        let standardized: Vec<Vec<f64>> = train
            .features()
            .iter_rows()
            .map(|row| {
                row.iter()
                    .zip(&means)
                    .zip(&scales)
                    .map(|((x, m), s)| (x - m) / s)
                    .collect()
            })
            .collect();
        let targets: Vec<f64> = train
            .labels()
            .iter()
            .map(|l| f64::from(l.as_u8()))
            .collect();

        let (weights, bias) = gradient_descent(&standardized, &targets, &self.config);

        let mut model = LogisticModel {
            weights,
            bias,
            means,
            scales,
            holdout_accuracy: 0.0,
        };
        model.holdout_accuracy = accuracy(&model, &split.test);

        tracing::info!(
            train_rows = train.len(),
            test_rows = split.test.len(),
            seed = self.config.seed,
            holdout_accuracy = model.holdout_accuracy,
            "trained logistic regression"
        );
        tracing::debug!(weights = ?model.weights, bias = model.bias, "fitted parameters");

        Ok(model)
    }

    fn predict(
        &self,
        model: &LogisticModel,
        samples: &FeatureMatrix,
    ) -> Result<Vec<Label>, ClassifierError> {
        samples.ensure_cols(model.feature_count())?;
        Ok(samples.iter_rows().map(|row| model.classify(row)).collect())
    }
}

fn sigmoid(z: f64) -> f64 {
    1.0 / (1.0 + (-z).exp())
}

/// Per-column mean and population standard deviation.
fn standardization(features: &FeatureMatrix) -> (Vec<f64>, Vec<f64>) {
    let n = features.rows() as f64;
    let cols = features.cols();
    let mut means = vec![0.0; cols];
    for row in features.iter_rows() {
        for (m, x) in means.iter_mut().zip(row) {
            *m += x / n;
        }
    }
    let mut scales = vec![0.0; cols];
    for row in features.iter_rows() {
        for ((s, x), m) in scales.iter_mut().zip(row).zip(&means) {
            *s += (x - m).powi(2) / n;
        }
    }
    for s in &mut scales {
        *s = s.sqrt();
        if *s == 0.0 {
            *s = 1.0;
        }
    }
    (means, scales)
}

fn gradient_descent(rows: &[Vec<f64>], targets: &[f64], config: &TrainingConfig) -> (Vec<f64>, f64) {
    let n = rows.len() as f64;
    let cols = rows.first().map_or(0, Vec::len);
    let mut weights = vec![0.0; cols];
    let mut bias = 0.0;

    for _ in 0..config.epochs {
        let mut grad_w = vec![0.0; cols];
        let mut grad_b = 0.0;
        for (row, y) in rows.iter().zip(targets) {
            let z = row.iter().zip(&weights).map(|(x, w)| x * w).sum::<f64>() + bias;
            let err = sigmoid(z) - y;
            for (g, x) in grad_w.iter_mut().zip(row) {
                *g += err * x;
            }
            grad_b += err;
        }
        for (w, g) in weights.iter_mut().zip(&grad_w) {
            *w -= config.learning_rate * (g + config.l2_penalty * *w) / n;
        }
        bias -= config.learning_rate * grad_b / n;
    }

    (weights, bias)
}

fn accuracy(model: &LogisticModel, dataset: &Dataset) -> f64 {
    if dataset.is_empty() {
        return 0.0;
    }
    let correct = dataset
        .features()
        .iter_rows()
        .zip(dataset.labels())
        .filter(|(row, label)| model.classify(row) == **label)
        .count();
    correct as f64 / dataset.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    fn trained() -> (LogisticRegression, LogisticModel) {
        let clf = LogisticRegression::default();
        let model = clf
            .train(&Dataset::synthetic_prescriptions().unwrap())
            .unwrap();
        (clf, model)
    }

    #[test]
    fn flags_high_volume_and_passes_low_volume() {
        let (clf, model) = trained();
        let samples = FeatureMatrix::from_rows(&[[8.0, 22.0], [4.0, 10.0]]).unwrap();
        let labels = clf.predict(&model, &samples).unwrap();
        assert_eq!(labels, vec![Label::Misuse, Label::Legitimate]);
    }

    #[test]
    fn one_label_per_row_in_order() {
        let (clf, model) = trained();
        let samples =
            FeatureMatrix::from_rows(&[[6.0, 15.0], [8.0, 22.0], [4.0, 10.0], [9.0, 30.0]])
                .unwrap();
        let labels = clf.predict(&model, &samples).unwrap();
        assert_eq!(labels.len(), 4);
        assert!(labels.iter().all(|l| l.as_u8() <= 1));
        assert_eq!(labels[3], Label::Misuse);
    }

    #[test]
    fn training_is_deterministic() {
        let (_, a) = trained();
        let (_, b) = trained();
        assert_eq!(a, b);
    }

    #[test]
    fn predict_is_repeatable() {
        let (clf, model) = trained();
        let samples = FeatureMatrix::from_rows(&[[6.0, 15.0], [3.0, 7.0]]).unwrap();
        let first = clf.predict(&model, &samples).unwrap();
        let second = clf.predict(&model, &samples).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn weights_are_positive_for_monotone_features() {
        let (_, model) = trained();
        assert_eq!(model.weights().len(), 2);
        assert!(model.weights().iter().all(|w| *w > 0.0));
        assert!(model.bias().is_finite());
        assert!((0.0..=1.0).contains(&model.holdout_accuracy()));
    }

    #[test]
    fn wrong_column_count_rejected() {
        let (clf, model) = trained();
        let samples = FeatureMatrix::from_rows(&[[1.0, 2.0, 3.0]]).unwrap();
        assert!(matches!(
            clf.predict(&model, &samples),
            Err(ClassifierError::InvalidInput(_))
        ));
        assert!(model.probability(&[1.0]).is_err());
    }

    #[test]
    fn empty_samples_yield_no_labels() {
        let (clf, model) = trained();
        let samples = FeatureMatrix::from_rows::<[f64; 2]>(&[]).unwrap();
        assert!(clf.predict(&model, &samples).unwrap().is_empty());
    }

    #[test]
    fn probability_matches_decision() {
        let (_, model) = trained();
        let p_high = model.probability(&[9.0, 30.0]).unwrap();
        let p_low = model.probability(&[2.0, 5.0]).unwrap();
        assert!(p_high >= DECISION_THRESHOLD);
        assert!(p_low < DECISION_THRESHOLD);
        assert!(p_high > p_low);
    }

    #[test]
    fn single_class_training_rejected() {
        let ds = Dataset::from_labeled_rows(&[
            [1.0, 1.0, 0.0],
            [2.0, 2.0, 0.0],
            [3.0, 3.0, 0.0],
            [4.0, 4.0, 0.0],
            [5.0, 5.0, 0.0],
        ])
        .unwrap();
        assert!(matches!(
            LogisticRegression::default().train(&ds),
            Err(ClassifierError::InvalidInput(_))
        ));
    }

    #[test]
    fn invalid_config_rejected_before_training() {
        let clf = LogisticRegression::new(TrainingConfig {
            epochs: 0,
            ..TrainingConfig::default()
        });
        let err = clf
            .train(&Dataset::synthetic_prescriptions().unwrap())
            .unwrap_err();
        assert!(matches!(err, ClassifierError::InvalidConfig(_)));
    }

    #[test]
    fn model_survives_json() {
        let (clf, model) = trained();
        let json = serde_json::to_string(&model).unwrap();
        let back: LogisticModel = serde_json::from_str(&json).unwrap();
        let samples = FeatureMatrix::from_rows(&[[8.0, 22.0], [4.0, 10.0]]).unwrap();
        assert_eq!(
            clf.predict(&model, &samples).unwrap(),
            clf.predict(&back, &samples).unwrap()
        );
    }

    #[test]
    fn constant_column_gets_unit_scale() {
        let m = FeatureMatrix::from_rows(&[[1.0, 5.0], [3.0, 5.0]]).unwrap();
        let (means, scales) = standardization(&m);
        assert_eq!(means, vec![2.0, 5.0]);
        assert_eq!(scales, vec![1.0, 1.0]);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn labels_match_row_count(
                rows in proptest::collection::vec((0.0f64..50.0, 0.0f64..100.0), 0..20),
            ) {
                let (clf, model) = trained();
                let rows: Vec<[f64; 2]> = rows.into_iter().map(|(a, b)| [a, b]).collect();
                let samples = FeatureMatrix::from_rows(&rows).unwrap();
                let labels = clf.predict(&model, &samples).unwrap();
                prop_assert_eq!(labels.len(), rows.len());
            }
        }
    }
}
