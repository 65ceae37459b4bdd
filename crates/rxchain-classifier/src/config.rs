use serde::{Deserialize, Serialize};

use crate::error::ClassifierError;

/// Hyperparameters for [`LogisticRegression`](crate::LogisticRegression).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrainingConfig {
    /// Fraction of rows held out for evaluation, in (0, 1).
    pub test_fraction: f64,
    /// Seed for the train/test shuffle.
    pub seed: u64,
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Full-batch gradient steps.
    pub epochs: u32,
    /// L2 penalty strength, applied to weights only.
    pub l2_penalty: f64,
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            test_fraction: 0.2,
            seed: 42,
            learning_rate: 0.1,
            epochs: 2000,
            l2_penalty: 1.0,
        }
    }
}

impl TrainingConfig {
    /// Check every field's range.
    pub fn validate(&self) -> Result<(), ClassifierError> {
        let mut errors = Vec::new();
        if !(self.test_fraction > 0.0 && self.test_fraction < 1.0) {
            errors.push(format!("test_fraction ({}) must be in (0, 1)", self.test_fraction));
        }
        if !(self.learning_rate.is_finite() && self.learning_rate > 0.0) {
            errors.push(format!("learning_rate ({}) must be > 0", self.learning_rate));
        }
        if self.epochs == 0 {
            errors.push("epochs must be > 0".to_string());
        }
        if !(self.l2_penalty.is_finite() && self.l2_penalty >= 0.0) {
            errors.push(format!("l2_penalty ({}) must be >= 0", self.l2_penalty));
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(ClassifierError::InvalidConfig(errors.join("; ")))
        }
    }
}
