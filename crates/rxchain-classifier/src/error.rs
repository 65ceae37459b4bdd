use thiserror::Error;

/// Error raised by training or prediction.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ClassifierError {
    /// Input shape or content is unusable: ragged rows, wrong column
    /// count, non-finite values, label/row count mismatch, or a training
    /// set with a single class.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// A training hyperparameter is out of range.
    #[error("invalid training config: {0}")]
    InvalidConfig(String),
}
