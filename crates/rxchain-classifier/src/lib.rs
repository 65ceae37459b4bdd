//! # rxchain-classifier — Prescription Misuse Classifier
//!
//! A small binary classifier screening prescriptions before they are
//! recorded. Features are `[number_of_prescriptions, dosage]`; the label is
//! [`Label::Legitimate`] (0) or [`Label::Misuse`] (1).
//!
//! - **Matrix** (`matrix.rs`): row-major, finite-valued feature storage.
//! - **Dataset** (`dataset.rs`): labels, the fixed synthetic training set,
//!   and a seeded train/test split.
//! - **Config** (`config.rs`): training hyperparameters with defaults.
//! - **Logistic** (`logistic.rs`): L2-regularized logistic regression, the
//!   default [`Classifier`].
//!
//! Training is deterministic for a given [`TrainingConfig::seed`].
//! This crate has no knowledge of the chain.

pub mod config;
pub mod dataset;
pub mod error;
pub mod logistic;
pub mod matrix;
pub mod traits;

pub use config::TrainingConfig;
pub use dataset::{train_test_split, Dataset, Label, Split};
pub use error::ClassifierError;
pub use logistic::{LogisticModel, LogisticRegression, DECISION_THRESHOLD};
pub use matrix::FeatureMatrix;
pub use traits::Classifier;
