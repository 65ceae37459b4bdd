use crate::dataset::{Dataset, Label};
use crate::error::ClassifierError;
use crate::matrix::FeatureMatrix;

/// A trainable binary classifier.
///
/// Implementations are stateless; the fitted parameters live in
/// [`Classifier::Model`], so one classifier can produce many models.
pub trait Classifier {
    /// Fitted parameters.
    type Model;

    /// Fit a model to `dataset`.
    fn train(&self, dataset: &Dataset) -> Result<Self::Model, ClassifierError>;

    /// One label per row of `samples`, in row order.
    fn predict(
        &self,
        model: &Self::Model,
        samples: &FeatureMatrix,
    ) -> Result<Vec<Label>, ClassifierError>;
}
