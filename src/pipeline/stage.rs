//! Stage traits for pipeline composition.
//!
//! Two object-safe traits split stage capabilities at the type level:
//! - [`TransformStage`]: every non-terminal stage; fits to data and produces
//!   transformed features for the next stage.
//! - [`TerminalStage`]: the final stage; fits to the fully transformed
//!   features and produces predictions rather than further features.
//!
//! Because capabilities are trait-encoded, a composition whose non-terminal
//! stage cannot transform is unrepresentable; no runtime probing happens.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::pipeline::error::PipelineError;

/// A non-terminal processing stage: learns parameters from data and
/// transforms features for the next stage.
///
/// Fitting mutates the stage's internal state in place; a stage starts
/// unfitted and `transform` on an unfitted stage fails with
/// [`PipelineError::NotFitted`].
///
/// Stages that have no use for labels receive them anyway and ignore them.
pub trait TransformStage<B: Backend> {
    /// Fit the stage to the training data, replacing any previously learned
    /// state.
    ///
    /// # Errors
    /// Returns [`PipelineError`] if the data is empty, contains unexpected
    /// invalid values, or is otherwise incompatible with the stage.
    fn fit(
        &mut self,
        features: &Tensor2D<B>,
        labels: Option<&Tensor1D<B>>,
    ) -> Result<(), PipelineError>;

    /// Transform features using the learned parameters.
    ///
    /// # Errors
    /// [`PipelineError::NotFitted`] before a successful fit;
    /// [`PipelineError::FeatureMismatch`] if the column count differs from
    /// the fitted data.
    fn transform(&self, features: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError>;

    /// Whether the stage has been fitted.
    fn is_fitted(&self) -> bool;

    /// Stable kind identifier, used for diagnostics and persistence dispatch.
    fn kind(&self) -> &'static str;

    /// Serialize the learned parameters to bytes.
    ///
    /// # Errors
    /// [`PipelineError::NotFitted`] before a successful fit.
    fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError>;

    /// Restore learned parameters from bytes, leaving the stage fitted.
    fn params_from_bytes(&mut self, bytes: &[u8]) -> Result<(), PipelineError>;
}

/// The terminal stage of a pipeline: consumes the final transformed features
/// and produces predictions.
pub trait TerminalStage<B: Backend> {
    /// Fit the stage on the final transformed features and the original
    /// labels.
    ///
    /// # Errors
    /// Returns [`PipelineError`] if the data is empty or the stage requires
    /// labels and none were provided.
    fn fit(
        &mut self,
        features: &Tensor2D<B>,
        labels: Option<&Tensor1D<B>>,
    ) -> Result<(), PipelineError>;

    /// Predict one value per input row using the learned parameters.
    ///
    /// # Errors
    /// [`PipelineError::NotFitted`] before a successful fit;
    /// [`PipelineError::FeatureMismatch`] on a column count mismatch.
    fn predict(&self, features: &Tensor2D<B>) -> Result<Tensor1D<B>, PipelineError>;

    /// Whether the stage has been fitted.
    fn is_fitted(&self) -> bool;

    /// Stable kind identifier, used for diagnostics and persistence dispatch.
    fn kind(&self) -> &'static str;

    /// Serialize the learned parameters to bytes.
    ///
    /// # Errors
    /// [`PipelineError::NotFitted`] before a successful fit.
    fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError>;

    /// Restore learned parameters from bytes, leaving the stage fitted.
    fn params_from_bytes(&mut self, bytes: &[u8]) -> Result<(), PipelineError>;
}
