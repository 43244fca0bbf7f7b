//! Error types for pipeline construction and execution.

use thiserror::Error;

/// Error type shared by pipeline construction, fitting and inference.
///
/// Configuration problems (`DuplicateStageName`, `MissingTerminal`) are
/// reported at build time, before any data is touched. Stage failures during
/// `fit`/`transform`/`predict` abort the whole call and surface to the caller
/// unchanged; there is no retry or partial-failure recovery.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Two stages in one pipeline share a name.
    #[error("duplicate stage name '{0}'")]
    DuplicateStageName(String),

    /// The pipeline was built without a terminal stage.
    #[error("pipeline has no terminal stage")]
    MissingTerminal,

    /// An operation requiring fitted state was invoked before a successful
    /// fit.
    #[error("not fitted: {0}")]
    NotFitted(String),

    /// Empty data provided where non-empty was required.
    #[error("empty data: {0}")]
    EmptyData(String),

    /// Feature dimension mismatch between fit and a later call.
    #[error("feature mismatch: expected {expected} features, got {got}")]
    FeatureMismatch { expected: usize, got: usize },

    /// Shape mismatch between features and labels.
    #[error("shape mismatch: expected {expected}, got {got}")]
    ShapeMismatch { expected: String, got: String },

    /// Invalid hyperparameter value or stage configuration.
    #[error("invalid parameter: {0}")]
    InvalidParameter(String),

    /// Data contains missing values (NaN) where none are expected.
    #[error("missing values: {0}")]
    MissingValues(String),

    /// Serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// I/O error during file operations.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<bincode::Error> for PipelineError {
    fn from(err: bincode::Error) -> Self {
        PipelineError::Serialization(err.to_string())
    }
}
