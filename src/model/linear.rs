//! Linear regression terminal stage.
//!
//! Ordinary least squares fitted with full-batch gradient descent. Weights
//! start at zero and the gradient step is deterministic, so fitting the same
//! data with the same configuration always yields the same parameters.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage::TerminalStage;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};

/// Configuration for LinearRegressor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearRegressorConfig {
    /// Gradient descent step size.
    pub learning_rate: f64,
    /// Number of full-batch passes over the training data.
    pub epochs: usize,
}

impl Default for LinearRegressorConfig {
    fn default() -> Self {
        Self {
            learning_rate: 0.05,
            epochs: 1000,
        }
    }
}

/// Serializable parameters for a fitted LinearRegressor.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LinearRegressorParams {
    /// Configuration options.
    pub config: LinearRegressorConfig,
    /// Learned weights, one per feature.
    pub weights: Vec<f64>,
    /// Learned intercept.
    pub bias: f64,
    /// Number of features seen during fit.
    pub n_features: usize,
}

struct LinearState<B: Backend> {
    weights: Tensor1D<B>,
    bias: f64,
    n_features: usize,
}

/// Linear regression estimator.
///
/// Requires labels at fit time; fitting without them fails.
pub struct LinearRegressor<B: Backend> {
    config: LinearRegressorConfig,
    state: Option<LinearState<B>>,
}

impl<B: Backend> Default for LinearRegressor<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> LinearRegressor<B> {
    /// Create a new LinearRegressor with default configuration.
    pub fn new() -> Self {
        Self {
            config: LinearRegressorConfig::default(),
            state: None,
        }
    }

    /// Set the gradient descent step size. Validated at fit time: must be
    /// positive.
    pub fn with_learning_rate(mut self, learning_rate: f64) -> Self {
        self.config.learning_rate = learning_rate;
        self
    }

    /// Set the number of training epochs. Validated at fit time: must be
    /// non-zero.
    pub fn with_epochs(mut self, epochs: usize) -> Self {
        self.config.epochs = epochs;
        self
    }

    /// Learned weights, or `None` if unfitted.
    pub fn weights(&self) -> Option<Vec<f64>> {
        self.state.as_ref().map(|s| s.weights.to_vec())
    }

    /// Learned intercept, or `None` if unfitted.
    pub fn bias(&self) -> Option<f64> {
        self.state.as_ref().map(|s| s.bias)
    }
}

impl<B: Backend> TerminalStage<B> for LinearRegressor<B> {
    fn fit(
        &mut self,
        features: &Tensor2D<B>,
        labels: Option<&Tensor1D<B>>,
    ) -> Result<(), PipelineError> {
        if !(self.config.learning_rate > 0.0 && self.config.learning_rate.is_finite()) {
            return Err(PipelineError::InvalidParameter(format!(
                "learning rate must be positive and finite, got {}",
                self.config.learning_rate
            )));
        }
        if self.config.epochs == 0 {
            return Err(PipelineError::InvalidParameter(
                "epochs must be non-zero".to_string(),
            ));
        }

        let labels = labels.ok_or_else(|| {
            PipelineError::InvalidParameter(
                "LinearRegressor requires labels to fit".to_string(),
            )
        })?;

        let (rows, cols) = features.shape();
        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit LinearRegressor on empty data".to_string(),
            ));
        }
        if labels.len() != rows {
            return Err(PipelineError::ShapeMismatch {
                expected: format!("{rows} labels"),
                got: labels.len().to_string(),
            });
        }

        let n = rows as f64;
        let mut weights = Tensor1D::<B>::zeros(cols);
        let mut bias = 0.0;

        for _ in 0..self.config.epochs {
            // Full-batch MSE gradient: d/dw = 2/n * X^T (Xw + b - y)
            let mut predicted = features.dot(&weights);
            predicted = predicted.add_scalar(bias);
            let residual = predicted.sub(labels);

            let grad_w = Tensor1D::<B>::from_raw(B::matvec_transposed(
                &features.data,
                &residual.data,
            ))
            .scale(2.0 / n);
            let grad_b = 2.0 * residual.sum() / n;

            weights = weights.sub(&grad_w.scale(self.config.learning_rate));
            bias -= self.config.learning_rate * grad_b;
        }

        self.state = Some(LinearState {
            weights,
            bias,
            n_features: cols,
        });
        Ok(())
    }

    fn predict(&self, features: &Tensor2D<B>) -> Result<Tensor1D<B>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("LinearRegressor: call fit before predict".to_string())
        })?;

        let (_, cols) = features.shape();
        if cols != state.n_features {
            return Err(PipelineError::FeatureMismatch {
                expected: state.n_features,
                got: cols,
            });
        }

        Ok(features.dot(&state.weights).add_scalar(state.bias))
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn kind(&self) -> &'static str {
        "LinearRegressor"
    }

    fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("LinearRegressor: call fit before saving".to_string())
        })?;
        let params = LinearRegressorParams {
            config: self.config.clone(),
            weights: state.weights.to_vec(),
            bias: state.bias,
            n_features: state.n_features,
        };
        Ok(params.to_bytes()?)
    }

    fn params_from_bytes(&mut self, bytes: &[u8]) -> Result<(), PipelineError> {
        let params = LinearRegressorParams::from_bytes(bytes)?;
        self.state = Some(LinearState {
            weights: Tensor1D::new(params.weights),
            bias: params.bias,
            n_features: params.n_features,
        });
        self.config = params.config;
        Ok(())
    }
}
