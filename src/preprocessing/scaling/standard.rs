//! Standard Scaler (Z-score normalization).
//!
//! Transforms features by removing the mean and scaling to unit variance.
//!
//! The standard score of a sample `x` is calculated as:
//! ```text
//! z = (x - u) / s
//! ```
//! where `u` is the mean of the training samples, and `s` is the standard
//! deviation (population, ddof=0).

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage::TransformStage;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};

/// Configuration for StandardScaler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScalerConfig {
    /// If true, center the data before scaling.
    pub with_mean: bool,
    /// If true, scale the data to unit variance.
    pub with_std: bool,
}

impl Default for StandardScalerConfig {
    fn default() -> Self {
        Self {
            with_mean: true,
            with_std: true,
        }
    }
}

/// Serializable parameters for a fitted StandardScaler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct StandardScalerParams {
    /// Configuration options.
    pub config: StandardScalerConfig,
    /// Mean of each feature (zeros if with_mean=false).
    pub mean: Vec<f64>,
    /// Standard deviation of each feature (ones if with_std=false).
    pub std: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

struct ScalerState<B: Backend> {
    mean: Tensor1D<B>,
    std: Tensor1D<B>,
    n_features: usize,
}

/// Standardizing transform stage.
///
/// Starts unfitted; fitting learns per-column mean and standard deviation
/// in place.
pub struct StandardScaler<B: Backend> {
    config: StandardScalerConfig,
    state: Option<ScalerState<B>>,
}

impl<B: Backend> Default for StandardScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> StandardScaler<B> {
    /// Create a new StandardScaler with default configuration.
    pub fn new() -> Self {
        Self {
            config: StandardScalerConfig::default(),
            state: None,
        }
    }

    /// Set whether to center data by mean.
    pub fn with_mean(mut self, with_mean: bool) -> Self {
        self.config.with_mean = with_mean;
        self
    }

    /// Set whether to scale data to unit variance.
    pub fn with_std(mut self, with_std: bool) -> Self {
        self.config.with_std = with_std;
        self
    }

    /// Per-feature means learned during fit, or `None` if unfitted.
    pub fn mean(&self) -> Option<Vec<f64>> {
        self.state.as_ref().map(|s| s.mean.to_vec())
    }

    /// Per-feature standard deviations learned during fit, or `None` if
    /// unfitted.
    pub fn std(&self) -> Option<Vec<f64>> {
        self.state.as_ref().map(|s| s.std.to_vec())
    }
}

impl<B: Backend> TransformStage<B> for StandardScaler<B> {
    fn fit(
        &mut self,
        features: &Tensor2D<B>,
        _labels: Option<&Tensor1D<B>>,
    ) -> Result<(), PipelineError> {
        let (rows, cols) = features.shape();

        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit StandardScaler on empty data".to_string(),
            ));
        }
        if features.to_vec().iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::MissingValues(
                "StandardScaler requires finite input; impute missing values first".to_string(),
            ));
        }

        let mean = if self.config.with_mean {
            Tensor1D::from_raw(B::col_mean_2d(&features.data))
        } else {
            Tensor1D::zeros(cols)
        };

        let std = if self.config.with_std {
            // Constant features get std 1 so they pass through unscaled.
            let raw = B::to_vec_1d(&B::col_std_2d(&features.data, 0));
            Tensor1D::new(raw.iter().map(|&s| if s == 0.0 { 1.0 } else { s }).collect())
        } else {
            Tensor1D::new(vec![1.0; cols])
        };

        self.state = Some(ScalerState {
            mean,
            std,
            n_features: cols,
        });
        Ok(())
    }

    fn transform(&self, features: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("StandardScaler: call fit before transform".to_string())
        })?;

        let (_, cols) = features.shape();
        if cols != state.n_features {
            return Err(PipelineError::FeatureMismatch {
                expected: state.n_features,
                got: cols,
            });
        }

        let mut result = features.data.clone();
        if self.config.with_mean {
            result = B::broadcast_sub_1d_to_2d_rows(&result, &state.mean.data);
        }
        if self.config.with_std {
            result = B::broadcast_div_1d_to_2d_rows(&result, &state.std.data);
        }
        Ok(Tensor2D::from_raw(result))
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn kind(&self) -> &'static str {
        "StandardScaler"
    }

    fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("StandardScaler: call fit before saving".to_string())
        })?;
        let params = StandardScalerParams {
            config: self.config.clone(),
            mean: state.mean.to_vec(),
            std: state.std.to_vec(),
            n_features: state.n_features,
        };
        Ok(params.to_bytes()?)
    }

    fn params_from_bytes(&mut self, bytes: &[u8]) -> Result<(), PipelineError> {
        let params = StandardScalerParams::from_bytes(bytes)?;
        self.state = Some(ScalerState {
            mean: Tensor1D::new(params.mean),
            std: Tensor1D::new(params.std),
            n_features: params.n_features,
        });
        self.config = params.config;
        Ok(())
    }
}
