//! Min-Max Scaler.
//!
//! Transforms features by scaling each column to a given range, by default
//! `[0, 1]`:
//! ```text
//! x' = (x - min(x)) / (max(x) - min(x)) * (range_max - range_min) + range_min
//! ```

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage::TransformStage;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};

/// Configuration for MinMaxScaler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MinMaxScalerConfig {
    /// Lower bound of the output range.
    pub range_min: f64,
    /// Upper bound of the output range.
    pub range_max: f64,
}

impl Default for MinMaxScalerConfig {
    fn default() -> Self {
        Self {
            range_min: 0.0,
            range_max: 1.0,
        }
    }
}

/// Serializable parameters for a fitted MinMaxScaler.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct MinMaxScalerParams {
    /// Configuration options.
    pub config: MinMaxScalerConfig,
    /// Minimum of each feature seen during fit.
    pub data_min: Vec<f64>,
    /// Per-feature `max - min` spread (1 for constant features).
    pub data_range: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

struct MinMaxState<B: Backend> {
    data_min: Tensor1D<B>,
    data_range: Tensor1D<B>,
    n_features: usize,
}

/// Range-scaling transform stage.
pub struct MinMaxScaler<B: Backend> {
    config: MinMaxScalerConfig,
    state: Option<MinMaxState<B>>,
}

impl<B: Backend> Default for MinMaxScaler<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> MinMaxScaler<B> {
    /// Create a new MinMaxScaler targeting the `[0, 1]` range.
    pub fn new() -> Self {
        Self {
            config: MinMaxScalerConfig::default(),
            state: None,
        }
    }

    /// Set the output range. Validated at fit time: `min` must be strictly
    /// less than `max`.
    pub fn with_range(mut self, min: f64, max: f64) -> Self {
        self.config.range_min = min;
        self.config.range_max = max;
        self
    }

    /// Per-feature minimums learned during fit, or `None` if unfitted.
    pub fn data_min(&self) -> Option<Vec<f64>> {
        self.state.as_ref().map(|s| s.data_min.to_vec())
    }

    /// Per-feature `max - min` spreads learned during fit, or `None` if
    /// unfitted.
    pub fn data_range(&self) -> Option<Vec<f64>> {
        self.state.as_ref().map(|s| s.data_range.to_vec())
    }
}

impl<B: Backend> TransformStage<B> for MinMaxScaler<B> {
    fn fit(
        &mut self,
        features: &Tensor2D<B>,
        _labels: Option<&Tensor1D<B>>,
    ) -> Result<(), PipelineError> {
        if self.config.range_min >= self.config.range_max {
            return Err(PipelineError::InvalidParameter(format!(
                "MinMaxScaler range min ({}) must be less than max ({})",
                self.config.range_min, self.config.range_max
            )));
        }

        let (rows, cols) = features.shape();
        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit MinMaxScaler on empty data".to_string(),
            ));
        }
        if features.to_vec().iter().any(|v| !v.is_finite()) {
            return Err(PipelineError::MissingValues(
                "MinMaxScaler requires finite input; impute missing values first".to_string(),
            ));
        }

        let data_min = B::to_vec_1d(&B::col_min_2d(&features.data));
        let data_max = B::to_vec_1d(&B::col_max_2d(&features.data));
        // Constant features get range 1 so they map to range_min unchanged.
        let data_range: Vec<f64> = data_min
            .iter()
            .zip(data_max.iter())
            .map(|(&lo, &hi)| if hi == lo { 1.0 } else { hi - lo })
            .collect();

        self.state = Some(MinMaxState {
            data_min: Tensor1D::new(data_min),
            data_range: Tensor1D::new(data_range),
            n_features: cols,
        });
        Ok(())
    }

    fn transform(&self, features: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("MinMaxScaler: call fit before transform".to_string())
        })?;

        let (_, cols) = features.shape();
        if cols != state.n_features {
            return Err(PipelineError::FeatureMismatch {
                expected: state.n_features,
                got: cols,
            });
        }

        let span = self.config.range_max - self.config.range_min;
        let mut result = B::broadcast_sub_1d_to_2d_rows(&features.data, &state.data_min.data);
        result = B::broadcast_div_1d_to_2d_rows(&result, &state.data_range.data);
        result = B::mul_scalar_2d(&result, span);
        result = B::add_scalar_2d(&result, self.config.range_min);
        Ok(Tensor2D::from_raw(result))
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn kind(&self) -> &'static str {
        "MinMaxScaler"
    }

    fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("MinMaxScaler: call fit before saving".to_string())
        })?;
        let params = MinMaxScalerParams {
            config: self.config.clone(),
            data_min: state.data_min.to_vec(),
            data_range: state.data_range.to_vec(),
            n_features: state.n_features,
        };
        Ok(params.to_bytes()?)
    }

    fn params_from_bytes(&mut self, bytes: &[u8]) -> Result<(), PipelineError> {
        let params = MinMaxScalerParams::from_bytes(bytes)?;
        self.state = Some(MinMaxState {
            data_min: Tensor1D::new(params.data_min),
            data_range: Tensor1D::new(params.data_range),
            n_features: params.n_features,
        });
        self.config = params.config;
        Ok(())
    }
}
