//! Simple Imputer.
//!
//! Completes missing values (NaN) per column using the mean, the median or a
//! constant. Statistics are computed over the observed values only.

use crate::backend::{Backend, Tensor1D, Tensor2D};
use crate::pipeline::error::PipelineError;
use crate::pipeline::stage::TransformStage;
use crate::serialization::SerializableParams;
use serde::{Deserialize, Serialize};

/// Strategy for imputing missing values.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub enum ImputeStrategy {
    /// Replace missing values with the mean of each column.
    #[default]
    Mean,
    /// Replace missing values with the median of each column.
    Median,
    /// Replace missing values with a constant value.
    Constant(f64),
}

/// Serializable parameters for a fitted SimpleImputer.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SimpleImputerParams {
    /// Strategy used for imputation.
    pub strategy: ImputeStrategy,
    /// Fill value for each feature.
    pub statistics: Vec<f64>,
    /// Number of features seen during fit.
    pub n_features: usize,
}

struct ImputerState {
    statistics: Vec<f64>,
    n_features: usize,
}

/// Missing-value imputation transform stage.
pub struct SimpleImputer<B: Backend> {
    strategy: ImputeStrategy,
    state: Option<ImputerState>,
    _backend: std::marker::PhantomData<B>,
}

impl<B: Backend> Default for SimpleImputer<B> {
    fn default() -> Self {
        Self::new()
    }
}

impl<B: Backend> SimpleImputer<B> {
    /// Create a new SimpleImputer with the mean strategy.
    pub fn new() -> Self {
        Self {
            strategy: ImputeStrategy::default(),
            state: None,
            _backend: std::marker::PhantomData,
        }
    }

    /// Set the imputation strategy.
    pub fn with_strategy(mut self, strategy: ImputeStrategy) -> Self {
        self.strategy = strategy;
        self
    }

    /// Fill values learned during fit, one per feature, or `None` if
    /// unfitted.
    pub fn statistics(&self) -> Option<&[f64]> {
        self.state.as_ref().map(|s| s.statistics.as_slice())
    }
}

fn median(values: &mut [f64]) -> f64 {
    values.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));
    let n = values.len();
    if n % 2 == 1 {
        values[n / 2]
    } else {
        (values[n / 2 - 1] + values[n / 2]) / 2.0
    }
}

impl<B: Backend> TransformStage<B> for SimpleImputer<B> {
    fn fit(
        &mut self,
        features: &Tensor2D<B>,
        _labels: Option<&Tensor1D<B>>,
    ) -> Result<(), PipelineError> {
        let (rows, cols) = features.shape();
        if rows == 0 {
            return Err(PipelineError::EmptyData(
                "cannot fit SimpleImputer on empty data".to_string(),
            ));
        }

        let data = features.to_vec();
        let mut statistics = vec![0.0; cols];
        for col in 0..cols {
            let mut observed: Vec<f64> = (0..rows)
                .map(|row| data[row * cols + col])
                .filter(|v| !v.is_nan())
                .collect();

            statistics[col] = match self.strategy {
                ImputeStrategy::Constant(value) => value,
                ImputeStrategy::Mean => {
                    if observed.is_empty() {
                        return Err(PipelineError::MissingValues(format!(
                            "column {col} has no observed values to compute a mean from"
                        )));
                    }
                    observed.iter().sum::<f64>() / observed.len() as f64
                }
                ImputeStrategy::Median => {
                    if observed.is_empty() {
                        return Err(PipelineError::MissingValues(format!(
                            "column {col} has no observed values to compute a median from"
                        )));
                    }
                    median(&mut observed)
                }
            };
        }

        self.state = Some(ImputerState {
            statistics,
            n_features: cols,
        });
        Ok(())
    }

    fn transform(&self, features: &Tensor2D<B>) -> Result<Tensor2D<B>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("SimpleImputer: call fit before transform".to_string())
        })?;

        let (rows, cols) = features.shape();
        if cols != state.n_features {
            return Err(PipelineError::FeatureMismatch {
                expected: state.n_features,
                got: cols,
            });
        }

        let mut data = features.to_vec();
        for row in 0..rows {
            for col in 0..cols {
                let idx = row * cols + col;
                if data[idx].is_nan() {
                    data[idx] = state.statistics[col];
                }
            }
        }
        Ok(Tensor2D::new(data, rows, cols))
    }

    fn is_fitted(&self) -> bool {
        self.state.is_some()
    }

    fn kind(&self) -> &'static str {
        "SimpleImputer"
    }

    fn params_to_bytes(&self) -> Result<Vec<u8>, PipelineError> {
        let state = self.state.as_ref().ok_or_else(|| {
            PipelineError::NotFitted("SimpleImputer: call fit before saving".to_string())
        })?;
        let params = SimpleImputerParams {
            strategy: self.strategy,
            statistics: state.statistics.clone(),
            n_features: state.n_features,
        };
        Ok(params.to_bytes()?)
    }

    fn params_from_bytes(&mut self, bytes: &[u8]) -> Result<(), PipelineError> {
        let params = SimpleImputerParams::from_bytes(bytes)?;
        self.state = Some(ImputerState {
            statistics: params.statistics,
            n_features: params.n_features,
        });
        self.strategy = params.strategy;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    fn data_with_gaps() -> Tensor2D<CpuBackend> {
        // [[1, 10], [NaN, 20], [3, NaN], [5, 30]]
        Tensor2D::new(
            vec![1.0, 10.0, f64::NAN, 20.0, 3.0, f64::NAN, 5.0, 30.0],
            4,
            2,
        )
    }

    #[test]
    fn test_imputer_mean() {
        let data = data_with_gaps();
        let mut imputer = SimpleImputer::<CpuBackend>::new();
        imputer.fit(&data, None).unwrap();

        let stats = imputer.statistics().unwrap();
        assert!((stats[0] - 3.0).abs() < 1e-10); // (1+3+5)/3
        assert!((stats[1] - 20.0).abs() < 1e-10); // (10+20+30)/3

        let values = imputer.transform(&data).unwrap().to_vec();
        assert!((values[2] - 3.0).abs() < 1e-10);
        assert!((values[5] - 20.0).abs() < 1e-10);
        // Observed values pass through unchanged.
        assert_eq!(values[0], 1.0);
        assert_eq!(values[7], 30.0);
    }

    #[test]
    fn test_imputer_median() {
        // Column: [1, NaN, 2, 100] -> median of [1, 2, 100] = 2
        let data = Tensor2D::<CpuBackend>::new(vec![1.0, f64::NAN, 2.0, 100.0], 4, 1);
        let mut imputer =
            SimpleImputer::<CpuBackend>::new().with_strategy(ImputeStrategy::Median);
        imputer.fit(&data, None).unwrap();

        assert!((imputer.statistics().unwrap()[0] - 2.0).abs() < 1e-10);
    }

    #[test]
    fn test_imputer_median_even_count() {
        let data = Tensor2D::<CpuBackend>::new(vec![1.0, 2.0, 3.0, 4.0], 4, 1);
        let mut imputer =
            SimpleImputer::<CpuBackend>::new().with_strategy(ImputeStrategy::Median);
        imputer.fit(&data, None).unwrap();

        assert!((imputer.statistics().unwrap()[0] - 2.5).abs() < 1e-10);
    }

    #[test]
    fn test_imputer_constant() {
        let data = data_with_gaps();
        let mut imputer =
            SimpleImputer::<CpuBackend>::new().with_strategy(ImputeStrategy::Constant(-1.0));
        imputer.fit(&data, None).unwrap();

        let values = imputer.transform(&data).unwrap().to_vec();
        assert_eq!(values[2], -1.0);
        assert_eq!(values[5], -1.0);
        assert_eq!(values[0], 1.0);
    }

    #[test]
    fn test_imputer_all_missing_column_fails() {
        let data = Tensor2D::<CpuBackend>::new(vec![f64::NAN, 1.0, f64::NAN, 2.0], 2, 2);
        let mut imputer = SimpleImputer::<CpuBackend>::new();
        assert!(matches!(
            imputer.fit(&data, None),
            Err(PipelineError::MissingValues(_))
        ));
    }

    #[test]
    fn test_imputer_all_missing_column_constant_ok() {
        let data = Tensor2D::<CpuBackend>::new(vec![f64::NAN, 1.0, f64::NAN, 2.0], 2, 2);
        let mut imputer =
            SimpleImputer::<CpuBackend>::new().with_strategy(ImputeStrategy::Constant(0.0));
        imputer.fit(&data, None).unwrap();

        let values = imputer.transform(&data).unwrap().to_vec();
        assert_eq!(values[0], 0.0);
        assert_eq!(values[2], 0.0);
    }

    #[test]
    fn test_imputer_transform_before_fit() {
        let data = data_with_gaps();
        let imputer = SimpleImputer::<CpuBackend>::new();
        assert!(matches!(
            imputer.transform(&data),
            Err(PipelineError::NotFitted(_))
        ));
    }

    #[test]
    fn test_imputer_serialization_round_trip() {
        let data = data_with_gaps();
        let mut imputer = SimpleImputer::<CpuBackend>::new();
        imputer.fit(&data, None).unwrap();

        let bytes = imputer.params_to_bytes().unwrap();
        let mut restored = SimpleImputer::<CpuBackend>::new();
        restored.params_from_bytes(&bytes).unwrap();

        let t1 = imputer.transform(&data).unwrap().to_vec();
        let t2 = restored.transform(&data).unwrap().to_vec();
        assert_eq!(t1, t2);
    }
}
