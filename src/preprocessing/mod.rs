//! Preprocessing stages: transformers that clean and rescale features
//! before they reach the terminal estimator.
//!
//! Every type here implements [`TransformStage`](crate::pipeline::TransformStage)
//! and can be used standalone or composed into a
//! [`Pipeline`](crate::pipeline::Pipeline).

pub mod imputation;
pub mod scaling;

pub use imputation::{ImputeStrategy, SimpleImputer};
pub use scaling::{MinMaxScaler, StandardScaler};
