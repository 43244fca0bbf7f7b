//! Sequential composition of named processing stages.
//!
//! A [`Pipeline`] chains an ordered list of named transform stages and a
//! single terminal stage (an estimator) into one unit with a two-phase
//! contract: [`Pipeline::fit`] learns every stage's parameters in declared
//! order, [`Pipeline::predict`] runs new data through the already-fitted
//! stages.
//!
//! # Example
//! ```
//! use stagewise::backend::{CpuBackend, Tensor1D, Tensor2D};
//! use stagewise::model::LinearRegressor;
//! use stagewise::pipeline::Pipeline;
//! use stagewise::preprocessing::StandardScaler;
//!
//! let mut pipeline = Pipeline::<CpuBackend>::builder()
//!     .stage("scale", StandardScaler::new())
//!     .terminal("model", LinearRegressor::new())
//!     .build()?;
//!
//! let x = Tensor2D::from_rows(&[vec![1.0], vec![2.0], vec![3.0]]);
//! let y = Tensor1D::new(vec![1.0, 2.0, 3.0]);
//!
//! pipeline.fit(&x, Some(&y))?;
//! let predictions = pipeline.predict(&Tensor2D::from_rows(&[vec![4.0]]))?;
//! # Ok::<(), stagewise::pipeline::PipelineError>(())
//! ```

pub mod composition;
pub mod error;
mod persist;
pub mod stage;

pub use composition::{Pipeline, PipelineBuilder};
pub use error::PipelineError;
pub use stage::{TerminalStage, TransformStage};
