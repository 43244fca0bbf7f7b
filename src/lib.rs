//! # stagewise
//!
//! Named-stage ML pipelines: chain preprocessing transformers with a terminal
//! estimator into a single fit/predict unit.
//!
//! ## Core Design Principles
//!
//! - **Capabilities in the Type System**: non-terminal stages implement
//!   [`TransformStage`], the terminal stage implements [`TerminalStage`]; a
//!   composition with a non-transforming middle stage cannot be expressed.
//! - **Build-Time Validation**: stage names are checked for uniqueness and a
//!   terminal stage is required before the pipeline exists.
//! - **Backend Agnosticism**: the abstract [`Backend`](backend::Backend) trait
//!   decouples stage logic from tensor storage; a plain CPU backend ships by
//!   default, an `ndarray`-backed one behind the `ndarray` feature.
//! - **Fail Fast**: the first stage error aborts the whole call and surfaces
//!   to the caller unchanged.
//!
//! ## Quick Start
//!
//! ```rust
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
//! pipeline.fit(&x, Some(&y))?;
//!
//! let predictions = pipeline.predict(&Tensor2D::from_rows(&[vec![4.0]]))?;
//! assert!((predictions.to_vec()[0] - 4.0).abs() < 1e-6);
//! # Ok::<(), stagewise::pipeline::PipelineError>(())
//! ```
//!
//! ## Module Structure
//!
//! - `backend` — tensor abstractions and computation primitives
//! - `pipeline` — stage traits, builder, composition, persistence
//! - `preprocessing` — scaling and imputation transform stages
//! - `model` — terminal estimators
//! - `dataset` — CSV loading into tensors
//! - `serialization` — byte-level parameter (de)serialization

pub mod backend;
pub mod dataset;
pub mod model;
pub mod pipeline;
pub mod preprocessing;
pub mod serialization;

#[cfg(feature = "cpu")]
pub use backend::CpuBackend;
pub use backend::{Tensor1D, Tensor2D};
pub use model::LinearRegressor;
pub use pipeline::{Pipeline, PipelineBuilder, PipelineError, TerminalStage, TransformStage};
pub use preprocessing::{ImputeStrategy, MinMaxScaler, SimpleImputer, StandardScaler};
