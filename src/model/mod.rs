//! Terminal estimators.
//!
//! Models implement [`TerminalStage`](crate::pipeline::TerminalStage) and sit
//! at the end of a [`Pipeline`](crate::pipeline::Pipeline), consuming the
//! fully transformed features and producing one prediction per row.

pub mod linear;

pub use linear::LinearRegressor;
