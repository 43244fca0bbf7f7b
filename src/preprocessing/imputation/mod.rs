//! Missing-value imputation stages.

pub mod simple;

pub use simple::{ImputeStrategy, SimpleImputer};
