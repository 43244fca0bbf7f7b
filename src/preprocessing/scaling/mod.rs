//! Feature scaling stages.

pub mod minmax;
pub mod standard;

pub use minmax::MinMaxScaler;
pub use standard::StandardScaler;
