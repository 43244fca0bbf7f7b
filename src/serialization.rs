//! Serialization of fitted stage parameters.
//!
//! A backend-agnostic way to serialize and deserialize the numerical
//! parameters learned by a stage, without coupling stage code to a specific
//! wire format or to backend resources.

use std::error::Error;

/// A trait for parameter representations that can be serialized to and from
/// bytes.
///
/// Implementors should contain only plain numerical data (e.g., `Vec<f64>`,
/// scalars, configs), never backend-specific tensors or handles.
pub trait SerializableParams: Sized {
    /// The error type returned during (de)serialization.
    type Error: Error + Send + Sync + 'static;

    /// Serialize the parameters into a byte buffer.
    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error>;

    /// Deserialize the parameters from a byte buffer.
    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error>;
}

impl<T> SerializableParams for T
where
    T: serde::Serialize + for<'de> serde::Deserialize<'de>,
{
    type Error = bincode::Error;

    fn to_bytes(&self) -> Result<Vec<u8>, Self::Error> {
        bincode::serialize(self)
    }

    fn from_bytes(bytes: &[u8]) -> Result<Self, Self::Error> {
        bincode::deserialize(bytes)
    }
}
