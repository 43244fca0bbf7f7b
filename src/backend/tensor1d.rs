use crate::backend::Backend;
use std::marker::PhantomData;

/// Backend-typed 1D tensor.
///
/// Wraps a backend's native 1D representation (`B::Tensor1D`) while carrying
/// phantom type information about its originating backend, preventing
/// accidental mixing of tensors from different backends at compile time.
/// `PhantomData<B>` adds no runtime overhead.
///
/// # Example
/// ```
/// use stagewise::backend::{CpuBackend, Tensor1D};
///
/// let x: Tensor1D<CpuBackend> = Tensor1D::new(vec![1.0, 2.0, 3.0]);
/// assert_eq!(x.len(), 3);
/// assert_eq!(x.sum(), 6.0);
/// ```
#[derive(Clone)]
pub struct Tensor1D<B: Backend> {
    pub(crate) data: B::Tensor1D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor1D<B> {
    /// Creates a new 1D tensor from a vector of `f64` values.
    pub fn new(data: Vec<f64>) -> Self {
        Self {
            data: B::from_vec_1d(data),
            backend: PhantomData,
        }
    }

    /// Creates a 1D tensor filled with zeros of specified length.
    pub fn zeros(len: usize) -> Self {
        Self {
            data: B::zeros_1d(len),
            backend: PhantomData,
        }
    }

    pub(crate) fn from_raw(data: B::Tensor1D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Returns the number of elements in the tensor.
    pub fn len(&self) -> usize {
        B::len_1d(&self.data)
    }

    /// Returns `true` if the tensor contains no elements.
    pub fn is_empty(&self) -> bool {
        B::len_1d(&self.data) == 0
    }

    /// Converts the tensor to a host `Vec<f64>`.
    ///
    /// Used for parameter extraction, debugging and test assertions; not
    /// intended for hot paths.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_1d(&self.data)
    }

    /// Computes element-wise subtraction: `self - other`.
    ///
    /// # Panics
    /// Panics if tensors have different lengths.
    pub fn sub(&self, other: &Self) -> Self {
        Self::from_raw(B::sub_1d(&self.data, &other.data))
    }

    /// Scales the tensor by multiplying each element by a scalar.
    pub fn scale(&self, s: f64) -> Self {
        Self::from_raw(B::mul_scalar_1d(&self.data, s))
    }

    /// Adds a scalar value to each element of the tensor.
    pub fn add_scalar(&self, s: f64) -> Self {
        Self::from_raw(B::add_scalar_1d(&self.data, s))
    }

    /// Computes the sum of all elements.
    pub fn sum(&self) -> f64 {
        B::sum_all_1d(&self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::CpuBackend;

    #[test]
    fn test_new_and_to_vec() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.5, -2.5, 3.5]);
        assert_eq!(t.to_vec(), vec![1.5, -2.5, 3.5]);
        assert_eq!(t.len(), 3);
        assert!(!t.is_empty());
    }

    #[test]
    fn test_zeros() {
        let t = Tensor1D::<CpuBackend>::zeros(4);
        assert_eq!(t.to_vec(), vec![0.0; 4]);
    }

    #[test]
    fn test_empty() {
        let t = Tensor1D::<CpuBackend>::new(vec![]);
        assert!(t.is_empty());
        assert_eq!(t.len(), 0);
    }

    #[test]
    fn test_sub() {
        let a = Tensor1D::<CpuBackend>::new(vec![5.0, 7.0]);
        let b = Tensor1D::<CpuBackend>::new(vec![2.0, 3.0]);
        assert_eq!(a.sub(&b).to_vec(), vec![3.0, 4.0]);
    }

    #[test]
    fn test_scale_add_scalar_chaining() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let result = t.scale(2.0).add_scalar(1.0);
        assert_eq!(result.to_vec(), vec![3.0, 5.0]);
    }

    #[test]
    fn test_sum() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0, 3.0]);
        assert_eq!(t.sum(), 6.0);
    }

    #[test]
    fn test_clone_independence() {
        let t = Tensor1D::<CpuBackend>::new(vec![1.0, 2.0]);
        let scaled = t.clone().scale(2.0);
        assert_eq!(t.to_vec(), vec![1.0, 2.0]);
        assert_eq!(scaled.to_vec(), vec![2.0, 4.0]);
    }
}
