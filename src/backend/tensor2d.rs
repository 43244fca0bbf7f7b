use crate::backend::{Backend, Tensor1D};
use std::marker::PhantomData;

/// Backend-typed 2D tensor with shape `(rows, cols)` in row-major order.
///
/// By convention throughout the crate, rows are samples and columns are
/// features.
///
/// # Example
/// ```
/// use stagewise::backend::{CpuBackend, Tensor2D};
///
/// // 2 samples x 3 features
/// let x: Tensor2D<CpuBackend> = Tensor2D::new(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0], 2, 3);
/// assert_eq!(x.shape(), (2, 3));
/// ```
#[derive(Clone)]
pub struct Tensor2D<B: Backend> {
    pub(crate) data: B::Tensor2D,
    pub(crate) backend: PhantomData<B>,
}

impl<B: Backend> Tensor2D<B> {
    /// Creates a new 2D tensor from row-major data.
    ///
    /// # Panics
    /// Panics if `data.len() != rows * cols`.
    pub fn new(data: Vec<f64>, rows: usize, cols: usize) -> Self {
        Self {
            data: B::from_vec_2d(data, rows, cols),
            backend: PhantomData,
        }
    }

    /// Creates a 2D tensor from a slice of row vectors.
    ///
    /// # Panics
    /// Panics if rows have inconsistent lengths.
    pub fn from_rows(rows: &[Vec<f64>]) -> Self {
        let n_rows = rows.len();
        let n_cols = rows.first().map_or(0, Vec::len);
        assert!(
            rows.iter().all(|r| r.len() == n_cols),
            "from_rows: ragged row lengths"
        );
        let data: Vec<f64> = rows.iter().flatten().copied().collect();
        Self::new(data, n_rows, n_cols)
    }

    pub(crate) fn from_raw(data: B::Tensor2D) -> Self {
        Self {
            data,
            backend: PhantomData,
        }
    }

    /// Returns the shape as `(rows, cols)`.
    pub fn shape(&self) -> (usize, usize) {
        B::shape(&self.data)
    }

    /// Converts the tensor to a host `Vec<f64>` in row-major order.
    pub fn to_vec(&self) -> Vec<f64> {
        B::to_vec_2d(&self.data)
    }

    /// Matrix-vector product: `self (m x n) · w (n,) -> (m,)`.
    ///
    /// # Panics
    /// Panics if `cols != w.len()`.
    pub fn dot(&self, w: &Tensor1D<B>) -> Tensor1D<B> {
        Tensor1D::from_raw(B::matvec(&self.data, &w.data))
    }
}
