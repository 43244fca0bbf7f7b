//! # Backend Abstraction
//!
//! A trait-based abstraction over tensor storage and numerics, so pipeline
//! stages run on different backends without code changes.
//!
//! ## Design Philosophy
//!
//! - **Minimal trait surface**: only the operations the pipeline stages need
//!   are exposed, keeping backend implementations small and testable.
//! - **Zero-cost generics**: backend selection happens at compile time via
//!   type parameters; no runtime dispatch in numeric code.
//! - **Type-safe tensor handling**: each backend defines its own tensor types
//!   wrapped in [`Tensor1D`] / [`Tensor2D`], preventing accidental mixing of
//!   tensors from different backends.
//! - **Feature-gated implementations**: backends are enabled via Cargo
//!   features (`cpu`, `ndarray`), letting users minimize dependencies.
//!
//! ## Available Backends
//!
//! | Backend          | Feature   | Use Case                          |
//! |------------------|-----------|-----------------------------------|
//! | `CpuBackend`     | `cpu`     | Default, pure-Rust implementation |
//! | `NdarrayBackend` | `ndarray` | Interop with the `ndarray` crate  |

#[cfg(feature = "cpu")]
pub mod cpu;
#[cfg(feature = "cpu")]
pub use cpu::{CpuBackend, CpuTensor2D};

#[cfg(feature = "ndarray")]
mod ndarray_backend;
#[cfg(feature = "ndarray")]
pub use ndarray_backend::NdarrayBackend;

/// One-dimensional tensor wrapper.
pub mod tensor1d;
/// Two-dimensional tensor wrapper.
pub mod tensor2d;

pub use tensor1d::Tensor1D;
pub use tensor2d::Tensor2D;

/// Abstraction over tensor storage and the numeric operations the pipeline
/// stages require.
///
/// Implementations provide concrete tensor types and device-specific
/// optimizations while keeping a uniform API surface. All checked operations
/// (`matvec`, `matvec_transposed`, element-wise 1D ops) validate shapes and
/// panic on mismatch; the [`Tensor1D`] / [`Tensor2D`] wrappers and the stages
/// built on top of them perform their own `Result`-based validation before
/// reaching the backend.
///
/// Values are `f64` throughout; constructors take row-major data.
pub trait Backend: Clone + Copy + 'static {
    /// One-dimensional tensor type.
    type Tensor1D: Clone + Send + Sync;

    /// Two-dimensional tensor type.
    type Tensor2D: Clone + Send + Sync;

    // --- Constructors ---

    /// Creates a 1D tensor filled with zeros of given length.
    fn zeros_1d(len: usize) -> Self::Tensor1D;

    /// Constructs a 1D tensor from owned data.
    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D;

    /// Constructs a 2D tensor from row-major ordered data.
    ///
    /// # Panics
    /// If `data.len() != rows * cols`.
    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D;

    // --- Shape and data access ---

    /// Returns the number of elements in a 1D tensor.
    fn len_1d(t: &Self::Tensor1D) -> usize;

    /// Returns the shape of a 2D tensor as (rows, cols).
    fn shape(t: &Self::Tensor2D) -> (usize, usize);

    /// Converts a 1D tensor to a host `Vec<f64>`.
    ///
    /// Primarily used for parameter extraction, debugging and tests.
    /// Not intended for hot paths due to allocation overhead.
    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64>;

    /// Converts a 2D tensor to a host `Vec<f64>` in row-major order.
    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64>;

    // --- Element-wise operations (1D) ---

    /// Element-wise subtraction of two 1D tensors.
    ///
    /// # Panics
    /// If tensors have different lengths.
    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D;

    /// Multiplies each element of a 1D tensor by a scalar.
    fn mul_scalar_1d(t: &Self::Tensor1D, s: f64) -> Self::Tensor1D;

    /// Adds a scalar to each element of a 1D tensor.
    fn add_scalar_1d(t: &Self::Tensor1D, s: f64) -> Self::Tensor1D;

    /// Computes the sum of all elements in a 1D tensor.
    fn sum_all_1d(t: &Self::Tensor1D) -> f64;

    // --- Element-wise operations (2D) ---

    /// Multiplies each element of a 2D tensor by a scalar.
    fn mul_scalar_2d(t: &Self::Tensor2D, s: f64) -> Self::Tensor2D;

    /// Adds a scalar to each element of a 2D tensor.
    fn add_scalar_2d(t: &Self::Tensor2D, s: f64) -> Self::Tensor2D;

    // --- Linear algebra ---

    /// Matrix-vector multiplication: `y = A * x` for `A` (m × n), `x` (n,).
    ///
    /// # Panics
    /// If `A.cols() != x.len()`.
    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    /// Transposed matrix-vector multiplication: `y = A^T * x` for `A` (m × n),
    /// `x` (m,).
    ///
    /// # Panics
    /// If `A.rows() != x.len()`.
    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D;

    // --- Column statistics (for preprocessing) ---

    /// Computes the mean of each column; returns a 1D tensor of length `cols`.
    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Computes the standard deviation of each column.
    ///
    /// `ddof` is the delta degrees of freedom (0 for population std,
    /// 1 for sample std).
    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D;

    /// Computes the minimum of each column.
    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    /// Computes the maximum of each column.
    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D;

    // --- Broadcasting operations ---

    /// Subtracts a 1D tensor of length `cols` from each row of a 2D tensor:
    /// `Result[i, j] = t[i, j] - v[j]`.
    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Divides each row of a 2D tensor by a 1D tensor element-wise:
    /// `Result[i, j] = t[i, j] / v[j]`.
    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Multiplies each row of a 2D tensor by a 1D tensor element-wise:
    /// `Result[i, j] = t[i, j] * v[j]`.
    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;

    /// Adds a 1D tensor to each row of a 2D tensor:
    /// `Result[i, j] = t[i, j] + v[j]`.
    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D;
}
