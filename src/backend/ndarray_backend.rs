use super::Backend;
use ndarray::{Array1, Array2, Axis};

/// Tensor backend implemented on top of the `ndarray` crate.
///
/// Useful when the surrounding application already lives in the `ndarray`
/// ecosystem; numerically equivalent to [`CpuBackend`](super::CpuBackend).
///
/// # Type mappings
/// - `Tensor1D`: `ndarray::Array1<f64>`
/// - `Tensor2D`: `ndarray::Array2<f64>`
#[derive(Clone, Copy, Debug)]
pub struct NdarrayBackend;

impl Backend for NdarrayBackend {
    type Tensor1D = Array1<f64>;
    type Tensor2D = Array2<f64>;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        Array1::zeros(len)
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        Array1::from_vec(data)
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        Array2::from_shape_vec((rows, cols), data)
            .expect("from_vec_2d: data length does not match shape")
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        t.dim()
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.to_vec()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.iter().copied().collect()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        a - b
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: f64) -> Self::Tensor1D {
        t * s
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: f64) -> Self::Tensor1D {
        t + s
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> f64 {
        t.sum()
    }

    fn mul_scalar_2d(t: &Self::Tensor2D, s: f64) -> Self::Tensor2D {
        t * s
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: f64) -> Self::Tensor2D {
        t + s
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.dot(x)
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        a.t().dot(x)
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.mean_axis(Axis(0))
            .unwrap_or_else(|| Array1::zeros(t.ncols()))
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        assert!(t.nrows() > ddof, "col_std_2d: not enough rows for ddof {ddof}");
        t.std_axis(Axis(0), ddof as f64)
    }

    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.fold_axis(Axis(0), f64::INFINITY, |acc, &v| acc.min(v))
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        t.fold_axis(Axis(0), f64::NEG_INFINITY, |acc, &v| acc.max(v))
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t - v
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t / v
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t * v
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        t + v
    }
}
