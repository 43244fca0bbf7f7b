//! Pure-Rust CPU backend with row-major `Vec<f64>` storage.
//!
//! This is the default backend. It favors simple, auditable inner loops over
//! vectorized tricks; the data volumes a pipeline typically sees during
//! fit/predict are small enough that clarity wins.

use super::Backend;

/// CPU-based backend with no external dependencies.
#[derive(Clone, Copy, Debug)]
pub struct CpuBackend;

/// Row-major 2D tensor storage for [`CpuBackend`].
#[derive(Clone, Debug)]
pub struct CpuTensor2D {
    pub(crate) data: Vec<f64>,
    pub(crate) rows: usize,
    pub(crate) cols: usize,
}

impl Backend for CpuBackend {
    type Tensor1D = Vec<f64>;
    type Tensor2D = CpuTensor2D;

    fn zeros_1d(len: usize) -> Self::Tensor1D {
        vec![0.0; len]
    }

    fn from_vec_1d(data: Vec<f64>) -> Self::Tensor1D {
        data
    }

    fn from_vec_2d(data: Vec<f64>, rows: usize, cols: usize) -> Self::Tensor2D {
        assert_eq!(
            data.len(),
            rows * cols,
            "from_vec_2d: data length {} does not match shape ({rows}, {cols})",
            data.len()
        );
        CpuTensor2D { data, rows, cols }
    }

    fn len_1d(t: &Self::Tensor1D) -> usize {
        t.len()
    }

    fn shape(t: &Self::Tensor2D) -> (usize, usize) {
        (t.rows, t.cols)
    }

    fn to_vec_1d(t: &Self::Tensor1D) -> Vec<f64> {
        t.clone()
    }

    fn to_vec_2d(t: &Self::Tensor2D) -> Vec<f64> {
        t.data.clone()
    }

    fn sub_1d(a: &Self::Tensor1D, b: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.len(), b.len(), "sub_1d: length mismatch");
        a.iter().zip(b).map(|(x, y)| x - y).collect()
    }

    fn mul_scalar_1d(t: &Self::Tensor1D, s: f64) -> Self::Tensor1D {
        t.iter().map(|&x| x * s).collect()
    }

    fn add_scalar_1d(t: &Self::Tensor1D, s: f64) -> Self::Tensor1D {
        t.iter().map(|&x| x + s).collect()
    }

    fn sum_all_1d(t: &Self::Tensor1D) -> f64 {
        t.iter().sum()
    }

    fn mul_scalar_2d(t: &Self::Tensor2D, s: f64) -> Self::Tensor2D {
        CpuTensor2D {
            data: t.data.iter().map(|&x| x * s).collect(),
            rows: t.rows,
            cols: t.cols,
        }
    }

    fn add_scalar_2d(t: &Self::Tensor2D, s: f64) -> Self::Tensor2D {
        CpuTensor2D {
            data: t.data.iter().map(|&x| x + s).collect(),
            rows: t.rows,
            cols: t.cols,
        }
    }

    fn matvec(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.cols, x.len(), "matvec: shape mismatch");
        let mut out = Vec::with_capacity(a.rows);
        for i in 0..a.rows {
            let row = &a.data[i * a.cols..(i + 1) * a.cols];
            out.push(row.iter().zip(x).map(|(v, w)| v * w).sum());
        }
        out
    }

    fn matvec_transposed(a: &Self::Tensor2D, x: &Self::Tensor1D) -> Self::Tensor1D {
        assert_eq!(a.rows, x.len(), "matvec_transposed: shape mismatch");
        let mut out = vec![0.0; a.cols];
        for i in 0..a.rows {
            let xi = x[i];
            let row = &a.data[i * a.cols..(i + 1) * a.cols];
            for (o, v) in out.iter_mut().zip(row) {
                *o += v * xi;
            }
        }
        out
    }

    fn col_mean_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let mut sums = vec![0.0; t.cols];
        for i in 0..t.rows {
            let row = &t.data[i * t.cols..(i + 1) * t.cols];
            for (s, v) in sums.iter_mut().zip(row) {
                *s += v;
            }
        }
        let n = t.rows as f64;
        sums.iter().map(|s| s / n).collect()
    }

    fn col_std_2d(t: &Self::Tensor2D, ddof: usize) -> Self::Tensor1D {
        assert!(t.rows > ddof, "col_std_2d: not enough rows for ddof {ddof}");
        let means = Self::col_mean_2d(t);
        let mut sq = vec![0.0; t.cols];
        for i in 0..t.rows {
            let row = &t.data[i * t.cols..(i + 1) * t.cols];
            for ((s, v), m) in sq.iter_mut().zip(row).zip(&means) {
                let d = v - m;
                *s += d * d;
            }
        }
        let denom = (t.rows - ddof) as f64;
        sq.iter().map(|s| (s / denom).sqrt()).collect()
    }

    fn col_min_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let mut mins = vec![f64::INFINITY; t.cols];
        for i in 0..t.rows {
            let row = &t.data[i * t.cols..(i + 1) * t.cols];
            for (m, v) in mins.iter_mut().zip(row) {
                *m = m.min(*v);
            }
        }
        mins
    }

    fn col_max_2d(t: &Self::Tensor2D) -> Self::Tensor1D {
        let mut maxs = vec![f64::NEG_INFINITY; t.cols];
        for i in 0..t.rows {
            let row = &t.data[i * t.cols..(i + 1) * t.cols];
            for (m, v) in maxs.iter_mut().zip(row) {
                *m = m.max(*v);
            }
        }
        maxs
    }

    fn broadcast_sub_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        broadcast_rows(t, v, |a, b| a - b)
    }

    fn broadcast_div_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        broadcast_rows(t, v, |a, b| a / b)
    }

    fn broadcast_mul_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        broadcast_rows(t, v, |a, b| a * b)
    }

    fn broadcast_add_1d_to_2d_rows(t: &Self::Tensor2D, v: &Self::Tensor1D) -> Self::Tensor2D {
        broadcast_rows(t, v, |a, b| a + b)
    }
}

fn broadcast_rows(t: &CpuTensor2D, v: &[f64], op: impl Fn(f64, f64) -> f64) -> CpuTensor2D {
    assert_eq!(t.cols, v.len(), "broadcast: length mismatch");
    let mut data = Vec::with_capacity(t.data.len());
    for i in 0..t.rows {
        let row = &t.data[i * t.cols..(i + 1) * t.cols];
        for (a, b) in row.iter().zip(v) {
            data.push(op(*a, *b));
        }
    }
    CpuTensor2D {
        data,
        rows: t.rows,
        cols: t.cols,
    }
}
