use nalgebra::*;
use serde::{Serialize, Deserialize};
use crate::matrix::{SparseMatrix, DEFAULT_TOLERANCE};
use crate::error::ResizeError;
use super::Resizer;
use super::bilinear::resize_bilinear;

/// Orthogonal wavelet family used for decomposition and synthesis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Basis {
    Haar,
    Daubechies4
}

impl Default for Basis {

    fn default() -> Self {
        Basis::Haar
    }

}

impl Basis {

    /// Low-pass (scaling) filter coefficients.
    pub fn lowpass(&self) -> Vec<f64> {
        match self {
            Basis::Haar => vec![std::f64::consts::FRAC_1_SQRT_2; 2],
            Basis::Daubechies4 => {
                let s3 = 3f64.sqrt();
                let d = 4.0 * 2f64.sqrt();
                vec![(1.0 + s3) / d, (3.0 + s3) / d, (3.0 - s3) / d, (1.0 - s3) / d]
            }
        }
    }

    /// High-pass (wavelet) filter, the quadrature mirror of the low-pass.
    pub fn highpass(&self) -> Vec<f64> {
        let h = self.lowpass();
        let k = h.len();
        (0..k).map(|i| if i % 2 == 0 { h[k - 1 - i] } else { -h[k - 1 - i] } ).collect()
    }

}

/// Single-level periodic analysis of an even-length signal into its
/// (approximation, detail) halves.
pub fn analyze(x : &[f64], basis : Basis) -> (Vec<f64>, Vec<f64>) {
    let (h, g) = (basis.lowpass(), basis.highpass());
    let len = x.len();
    let half = len / 2;
    let mut approx = vec![0.0; half];
    let mut detail = vec![0.0; half];
    for i in 0..half {
        for k in 0..h.len() {
            let xv = x[(2 * i + k) % len];
            approx[i] += h[k] * xv;
            detail[i] += g[k] * xv;
        }
    }
    (approx, detail)
}

/// Single-level periodic synthesis, inverse of analyze.
pub fn synthesize(approx : &[f64], detail : &[f64], basis : Basis) -> Vec<f64> {
    let (h, g) = (basis.lowpass(), basis.highpass());
    let len = approx.len() * 2;
    let mut x = vec![0.0; len];
    for i in 0..approx.len() {
        for k in 0..h.len() {
            x[(2 * i + k) % len] += h[k] * approx[i] + g[k] * detail[i];
        }
    }
    x
}

fn map_rows_then_cols<F>(m : &DMatrix<f64>, out_len : usize, f : F) -> DMatrix<f64>
    where F : Fn(&[f64]) -> Vec<f64>
{
    let n = m.nrows();
    let mut rows = DMatrix::zeros(n, out_len);
    for r in 0..n {
        let row : Vec<f64> = m.row(r).iter().cloned().collect();
        for (c, v) in f(&row).into_iter().enumerate() {
            rows[(r, c)] = v;
        }
    }
    let mut out = DMatrix::zeros(out_len, out_len);
    for c in 0..out_len {
        let col : Vec<f64> = rows.column(c).iter().cloned().collect();
        for (r, v) in f(&col).into_iter().enumerate() {
            out[(r, c)] = v;
        }
    }
    out
}

/// Approximation (LL) sub-band of one 2D decomposition level, scaled by 1/2
/// so that it keeps the mean of its input.
fn coarsen(m : &DMatrix<f64>, basis : Basis) -> DMatrix<f64> {
    let half = m.nrows() / 2;
    map_rows_then_cols(m, half, |x| analyze(x, basis).0 ) * 0.5
}

/// One 2D synthesis level from an approximation with zero detail sub-bands,
/// scaled by 2 so that it keeps the mean of its input.
fn refine(m : &DMatrix<f64>, basis : Basis) -> DMatrix<f64> {
    let zeros = vec![0.0; m.nrows()];
    map_rows_then_cols(m, 2 * m.nrows(), |x| synthesize(x, &zeros, basis) ) * 2.0
}

/// Wavelet-domain resize. Downscaling repeatedly keeps the approximation
/// sub-band while the current side is even and halving does not go below
/// the target; upscaling repeatedly synthesizes with zero detail coefficients
/// while doubling does not exceed the target. A final bilinear step reaches
/// the exact target when it is not a power-of-two multiple of the source.
/// Both directions preserve the mean value. `max_levels` caps the number of
/// halving/doubling steps.
///
/// The source is densified: memory is O(max(n, target)^2).
#[derive(Debug, Clone, Copy)]
pub struct WaveletResizer {
    basis : Basis,
    max_levels : Option<usize>,
    tolerance : f64
}

impl Default for WaveletResizer {

    fn default() -> Self {
        Self { basis : Basis::Haar, max_levels : None, tolerance : DEFAULT_TOLERANCE }
    }

}

impl WaveletResizer {

    pub fn new(basis : Basis, max_levels : Option<usize>, tolerance : f64) -> Self {
        Self { basis, max_levels, tolerance }
    }

}

impl Resizer for WaveletResizer {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        let n = matrix.nrows();
        if n == 0 || matrix.nnz() == 0 {
            return Ok(SparseMatrix::zeros(target));
        }
        let max_levels = self.max_levels.unwrap_or(usize::MAX);
        let mut current = matrix.to_dense();
        let mut levels = 0;
        while levels < max_levels {
            let side = current.nrows();
            if side > target && side % 2 == 0 && side / 2 >= target {
                current = coarsen(&current, self.basis);
            } else if side < target && 2 * side <= target {
                current = refine(&current, self.basis);
            } else {
                break;
            }
            levels += 1;
        }
        if current.iter().any(|v| !v.is_finite() ) {
            return Err(ResizeError::computation("Non-finite wavelet coefficient"));
        }
        let resized = SparseMatrix::from_dense(&current, self.tolerance);
        if resized.nrows() == target {
            Ok(resized)
        } else {
            Ok(resize_bilinear(&resized, target)?.pruned(self.tolerance))
        }
    }

}

#[cfg(test)]
pub mod test {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn analysis_synthesis_round_trip() {
        let x = vec![1.0, -2.0, 3.5, 0.0, 0.25, 7.0, -1.0, 2.0];
        for &b in [Basis::Haar, Basis::Daubechies4].iter() {
            let (a, d) = analyze(&x, b);
            let y = synthesize(&a, &d, b);
            for (u, v) in x.iter().zip(y.iter()) {
                assert_relative_eq!(u, v, epsilon = 1E-12);
            }
        }
    }

    #[test]
    fn constant_is_preserved_both_ways() {
        let n = 16;
        let m = SparseMatrix::from_triplets(n, n, (0..n*n).map(|k| (k / n, k % n, 5.0) )).unwrap();
        for &b in [Basis::Haar, Basis::Daubechies4].iter() {
            let w = WaveletResizer::new(b, None, DEFAULT_TOLERANCE);
            for &t in [4, 6, 32, 40].iter() {
                let out = w.resize(&m, t).unwrap();
                assert_eq!(out.nnz(), t * t);
                for (_, _, v) in out.iter() {
                    assert_relative_eq!(v, 5.0, epsilon = 1E-9);
                }
            }
        }
    }

    #[test]
    fn haar_identity_upscale_doubles_diagonal_blocks() {
        let out = WaveletResizer::default().resize(&SparseMatrix::identity(100), 200).unwrap();
        assert_eq!(out.shape(), (200, 200));
        assert_eq!(out.nnz(), 400);
        assert_relative_eq!(out.get(0, 1), 1.0, epsilon = 1E-12);
    }

    #[test]
    fn level_cap_falls_back_to_interpolation() {
        let id = SparseMatrix::identity(64);
        let out = WaveletResizer::new(Basis::Haar, Some(1), DEFAULT_TOLERANCE).resize(&id, 8).unwrap();
        assert_eq!(out.shape(), (8, 8));
    }

}
