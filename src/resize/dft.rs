use nalgebra::*;
use std::f64::consts::PI;
use crate::matrix::{SparseMatrix, DEFAULT_TOLERANCE};
use crate::error::ResizeError;
use super::Resizer;

/// Unnormalized DFT matrix of size n, entry (k, i) = exp(-+2 pi i k i / n)
/// (negative exponent for the forward transform). The matrix is symmetric,
/// so a 2D transform is F X F.
pub fn fourier_basis(n : usize, inverse : bool) -> DMatrix<Complex<f64>> {
    let sign = if inverse { 1.0 } else { -1.0 };
    DMatrix::from_fn(n, n, |k, i| {
        let phase = sign * 2.0 * PI * ((k * i) % n) as f64 / n as f64;
        Complex::new(phase.cos(), phase.sin())
    })
}

/// Index of the centred frequency f in a spectrum of length n.
fn spectrum_index(f : isize, n : usize) -> usize {
    f.rem_euclid(n as isize) as usize
}

/// Fourier-domain resize. The source is densified and transformed; the
/// min(n, target) lowest frequencies along each axis are copied into a
/// target x target spectrum (truncation when downscaling, zero-padding when
/// upscaling), which is inverted with a normalization that preserves the mean
/// value. The imaginary residue is discarded and values at or below
/// `tolerance` are dropped.
///
/// The transform works on dense n x n and target x target complex matrices:
/// memory is O(max(n, target)^2) and time O(max(n, target)^3).
#[derive(Debug, Clone, Copy)]
pub struct FourierResizer {
    tolerance : f64
}

impl Default for FourierResizer {

    fn default() -> Self {
        Self { tolerance : DEFAULT_TOLERANCE }
    }

}

impl FourierResizer {

    pub fn new(tolerance : f64) -> Self {
        Self { tolerance }
    }

    fn spectrum(&self, matrix : &SparseMatrix) -> DMatrix<Complex<f64>> {
        let n = matrix.nrows();
        let dense = matrix.to_dense().map(|v| Complex::new(v, 0.0) );
        let fwd = fourier_basis(n, false);
        &fwd * dense * &fwd
    }

}

impl Resizer for FourierResizer {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        let n = matrix.nrows();
        if n == 0 || matrix.nnz() == 0 {
            return Ok(SparseMatrix::zeros(target));
        }
        let spec = self.spectrum(matrix);

        let m = n.min(target);
        let freqs : Vec<isize> = (0..m)
            .map(|k| if k < (m + 1) / 2 { k as isize } else { k as isize - m as isize } )
            .collect();
        let mut resized = DMatrix::from_element(target, target, Complex::new(0.0, 0.0));
        for &fr in freqs.iter() {
            for &fc in freqs.iter() {
                resized[(spectrum_index(fr, target), spectrum_index(fc, target))] = spec[(spectrum_index(fr, n), spectrum_index(fc, n))];
            }
        }

        let inv = fourier_basis(target, true);
        let norm = 1.0 / (n * n) as f64;
        let out = (&inv * resized * &inv).map(|c| c.re * norm );
        if out.iter().any(|v| !v.is_finite() ) {
            return Err(ResizeError::computation("Non-finite value in inverse Fourier transform"));
        }
        Ok(SparseMatrix::from_dense(&out, self.tolerance))
    }

}

#[cfg(test)]
pub mod test {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn same_size_is_lossless() {
        let m = SparseMatrix::from_triplets(7, 7, vec![(0, 3, 1.0), (4, 4, -3.0), (6, 1, 0.5)]).unwrap();
        let out = FourierResizer::default().resize(&m, 7).unwrap();
        assert!(out.approx_eq(&m, 1E-9));
    }

    #[test]
    fn constant_is_preserved() {
        let n = 6;
        let m = SparseMatrix::from_triplets(n, n, (0..n*n).map(|k| (k / n, k % n, 2.0) )).unwrap();
        for &t in [3, 6, 15].iter() {
            let out = FourierResizer::default().resize(&m, t).unwrap();
            assert_eq!(out.nnz(), t * t);
            for (_, _, v) in out.iter() {
                assert_relative_eq!(v, 2.0, epsilon = 1E-9);
            }
        }
    }

    #[test]
    fn identity_upscale_has_target_shape() {
        let out = FourierResizer::default().resize(&SparseMatrix::identity(20), 40).unwrap();
        assert_eq!(out.shape(), (40, 40));
        assert!(out.nnz() >= 40);
    }

}
