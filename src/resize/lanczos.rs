use std::f64::consts::PI;
use crate::matrix::SparseMatrix;
use crate::error::ResizeError;
use super::kernel::AxisMap;
use super::Resizer;

fn sinc(x : f64) -> f64 {
    if x.abs() < 1E-12 {
        1.0
    } else {
        let px = PI * x;
        px.sin() / px
    }
}

/// Lanczos (windowed sinc) resampling with `lobes` lobes, sinc(x) sinc(x / a)
/// for |x| < a. The support covers `lobes` source cells on each side of the
/// sampled coordinate, widened by the scale factor when downscaling. Only
/// source entries inside a target cell's support contribute, so the output is
/// sparse as long as the input is sparse relative to the kernel support.
/// Negative lobes can cancel contributions exactly; such cells are dropped.
#[derive(Debug, Clone, Copy)]
pub struct Lanczos {
    lobes : usize
}

impl Default for Lanczos {

    fn default() -> Self {
        Self { lobes : 3 }
    }

}

impl Lanczos {

    pub fn new(lobes : usize) -> Self {
        Self { lobes }
    }

    pub fn weight(&self, x : f64) -> f64 {
        let a = self.lobes as f64;
        if x.abs() >= a {
            0.0
        } else {
            sinc(x) * sinc(x / a)
        }
    }

}

impl Resizer for Lanczos {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        if self.lobes == 0 {
            return Err(ResizeError::unsupported("Lanczos kernel needs at least one lobe"));
        }
        let n = matrix.nrows();
        if n == 0 {
            return Ok(SparseMatrix::zeros(target));
        }
        let map = AxisMap::kernel(n, target, self.lobes as f64, true, |x| self.weight(x) );
        Ok(map.apply(matrix, target, 1E-14))
    }

}
