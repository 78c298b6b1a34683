use crate::matrix::SparseMatrix;
use crate::error::ResizeError;
use super::kernel::AxisMap;
use super::Resizer;

/// Gaussian-weighted downscaling. Each target index aggregates the source
/// indices around its half-pixel aligned source coordinate, weighted by a
/// Gaussian of standard deviation scale / 2 (scale = n / target), truncated at
/// `truncate` standard deviations and normalized per target index. Cost is
/// proportional to nnz times the squared window width.
///
/// Upscaling is not defined for this filter and is rejected before any work.
#[derive(Debug, Clone, Copy)]
pub struct GaussianResizer {
    truncate : f64
}

impl Default for GaussianResizer {

    fn default() -> Self {
        Self { truncate : 3.0 }
    }

}

impl GaussianResizer {

    pub fn new(truncate : f64) -> Self {
        Self { truncate }
    }

}

impl Resizer for GaussianResizer {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        let n = matrix.nrows();
        if target > n {
            return Err(ResizeError::unsupported(
                format!("Gaussian resize only downscales (source {}, target {})", n, target)
            ));
        }
        if !(self.truncate > 0.0) {
            return Err(ResizeError::computation(format!("Gaussian window must be positive (got {})", self.truncate)));
        }

        // Kernel expressed in target units (sigma = 0.5); the map stretches it by the scale factor.
        let map = AxisMap::kernel(n, target, 0.5 * self.truncate, true, |x| (-2.0 * x * x).exp() );
        Ok(map.apply(matrix, target, 0.0))
    }

}
