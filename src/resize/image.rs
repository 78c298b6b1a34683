use ::image::{ImageBuffer, Luma};
use ::image::imageops::{self, FilterType};
use serde::{Serialize, Deserialize};
use crate::matrix::{SparseMatrix, DEFAULT_TOLERANCE};
use crate::error::ResizeError;
use super::Resizer;

/// Resampling filters offered by the raster backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Filter {
    Nearest,
    Triangle,
    CatmullRom,
    Gaussian,
    Lanczos3
}

impl Default for Filter {

    fn default() -> Self {
        Filter::CatmullRom
    }

}

impl From<Filter> for FilterType {

    fn from(f : Filter) -> FilterType {
        match f {
            Filter::Nearest => FilterType::Nearest,
            Filter::Triangle => FilterType::Triangle,
            Filter::CatmullRom => FilterType::CatmullRom,
            Filter::Gaussian => FilterType::Gaussian,
            Filter::Lanczos3 => FilterType::Lanczos3
        }
    }

}

type Raster = ImageBuffer<Luma<f32>, Vec<f32>>;

/// Image-filter resize: the matrix is densified into a single-channel f32
/// raster, resampled by `image::imageops::resize`, and re-sparsified.
///
/// The raster backend clamps floating-point samples to [0, 1], so values are
/// first mapped affinely from [min(0, lo), max(0, hi)] onto [0, 1] and mapped
/// back afterwards. Ringing that would overshoot the source range is clipped
/// to it. Since the raster is single precision, values within
/// max(tolerance, range * 1e-6) of zero are dropped.
///
/// The whole source and target grids are materialized: memory is
/// O(n^2 + target^2), which bounds the matrix sizes this method can handle.
#[derive(Debug, Clone, Copy)]
pub struct ImageFilter {
    filter : Filter,
    tolerance : f64
}

impl Default for ImageFilter {

    fn default() -> Self {
        Self { filter : Filter::CatmullRom, tolerance : DEFAULT_TOLERANCE }
    }

}

impl ImageFilter {

    pub fn new(filter : Filter, tolerance : f64) -> Self {
        Self { filter, tolerance }
    }

}

impl Resizer for ImageFilter {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        let n = matrix.nrows();
        if n == 0 || matrix.nnz() == 0 {
            return Ok(SparseMatrix::zeros(target));
        }
        if n > u32::MAX as usize || target > u32::MAX as usize {
            return Err(ResizeError::unsupported("Matrix dimension exceeds raster limits"));
        }
        let lo = matrix.iter().map(|e| e.2 ).fold(0.0, f64::min);
        let hi = matrix.iter().map(|e| e.2 ).fold(0.0, f64::max);
        let range = hi - lo;

        let dense = matrix.to_dense();
        let src : Raster = ImageBuffer::from_fn(n as u32, n as u32, |x, y| {
            Luma([((dense[(y as usize, x as usize)] - lo) / range) as f32])
        });
        let dst = imageops::resize(&src, target as u32, target as u32, self.filter.into());

        let tol = self.tolerance.max(range * 1E-6);
        let mut entries = Vec::new();
        for (x, y, px) in dst.enumerate_pixels() {
            let v = px.0[0] as f64 * range + lo;
            if !v.is_finite() {
                return Err(ResizeError::computation("Non-finite sample in resampled raster"));
            }
            if v.abs() > tol {
                entries.push((y as usize, x as usize, v));
            }
        }
        SparseMatrix::from_triplets(target, target, entries)
    }

}
