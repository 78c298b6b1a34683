use nalgebra::*;
use std::collections::{BTreeMap, HashMap};
use std::f64::consts::PI;
use crate::matrix::{SparseMatrix, DEFAULT_TOLERANCE};
use crate::error::ResizeError;
use super::Resizer;

/// Orthonormal DCT-II basis of size n (rows are frequencies), such that
/// coefficients = C x C^T and x = C^T coefficients C.
pub fn dct_basis(n : usize) -> DMatrix<f64> {
    let nf = n as f64;
    DMatrix::from_fn(n, n, |k, i| {
        let alpha = if k == 0 { (1.0 / nf).sqrt() } else { (2.0 / nf).sqrt() };
        alpha * (PI * (2.0 * i as f64 + 1.0) * k as f64 / (2.0 * nf)).cos()
    })
}

/// Block-wise DCT resize. The source is split into block x block tiles (the
/// last row/column of tiles is zero-padded when n is not a multiple of the
/// block size). Tile k along an axis maps to the target range
/// [round(k * block * target / n), round((k + 1) * block * target / n)); its
/// cosine spectrum is truncated or zero-padded to that extent, rescaled so the
/// tile mean is preserved, and inverted. Target cells beyond `target` (the
/// image of the padding) are cropped. Values at or below `tolerance` are
/// dropped.
///
/// Only tiles holding stored entries are transformed; each is a dense
/// block x block local, and the output is assembled tile by tile, so memory is
/// bounded by the output size, which may itself approach target^2.
#[derive(Debug, Clone, Copy)]
pub struct BlockDct {
    block : usize,
    tolerance : f64
}

impl Default for BlockDct {

    fn default() -> Self {
        Self { block : 8, tolerance : DEFAULT_TOLERANCE }
    }

}

impl BlockDct {

    pub fn new(block : usize, tolerance : f64) -> Self {
        Self { block, tolerance }
    }

    fn target_bounds(&self, n : usize, target : usize) -> Vec<usize> {
        let nblocks = (n + self.block - 1) / self.block;
        let ratio = target as f64 / n as f64;
        (0..=nblocks).map(|k| ((k * self.block) as f64 * ratio).round() as usize ).collect()
    }

}

struct Bases(HashMap<usize, DMatrix<f64>>);

impl Bases {

    fn get(&mut self, n : usize) -> &DMatrix<f64> {
        self.0.entry(n).or_insert_with(|| dct_basis(n) )
    }

}

impl Resizer for BlockDct {

    fn resize(&self, matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
        if self.block == 0 {
            return Err(ResizeError::unsupported("DCT block size must be positive"));
        }
        let n = matrix.nrows();
        if n == 0 {
            return Ok(SparseMatrix::zeros(target));
        }
        let b = self.block;
        let bounds = self.target_bounds(n, target);

        let mut tiles : BTreeMap<(usize, usize), DMatrix<f64>> = BTreeMap::new();
        for (r, c, v) in matrix.iter() {
            let tile = tiles.entry((r / b, c / b)).or_insert_with(|| DMatrix::zeros(b, b) );
            tile[(r % b, c % b)] = v;
        }

        let mut bases = Bases(HashMap::new());
        let src_basis = bases.get(b).clone();
        let mut acc : BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for ((kr, kc), tile) in tiles {
            let (r0, r1) = (bounds[kr], bounds[kr + 1]);
            let (c0, c1) = (bounds[kc], bounds[kc + 1]);
            let (hr, hc) = (r1 - r0, c1 - c0);
            if hr == 0 || hc == 0 {
                continue;
            }
            let coefs = &src_basis * tile * src_basis.transpose();
            let gain = ((hr * hc) as f64).sqrt() / b as f64;
            let mut resized = DMatrix::zeros(hr, hc);
            for i in 0..hr.min(b) {
                for j in 0..hc.min(b) {
                    resized[(i, j)] = coefs[(i, j)] * gain;
                }
            }
            let inv_rows = bases.get(hr).transpose();
            let inv_cols = bases.get(hc).clone();
            let out = inv_rows * resized * inv_cols;
            for i in 0..hr {
                for j in 0..hc {
                    let (tr, tc) = (r0 + i, c0 + j);
                    if tr < target && tc < target {
                        *acc.entry((tr, tc)).or_insert(0.0) += out[(i, j)];
                    }
                }
            }
        }
        if acc.values().any(|v| !v.is_finite() ) {
            return Err(ResizeError::computation("Non-finite coefficient in block DCT"));
        }
        Ok(SparseMatrix::from_accumulated(target, acc, self.tolerance))
    }

}

#[cfg(test)]
pub mod test {

    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn basis_is_orthonormal() {
        for &n in [1, 3, 8].iter() {
            let c = dct_basis(n);
            let prod = &c * c.transpose();
            assert!((prod - DMatrix::<f64>::identity(n, n)).norm() < 1E-12);
        }
    }

    #[test]
    fn constant_tiles_keep_their_mean() {
        let n = 16;
        let m = SparseMatrix::from_triplets(n, n, (0..n*n).map(|k| (k / n, k % n, 3.0) )).unwrap();
        let down = BlockDct::default().resize(&m, 8).unwrap();
        assert_eq!(down.nnz(), 64);
        for (_, _, v) in down.iter() {
            assert_relative_eq!(v, 3.0, epsilon = 1E-9);
        }
        let up = BlockDct::default().resize(&m, 40).unwrap();
        assert_eq!(up.nnz(), 1600);
        for (_, _, v) in up.iter() {
            assert_relative_eq!(v, 3.0, epsilon = 1E-9);
        }
    }

    #[test]
    fn same_size_round_trips() {
        let m = SparseMatrix::from_triplets(12, 12, vec![(0, 0, 1.0), (5, 9, -2.5), (11, 3, 0.75)]).unwrap();
        let out = BlockDct::default().resize(&m, 12).unwrap();
        assert!(out.approx_eq(&m, 1E-9));
    }

    #[test]
    fn padded_source_is_cropped_to_target() {
        let out = BlockDct::new(8, DEFAULT_TOLERANCE).resize(&SparseMatrix::identity(100), 200).unwrap();
        assert_eq!(out.shape(), (200, 200));
        assert!(out.iter().all(|(r, c, _)| r < 200 && c < 200 ));
    }

}
