use crate::matrix::SparseMatrix;
use crate::error::ResizeError;
use super::kernel::AxisMap;

fn triangle(x : f64) -> f64 {
    (1.0 - x.abs()).max(0.0)
}

/// Bilinear resize with half-pixel aligned coordinates
/// (y, x) = ((i + 0.5) * s - 0.5, (j + 0.5) * s - 0.5), s = n / target.
/// Each target cell is the bilinear blend of its four surrounding source
/// cells, indices clamped at the border. Only target cells whose neighbourhood
/// holds a stored entry receive a value, so the result stays sparse and the
/// cost is proportional to nnz.
pub fn resize_bilinear(matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
    let n = matrix.nrows();
    if n == 0 {
        return Ok(SparseMatrix::zeros(target));
    }
    let map = AxisMap::kernel(n, target, 1.0, false, triangle);
    Ok(map.apply(matrix, target, 0.0))
}
