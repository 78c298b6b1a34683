use crate::matrix::SparseMatrix;
use crate::error::ResizeError;
use super::kernel::AxisMap;

/// Nearest-neighbour resize. Target cell (i, j) takes the value of source cell
/// (floor(i * n / target), floor(j * n / target)). Each stored entry is mapped
/// forward to the block of target cells reading it (empty when downscaling
/// skips it), so cost and memory are proportional to the output nonzeros.
pub fn resize_nearest(matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
    let n = matrix.nrows();
    if n == 0 {
        return Ok(SparseMatrix::zeros(target));
    }
    let map = AxisMap::nearest(n, target);
    Ok(map.apply(matrix, target, 0.0))
}
