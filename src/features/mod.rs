use serde::{Serialize, Deserialize};
use crate::matrix::SparseMatrix;

/// Structural and numerical summary of a sparse matrix, used by downstream
/// tools to characterize generated or resized matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Features {

    pub nrows : usize,

    pub ncols : usize,

    pub nnz : usize,

    /// nnz / (nrows * ncols); zero for an empty shape.
    pub density : f64,

    /// Largest |row - col| over stored entries.
    pub bandwidth : usize,

    pub diagonal_nnz : usize,

    pub empty_rows : usize,

    pub row_nnz_min : usize,

    pub row_nnz_max : usize,

    pub row_nnz_mean : f64,

    /// Whether the stored positions are symmetric.
    pub pattern_symmetric : bool,

    /// Whether values at mirrored positions agree.
    pub numerically_symmetric : bool,

    /// Fraction of rows where |a_ii| >= sum of |a_ij|, j != i.
    pub diagonal_dominance : f64,

    pub trace : f64,

    pub frobenius_norm : f64,

    pub max_abs : f64

}

/// Computes the feature summary in O(nnz log nnz).
pub fn compute_features(m : &SparseMatrix) -> Features {
    let (nrows, ncols) = m.shape();
    let nnz = m.nnz();
    let cells = nrows * ncols;
    let density = if cells == 0 { 0.0 } else { nnz as f64 / cells as f64 };

    let mut row_nnz = vec![0usize; nrows];
    let mut diag = vec![0.0; nrows];
    let mut off_diag = vec![0.0; nrows];
    let mut bandwidth = 0;
    let mut diagonal_nnz = 0;
    let mut pattern_symmetric = m.is_square();
    let mut numerically_symmetric = m.is_square();
    for (r, c, v) in m.iter() {
        row_nnz[r] += 1;
        bandwidth = bandwidth.max(if r > c { r - c } else { c - r });
        if r == c {
            diagonal_nnz += 1;
            diag[r] = v;
        } else {
            off_diag[r] += v.abs();
            if pattern_symmetric {
                let mirror = m.get(c, r);
                if mirror == 0.0 {
                    pattern_symmetric = false;
                    numerically_symmetric = false;
                } else if mirror != v {
                    numerically_symmetric = false;
                }
            }
        }
    }

    let dominant = (0..nrows).filter(|&i| diag[i].abs() >= off_diag[i] ).count();
    Features {
        nrows,
        ncols,
        nnz,
        density,
        bandwidth,
        diagonal_nnz,
        empty_rows : row_nnz.iter().filter(|n| **n == 0 ).count(),
        row_nnz_min : row_nnz.iter().cloned().min().unwrap_or(0),
        row_nnz_max : row_nnz.iter().cloned().max().unwrap_or(0),
        row_nnz_mean : if nrows == 0 { 0.0 } else { nnz as f64 / nrows as f64 },
        pattern_symmetric,
        numerically_symmetric,
        diagonal_dominance : if nrows == 0 { 0.0 } else { dominant as f64 / nrows as f64 },
        trace : diag.iter().sum(),
        frobenius_norm : m.iter().map(|e| e.2 * e.2 ).sum::<f64>().sqrt(),
        max_abs : m.iter().map(|e| e.2.abs() ).fold(0.0, f64::max)
    }
}
