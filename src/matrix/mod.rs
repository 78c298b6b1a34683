use nalgebra::*;
use std::collections::BTreeMap;
use std::convert::TryFrom;
use serde::{Serialize, Deserialize};
use crate::error::ResizeError;

/// Magnitude at or below which dense intermediates are dropped when they
/// are converted back into a sparse representation.
pub const DEFAULT_TOLERANCE : f64 = 1E-10;

/// Immutable sparse matrix, represented as its shape plus a row-major sorted
/// list of explicit (row, col, value) entries. Entries are unique per position
/// and never hold an exact zero. Resizing algorithms read a SparseMatrix and
/// always produce a new one.
///
/// Deserialization goes through from_triplets, so serialized input with
/// repeated positions or explicit zeros is normalized the same way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Triplets")]
pub struct SparseMatrix {

    nrows : usize,

    ncols : usize,

    entries : Vec<(usize, usize, f64)>

}

/// Unchecked serialized form of a SparseMatrix.
#[derive(Deserialize)]
struct Triplets {
    nrows : usize,
    ncols : usize,
    entries : Vec<(usize, usize, f64)>
}

impl TryFrom<Triplets> for SparseMatrix {

    type Error = ResizeError;

    fn try_from(t : Triplets) -> Result<Self, ResizeError> {
        SparseMatrix::from_triplets(t.nrows, t.ncols, t.entries)
    }

}

impl SparseMatrix {

    /// Builds a matrix from an arbitrary sequence of triplets. When the same
    /// position appears more than once, the last value wins. Explicit zeros are
    /// discarded. Out-of-range positions and non-finite values are rejected.
    pub fn from_triplets<I>(nrows : usize, ncols : usize, triplets : I) -> Result<Self, ResizeError>
        where I : IntoIterator<Item=(usize, usize, f64)>
    {
        let mut map = BTreeMap::new();
        for (r, c, v) in triplets {
            if r >= nrows || c >= ncols {
                return Err(ResizeError::invalid_matrix(
                    format!("Entry ({}, {}) outside {}x{} shape", r, c, nrows, ncols)
                ));
            }
            if !v.is_finite() {
                return Err(ResizeError::invalid_matrix(
                    format!("Non-finite value {} at ({}, {})", v, r, c)
                ));
            }
            map.insert((r, c), v);
        }
        let entries = map.into_iter()
            .filter(|(_, v)| *v != 0.0 )
            .map(|((r, c), v)| (r, c, v) )
            .collect();
        Ok(Self { nrows, ncols, entries })
    }

    /// Builds a matrix from triplets by summing values that share a
    /// position. Used by algorithms that scatter contributions forward.
    pub(crate) fn from_accumulated(n : usize, acc : BTreeMap<(usize, usize), f64>, tol : f64) -> Self {
        let entries = acc.into_iter()
            .filter(|(_, v)| v.abs() > tol )
            .map(|((r, c), v)| (r, c, v) )
            .collect();
        Self { nrows : n, ncols : n, entries }
    }

    /// Copy without the entries whose magnitude is at or below tol.
    pub fn pruned(&self, tol : f64) -> Self {
        let entries = self.entries.iter().filter(|e| e.2.abs() > tol ).cloned().collect();
        Self { nrows : self.nrows, ncols : self.ncols, entries }
    }

    pub fn zeros(n : usize) -> Self {
        Self { nrows : n, ncols : n, entries : Vec::new() }
    }

    pub fn identity(n : usize) -> Self {
        Self { nrows : n, ncols : n, entries : (0..n).map(|i| (i, i, 1.0) ).collect() }
    }

    /// Re-sparsifies a dense matrix, keeping entries with |v| > tol.
    pub fn from_dense(dense : &DMatrix<f64>, tol : f64) -> Self {
        let (nrows, ncols) = dense.shape();
        let mut entries = Vec::new();
        for r in 0..nrows {
            for c in 0..ncols {
                let v = dense[(r, c)];
                if v.is_finite() && v.abs() > tol {
                    entries.push((r, c, v));
                }
            }
        }
        Self { nrows, ncols, entries }
    }

    /// Materializes the full nrows x ncols grid. Memory grows with the square
    /// of the dimension regardless of how many entries are stored.
    pub fn to_dense(&self) -> DMatrix<f64> {
        let mut dense = DMatrix::zeros(self.nrows, self.ncols);
        for &(r, c, v) in self.entries.iter() {
            dense[(r, c)] = v;
        }
        dense
    }

    pub fn shape(&self) -> (usize, usize) {
        (self.nrows, self.ncols)
    }

    pub fn nrows(&self) -> usize {
        self.nrows
    }

    pub fn ncols(&self) -> usize {
        self.ncols
    }

    pub fn is_square(&self) -> bool {
        self.nrows == self.ncols
    }

    pub fn nnz(&self) -> usize {
        self.entries.len()
    }

    /// Entries in row-major order.
    pub fn iter<'a>(&'a self) -> impl Iterator<Item=(usize, usize, f64)> + 'a {
        self.entries.iter().cloned()
    }

    pub fn triplets(&self) -> &[(usize, usize, f64)] {
        &self.entries[..]
    }

    pub fn get(&self, row : usize, col : usize) -> f64 {
        match self.entries.binary_search_by(|&(r, c, _)| (r, c).cmp(&(row, col)) ) {
            Ok(ix) => self.entries[ix].2,
            Err(_) => 0.0
        }
    }

    pub fn sum(&self) -> f64 {
        self.entries.iter().map(|e| e.2 ).sum()
    }

    /// Whether both matrices have the same shape and all positions
    /// (stored or implicit) agree within tol.
    pub fn approx_eq(&self, other : &Self, tol : f64) -> bool {
        if self.shape() != other.shape() {
            return false;
        }
        let mut diff : BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for &(r, c, v) in self.entries.iter() {
            *diff.entry((r, c)).or_insert(0.0) += v;
        }
        for &(r, c, v) in other.entries.iter() {
            *diff.entry((r, c)).or_insert(0.0) -= v;
        }
        diff.values().all(|d| d.abs() <= tol )
    }

}
