use std::collections::BTreeMap;
use crate::matrix::SparseMatrix;

/// Resampling weights along one axis, stored in scatter form: for every
/// source index, the target indices it contributes to and the weight of
/// each contribution. Because the resizers below are separable and operate on
/// square matrices, the same map is applied to rows and columns, and a source
/// entry (r, c, v) contributes v * wr * wc to every target pair reachable from
/// r and c. Applying a map costs O(nnz * support^2) and never materializes the
/// dense target grid.
#[derive(Debug, Clone)]
pub struct AxisMap {
    scatter : Vec<Vec<(usize, f64)>>
}

impl AxisMap {

    /// Inverts a gather table (for every target index, the weighted source
    /// indices it reads) into scatter form.
    pub fn from_gather(src_len : usize, gather : Vec<Vec<(usize, f64)>>) -> Self {
        let mut scatter = vec![Vec::new(); src_len];
        for (t, row) in gather.into_iter().enumerate() {
            for (s, w) in row {
                if w != 0.0 {
                    scatter[s].push((t, w));
                }
            }
        }
        Self { scatter }
    }

    /// Maps target index i to source index floor(i * src / tgt), inverting the
    /// relation exactly with integer arithmetic: source s is read by every
    /// target i in [ceil(s * tgt / src), ceil((s + 1) * tgt / src)).
    pub fn nearest(src : usize, tgt : usize) -> Self {
        let scatter = (0..src).map(|s| {
            let first = div_ceil(s * tgt, src);
            let last = div_ceil((s + 1) * tgt, src).min(tgt);
            (first..last).map(|t| (t, 1.0) ).collect()
        }).collect();
        Self { scatter }
    }

    /// Builds weights from a continuous kernel evaluated at the half-pixel
    /// aligned source coordinate of every target index. When stretch is set and
    /// the target is smaller than the source, the kernel is widened by the
    /// scale factor so that it acts as a low-pass filter. Out-of-range source
    /// indices are clamped (edge replication) and weights are normalized to
    /// sum to one per target index.
    pub fn kernel<K>(src : usize, tgt : usize, support : f64, stretch : bool, k : K) -> Self
        where K : Fn(f64) -> f64
    {
        let scale = src as f64 / tgt as f64;
        let fs = if stretch && scale > 1.0 { scale } else { 1.0 };
        let radius = support * fs;
        let last = src as i64 - 1;
        let gather = (0..tgt).map(|t| {
            let x = source_coordinate(t, scale);
            let lo = (x - radius).ceil() as i64;
            let hi = (x + radius).floor() as i64;
            let mut row : Vec<(usize, f64)> = Vec::with_capacity((hi - lo + 1).max(0) as usize);
            for j in lo..=hi {
                let w = k((j as f64 - x) / fs);
                if w != 0.0 {
                    row.push((j.max(0).min(last) as usize, w));
                }
            }
            normalize(&mut row);
            row
        }).collect();
        Self::from_gather(src, gather)
    }

    pub fn targets(&self, src_ix : usize) -> &[(usize, f64)] {
        &self.scatter[src_ix][..]
    }

    pub fn len(&self) -> usize {
        self.scatter.len()
    }

    /// Forward-maps every stored entry of a square matrix through this map on
    /// both axes, accumulating into a target x target matrix. Accumulated
    /// values with magnitude at or below tol are dropped.
    pub fn apply(&self, m : &SparseMatrix, target : usize, tol : f64) -> SparseMatrix {
        let mut acc : BTreeMap<(usize, usize), f64> = BTreeMap::new();
        for (r, c, v) in m.iter() {
            let rows = self.targets(r);
            let cols = self.targets(c);
            for &(tr, wr) in rows {
                for &(tc, wc) in cols {
                    *acc.entry((tr, tc)).or_insert(0.0) += v * wr * wc;
                }
            }
        }
        SparseMatrix::from_accumulated(target, acc, tol)
    }

}

/// Continuous source coordinate of target index t under half-pixel alignment.
pub fn source_coordinate(t : usize, scale : f64) -> f64 {
    (t as f64 + 0.5) * scale - 0.5
}

fn normalize(row : &mut Vec<(usize, f64)>) {
    let total : f64 = row.iter().map(|(_, w)| *w ).sum();
    if total.abs() > f64::EPSILON {
        row.iter_mut().for_each(|(_, w)| *w /= total );
    }
}

fn div_ceil(a : usize, b : usize) -> usize {
    (a + b - 1) / b
}
