use std::collections::{BTreeMap, VecDeque};
use petgraph::graph::{UnGraph, NodeIndex};
use crate::matrix::SparseMatrix;
use crate::error::ResizeError;

/// Undirected affinity structure of a square matrix: one node per row/column
/// and one edge per stored entry (self-loops included), weighted by |value|.
pub fn affinity_graph(matrix : &SparseMatrix) -> UnGraph<usize, f64> {
    let n = matrix.nrows();
    let mut graph = UnGraph::with_capacity(n, matrix.nnz());
    let nodes : Vec<NodeIndex> = (0..n).map(|i| graph.add_node(i) ).collect();
    for (r, c, v) in matrix.iter() {
        graph.add_edge(nodes[r], nodes[c], v.abs());
    }
    graph
}

/// Breadth-first node order: components are entered at their lowest-index
/// node, in index order, and neighbours are visited in index order. Nodes that
/// are adjacent in the graph end up close in the ordering.
pub fn traversal_order(graph : &UnGraph<usize, f64>) -> Vec<usize> {
    let n = graph.node_count();
    let mut visited = vec![false; n];
    let mut order = Vec::with_capacity(n);
    let mut queue = VecDeque::new();
    for start in 0..n {
        if visited[start] {
            continue;
        }
        visited[start] = true;
        queue.push_back(start);
        while let Some(u) = queue.pop_front() {
            order.push(u);
            let mut neigh : Vec<usize> = graph.neighbors(NodeIndex::new(u))
                .map(|ix| ix.index() )
                .filter(|&v| !visited[v] )
                .collect();
            neigh.sort_unstable();
            neigh.dedup();
            for v in neigh {
                visited[v] = true;
                queue.push_back(v);
            }
        }
    }
    order
}

/// Contiguous block of target nodes that source node i expands into when n
/// nodes are split into target >= n nodes.
fn expansion_block(i : usize, n : usize, target : usize) -> std::ops::Range<usize> {
    (i * target / n)..((i + 1) * target / n)
}

fn contract(matrix : &SparseMatrix, target : usize) -> SparseMatrix {
    let n = matrix.nrows();
    let order = traversal_order(&affinity_graph(matrix));
    let mut group = vec![0; n];
    for (pos, node) in order.into_iter().enumerate() {
        group[node] = pos * target / n;
    }
    let mut acc : BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for (r, c, v) in matrix.iter() {
        *acc.entry((group[r], group[c])).or_insert(0.0) += v;
    }
    SparseMatrix::from_accumulated(target, acc, 0.0)
}

fn expand(matrix : &SparseMatrix, target : usize) -> SparseMatrix {
    let n = matrix.nrows();
    let mut acc : BTreeMap<(usize, usize), f64> = BTreeMap::new();
    for (r, c, v) in matrix.iter() {
        let rows = expansion_block(r, n, target);
        let cols = expansion_block(c, n, target);
        let share = v / (rows.len() * cols.len()) as f64;
        for a in rows {
            for b in cols.clone() {
                *acc.entry((a, b)).or_insert(0.0) += share;
            }
        }
    }
    SparseMatrix::from_accumulated(target, acc, 0.0)
}

/// Graph-based resize. The matrix is read as a weighted adjacency structure.
///
/// Downscaling contracts nodes into `target` groups of consecutive nodes in
/// breadth-first order and sums the edge weights between every pair of groups
/// (quotient graph). Upscaling splits node i into the contiguous block of
/// nodes [i * target / n, (i + 1) * target / n) and spreads every edge weight
/// uniformly over the block pairs. Both directions preserve the total edge
/// weight. An empty matrix or one without edges has no structure to resample
/// and fails with ComputationError.
pub fn resize_graph(matrix : &SparseMatrix, target : usize) -> Result<SparseMatrix, ResizeError> {
    let n = matrix.nrows();
    if n == 0 {
        return Err(ResizeError::computation("Graph resize of an empty (0-node) graph"));
    }
    if matrix.nnz() == 0 {
        return Err(ResizeError::computation("Graph resize of a graph without edges"));
    }
    if target == n {
        return Ok(matrix.clone());
    }
    if target < n {
        Ok(contract(matrix, target))
    } else {
        Ok(expand(matrix, target))
    }
}
