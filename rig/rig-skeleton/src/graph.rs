//! Undirected joint graph with rest positions.

use nalgebra::Point3;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Joints as graph vertices, bones as undirected edges.
///
/// Both the full and the compressed skeleton are stored this way. Each edge
/// is kept in the neighbor lists of both of its endpoints.
#[derive(Debug, Clone, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct SkeletonGraph {
    positions: Vec<Point3<f64>>,
    edges: Vec<Vec<usize>>,
}

impl SkeletonGraph {
    /// An empty graph.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            positions: Vec::new(),
            edges: Vec::new(),
        }
    }

    /// An empty graph with room for `joints` vertices.
    #[must_use]
    pub fn with_capacity(joints: usize) -> Self {
        Self {
            positions: Vec::with_capacity(joints),
            edges: Vec::with_capacity(joints),
        }
    }

    /// Add a vertex and return its index.
    pub fn add_vertex(&mut self, position: Point3<f64>) -> usize {
        self.positions.push(position);
        self.edges.push(Vec::new());
        self.positions.len() - 1
    }

    /// Connect `a` and `b`. Out-of-range indices are ignored.
    pub fn add_edge(&mut self, a: usize, b: usize) {
        if a >= self.len() || b >= self.len() {
            return;
        }
        self.edges[a].push(b);
        self.edges[b].push(a);
    }

    /// Number of vertices.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// Whether the graph has no vertices.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// Position of a vertex.
    #[inline]
    #[must_use]
    pub fn position(&self, vertex: usize) -> Option<&Point3<f64>> {
        self.positions.get(vertex)
    }

    /// All positions, indexed by vertex.
    #[inline]
    #[must_use]
    pub fn positions(&self) -> &[Point3<f64>] {
        &self.positions
    }

    /// Neighbors of a vertex; empty when out of range.
    #[inline]
    #[must_use]
    pub fn neighbors(&self, vertex: usize) -> &[usize] {
        self.edges.get(vertex).map_or(&[], |n| n.as_slice())
    }

    /// Number of edges at a vertex.
    #[inline]
    #[must_use]
    pub fn degree(&self, vertex: usize) -> usize {
        self.neighbors(vertex).len()
    }

    /// Total number of edges.
    #[must_use]
    pub fn edge_count(&self) -> usize {
        self.edges.iter().map(Vec::len).sum::<usize>() / 2
    }

    /// Multiply every position by `factor`.
    pub fn scale(&mut self, factor: f64) {
        for p in &mut self.positions {
            *p *= factor;
        }
    }

    /// Whether the graph is a tree: connected with `n - 1` edges.
    ///
    /// The empty graph counts as a tree.
    #[must_use]
    pub fn is_tree(&self) -> bool {
        let n = self.len();
        if n == 0 {
            return true;
        }
        if self.edge_count() != n - 1 {
            return false;
        }

        let mut seen = vec![false; n];
        let mut stack = vec![0];
        seen[0] = true;
        let mut reached = 1;
        while let Some(v) = stack.pop() {
            for &w in self.neighbors(v) {
                if !seen[w] {
                    seen[w] = true;
                    reached += 1;
                    stack.push(w);
                }
            }
        }
        reached == n
    }
}
