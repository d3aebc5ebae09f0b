//! Indexed triangle mesh.

use crate::{Aabb, MeshBounds, MeshTopology, Triangle, Vertex};
use nalgebra::{Point3, Vector3};

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// An indexed triangle mesh.
///
/// Vertices and faces are stored separately; each face is a triple of
/// indices into `vertices` with counter-clockwise winding seen from outside.
///
/// # Example
///
/// ```
/// use mesh_types::{IndexedMesh, MeshTopology, Vertex};
///
/// let mesh = IndexedMesh::from_parts(
///     vec![
///         Vertex::from_coords(0.0, 0.0, 0.0),
///         Vertex::from_coords(1.0, 0.0, 0.0),
///         Vertex::from_coords(0.0, 1.0, 0.0),
///     ],
///     vec![[0, 1, 2]],
/// );
/// assert_eq!(mesh.vertex_count(), 3);
/// assert!(mesh.triangle(0).is_some());
/// ```
#[derive(Debug, Clone, Default)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IndexedMesh {
    /// Vertex data.
    pub vertices: Vec<Vertex>,

    /// Triangle faces as indices into the vertex array.
    pub faces: Vec<[u32; 3]>,
}

impl IndexedMesh {
    /// Create an empty mesh.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
        }
    }

    /// Create an empty mesh with room for the given counts.
    #[inline]
    #[must_use]
    pub fn with_capacity(vertex_count: usize, face_count: usize) -> Self {
        Self {
            vertices: Vec::with_capacity(vertex_count),
            faces: Vec::with_capacity(face_count),
        }
    }

    /// Create a mesh from vertices and faces.
    #[inline]
    #[must_use]
    pub const fn from_parts(vertices: Vec<Vertex>, faces: Vec<[u32; 3]>) -> Self {
        Self { vertices, faces }
    }

    /// Create a mesh from flat coordinate and index arrays.
    ///
    /// Returns an empty mesh if either array length is not a multiple of 3.
    #[must_use]
    pub fn from_raw(positions: &[f64], indices: &[u32]) -> Self {
        if positions.len() % 3 != 0 || indices.len() % 3 != 0 {
            return Self::new();
        }

        Self {
            vertices: positions
                .chunks_exact(3)
                .map(|c| Vertex::from_coords(c[0], c[1], c[2]))
                .collect(),
            faces: indices.chunks_exact(3).map(|c| [c[0], c[1], c[2]]).collect(),
        }
    }

    /// Position of a vertex, or `None` if out of range.
    #[inline]
    #[must_use]
    pub fn position(&self, index: u32) -> Option<&Point3<f64>> {
        self.vertices.get(index as usize).map(|v| &v.position)
    }

    /// Translate every vertex.
    pub fn translate(&mut self, offset: Vector3<f64>) {
        for vertex in &mut self.vertices {
            vertex.position += offset;
        }
    }

    /// Scale every vertex about the origin.
    pub fn scale(&mut self, factor: f64) {
        for vertex in &mut self.vertices {
            vertex.position.coords *= factor;
        }
    }

    /// Fit the mesh into the unit box `[0, 1]^3`.
    ///
    /// The minimum corner moves to the origin and the mesh is scaled
    /// uniformly so its longest bounding-box edge becomes 1. Returns the
    /// applied `(offset, scale)` so callers can map results back, or `None`
    /// when the mesh has no extent and was left untouched.
    pub fn normalize_to_unit_box(&mut self) -> Option<(Vector3<f64>, f64)> {
        let bounds = self.bounds();
        let extent = bounds.max_extent();
        if bounds.is_empty() || extent <= 0.0 {
            return None;
        }

        let offset = -bounds.min.coords;
        let factor = 1.0 / extent;
        self.translate(offset);
        self.scale(factor);
        Some((offset, factor))
    }
}

impl MeshTopology for IndexedMesh {
    #[inline]
    fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    #[inline]
    fn face_count(&self) -> usize {
        self.faces.len()
    }

    fn face(&self, index: usize) -> Option<[u32; 3]> {
        self.faces.get(index).copied()
    }

    fn triangle(&self, face_index: usize) -> Option<Triangle> {
        let [a, b, c] = self.face(face_index)?;
        Some(Triangle::new(
            *self.position(a)?,
            *self.position(b)?,
            *self.position(c)?,
        ))
    }
}

impl MeshBounds for IndexedMesh {
    fn bounds(&self) -> Aabb {
        Aabb::from_points(self.vertices.iter().map(|v| &v.position))
    }
}

/// Closed cube of edge length `size` centered at the origin.
///
/// Twelve triangles with outward (counter-clockwise) winding; every square
/// face is split along one diagonal.
///
/// # Example
///
/// ```
/// use mesh_types::{centered_cube, MeshBounds, MeshTopology};
///
/// let cube = centered_cube(1.0);
/// assert_eq!(cube.face_count(), 12);
/// assert!((cube.bounds().min.z + 0.5).abs() < 1e-12);
/// ```
#[must_use]
pub fn centered_cube(size: f64) -> IndexedMesh {
    let h = size * 0.5;
    let mut mesh = IndexedMesh::with_capacity(8, 12);

    for &(x, y, z) in &[
        (-h, -h, -h),
        (h, -h, -h),
        (h, h, -h),
        (-h, h, -h),
        (-h, -h, h),
        (h, -h, h),
        (h, h, h),
        (-h, h, h),
    ] {
        mesh.vertices.push(Vertex::from_coords(x, y, z));
    }

    mesh.faces.extend_from_slice(&[
        // -Z
        [0, 2, 1],
        [0, 3, 2],
        // +Z
        [4, 5, 6],
        [4, 6, 7],
        // -Y
        [0, 1, 5],
        [0, 5, 4],
        // +Y
        [3, 7, 6],
        [3, 6, 2],
        // -X
        [0, 4, 7],
        [0, 7, 3],
        // +X
        [1, 2, 6],
        [1, 6, 5],
    ]);

    mesh
}
