//! Traits describing a read-only mesh source.

use crate::{Aabb, Triangle};

/// Minimal topology interface the intersection code is written against.
pub trait MeshTopology {
    /// Number of vertices.
    fn vertex_count(&self) -> usize;

    /// Number of triangular faces.
    fn face_count(&self) -> usize;

    /// Whether the mesh has no faces to query.
    fn is_empty(&self) -> bool {
        self.vertex_count() == 0 || self.face_count() == 0
    }

    /// Vertex indices of a face, or `None` if `index` is out of range.
    fn face(&self, index: usize) -> Option<[u32; 3]>;

    /// Resolved triangle for a face.
    ///
    /// Returns `None` if the face or any of its vertex indices is out of
    /// range.
    fn triangle(&self, face_index: usize) -> Option<Triangle>;
}

/// Types that know their bounding volume.
pub trait MeshBounds {
    /// Axis-aligned bounding box; empty if there are no vertices.
    fn bounds(&self) -> Aabb;
}
