//! Error types for intersector construction.

use thiserror::Error;

/// Result type for intersector operations.
pub type IntersectResult<T> = Result<T, IntersectError>;

/// Errors that can occur while building a [`MeshIntersector`](crate::MeshIntersector).
///
/// Degenerate triangles are not errors; they are left out of the index.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IntersectError {
    /// The query direction is zero or not finite.
    #[error("query direction must be a finite non-zero vector, got ({x}, {y}, {z})")]
    InvalidDirection {
        /// X component.
        x: f64,
        /// Y component.
        y: f64,
        /// Z component.
        z: f64,
    },

    /// A face references a vertex that does not exist.
    #[error("face {face} references vertex {vertex}, but the mesh has {vertex_count} vertices")]
    InvalidFace {
        /// Index of the offending face.
        face: usize,
        /// The out-of-range vertex index.
        vertex: u32,
        /// Number of vertices in the mesh.
        vertex_count: usize,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_name_the_culprit() {
        let err = IntersectError::InvalidFace {
            face: 3,
            vertex: 99,
            vertex_count: 8,
        };
        let msg = err.to_string();
        assert!(msg.contains("face 3"));
        assert!(msg.contains("99"));

        let err = IntersectError::InvalidDirection {
            x: 0.0,
            y: 0.0,
            z: 0.0,
        };
        assert!(err.to_string().contains("non-zero"));
    }
}
