//! Core mesh types for the rigging pipeline.
//!
//! This crate provides the read-only mesh source that the rigging crates
//! query against:
//!
//! - [`Vertex`] - A point on the character surface
//! - [`IndexedMesh`] - A triangle mesh with indexed vertices
//! - [`Triangle`] - A concrete triangle with resolved vertex positions
//! - [`Aabb`] - Axis-aligned bounding box (the mesh's bounding volume)
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. Mesh loading is
//! left to the caller; this crate only describes the data.
//!
//! # Normalized Space
//!
//! Skeleton templates are authored so that they fit a character normalized
//! to the unit box `[0, 1]^3`. [`IndexedMesh::normalize_to_unit_box`] puts a
//! mesh into that space.
//!
//! # Example
//!
//! ```
//! use mesh_types::{IndexedMesh, MeshBounds, MeshTopology, Vertex};
//!
//! let mut mesh = IndexedMesh::new();
//! mesh.vertices.push(Vertex::from_coords(0.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(4.0, 0.0, 0.0));
//! mesh.vertices.push(Vertex::from_coords(0.0, 2.0, 0.0));
//! mesh.faces.push([0, 1, 2]);
//!
//! mesh.normalize_to_unit_box();
//! assert_eq!(mesh.face_count(), 1);
//! assert!((mesh.bounds().max.x - 1.0).abs() < 1e-12);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod bounds;
mod mesh;
mod traits;
mod triangle;
mod vertex;

pub use bounds::Aabb;
pub use mesh::{IndexedMesh, centered_cube};
pub use traits::{MeshBounds, MeshTopology};
pub use triangle::Triangle;
pub use vertex::Vertex;

// Re-export nalgebra types for convenience
pub use nalgebra::{Point3, Vector3};
