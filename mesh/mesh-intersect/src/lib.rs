//! Ray/mesh crossing queries along a fixed direction.
//!
//! Embedding a skeleton needs many ray casts through the character mesh, all
//! along the same direction. [`MeshIntersector`] pays a one-time cost to
//! project the mesh onto the plane perpendicular to that direction and bucket
//! the projected triangles into a uniform grid. Each query then tests only
//! the triangles in one grid cell.
//!
//! - [`MeshIntersector`] - The query object
//! - [`RayHit`] - One crossing: point, face and signed distance
//! - [`IntersectParams`] - Grid resolution and tolerance knobs
//! - [`ProjectedBasis`] / [`Bounds2`] - The projected plane
//! - [`GridLayout`] / [`TriangleGrid`] - The bucket grid
//!
//! # Layer 0 Crate
//!
//! This is a Layer 0 crate with **zero Bevy dependencies**. Large meshes are
//! indexed on the rayon pool; queries are read-only and may run from any
//! number of threads.
//!
//! # Edge Handling
//!
//! A ray through an edge or vertex shared by several triangles reports one
//! crossing there, not one per triangle. Points on an edge belong to the
//! triangle for which that edge is a top or left edge in the projected plane.
//!
//! # Example
//!
//! ```
//! use mesh_intersect::{IntersectParams, MeshIntersector};
//! use mesh_types::centered_cube;
//! use nalgebra::{Point3, Vector3};
//!
//! let cube = centered_cube(2.0);
//! let params = IntersectParams::coarse();
//! let intersector = MeshIntersector::with_params(&cube, Vector3::y(), &params).unwrap();
//!
//! let mut faces = Vec::new();
//! let points = intersector.intersect_with_faces(&Point3::new(0.3, -4.0, 0.2), &mut faces);
//! assert_eq!(points.len(), 2);
//! assert_eq!(faces.len(), 2);
//! assert!(points[0].y < points[1].y);
//! ```

#![cfg_attr(not(test), deny(clippy::unwrap_used, clippy::expect_used))]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]

mod error;
mod grid;
mod intersector;
mod params;
mod projection;

pub use error::{IntersectError, IntersectResult};
pub use grid::{GridLayout, TriangleGrid};
pub use intersector::{MeshIntersector, ProjectedTriangle, RayHit};
pub use params::IntersectParams;
pub use projection::{Bounds2, ProjectedBasis};
