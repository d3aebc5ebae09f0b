//! Repeated ray queries against a mesh along one fixed direction.

// Mean footprints divide by triangle counts.
#![allow(clippy::cast_precision_loss)]

use mesh_types::{IndexedMesh, MeshTopology, Triangle};
use nalgebra::{Point2, Point3, Vector2, Vector3};
use rayon::prelude::*;
use tracing::{debug, info};

use crate::error::{IntersectError, IntersectResult};
use crate::grid::{GridLayout, TriangleGrid};
use crate::params::IntersectParams;
use crate::projection::{Bounds2, ProjectedBasis};

/// A mesh triangle expressed in the projected plane.
///
/// Corners are stored counter-clockwise in `(u, v)` coordinates. The scaled
/// normal `n / (n · dir)` turns the ray/plane solve into one dot product.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedTriangle {
    face: usize,
    corners: [Point2<f64>; 3],
    anchor: Point3<f64>,
    scaled_normal: Vector3<f64>,
}

impl ProjectedTriangle {
    /// Project `triangle` (mesh face `face`) into `basis`.
    ///
    /// Returns `None` when the triangle is degenerate or (near-)parallel to
    /// the query direction; such triangles have no stable ray parameter.
    #[must_use]
    pub fn new(
        face: usize,
        triangle: &Triangle,
        basis: &ProjectedBasis,
        params: &IntersectParams,
    ) -> Option<Self> {
        if triangle.is_degenerate(params.degenerate_area) {
            return None;
        }
        let dir = basis.direction();
        let normal = triangle.normal_unnormalized();
        let cos = triangle.normal()?.dot(&dir);
        if cos.abs() <= params.parallel_epsilon {
            return None;
        }

        let mut corners = triangle.vertices().map(|p| basis.project(&p));
        let orientation = cross2(&(corners[1] - corners[0]), &(corners[2] - corners[0]));
        if orientation == 0.0 {
            return None;
        }
        if orientation < 0.0 {
            corners.swap(1, 2);
        }

        Some(Self {
            face,
            corners,
            anchor: triangle.v0,
            scaled_normal: normal / normal.dot(&dir),
        })
    }

    /// Source face index in the mesh.
    #[inline]
    #[must_use]
    pub const fn face(&self) -> usize {
        self.face
    }

    /// Projected corners, counter-clockwise.
    #[inline]
    #[must_use]
    pub const fn corners(&self) -> &[Point2<f64>; 3] {
        &self.corners
    }

    /// Bounding rectangle of the projected corners.
    #[must_use]
    pub fn footprint(&self) -> Bounds2 {
        Bounds2::from_points(&self.corners)
    }

    /// Whether the projected point falls in this triangle.
    ///
    /// Interior points are always inside. A point exactly on an edge belongs
    /// to the triangle only if that edge is a top or left edge, so a point on
    /// an edge shared by two same-facing triangles is claimed once.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        (0..3).all(|i| {
            let a = &self.corners[i];
            let b = &self.corners[(i + 1) % 3];
            let side = edge_side(a, b, point);
            side > 0.0 || (side == 0.0 && owns_edge(&(b - a)))
        })
    }

    /// Signed distance along the unit direction from `origin` to this
    /// triangle's plane.
    #[inline]
    #[must_use]
    pub fn ray_parameter(&self, origin: &Point3<f64>) -> f64 {
        (self.anchor - origin).dot(&self.scaled_normal)
    }
}

#[inline]
fn cross2(a: &Vector2<f64>, b: &Vector2<f64>) -> f64 {
    a.x * b.y - a.y * b.x
}

/// Side of `point` relative to the directed edge `a -> b`, positive on the
/// left.
///
/// The product is always formed from the lexicographically smaller endpoint,
/// so the two triangles sharing an edge get exactly opposite values and
/// never both (or neither) claim a point near it.
#[inline]
fn edge_side(a: &Point2<f64>, b: &Point2<f64>, point: &Point2<f64>) -> f64 {
    let forward = a.x.total_cmp(&b.x).then(a.y.total_cmp(&b.y)).is_le();
    if forward {
        cross2(&(b - a), &(point - a))
    } else {
        -cross2(&(a - b), &(point - b))
    }
}

#[inline]
#[allow(clippy::float_cmp)]
fn owns_edge(d: &Vector2<f64>) -> bool {
    d.y < 0.0 || (d.y == 0.0 && d.x < 0.0)
}

/// One surface crossing along a query ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// Point on the mesh surface.
    pub point: Point3<f64>,
    /// Index of the crossed face.
    pub face: usize,
    /// Signed distance from the query point along the direction.
    pub distance: f64,
}

/// Precomputed index answering "where does the ray through `p` along `dir`
/// cross the surface?" for many `p` and one `dir`.
///
/// The intersector borrows the mesh; the mesh cannot change while the
/// intersector exists. After construction every query takes `&self`, so one
/// instance can be shared across threads.
///
/// # Example
///
/// ```
/// use mesh_intersect::MeshIntersector;
/// use mesh_types::centered_cube;
/// use nalgebra::{Point3, Vector3};
///
/// let cube = centered_cube(1.0);
/// let intersector = MeshIntersector::new(&cube, Vector3::z()).unwrap();
///
/// let hits = intersector.intersect(&Point3::new(0.0, 0.0, -5.0));
/// assert_eq!(hits.len(), 2);
/// assert!((hits[0].z + 0.5).abs() < 1e-12);
/// assert!((hits[1].z - 0.5).abs() < 1e-12);
///
/// assert!(intersector.is_inside(&Point3::new(0.1, 0.2, 0.0)));
/// assert!(intersector.intersect(&Point3::new(3.0, 0.0, 0.0)).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct MeshIntersector<'a> {
    mesh: &'a IndexedMesh,
    basis: ProjectedBasis,
    triangles: Vec<ProjectedTriangle>,
    grid: TriangleGrid,
}

impl<'a> MeshIntersector<'a> {
    /// Build an intersector with default parameters.
    ///
    /// # Errors
    ///
    /// See [`MeshIntersector::with_params`].
    pub fn new(mesh: &'a IndexedMesh, direction: Vector3<f64>) -> IntersectResult<Self> {
        Self::with_params(mesh, direction, &IntersectParams::default())
    }

    /// Build an intersector for `mesh` along `direction`.
    ///
    /// Degenerate triangles and triangles parallel to `direction` are left
    /// out of the index. Meshes with at least
    /// [`IntersectParams::parallel_threshold`] faces are projected and
    /// bucketed on the rayon pool.
    ///
    /// # Errors
    ///
    /// - [`IntersectError::InvalidDirection`] if `direction` is zero or not
    ///   finite.
    /// - [`IntersectError::InvalidFace`] if a face references a missing
    ///   vertex.
    pub fn with_params(
        mesh: &'a IndexedMesh,
        direction: Vector3<f64>,
        params: &IntersectParams,
    ) -> IntersectResult<Self> {
        let basis = ProjectedBasis::new(direction)?;
        validate_faces(mesh)?;

        let face_count = mesh.face_count();
        let parallel = face_count >= params.parallel_threshold;

        let project = |face: usize| {
            mesh.triangle(face)
                .and_then(|tri| ProjectedTriangle::new(face, &tri, &basis, params))
        };
        let triangles: Vec<ProjectedTriangle> = if parallel {
            (0..face_count).into_par_iter().filter_map(project).collect()
        } else {
            (0..face_count).filter_map(project).collect()
        };

        let footprints: Vec<Bounds2> = triangles.iter().map(ProjectedTriangle::footprint).collect();
        let mut bounds = Bounds2::empty();
        let mut extent_sum = (0.0, 0.0);
        for footprint in &footprints {
            bounds.union(footprint);
            let (w, h) = footprint.size();
            extent_sum.0 += w;
            extent_sum.1 += h;
        }
        let mean_footprint = if footprints.is_empty() {
            (0.0, 0.0)
        } else {
            let n = footprints.len() as f64;
            (extent_sum.0 / n, extent_sum.1 / n)
        };

        let layout = GridLayout::fitted(
            bounds,
            mean_footprint,
            params.cell_scale,
            params.max_cells_per_axis,
        );
        let grid = TriangleGrid::build(layout, &footprints, parallel);

        let (cells_x, cells_y) = layout.dimensions();
        info!(
            faces = face_count,
            indexed = triangles.len(),
            excluded = face_count - triangles.len(),
            cells_x,
            cells_y,
            parallel,
            "Built mesh intersector"
        );
        debug!(
            entries = grid.entry_count(),
            max_cell = grid.max_cell_len(),
            "Intersector grid occupancy"
        );

        Ok(Self {
            mesh,
            basis,
            triangles,
            grid,
        })
    }

    /// The mesh being queried.
    #[must_use]
    pub const fn mesh(&self) -> &'a IndexedMesh {
        self.mesh
    }

    /// Unit query direction.
    #[must_use]
    pub const fn direction(&self) -> Vector3<f64> {
        self.basis.direction()
    }

    /// Projection frame.
    #[must_use]
    pub const fn basis(&self) -> &ProjectedBasis {
        &self.basis
    }

    /// Query domain in the projected plane.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds2 {
        self.grid.layout().bounds()
    }

    /// Grid resolution `(cells_x, cells_y)`.
    #[must_use]
    pub const fn grid_dimensions(&self) -> (usize, usize) {
        self.grid.layout().dimensions()
    }

    /// Number of faces in the index.
    #[must_use]
    pub fn indexed_count(&self) -> usize {
        self.triangles.len()
    }

    /// Number of faces left out as degenerate or parallel.
    #[must_use]
    pub fn excluded_count(&self) -> usize {
        self.mesh.face_count() - self.triangles.len()
    }

    /// How many triangles the grid offers for the ray through `point`.
    #[must_use]
    pub fn candidate_count(&self, point: &Point3<f64>) -> usize {
        self.grid.candidates(&self.basis.project(point)).len()
    }

    /// Surface crossings of the line through `point` along the direction,
    /// nearest first by signed distance.
    ///
    /// Hits behind `point` have negative distance. Points projecting outside
    /// the query domain return no hits.
    #[must_use]
    pub fn hits(&self, point: &Point3<f64>) -> Vec<RayHit> {
        let projected = self.basis.project(point);
        let dir = self.basis.direction();

        let mut hits: Vec<RayHit> = self
            .grid
            .candidates(&projected)
            .iter()
            .filter_map(|&i| self.triangles.get(i))
            .filter(|tri| tri.contains(&projected))
            .map(|tri| {
                let distance = tri.ray_parameter(point);
                RayHit {
                    point: point + dir * distance,
                    face: tri.face(),
                    distance,
                }
            })
            .collect();

        hits.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        hits
    }

    /// Crossing points ordered by signed distance along the direction.
    #[must_use]
    pub fn intersect(&self, point: &Point3<f64>) -> Vec<Point3<f64>> {
        self.hits(point).into_iter().map(|h| h.point).collect()
    }

    /// Like [`intersect`](Self::intersect), also filling `faces` with the
    /// crossed face of each returned point, in the same order.
    ///
    /// `faces` is cleared first.
    pub fn intersect_with_faces(
        &self,
        point: &Point3<f64>,
        faces: &mut Vec<usize>,
    ) -> Vec<Point3<f64>> {
        let hits = self.hits(point);
        faces.clear();
        faces.extend(hits.iter().map(|h| h.face));
        hits.into_iter().map(|h| h.point).collect()
    }

    /// Odd-crossings test: whether `point` is inside a closed mesh.
    ///
    /// Counts crossings strictly ahead of `point` along the direction.
    #[must_use]
    pub fn is_inside(&self, point: &Point3<f64>) -> bool {
        self.hits(point).iter().filter(|h| h.distance > 0.0).count() % 2 == 1
    }
}

fn validate_faces(mesh: &IndexedMesh) -> IntersectResult<()> {
    let vertex_count = mesh.vertex_count();
    for (face, indices) in mesh.faces.iter().enumerate() {
        if let Some(&vertex) = indices.iter().find(|&&v| v as usize >= vertex_count) {
            return Err(IntersectError::InvalidFace {
                face,
                vertex,
                vertex_count,
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use mesh_types::{Vertex, centered_cube};

    fn z_cube() -> IndexedMesh {
        centered_cube(1.0)
    }

    #[test]
    fn cube_ray_from_below_hits_both_caps() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::z()).unwrap();
        let hits = ix.intersect(&Point3::new(0.0, 0.0, -5.0));

        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0], Point3::new(0.0, 0.0, -0.5), epsilon = 1e-12);
        assert_relative_eq!(hits[1], Point3::new(0.0, 0.0, 0.5), epsilon = 1e-12);
    }

    #[test]
    fn side_faces_are_excluded_as_parallel() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::z()).unwrap();
        assert_eq!(ix.indexed_count(), 4);
        assert_eq!(ix.excluded_count(), 8);
    }

    #[test]
    fn face_indices_follow_hit_order() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::z()).unwrap();
        let mut faces = vec![99];
        let points = ix.intersect_with_faces(&Point3::new(0.2, -0.1, 3.0), &mut faces);

        assert_eq!(points.len(), 2);
        assert_eq!(faces.len(), 2);
        // -Z cap is faces 0-1, +Z cap is faces 2-3
        assert!(faces[0] < 2);
        assert!((2..4).contains(&faces[1]));
    }

    #[test]
    fn hits_behind_have_negative_distance() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::z()).unwrap();
        let hits = ix.hits(&Point3::new(0.1, 0.1, 2.0));
        assert_eq!(hits.len(), 2);
        assert_relative_eq!(hits[0].distance, -2.5, epsilon = 1e-12);
        assert_relative_eq!(hits[1].distance, -1.5, epsilon = 1e-12);
    }

    #[test]
    fn reversed_direction_reverses_order() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, -Vector3::z()).unwrap();
        let hits = ix.intersect(&Point3::new(0.0, 0.0, -5.0));
        assert_eq!(hits.len(), 2);
        assert!(hits[0].z > hits[1].z);
    }

    #[test]
    fn outside_domain_is_empty_not_error() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::z()).unwrap();
        assert!(ix.intersect(&Point3::new(0.6, 0.0, 0.0)).is_empty());
        assert_eq!(ix.candidate_count(&Point3::new(0.0, 40.0, 0.0)), 0);
    }

    #[test]
    fn domain_edge_is_inside() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::z()).unwrap();
        assert!(ix.candidate_count(&Point3::new(0.5, 0.2, 0.0)) > 0);
        // A ray grazing the silhouette may miss or hit, but never only one cap.
        assert_eq!(ix.intersect(&Point3::new(0.5, 0.2, -1.0)).len() % 2, 0);
    }

    #[test]
    fn inside_test_counts_forward_crossings() {
        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::new(0.3, 0.2, 1.0)).unwrap();
        assert!(ix.is_inside(&Point3::new(0.1, -0.2, 0.05)));
        assert!(!ix.is_inside(&Point3::new(0.1, -0.2, 0.9)));
        assert!(!ix.is_inside(&Point3::new(5.0, 5.0, 5.0)));
    }

    #[test]
    fn shared_vertex_is_claimed_once() {
        // Four-triangle tent whose apex projects onto the query ray.
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.25),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 1.0, 0.0),
                Vertex::from_coords(-1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, -1.0, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3], [0, 3, 4], [0, 4, 1]],
        );
        let ix = MeshIntersector::new(&mesh, Vector3::z()).unwrap();
        let hits = ix.hits(&Point3::new(0.0, 0.0, -1.0));
        assert_eq!(hits.len(), 1);
        assert_relative_eq!(hits[0].point.z, 0.25, epsilon = 1e-12);
    }

    #[test]
    fn split_quad_diagonal_is_claimed_once() {
        // Diagonal (0,0) -> (0.3,0.7) has no exactly representable interior
        // points, so every ray below lands a rounding error off the edge.
        let quad = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(0.3, 0.0, 0.0),
                Vertex::from_coords(0.3, 0.7, 0.0),
                Vertex::from_coords(0.0, 0.7, 0.0),
            ],
            vec![[0, 1, 2], [0, 2, 3]],
        );
        for dir in [
            Vector3::z(),
            Vector3::new(0.3, 0.2, 1.0),
            Vector3::new(-0.45, 0.1, 1.0),
        ] {
            let ix = MeshIntersector::new(&quad, dir).unwrap();
            let unit = dir.normalize();
            for k in 1..2000 {
                let t = f64::from(k) / 2000.0;
                let on_edge = Point3::new(0.3 * t, 0.7 * t, 0.0);
                let hits = ix.hits(&(on_edge - unit * 2.0));
                assert_eq!(hits.len(), 1, "dir {dir:?}, t {t}");
            }
        }
    }

    #[test]
    fn cube_cap_diagonal_gives_enter_exit_pairs() {
        let cube = centered_cube(1.0);
        for dir in [Vector3::new(0.3, 0.2, 1.0), Vector3::new(0.1, -0.35, 1.0)] {
            let ix = MeshIntersector::new(&cube, dir).unwrap();
            let unit = dir.normalize();
            for k in 1..2000 {
                let t = f64::from(k) / 2000.0;
                let on_diagonal = Point3::new(-0.5 + t, -0.5 + t, -0.5);
                let start = on_diagonal - unit * 3.0;

                let hits = ix.hits(&start);
                assert_eq!(hits.len(), 2, "dir {dir:?}, t {t}");
                assert!(!ix.is_inside(&start));
            }
        }
    }

    #[test]
    fn degenerate_triangles_are_skipped() {
        let mut mesh = z_cube();
        let a = mesh.faces[0][0];
        mesh.faces.push([a, a, a]);
        let ix = MeshIntersector::new(&mesh, Vector3::z()).unwrap();
        assert_eq!(ix.indexed_count(), 4);
        assert_eq!(ix.intersect(&Point3::new(0.1, 0.1, -1.0)).len(), 2);
    }

    #[test]
    fn bad_face_index_is_an_error() {
        let mut mesh = z_cube();
        mesh.faces.push([0, 1, 42]);
        let err = MeshIntersector::new(&mesh, Vector3::z()).unwrap_err();
        assert!(matches!(
            err,
            IntersectError::InvalidFace {
                face: 12,
                vertex: 42,
                ..
            }
        ));
    }

    #[test]
    fn zero_direction_is_an_error() {
        let cube = z_cube();
        assert!(matches!(
            MeshIntersector::new(&cube, Vector3::zeros()),
            Err(IntersectError::InvalidDirection { .. })
        ));
    }

    #[test]
    fn empty_mesh_answers_nothing() {
        let mesh = IndexedMesh::new();
        let ix = MeshIntersector::new(&mesh, Vector3::x()).unwrap();
        assert!(ix.bounds().is_empty());
        assert!(ix.intersect(&Point3::origin()).is_empty());
        assert_eq!(ix.grid_dimensions(), (1, 1));
    }

    #[test]
    fn single_flat_triangle_edge_on_is_excluded() {
        let mesh = IndexedMesh::from_parts(
            vec![
                Vertex::from_coords(0.0, 0.0, 0.0),
                Vertex::from_coords(1.0, 0.0, 0.0),
                Vertex::from_coords(0.0, 0.0, 1.0),
            ],
            vec![[0, 1, 2]],
        );
        let ix = MeshIntersector::new(&mesh, Vector3::x()).unwrap();
        assert_eq!(ix.indexed_count(), 0);
    }

    #[test]
    fn parallel_build_answers_like_sequential() {
        let cube = z_cube();
        let dir = Vector3::new(0.2, -0.4, 1.0);
        let seq = MeshIntersector::new(&cube, dir).unwrap();
        let par = MeshIntersector::with_params(
            &cube,
            dir,
            &IntersectParams::default().parallel_threshold(0),
        )
        .unwrap();

        for p in [
            Point3::new(0.0, 0.0, 0.0),
            Point3::new(0.3, 0.1, -2.0),
            Point3::new(-0.4, 0.45, 1.0),
        ] {
            assert_eq!(seq.hits(&p), par.hits(&p));
        }
        assert_eq!(seq.grid_dimensions(), par.grid_dimensions());
    }

    #[test]
    fn queries_are_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MeshIntersector<'_>>();

        let cube = z_cube();
        let ix = MeshIntersector::new(&cube, Vector3::z()).unwrap();
        let starts: Vec<Point3<f64>> = (0..64)
            .map(|i| {
                let t = f64::from(i) / 64.0 - 0.5;
                Point3::new(t * 0.9, -t * 0.7, -3.0)
            })
            .collect();
        let expected: Vec<usize> = starts.iter().map(|p| ix.intersect(p).len()).collect();

        let got: Vec<usize> = starts.par_iter().map(|p| ix.intersect(p).len()).collect();
        assert_eq!(expected, got);
        assert!(got.iter().all(|&n| n == 2));
    }
}
