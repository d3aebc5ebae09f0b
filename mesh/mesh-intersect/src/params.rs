//! Parameters for building the intersection index.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Parameters controlling how a [`MeshIntersector`](crate::MeshIntersector)
/// indexes its mesh.
///
/// # Example
///
/// ```
/// use mesh_intersect::IntersectParams;
///
/// let params = IntersectParams::default();
/// assert_eq!(params.max_cells_per_axis, 200);
///
/// let fine = IntersectParams::fine().max_cells_per_axis(512);
/// assert_eq!(fine.max_cells_per_axis, 512);
/// assert!(fine.cell_scale < params.cell_scale);
/// ```
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct IntersectParams {
    /// Upper bound on grid cells along each projected axis.
    pub max_cells_per_axis: usize,

    /// Cell edge as a multiple of the mean projected triangle footprint.
    /// At 1.0 an average triangle covers about one cell.
    pub cell_scale: f64,

    /// Triangles whose unit normal has `|n · dir|` at or below this are
    /// treated as parallel to the query direction and skipped.
    pub parallel_epsilon: f64,

    /// Triangles with 3D area at or below this are skipped.
    pub degenerate_area: f64,

    /// Meshes with at least this many faces are indexed in parallel.
    pub parallel_threshold: usize,
}

impl Default for IntersectParams {
    fn default() -> Self {
        Self {
            max_cells_per_axis: 200,
            cell_scale: 1.0,
            parallel_epsilon: 1e-8,
            degenerate_area: 1e-12,
            parallel_threshold: 4096,
        }
    }
}

impl IntersectParams {
    /// Fewer, larger cells. Cheaper to build, longer candidate lists.
    #[must_use]
    pub fn coarse() -> Self {
        Self {
            max_cells_per_axis: 64,
            cell_scale: 2.0,
            ..Self::default()
        }
    }

    /// More, smaller cells. Shorter candidate lists for dense query loads.
    #[must_use]
    pub fn fine() -> Self {
        Self {
            max_cells_per_axis: 400,
            cell_scale: 0.5,
            ..Self::default()
        }
    }

    /// Set the per-axis cell cap.
    #[must_use]
    pub const fn max_cells_per_axis(mut self, cells: usize) -> Self {
        self.max_cells_per_axis = cells;
        self
    }

    /// Set the cell size multiplier.
    #[must_use]
    pub const fn cell_scale(mut self, scale: f64) -> Self {
        self.cell_scale = scale;
        self
    }

    /// Set the parallel-triangle threshold.
    #[must_use]
    pub const fn parallel_epsilon(mut self, epsilon: f64) -> Self {
        self.parallel_epsilon = epsilon;
        self
    }

    /// Set the area at or below which a triangle is skipped as degenerate.
    #[must_use]
    pub const fn degenerate_area(mut self, area: f64) -> Self {
        self.degenerate_area = area;
        self
    }

    /// Set the face count from which indexing runs in parallel.
    #[must_use]
    pub const fn parallel_threshold(mut self, faces: usize) -> Self {
        self.parallel_threshold = faces;
        self
    }
}
