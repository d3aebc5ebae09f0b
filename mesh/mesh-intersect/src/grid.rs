//! Uniform bucket grid over the projected plane.
//!
//! Each cell lists the triangles whose projected bounding rectangle overlaps
//! it. A query point looks at exactly one cell.

// Cell coordinates come from clamped, non-negative floors.
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_sign_loss)]
#![allow(clippy::cast_precision_loss)]

use nalgebra::Point2;
use rayon::prelude::*;

use crate::projection::Bounds2;

/// Placement of the grid: covered rectangle and resolution.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridLayout {
    bounds: Bounds2,
    nx: usize,
    ny: usize,
}

impl GridLayout {
    /// Layout with `nx * ny` cells over `bounds`. Zero counts become 1.
    #[must_use]
    pub fn new(bounds: Bounds2, nx: usize, ny: usize) -> Self {
        Self {
            bounds,
            nx: nx.max(1),
            ny: ny.max(1),
        }
    }

    /// Pick a resolution where a footprint of `mean_footprint` (width,
    /// height) spans about `1 / cell_scale` cells on each axis.
    ///
    /// Each axis is clamped to `1..=max_cells`.
    #[must_use]
    pub fn fitted(
        bounds: Bounds2,
        mean_footprint: (f64, f64),
        cell_scale: f64,
        max_cells: usize,
    ) -> Self {
        let (width, height) = bounds.size();
        let max_cells = max_cells.max(1);
        let count = |extent: f64, footprint: f64| {
            let cell = footprint * cell_scale;
            if extent <= 0.0 || cell.is_nan() || cell <= 0.0 {
                return 1;
            }
            let n = (extent / cell).ceil();
            if n >= max_cells as f64 { max_cells } else { (n as usize).max(1) }
        };
        Self::new(
            bounds,
            count(width, mean_footprint.0),
            count(height, mean_footprint.1),
        )
    }

    /// Covered rectangle.
    #[must_use]
    pub const fn bounds(&self) -> &Bounds2 {
        &self.bounds
    }

    /// Cells along each axis.
    #[must_use]
    pub const fn dimensions(&self) -> (usize, usize) {
        (self.nx, self.ny)
    }

    /// Total number of cells.
    #[must_use]
    pub const fn cell_count(&self) -> usize {
        self.nx * self.ny
    }

    /// Cell coordinates of `point`, clamped into the grid.
    #[must_use]
    pub fn cell_of(&self, point: &Point2<f64>) -> (usize, usize) {
        let (width, height) = self.bounds.size();
        (
            axis_cell(point.x, self.bounds.min.x, width, self.nx),
            axis_cell(point.y, self.bounds.min.y, height, self.ny),
        )
    }

    #[inline]
    const fn flat(&self, x: usize, y: usize) -> usize {
        y * self.nx + x
    }

    /// Flat indices of every cell a footprint overlaps.
    fn cells_overlapping(&self, footprint: &Bounds2) -> impl Iterator<Item = usize> + '_ {
        let (x0, y0) = self.cell_of(&footprint.min);
        let (x1, y1) = self.cell_of(&footprint.max);
        (y0..=y1).flat_map(move |y| (x0..=x1).map(move |x| self.flat(x, y)))
    }
}

fn axis_cell(value: f64, lo: f64, extent: f64, n: usize) -> usize {
    if extent <= 0.0 {
        return 0;
    }
    let c = ((value - lo) / extent * n as f64).floor();
    if c.is_nan() || c <= 0.0 {
        0
    } else {
        (c as usize).min(n - 1)
    }
}

/// Bucket grid of item indices.
///
/// # Example
///
/// ```
/// use mesh_intersect::{Bounds2, GridLayout, TriangleGrid};
/// use nalgebra::Point2;
///
/// let bounds = Bounds2::from_points(&[Point2::new(0.0, 0.0), Point2::new(4.0, 4.0)]);
/// let footprints = [
///     Bounds2::from_points(&[Point2::new(0.0, 0.0), Point2::new(1.0, 1.0)]),
///     Bounds2::from_points(&[Point2::new(2.5, 2.5), Point2::new(4.0, 4.0)]),
/// ];
/// let grid = TriangleGrid::build(GridLayout::new(bounds, 4, 4), &footprints, false);
///
/// assert_eq!(grid.candidates(&Point2::new(0.5, 0.5)), &[0]);
/// assert_eq!(grid.candidates(&Point2::new(3.5, 3.5)), &[1]);
/// assert!(grid.candidates(&Point2::new(9.0, 0.0)).is_empty());
/// ```
#[derive(Debug, Clone)]
pub struct TriangleGrid {
    layout: GridLayout,
    cells: Vec<Vec<usize>>,
}

impl TriangleGrid {
    /// Insert item `i` into every cell overlapped by `footprints[i]`.
    ///
    /// With `parallel`, items are split across rayon workers, each filling
    /// its own cell lists, and the lists are concatenated afterwards. Cell
    /// lists are sorted either way, so the result does not depend on the
    /// schedule.
    #[must_use]
    pub fn build(layout: GridLayout, footprints: &[Bounds2], parallel: bool) -> Self {
        let n = layout.cell_count();
        let mut cells = if parallel {
            footprints
                .par_iter()
                .enumerate()
                .fold(
                    || vec![Vec::new(); n],
                    |mut cells: Vec<Vec<usize>>, (i, footprint)| {
                        for cell in layout.cells_overlapping(footprint) {
                            cells[cell].push(i);
                        }
                        cells
                    },
                )
                .reduce(
                    || vec![Vec::new(); n],
                    |mut a, b| {
                        for (into, from) in a.iter_mut().zip(b) {
                            into.extend(from);
                        }
                        a
                    },
                )
        } else {
            let mut cells = vec![Vec::new(); n];
            for (i, footprint) in footprints.iter().enumerate() {
                for cell in layout.cells_overlapping(footprint) {
                    cells[cell].push(i);
                }
            }
            cells
        };

        if parallel {
            cells.par_iter_mut().for_each(|c| c.sort_unstable());
        }

        Self { layout, cells }
    }

    /// Grid placement and resolution.
    #[must_use]
    pub const fn layout(&self) -> &GridLayout {
        &self.layout
    }

    /// Items listed in the cell containing `point`.
    ///
    /// Empty when `point` lies outside the covered rectangle.
    #[must_use]
    pub fn candidates(&self, point: &Point2<f64>) -> &[usize] {
        if !self.layout.bounds.contains(point) {
            return &[];
        }
        let (x, y) = self.layout.cell_of(point);
        self.cells
            .get(self.layout.flat(x, y))
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Length of the longest cell list.
    #[must_use]
    pub fn max_cell_len(&self) -> usize {
        self.cells.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// Total number of (cell, item) entries.
    #[must_use]
    pub fn entry_count(&self) -> usize {
        self.cells.iter().map(Vec::len).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rect(x0: f64, y0: f64, x1: f64, y1: f64) -> Bounds2 {
        Bounds2::from_points(&[Point2::new(x0, y0), Point2::new(x1, y1)])
    }

    #[test]
    fn cell_of_clamps_to_grid() {
        let layout = GridLayout::new(rect(0.0, 0.0, 10.0, 10.0), 5, 5);
        assert_eq!(layout.cell_of(&Point2::new(0.0, 0.0)), (0, 0));
        assert_eq!(layout.cell_of(&Point2::new(10.0, 10.0)), (4, 4));
        assert_eq!(layout.cell_of(&Point2::new(-3.0, 25.0)), (0, 4));
        assert_eq!(layout.cell_of(&Point2::new(4.0, 6.0)), (2, 3));
    }

    #[test]
    fn flat_rectangle_uses_one_cell_on_that_axis() {
        let layout = GridLayout::fitted(rect(0.0, 1.0, 10.0, 1.0), (1.0, 0.0), 1.0, 200);
        assert_eq!(layout.dimensions(), (10, 1));
        assert_eq!(layout.cell_of(&Point2::new(3.5, 1.0)), (3, 0));
    }

    #[test]
    fn fitted_respects_cap() {
        let layout = GridLayout::fitted(rect(0.0, 0.0, 1000.0, 1.0), (0.001, 1.0), 1.0, 64);
        assert_eq!(layout.dimensions(), (64, 1));
    }

    #[test]
    fn footprint_on_cell_boundary_reaches_both_cells() {
        let layout = GridLayout::new(rect(0.0, 0.0, 4.0, 1.0), 4, 1);
        let grid = TriangleGrid::build(layout, &[rect(0.5, 0.0, 2.0, 1.0)], false);
        assert_eq!(grid.candidates(&Point2::new(1.99, 0.5)), &[0]);
        assert_eq!(grid.candidates(&Point2::new(2.0, 0.5)), &[0]);
        assert!(grid.candidates(&Point2::new(3.0, 0.5)).is_empty());
    }

    #[test]
    fn parallel_build_matches_sequential() {
        let layout = GridLayout::new(rect(0.0, 0.0, 10.0, 10.0), 7, 9);
        let footprints: Vec<Bounds2> = (0..200)
            .map(|i| {
                let t = f64::from(i) * 0.05;
                rect(t, 10.0 - t, t + 0.7, 10.0 - t + 0.3)
            })
            .collect();

        let seq = TriangleGrid::build(layout, &footprints, false);
        let par = TriangleGrid::build(layout, &footprints, true);
        assert_eq!(seq.cells, par.cells);
        assert_eq!(seq.entry_count(), par.entry_count());
    }
}
