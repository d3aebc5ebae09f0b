//! Projection onto the plane perpendicular to the query direction.

use nalgebra::{Point2, Point3, Vector3};

use crate::error::{IntersectError, IntersectResult};

/// Orthonormal frame `(u, v, dir)` with `u × v = dir`.
///
/// Points are reduced to 2D by dotting with `u` and `v`; the remaining
/// coordinate along `dir` is the ray parameter.
///
/// # Example
///
/// ```
/// use mesh_intersect::ProjectedBasis;
/// use nalgebra::{Point3, Vector3};
///
/// let basis = ProjectedBasis::new(Vector3::new(0.0, 0.0, 3.0)).unwrap();
/// assert!((basis.direction().z - 1.0).abs() < 1e-12);
///
/// // Points that differ only along the direction project to the same spot.
/// let a = basis.project(&Point3::new(1.0, 2.0, -5.0));
/// let b = basis.project(&Point3::new(1.0, 2.0, 7.0));
/// assert!((a - b).norm() < 1e-12);
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProjectedBasis {
    u: Vector3<f64>,
    v: Vector3<f64>,
    dir: Vector3<f64>,
}

impl ProjectedBasis {
    /// Build a frame around `direction`, which is normalized.
    ///
    /// # Errors
    ///
    /// Returns [`IntersectError::InvalidDirection`] if `direction` is zero or
    /// contains a non-finite component.
    pub fn new(direction: Vector3<f64>) -> IntersectResult<Self> {
        let invalid = || IntersectError::InvalidDirection {
            x: direction.x,
            y: direction.y,
            z: direction.z,
        };
        if !direction.iter().all(|c| c.is_finite()) {
            return Err(invalid());
        }
        let dir = direction.try_normalize(f64::EPSILON).ok_or_else(invalid)?;

        // Cross with the axis least aligned with dir for a well-conditioned u.
        let abs = dir.abs();
        let axis = if abs.x <= abs.y && abs.x <= abs.z {
            Vector3::x()
        } else if abs.y <= abs.z {
            Vector3::y()
        } else {
            Vector3::z()
        };
        let u = dir.cross(&axis).try_normalize(f64::EPSILON).ok_or_else(invalid)?;
        let v = dir.cross(&u);

        Ok(Self { u, v, dir })
    }

    /// Unit query direction.
    #[inline]
    #[must_use]
    pub const fn direction(&self) -> Vector3<f64> {
        self.dir
    }

    /// First in-plane axis.
    #[inline]
    #[must_use]
    pub const fn u(&self) -> Vector3<f64> {
        self.u
    }

    /// Second in-plane axis.
    #[inline]
    #[must_use]
    pub const fn v(&self) -> Vector3<f64> {
        self.v
    }

    /// 2D coordinates of `point` in the `(u, v)` plane.
    #[inline]
    #[must_use]
    pub fn project(&self, point: &Point3<f64>) -> Point2<f64> {
        Point2::new(point.coords.dot(&self.u), point.coords.dot(&self.v))
    }
}

/// Axis-aligned rectangle in the projected plane.
///
/// Containment is inclusive on every edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bounds2 {
    /// Minimum corner.
    pub min: Point2<f64>,
    /// Maximum corner.
    pub max: Point2<f64>,
}

impl Bounds2 {
    /// A rectangle containing nothing.
    #[must_use]
    pub fn empty() -> Self {
        Self {
            min: Point2::new(f64::INFINITY, f64::INFINITY),
            max: Point2::new(f64::NEG_INFINITY, f64::NEG_INFINITY),
        }
    }

    /// Smallest rectangle containing every point.
    #[must_use]
    pub fn from_points<'a>(points: impl IntoIterator<Item = &'a Point2<f64>>) -> Self {
        points.into_iter().fold(Self::empty(), |mut b, p| {
            b.include(p);
            b
        })
    }

    /// Grow to include `point`.
    pub fn include(&mut self, point: &Point2<f64>) {
        self.min = self.min.inf(point);
        self.max = self.max.sup(point);
    }

    /// Grow to include another rectangle.
    pub fn union(&mut self, other: &Self) {
        self.min = self.min.inf(&other.min);
        self.max = self.max.sup(&other.max);
    }

    /// Whether the rectangle contains no points.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min.x > self.max.x || self.min.y > self.max.y
    }

    /// Whether `point` lies inside or on the boundary.
    #[must_use]
    pub fn contains(&self, point: &Point2<f64>) -> bool {
        point.x >= self.min.x
            && point.x <= self.max.x
            && point.y >= self.min.y
            && point.y <= self.max.y
    }

    /// Width and height; zero when empty.
    #[must_use]
    pub fn size(&self) -> (f64, f64) {
        if self.is_empty() {
            (0.0, 0.0)
        } else {
            (self.max.x - self.min.x, self.max.y - self.min.y)
        }
    }
}

impl Default for Bounds2 {
    fn default() -> Self {
        Self::empty()
    }
}
