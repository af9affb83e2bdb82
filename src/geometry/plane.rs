use crate::error::Result;
use crate::math::intersect_3d::distance_to_plane;
use crate::math::vector_3d::{are_parallel, normal_from_points, normalize};
use crate::math::{Point3, Vector3};

/// An infinite plane given by a unit normal and a point lying on it.
///
/// The normal is normalised on construction and is never zero-length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaneDefinition {
    normal: Vector3,
    point: Point3,
}

impl PlaneDefinition {
    /// Creates a plane from a normal (any non-zero length) and a point on it.
    ///
    /// # Errors
    ///
    /// Returns an error if the normal vector is zero-length.
    pub fn new(normal: Vector3, point: Point3) -> Result<Self> {
        Ok(Self {
            normal: normalize(&normal)?,
            point,
        })
    }

    /// Creates the plane through three points, oriented along `(a - b) x (c - b)`.
    /// The plane point is `a`.
    ///
    /// # Errors
    ///
    /// Returns an error if the points are collinear.
    pub fn from_points(a: &Point3, b: &Point3, c: &Point3) -> Result<Self> {
        Ok(Self {
            normal: normal_from_points(a, b, c)?,
            point: *a,
        })
    }

    /// Returns the unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        &self.normal
    }

    /// Returns the point on the plane.
    #[must_use]
    pub fn point(&self) -> &Point3 {
        &self.point
    }

    /// Whether `other` describes the same infinite plane: parallel normals and
    /// `other`'s point within `threshold` of this plane.
    #[must_use]
    pub fn coincides_with(&self, other: &PlaneDefinition, threshold: f64) -> bool {
        are_parallel(&self.normal, &other.normal) && distance_to_plane(&other.point, self) < threshold
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn normal_is_unit_length() {
        let plane = PlaneDefinition::new(Vector3::new(0.0, 0.0, 4.0), p(1.0, 1.0, 1.0)).unwrap();
        assert_relative_eq!(plane.normal().norm(), 1.0);
        assert!(PlaneDefinition::new(Vector3::zeros(), p(0.0, 0.0, 0.0)).is_err());
    }

    #[test]
    fn coincidence_ignores_orientation_and_in_plane_offset() {
        let a = PlaneDefinition::new(Vector3::z(), p(0.0, 0.0, 5.0)).unwrap();
        let b = PlaneDefinition::new(-Vector3::z(), p(3.0, -8.0, 5.0)).unwrap();
        let c = PlaneDefinition::new(Vector3::z(), p(0.0, 0.0, 5.1)).unwrap();
        assert!(a.coincides_with(&b, 1e-10));
        assert!(!a.coincides_with(&c, 1e-10));
        assert!(a.coincides_with(&c, 0.2));
    }

    #[test]
    fn from_points_uses_first_point() {
        let plane =
            PlaneDefinition::from_points(&p(0.0, 0.0, 2.0), &p(0.0, 1.0, 2.0), &p(1.0, 0.0, 2.0))
                .unwrap();
        assert_relative_eq!(*plane.normal(), Vector3::z());
        assert_eq!(*plane.point(), p(0.0, 0.0, 2.0));
    }
}
