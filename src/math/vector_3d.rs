use crate::error::{GeometryError, Result};

use super::{Point3, Vector3, TOLERANCE};

/// Returns `v` scaled to unit length.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if `v` has (near) zero length.
pub fn normalize(v: &Vector3) -> Result<Vector3> {
    let len = v.norm();
    if len < TOLERANCE {
        return Err(GeometryError::ZeroVector.into());
    }
    Ok(v / len)
}

/// Whether two directions are parallel or anti-parallel.
///
/// Compares unit directions, so the test does not depend on the input
/// lengths. A zero-length input is never parallel to anything.
#[must_use]
pub fn are_parallel(a: &Vector3, b: &Vector3) -> bool {
    let (la, lb) = (a.norm(), b.norm());
    if la < TOLERANCE || lb < TOLERANCE {
        return false;
    }
    (a / la).cross(&(b / lb)).norm() < TOLERANCE
}

/// Whether two points occupy the same location.
#[must_use]
pub fn points_coincide(a: &Point3, b: &Point3) -> bool {
    nalgebra::distance(a, b) < TOLERANCE
}

/// Angle from `from` to `to` measured about `axis`, in `(-PI, PI]`.
///
/// The magnitude is the unsigned angle between the vectors; the sign is
/// negative when `from x to` points against `axis`.
#[must_use]
pub fn signed_angle(from: &Vector3, to: &Vector3, axis: &Vector3) -> f64 {
    let unsigned = from.angle(to);
    if axis.dot(&from.cross(to)) < 0.0 {
        -unsigned
    } else {
        unsigned
    }
}

/// Unit normal of the plane through three points: `normalize((a - b) x (c - b))`.
///
/// # Errors
///
/// Returns [`GeometryError::ZeroVector`] if the points are collinear.
pub fn normal_from_points(a: &Point3, b: &Point3, c: &Point3) -> Result<Vector3> {
    normalize(&(a - b).cross(&(c - b)))
}

/// Arithmetic mean of a set of points, or `None` for an empty set.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn centroid(points: &[Point3]) -> Option<Point3> {
    if points.is_empty() {
        return None;
    }
    let sum = points
        .iter()
        .fold(Vector3::zeros(), |acc, p| acc + p.coords);
    Some(Point3::from(sum / points.len() as f64))
}
