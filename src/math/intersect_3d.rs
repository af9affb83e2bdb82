use crate::geometry::PlaneDefinition;

use super::{Point3, TOLERANCE};

/// Relationship of a line segment `p1 -> p2` with a plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SegmentPlaneRelation {
    /// The segment crosses (or touches) the plane at a single point.
    Crossing { point: Point3, t: f64 },
    /// The segment's supporting line meets the plane outside `[0, 1]`.
    Outside { t: f64 },
    /// Segment is parallel to the plane and off it.
    Parallel,
    /// Both endpoints lie on the plane.
    OnPlane,
}

/// Computes the intersection of the segment `p1 -> p2` with a plane.
///
/// Both the "on plane" and the "parallel" decisions are taken from the signed
/// distances of the two endpoints against [`TOLERANCE`], so a segment is never
/// reported as both coincident and crossing. A crossing parameter within
/// [`TOLERANCE`] of an endpoint snaps onto that endpoint.
#[must_use]
pub fn segment_plane_intersect(
    p1: &Point3,
    p2: &Point3,
    plane: &PlaneDefinition,
) -> SegmentPlaneRelation {
    let d1 = signed_distance_to_plane(p1, plane);
    let d2 = signed_distance_to_plane(p2, plane);

    if d1.abs() < TOLERANCE && d2.abs() < TOLERANCE {
        return SegmentPlaneRelation::OnPlane;
    }

    // d2 - d1 == dot(p2 - p1, normal)
    let denom = d2 - d1;
    if denom.abs() < TOLERANCE {
        return SegmentPlaneRelation::Parallel;
    }

    let t = -d1 / denom;
    if t.abs() < TOLERANCE || d1.abs() < TOLERANCE {
        SegmentPlaneRelation::Crossing { point: *p1, t: 0.0 }
    } else if (t - 1.0).abs() < TOLERANCE || d2.abs() < TOLERANCE {
        SegmentPlaneRelation::Crossing { point: *p2, t: 1.0 }
    } else if (0.0..=1.0).contains(&t) {
        SegmentPlaneRelation::Crossing {
            point: p1 + (p2 - p1) * t,
            t,
        }
    } else {
        SegmentPlaneRelation::Outside { t }
    }
}

/// Signed distance from a point to a plane.
/// Positive = on the normal side, negative = opposite.
#[must_use]
pub fn signed_distance_to_plane(point: &Point3, plane: &PlaneDefinition) -> f64 {
    (point - plane.point()).dot(plane.normal())
}

/// Perpendicular distance from a point to a plane.
#[must_use]
pub fn distance_to_plane(point: &Point3, plane: &PlaneDefinition) -> f64 {
    signed_distance_to_plane(point, plane).abs()
}
