use crate::geometry::{Aabb, PlaneDefinition};
use crate::math::intersect_3d::{segment_plane_intersect, SegmentPlaneRelation};
use crate::math::{Point3, TOLERANCE};

/// Computes where a plane cuts the surface of an axis-aligned box.
///
/// Each of the 12 box edges is tested against the plane: edges lying in the
/// plane contribute both endpoints, parallel edges contribute nothing, and
/// crossing edges contribute their crossing point. The result is
/// deduplicated and unordered: empty when the plane misses the box, 3 to 6
/// points for a cut through it, and 1 or 2 only when the plane merely
/// touches a corner or an edge.
pub struct IntersectBox<'a> {
    plane: &'a PlaneDefinition,
    aabb: &'a Aabb,
}

impl<'a> IntersectBox<'a> {
    /// Creates a new `IntersectBox` query.
    #[must_use]
    pub fn new(plane: &'a PlaneDefinition, aabb: &'a Aabb) -> Self {
        Self { plane, aabb }
    }

    /// Executes the query, returning the distinct intersection points.
    #[must_use]
    pub fn execute(&self) -> Vec<Point3> {
        let merge_distance = TOLERANCE * self.aabb.diagonal().max(1.0);
        let mut points: Vec<Point3> = Vec::with_capacity(6);
        let mut push = |candidate: Point3| {
            if !points
                .iter()
                .any(|existing| nalgebra::distance(existing, &candidate) < merge_distance)
            {
                points.push(candidate);
            }
        };

        for (start, end) in self.aabb.edges() {
            match segment_plane_intersect(&start, &end, self.plane) {
                SegmentPlaneRelation::OnPlane => {
                    push(start);
                    push(end);
                }
                SegmentPlaneRelation::Crossing { point, .. } => push(point),
                SegmentPlaneRelation::Parallel | SegmentPlaneRelation::Outside { .. } => {}
            }
        }

        points
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;
    use crate::math::intersect_3d::distance_to_plane;
    use crate::math::Vector3;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    fn cube() -> Aabb {
        Aabb::new(p(0.0, 0.0, 0.0), p(10.0, 10.0, 10.0))
    }

    fn cut(normal: Vector3, point: Point3) -> Vec<Point3> {
        let plane = PlaneDefinition::new(normal, point).unwrap();
        IntersectBox::new(&plane, &cube()).execute()
    }

    fn contains(points: &[Point3], expected: &Point3) -> bool {
        points.iter().any(|q| nalgebra::distance(q, expected) < 1e-9)
    }

    #[test]
    fn horizontal_cut_gives_square() {
        let points = cut(v(0.0, 0.0, 1.0), p(0.0, 0.0, 5.0));
        assert_eq!(points.len(), 4);
        for corner in [
            p(0.0, 0.0, 5.0),
            p(10.0, 0.0, 5.0),
            p(0.0, 10.0, 5.0),
            p(10.0, 10.0, 5.0),
        ] {
            assert!(contains(&points, &corner), "missing {corner:?} in {points:?}");
        }
    }

    #[test]
    fn plane_outside_box_misses() {
        assert!(cut(v(1.0, 0.0, 0.0), p(20.0, 0.0, 0.0)).is_empty());
    }

    #[test]
    fn plane_on_face_gives_face_corners_once() {
        let points = cut(v(0.0, 0.0, 1.0), p(3.0, 3.0, 0.0));
        assert_eq!(points.len(), 4);
        assert!(points.iter().all(|q| q.z.abs() < TOLERANCE));
    }

    #[test]
    fn diagonal_cut_through_centre_is_hexagon() {
        let points = cut(v(1.0, 1.0, 1.0), p(5.0, 5.0, 5.0));
        assert_eq!(points.len(), 6);
        let plane = PlaneDefinition::new(v(1.0, 1.0, 1.0), p(5.0, 5.0, 5.0)).unwrap();
        for q in &points {
            assert!(distance_to_plane(q, &plane) < 1e-9);
            assert!(cube().contains(q));
        }
    }

    #[test]
    fn corner_cut_is_triangle() {
        let points = cut(v(1.0, 1.0, 1.0), p(2.0, 0.0, 0.0));
        assert_eq!(points.len(), 3);
        assert!(contains(&points, &p(2.0, 0.0, 0.0)));
        assert!(contains(&points, &p(0.0, 2.0, 0.0)));
        assert!(contains(&points, &p(0.0, 0.0, 2.0)));
    }

    #[test]
    fn plane_through_opposite_edges_gives_rectangle() {
        let points = cut(v(1.0, -1.0, 0.0), p(0.0, 0.0, 0.0));
        assert_eq!(points.len(), 4);
        assert!(contains(&points, &p(0.0, 0.0, 10.0)));
        assert!(contains(&points, &p(10.0, 10.0, 0.0)));
    }

    #[test]
    fn touching_a_corner_only() {
        let points = cut(v(1.0, 1.0, 1.0), p(0.0, 0.0, 0.0));
        assert_eq!(points.len(), 1);
        assert_relative_eq!(points[0], p(0.0, 0.0, 0.0));
    }

    #[test]
    fn interior_cuts_never_yield_one_or_two_points() {
        let normals = [
            v(0.0, 0.0, 1.0),
            v(0.2, 0.3, 1.0),
            v(1.0, 2.0, 3.0),
            v(-1.0, 0.5, 0.25),
            v(0.7, -0.7, 0.1),
            v(1.0, 1.0, -1.0),
            v(0.0, 1.0, 1e-3),
        ];
        let points = [p(5.0, 5.0, 5.0), p(1.0, 9.0, 2.0), p(9.5, 0.5, 7.0), p(3.3, 6.1, 0.4)];
        for n in normals {
            for q in points {
                let count = cut(n, q).len();
                assert!(
                    (3..=6).contains(&count),
                    "normal {n:?} through {q:?} gave {count} points"
                );
            }
        }
    }

    #[test]
    fn far_from_origin_box() {
        let aabb = Aabb::new(p(1.0e4, 2.0e4, -3.0e4), p(1.1e4, 2.2e4, -2.9e4));
        let plane = PlaneDefinition::new(v(0.3, 0.2, 1.0), p(1.05e4, 2.1e4, -2.95e4)).unwrap();
        let points = IntersectBox::new(&plane, &aabb).execute();
        assert!((3..=6).contains(&points.len()));
    }
}
