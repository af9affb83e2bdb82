use crate::math::Point3;

/// Corner index pairs forming the 12 edges of a box, indexing [`Aabb::corners`].
const EDGES: [(usize, usize); 12] = [
    (0, 1),
    (0, 4),
    (1, 5),
    (4, 5),
    (7, 5),
    (3, 7),
    (7, 6),
    (6, 4),
    (2, 0),
    (2, 6),
    (2, 3),
    (1, 3),
];

/// An axis-aligned bounding box.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Aabb {
    /// Minimum corner of the bounding box.
    pub min: Point3,
    /// Maximum corner of the bounding box.
    pub max: Point3,
}

impl Aabb {
    /// Creates a box from two opposite corners, in any order.
    #[must_use]
    pub fn new(a: Point3, b: Point3) -> Self {
        Self {
            min: a.inf(&b),
            max: a.sup(&b),
        }
    }

    /// The 8 corners. Bit 2 of the index selects max x, bit 1 max y, bit 0 max z.
    #[must_use]
    pub fn corners(&self) -> [Point3; 8] {
        let (lo, hi) = (&self.min, &self.max);
        std::array::from_fn(|i| {
            Point3::new(
                if i & 4 == 0 { lo.x } else { hi.x },
                if i & 2 == 0 { lo.y } else { hi.y },
                if i & 1 == 0 { lo.z } else { hi.z },
            )
        })
    }

    /// The 12 edges as endpoint pairs.
    #[must_use]
    pub fn edges(&self) -> [(Point3, Point3); 12] {
        let corners = self.corners();
        EDGES.map(|(a, b)| (corners[a], corners[b]))
    }

    /// Length of the main diagonal.
    #[must_use]
    pub fn diagonal(&self) -> f64 {
        nalgebra::distance(&self.min, &self.max)
    }

    /// Whether `point` lies inside or on the box.
    #[must_use]
    pub fn contains(&self, point: &Point3) -> bool {
        (0..3).all(|i| point[i] >= self.min[i] && point[i] <= self.max[i])
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    #[test]
    fn corners_are_ordered_by_bits() {
        let aabb = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0));
        let corners = aabb.corners();
        assert_eq!(corners[0], p(0.0, 0.0, 0.0));
        assert_eq!(corners[1], p(0.0, 0.0, 3.0));
        assert_eq!(corners[2], p(0.0, 2.0, 0.0));
        assert_eq!(corners[4], p(1.0, 0.0, 0.0));
        assert_eq!(corners[7], p(1.0, 2.0, 3.0));
    }

    #[test]
    fn every_edge_is_axis_aligned_and_unique() {
        let aabb = Aabb::new(p(0.0, 0.0, 0.0), p(1.0, 2.0, 3.0));
        let edges = aabb.edges();
        for (a, b) in &edges {
            let changed = (0..3).filter(|&i| (a[i] - b[i]).abs() > 0.0).count();
            assert_eq!(changed, 1, "edge {a:?} -> {b:?} is not a box edge");
        }
        for (i, e) in edges.iter().enumerate() {
            for f in &edges[i + 1..] {
                let same = (e.0 == f.0 && e.1 == f.1) || (e.0 == f.1 && e.1 == f.0);
                assert!(!same, "duplicate edge {e:?}");
            }
        }
    }

    #[test]
    fn new_orders_corners() {
        let aabb = Aabb::new(p(10.0, 0.0, 5.0), p(0.0, 10.0, -5.0));
        assert_eq!(aabb.min, p(0.0, 0.0, -5.0));
        assert_eq!(aabb.max, p(10.0, 10.0, 5.0));
        assert!(aabb.contains(&p(5.0, 5.0, 0.0)));
        assert!(!aabb.contains(&p(5.0, 11.0, 0.0)));
    }
}
