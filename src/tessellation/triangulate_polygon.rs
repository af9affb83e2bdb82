use crate::error::{OperationError, Result};
use crate::math::vector_3d::{centroid, signed_angle};
use crate::math::{Point3, Vector3};

use super::TriangleMesh;

/// Fan-triangulates the convex polygon spanned by an unordered set of
/// coplanar points.
///
/// Points are ordered by their signed angle about `normal`, measured around
/// the polygon centroid from the first input point, then fanned from the first
/// point of that ordering. Triangles wind counter-clockwise when viewed from
/// the side `normal` points to. Only convex point sets are supported, which
/// covers every plane/box cross-section.
pub struct TriangulatePolygon<'a> {
    points: &'a [Point3],
    normal: Vector3,
}

impl<'a> TriangulatePolygon<'a> {
    /// Creates a new `TriangulatePolygon` operation.
    #[must_use]
    pub fn new(points: &'a [Point3], normal: Vector3) -> Self {
        Self { points, normal }
    }

    /// Executes the triangulation.
    ///
    /// Exactly three points are emitted as a single triangle without sorting,
    /// swapping the last two when the input order winds against `normal`.
    ///
    /// # Errors
    ///
    /// Returns an error for fewer than three points.
    #[allow(clippy::cast_possible_truncation)]
    pub fn execute(&self) -> Result<TriangleMesh> {
        let n = self.points.len();
        if n < 3 {
            return Err(OperationError::InvalidInput(format!(
                "polygon needs at least 3 points, got {n}"
            ))
            .into());
        }
        if n == 3 {
            let [a, b, c] = [self.points[0], self.points[1], self.points[2]];
            let triangle = if (b - a).cross(&(c - a)).dot(&self.normal) < 0.0 {
                [0, 2, 1]
            } else {
                [0, 1, 2]
            };
            return Ok(TriangleMesh {
                vertices: self.points.to_vec(),
                indices: vec![triangle],
            });
        }

        let centre = centroid(self.points)
            .ok_or_else(|| OperationError::InvalidInput("empty polygon".into()))?;
        let reference = self.points[0] - centre;

        let mut ordered: Vec<(f64, Point3)> = self
            .points
            .iter()
            .map(|p| (signed_angle(&reference, &(p - centre), &self.normal), *p))
            .collect();
        ordered[0].0 = 0.0;
        ordered.sort_by(|a, b| a.0.total_cmp(&b.0));

        let vertices: Vec<Point3> = ordered.into_iter().map(|(_, p)| p).collect();
        let indices = (1..n as u32 - 1).map(|i| [0, i, i + 1]).collect();

        Ok(TriangleMesh { vertices, indices })
    }
}
