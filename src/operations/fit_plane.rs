use nalgebra::DMatrix;

use crate::error::{GeometryError, OperationError, Result};
use crate::geometry::PlaneDefinition;
use crate::math::vector_3d::centroid;
use crate::math::{Point3, Vector3};

/// Relative gap required between the two smallest singular values.
///
/// When `second - smallest <= FIT_RELATIVE_EPSILON * largest` the least-variance
/// direction is not unique (collinear or coincident input).
pub const FIT_RELATIVE_EPSILON: f64 = 1e-9;

/// Fits a least-squares plane through a point cloud.
///
/// The plane passes through the centroid; its normal is the left singular
/// vector of the centred `3 x n` coordinate matrix belonging to the smallest
/// singular value, i.e. the direction of least variance.
pub struct FitPlane<'a> {
    points: &'a [Point3],
}

impl<'a> FitPlane<'a> {
    /// Creates a new `FitPlane` operation.
    #[must_use]
    pub fn new(points: &'a [Point3]) -> Self {
        Self { points }
    }

    /// Executes the fit.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::InvalidInput`] for fewer than 3 points and
    /// [`GeometryError::DegeneratePlaneFit`] when the points are collinear or
    /// coincident.
    pub fn execute(&self) -> Result<PlaneDefinition> {
        let n = self.points.len();
        if n < 3 {
            return Err(OperationError::InvalidInput(format!(
                "plane fit needs at least 3 points, got {n}"
            ))
            .into());
        }
        let centre = centroid(self.points)
            .ok_or_else(|| OperationError::InvalidInput("no points to fit".into()))?;

        // One column per point, centred on the centroid.
        let centred = DMatrix::from_fn(3, n, |row, col| self.points[col][row] - centre[row]);
        let svd = centred.svd(true, false);
        let u = svd
            .u
            .ok_or_else(|| OperationError::Failed("SVD did not produce left singular vectors".into()))?;
        let values = &svd.singular_values;

        let mut order = [0usize, 1, 2];
        order.sort_by(|&a, &b| values[a].total_cmp(&values[b]));
        let (smallest, second_smallest, largest) =
            (values[order[0]], values[order[1]], values[order[2]]);

        if second_smallest - smallest <= FIT_RELATIVE_EPSILON * largest {
            return Err(GeometryError::DegeneratePlaneFit {
                smallest,
                second_smallest,
            }
            .into());
        }

        let column = u.column(order[0]);
        let normal = Vector3::new(column[0], column[1], column[2]);
        PlaneDefinition::new(normal, centre)
    }
}
