use nalgebra::{Isometry3, Matrix3, Rotation3, Translation3, Unit, UnitQuaternion, Vector4};

use crate::error::{GeometryError, Result};

use super::{Matrix4, Point3, Vector3};

/// Affine transform mapping data-space coordinates into viewer space.
///
/// `apply` goes data -> viewer, `inverse().apply` goes viewer -> data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewTransform {
    matrix: Matrix4,
}

impl ViewTransform {
    /// Wraps a 4x4 affine matrix (bottom row `0 0 0 1`).
    #[must_use]
    pub fn new(matrix: Matrix4) -> Self {
        Self { matrix }
    }

    /// The identity transform: viewer space equals data space.
    #[must_use]
    pub fn identity() -> Self {
        Self::new(Matrix4::identity())
    }

    /// Returns the underlying matrix.
    #[must_use]
    pub fn matrix(&self) -> &Matrix4 {
        &self.matrix
    }

    /// Transforms a point by the affine matrix (homogeneous coordinates).
    #[must_use]
    pub fn apply(&self, point: &Point3) -> Point3 {
        let v = self.matrix * Vector4::new(point.x, point.y, point.z, 1.0);
        Point3::new(v.x, v.y, v.z)
    }

    /// Inverse of this transform.
    ///
    /// # Errors
    ///
    /// Returns an error if the matrix is singular.
    pub fn inverse(&self) -> Result<Self> {
        self.matrix.try_inverse().map(Self::new).ok_or_else(|| {
            GeometryError::Degenerate("view transform is not invertible".into()).into()
        })
    }

    /// Returns `other` applied after `self`.
    #[must_use]
    pub fn pre_concatenate(&self, other: &ViewTransform) -> Self {
        Self::new(other.matrix * self.matrix)
    }

    /// Returns `self` followed by a translation of `offset`.
    #[must_use]
    pub fn translated(&self, offset: &Vector3) -> Self {
        self.pre_concatenate(&Self::new(Matrix4::new_translation(offset)))
    }

    /// Rotation component of the linear part.
    ///
    /// Scaling is factored out by taking the closest rotation matrix to the
    /// upper-left 3x3 block.
    #[must_use]
    pub fn rotation(&self) -> UnitQuaternion<f64> {
        let linear: Matrix3<f64> = self.matrix.fixed_view::<3, 3>(0, 0).into_owned();
        UnitQuaternion::from_rotation_matrix(&Rotation3::from_matrix(&linear))
    }

    /// Rotation by `angle` radians about `axis`, pivoting on `centre`.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] if the axis is zero-length.
    pub fn rotation_about(centre: &Point3, axis: &Vector3, angle: f64) -> Result<Self> {
        let axis = Unit::try_new(*axis, super::TOLERANCE).ok_or(GeometryError::ZeroVector)?;
        let rotation = UnitQuaternion::from_axis_angle(&axis, angle).to_homogeneous();
        let to_origin = Matrix4::new_translation(&(-centre.coords));
        let back = Matrix4::new_translation(&centre.coords);
        Ok(Self::new(back * rotation * to_origin))
    }
}

impl Default for ViewTransform {
    fn default() -> Self {
        Self::identity()
    }
}

/// Rigid placement of the volume in the renderer's global frame.
///
/// Local (data) coordinates are rotated, then translated.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LocalTransform {
    isometry: Isometry3<f64>,
}

impl LocalTransform {
    /// Creates a placement from a rotation and a translation.
    #[must_use]
    pub fn new(rotation: UnitQuaternion<f64>, translation: Vector3) -> Self {
        Self {
            isometry: Isometry3::from_parts(Translation3::from(translation), rotation),
        }
    }

    /// The identity placement.
    #[must_use]
    pub fn identity() -> Self {
        Self {
            isometry: Isometry3::identity(),
        }
    }

    /// Maps a local point into the global frame.
    #[must_use]
    pub fn to_global(&self, point: &Point3) -> Point3 {
        self.isometry * point
    }
}

impl Default for LocalTransform {
    fn default() -> Self {
        Self::identity()
    }
}
