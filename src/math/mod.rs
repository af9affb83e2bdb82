pub mod intersect_3d;
pub mod transform;
pub mod vector_3d;

pub use transform::{LocalTransform, ViewTransform};

/// 3D point type.
pub type Point3 = nalgebra::Point3<f64>;

/// 3D vector type.
pub type Vector3 = nalgebra::Vector3<f64>;

/// 4x4 transformation matrix.
pub type Matrix4 = nalgebra::Matrix4<f64>;

/// Global geometric tolerance for floating-point comparisons.
///
/// Used for every "lies in plane" and "is parallel" decision so that an edge
/// can never be classified as both coincident and crossing.
pub const TOLERANCE: f64 = 1e-10;
