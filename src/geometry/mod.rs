mod aabb;
mod plane;

pub use aabb::Aabb;
pub use plane::PlaneDefinition;
