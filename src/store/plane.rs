use crate::geometry::PlaneDefinition;
use crate::math::{Point3, Vector3};

slotmap::new_key_type! {
    /// Unique identifier for a plane in the registry.
    pub struct PlaneId;
}

/// An RGB display colour with channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Colour {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Colour {
    pub const RED: Self = Self::new(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::new(0.0, 1.0, 0.0);
    pub const BLUE: Self = Self::new(0.0, 0.0, 1.0);
    pub const WHITE: Self = Self::new(1.0, 1.0, 1.0);

    /// Creates a colour from its channels.
    #[must_use]
    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }
}

/// State of a named plane.
///
/// `definition` lives in the volume's local (data) frame. `centroid` is the
/// centre of the plane's current cross-section with the volume and is only
/// ever derived from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PlaneData {
    pub(crate) name: String,
    pub(crate) definition: PlaneDefinition,
    pub(crate) centroid: Point3,
    pub colour: Colour,
    pub transparency: f32,
    pub visible: bool,
}

impl PlaneData {
    pub(crate) fn new(
        name: String,
        definition: PlaneDefinition,
        centroid: Point3,
        colour: Colour,
        transparency: f32,
    ) -> Self {
        Self {
            name,
            definition,
            centroid,
            colour,
            transparency,
            visible: true,
        }
    }

    /// The registry name of this plane.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The plane as normal + point.
    #[must_use]
    pub fn definition(&self) -> &PlaneDefinition {
        &self.definition
    }

    /// Unit normal.
    #[must_use]
    pub fn normal(&self) -> &Vector3 {
        self.definition.normal()
    }

    /// The point the plane was defined through.
    #[must_use]
    pub fn point(&self) -> &Point3 {
        self.definition.point()
    }

    /// Centroid of the plane's cross-section with the volume.
    #[must_use]
    pub fn centroid(&self) -> &Point3 {
        &self.centroid
    }
}
