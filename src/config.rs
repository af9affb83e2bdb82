use crate::store::Colour;

/// Name of the plane describing the desired cut.
pub const TARGET_PLANE: &str = "target";

/// Name of the plane describing the block face already cut; block vertices are pinned to it.
pub const BLOCK_PLANE: &str = "block";

/// Parameters of a targeting session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Largest point-to-plane distance (data units) still counted as "in plane",
    /// both for view alignment and for pinning block vertices.
    pub plane_distance_threshold: f64,
    /// Pick radius in viewer units for toggling and selecting points.
    pub pick_radius: f64,
    /// Transparency of newly created plane meshes.
    pub default_transparency: f32,
    pub target_colour: Colour,
    pub block_colour: Colour,
    /// Colour of planes other than target and block.
    pub other_colour: Colour,
    /// Colour shown while a plane is aligned with the cutting plane.
    pub aligned_colour: Colour,
    pub target_plane: String,
    pub block_plane: String,
}

impl SessionConfig {
    /// Initial colour for a new plane called `name`.
    #[must_use]
    pub fn colour_for(&self, name: &str) -> Colour {
        if name == self.target_plane {
            self.target_colour
        } else if name == self.block_plane {
            self.block_colour
        } else {
            self.other_colour
        }
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            plane_distance_threshold: 1e-10,
            pick_radius: 5.0,
            default_transparency: 0.7,
            target_colour: Colour::GREEN,
            block_colour: Colour::BLUE,
            other_colour: Colour::WHITE,
            aligned_colour: Colour::RED,
            target_plane: TARGET_PLANE.to_owned(),
            block_plane: BLOCK_PLANE.to_owned(),
        }
    }
}
