mod plane;
mod points;

pub use plane::{Colour, PlaneData, PlaneId};
pub use points::{PointStore, SelectionChange, Toggle, VertexRole};

use std::collections::HashMap;

use slotmap::SlotMap;

use crate::error::{GeometryError, RegistryError, Result};
use crate::geometry::PlaneDefinition;
use crate::math::Point3;

/// Owns every named plane of a session.
///
/// Planes live in a generational arena; a side index maps each name to its
/// key, so a name refers to at most one plane.
#[derive(Debug, Default)]
pub struct PlaneRegistry {
    planes: SlotMap<PlaneId, PlaneData>,
    names: HashMap<String, PlaneId>,
}

impl PlaneRegistry {
    /// Creates a new, empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of planes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.planes.len()
    }

    /// Whether the registry holds no planes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    /// Whether a plane with this name exists.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Returns the key of a named plane.
    #[must_use]
    pub fn id(&self, name: &str) -> Option<PlaneId> {
        self.names.get(name).copied()
    }

    /// Returns a plane by key, or an error if it was removed.
    ///
    /// # Errors
    ///
    /// Returns an error if the entity is not found in the registry.
    pub fn plane(&self, id: PlaneId) -> Result<&PlaneData, RegistryError> {
        self.planes
            .get(id)
            .ok_or_else(|| RegistryError::PlaneNotFound(format!("{id:?}")))
    }

    /// Returns a plane by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn get(&self, name: &str) -> Result<&PlaneData, RegistryError> {
        self.id(name)
            .and_then(|id| self.planes.get(id))
            .ok_or_else(|| RegistryError::PlaneNotFound(name.to_owned()))
    }

    /// Returns a mutable plane by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn get_mut(&mut self, name: &str) -> Result<&mut PlaneData, RegistryError> {
        let id = self
            .id(name)
            .ok_or_else(|| RegistryError::PlaneNotFound(name.to_owned()))?;
        self.planes
            .get_mut(id)
            .ok_or_else(|| RegistryError::PlaneNotFound(name.to_owned()))
    }

    /// Iterates all planes in arbitrary order.
    pub fn iter(&self) -> impl Iterator<Item = &PlaneData> {
        self.planes.values()
    }

    /// Names of all planes, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.names.keys().cloned().collect();
        names.sort();
        names
    }

    /// Redefines the named plane in place, or creates it with the given
    /// appearance when the name is new. Returns the plane's key.
    pub fn upsert(
        &mut self,
        name: &str,
        definition: PlaneDefinition,
        centroid: Point3,
        colour: Colour,
        transparency: f32,
    ) -> PlaneId {
        if let Some(id) = self.id(name) {
            if let Some(plane) = self.planes.get_mut(id) {
                plane.definition = definition;
                plane.centroid = centroid;
                return id;
            }
        }
        let id = self.planes.insert(PlaneData::new(
            name.to_owned(),
            definition,
            centroid,
            colour,
            transparency,
        ));
        self.names.insert(name.to_owned(), id);
        id
    }

    /// Removes and returns the named plane.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn remove(&mut self, name: &str) -> Result<PlaneData, RegistryError> {
        self.names
            .remove(name)
            .and_then(|id| self.planes.remove(id))
            .ok_or_else(|| RegistryError::PlaneNotFound(name.to_owned()))
    }

    /// Sets the stored colour of a plane.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn set_colour(&mut self, name: &str, colour: Colour) -> Result<()> {
        self.get_mut(name)?.colour = colour;
        Ok(())
    }

    /// Sets the transparency of a plane.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] unless `transparency`
    /// is within `[0, 1]`, or an error for an unknown name.
    pub fn set_transparency(&mut self, name: &str, transparency: f32) -> Result<()> {
        if !(0.0..=1.0).contains(&transparency) {
            return Err(GeometryError::ParameterOutOfRange {
                parameter: "transparency",
                value: f64::from(transparency),
                min: 0.0,
                max: 1.0,
            }
            .into());
        }
        self.get_mut(name)?.transparency = transparency;
        Ok(())
    }

    /// Flips a plane's visibility and returns the new value.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn toggle_visibility(&mut self, name: &str) -> Result<bool> {
        let plane = self.get_mut(name)?;
        plane.visible = !plane.visible;
        Ok(plane.visible)
    }
}
