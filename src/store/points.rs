use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::error::RegistryError;
use crate::math::vector_3d::points_coincide;
use crate::math::{Point3, ViewTransform};

/// Corner role a block vertex can be named with, fixing the sample's orientation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum VertexRole {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl VertexRole {
    /// Every role, in display order.
    pub const ALL: [VertexRole; 4] = [
        VertexRole::TopLeft,
        VertexRole::TopRight,
        VertexRole::BottomLeft,
        VertexRole::BottomRight,
    ];

    /// Short label shown next to the point in the 3D view.
    #[must_use]
    pub fn label(self) -> &'static str {
        match self {
            VertexRole::TopLeft => "TL",
            VertexRole::TopRight => "TR",
            VertexRole::BottomLeft => "BL",
            VertexRole::BottomRight => "BR",
        }
    }

    /// Human readable name.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            VertexRole::TopLeft => "Top Left",
            VertexRole::TopRight => "Top Right",
            VertexRole::BottomLeft => "Bottom Left",
            VertexRole::BottomRight => "Bottom Right",
        }
    }
}

impl fmt::Display for VertexRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VertexRole {
    type Err = RegistryError;

    /// Accepts the display name ("Top Left"), the snake-case key
    /// ("top_left") or the short label ("TL"), ignoring case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .chars()
            .filter(|c| c.is_ascii_alphanumeric())
            .map(|c| c.to_ascii_lowercase())
            .collect();
        match key.as_str() {
            "topleft" | "tl" => Ok(VertexRole::TopLeft),
            "topright" | "tr" => Ok(VertexRole::TopRight),
            "bottomleft" | "bl" => Ok(VertexRole::BottomLeft),
            "bottomright" | "br" => Ok(VertexRole::BottomRight),
            _ => Err(RegistryError::UnknownVertexRole(s.to_owned())),
        }
    }
}

/// Outcome of a proximity toggle on a point list.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Toggle {
    /// The candidate was appended.
    Added(Point3),
    /// An existing point near the candidate was removed; carries the stored point.
    Removed(Point3),
}

/// Outcome of a selection toggle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SelectionChange {
    Selected(Point3),
    Deselected(Point3),
    /// No block vertex near the cursor.
    Unchanged,
}

/// Point bookkeeping of a session: free points used to fit a plane, block
/// vertices pinned to the block plane, named corner roles and the single
/// selected vertex.
///
/// Proximity tests run in viewer space: a click "near" a point on screen
/// identifies it, even if the data coordinates differ slightly.
#[derive(Debug, Default, Clone)]
pub struct PointStore {
    points_to_fit: Vec<Point3>,
    block_vertices: Vec<Point3>,
    named_vertices: BTreeMap<VertexRole, Point3>,
    selected_vertex: Option<Point3>,
}

impl PointStore {
    /// Creates a new, empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn points_to_fit(&self) -> &[Point3] {
        &self.points_to_fit
    }

    #[must_use]
    pub fn block_vertices(&self) -> &[Point3] {
        &self.block_vertices
    }

    #[must_use]
    pub fn named_vertices(&self) -> &BTreeMap<VertexRole, Point3> {
        &self.named_vertices
    }

    #[must_use]
    pub fn named_vertex(&self, role: VertexRole) -> Option<&Point3> {
        self.named_vertices.get(&role)
    }

    #[must_use]
    pub fn selected_vertex(&self) -> Option<&Point3> {
        self.selected_vertex.as_ref()
    }

    /// Adds `candidate` to `list`, or removes the first existing point within
    /// `radius` of it once both are projected through `view`.
    pub fn add_or_remove(
        list: &mut Vec<Point3>,
        candidate: Point3,
        view: &ViewTransform,
        radius: f64,
    ) -> Toggle {
        let projected = view.apply(&candidate);
        let hit = list
            .iter()
            .position(|existing| nalgebra::distance(&view.apply(existing), &projected) < radius);

        match hit {
            Some(index) => Toggle::Removed(list.remove(index)),
            None => {
                list.push(candidate);
                Toggle::Added(candidate)
            }
        }
    }

    /// Toggles a free point used for plane fitting.
    pub fn toggle_point_to_fit(&mut self, candidate: Point3, view: &ViewTransform, radius: f64) -> Toggle {
        let toggle = Self::add_or_remove(&mut self.points_to_fit, candidate, view, radius);
        if let Toggle::Removed(point) = toggle {
            self.forget_vertex(&point);
        }
        toggle
    }

    /// Toggles a block vertex. Pinning the vertex to the block plane is the
    /// caller's concern.
    pub fn toggle_block_vertex(&mut self, candidate: Point3, view: &ViewTransform, radius: f64) -> Toggle {
        let toggle = Self::add_or_remove(&mut self.block_vertices, candidate, view, radius);
        if let Toggle::Removed(point) = toggle {
            self.forget_vertex(&point);
        }
        toggle
    }

    /// Selects the block vertex nearest the cursor in viewer space, or
    /// deselects it if it is already selected.
    pub fn toggle_selection(&mut self, cursor: &Point3, view: &ViewTransform, radius: f64) -> SelectionChange {
        let projected = view.apply(cursor);
        let Some(hit) = self
            .block_vertices
            .iter()
            .find(|vertex| nalgebra::distance(&view.apply(vertex), &projected) < radius)
            .copied()
        else {
            return SelectionChange::Unchanged;
        };

        match self.selected_vertex {
            Some(selected) if points_coincide(&selected, &hit) => {
                self.selected_vertex = None;
                SelectionChange::Deselected(hit)
            }
            _ => {
                self.selected_vertex = Some(hit);
                SelectionChange::Selected(hit)
            }
        }
    }

    /// Assigns `role` to `point`. Any other role held by a point at the same
    /// location is released, and the role's previous point loses it.
    pub fn name_vertex(&mut self, role: VertexRole, point: Point3) {
        self.named_vertices
            .retain(|_, existing| !points_coincide(existing, &point));
        self.named_vertices.insert(role, point);
    }

    /// Assigns `role` to the selected vertex and returns that vertex.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::NoVertexSelected`] if nothing is selected.
    pub fn name_selected_vertex(&mut self, role: VertexRole) -> Result<Point3, RegistryError> {
        let point = self.selected_vertex.ok_or(RegistryError::NoVertexSelected)?;
        self.name_vertex(role, point);
        Ok(point)
    }

    /// Whether every corner role has been assigned.
    #[must_use]
    pub fn all_roles_named(&self) -> bool {
        VertexRole::ALL
            .iter()
            .all(|role| self.named_vertices.contains_key(role))
    }

    /// Removes all block vertices with their names and selection; returns the removed points.
    pub fn clear_block_vertices(&mut self) -> Vec<Point3> {
        self.named_vertices.clear();
        self.selected_vertex = None;
        std::mem::take(&mut self.block_vertices)
    }

    /// Removes all free points; returns them.
    pub fn clear_points_to_fit(&mut self) -> Vec<Point3> {
        std::mem::take(&mut self.points_to_fit)
    }

    /// Drops name and selection bindings that refer to `point`'s location.
    fn forget_vertex(&mut self, point: &Point3) {
        self.named_vertices
            .retain(|_, existing| !points_coincide(existing, point));
        if self
            .selected_vertex
            .is_some_and(|selected| points_coincide(&selected, point))
        {
            self.selected_vertex = None;
        }
    }
}
