//! The targeting engine: one instance per open sample.
//!
//! A [`TargetingSession`] owns the plane registry and the point bookkeeping
//! and reacts to discrete host events (point placed, button pressed, view
//! transform changed). Every event runs to completion before the next one;
//! renderer calls are fire-and-forget.


use std::collections::BTreeMap;

use tracing::{debug, info, warn};

use crate::config::SessionConfig;
use crate::error::{GeometryError, OperationError, RegistryError, Result};
use crate::geometry::PlaneDefinition;
use crate::host::Host;
use crate::math::intersect_3d::distance_to_plane;
use crate::math::vector_3d::{are_parallel, centroid};
use crate::math::{Point3, Vector3, ViewTransform};
use crate::operations::{FitPlane, IntersectBox};
use crate::store::{Colour, PlaneData, PlaneId, PlaneRegistry, PointStore, SelectionChange, Toggle, VertexRole};
use crate::sync;
use crate::tessellation::TriangulatePolygon;

/// Which plane, if any, follows the live view.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TrackingState {
    #[default]
    Idle,
    /// The named plane is redefined from every view transform change.
    Tracking(String),
}

/// Outcome of redefining a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneUpdate {
    /// The plane was created or redefined and its mesh regenerated.
    Updated {
        id: PlaneId,
        created: bool,
        /// Number of box intersection points forming the mesh outline.
        outline_points: usize,
    },
    /// The plane does not cut the volume; any previous state is kept.
    EmptyIntersection,
}

/// Outcome of moving the view onto a plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMove {
    /// The view already shows the plane; nothing was sent to the viewer.
    AlreadyAligned,
    /// The view was centred on the plane, and re-levelled when the normals differed.
    Moved { levelled: bool },
}

/// An engine instance bound to a host.
#[derive(Debug)]
pub struct TargetingSession<H: Host> {
    host: H,
    config: SessionConfig,
    planes: PlaneRegistry,
    points: PointStore,
    tracking: TrackingState,
}

impl<H: Host> TargetingSession<H> {
    /// Creates a session with the default configuration.
    #[must_use]
    pub fn new(host: H) -> Self {
        Self::with_config(host, SessionConfig::default())
    }

    /// Creates a session with an explicit configuration.
    #[must_use]
    pub fn with_config(host: H, config: SessionConfig) -> Self {
        Self {
            host,
            config,
            planes: PlaneRegistry::new(),
            points: PointStore::new(),
            tracking: TrackingState::Idle,
        }
    }

    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    pub fn host_mut(&mut self) -> &mut H {
        &mut self.host
    }

    /// Consumes the session, returning its host.
    pub fn into_host(self) -> H {
        self.host
    }

    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    #[must_use]
    pub fn planes(&self) -> &PlaneRegistry {
        &self.planes
    }

    #[must_use]
    pub fn points(&self) -> &PointStore {
        &self.points
    }

    /// Returns the named plane.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn plane(&self, name: &str) -> Result<&PlaneData> {
        Ok(self.planes.get(name)?)
    }

    #[must_use]
    pub fn has_plane(&self, name: &str) -> bool {
        self.planes.contains(name)
    }

    /// Whether the named plane is shown.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn plane_visible(&self, name: &str) -> Result<bool> {
        Ok(self.planes.get(name)?.visible)
    }

    #[must_use]
    pub fn named_vertices(&self) -> &BTreeMap<VertexRole, Point3> {
        self.points.named_vertices()
    }

    #[must_use]
    pub fn points_to_fit(&self) -> &[Point3] {
        self.points.points_to_fit()
    }

    #[must_use]
    pub fn block_vertices(&self) -> &[Point3] {
        self.points.block_vertices()
    }

    #[must_use]
    pub fn selected_vertex(&self) -> Option<&Point3> {
        self.points.selected_vertex()
    }

    #[must_use]
    pub fn tracking_state(&self) -> &TrackingState {
        &self.tracking
    }

    #[must_use]
    pub fn is_tracking_plane(&self) -> bool {
        matches!(self.tracking, TrackingState::Tracking(_))
    }

    #[must_use]
    pub fn tracked_plane_name(&self) -> Option<&str> {
        match &self.tracking {
            TrackingState::Idle => None,
            TrackingState::Tracking(name) => Some(name),
        }
    }

    /// Whether the target plane, the block plane and all four corner names exist.
    #[must_use]
    pub fn all_planes_and_vertices_defined(&self) -> bool {
        self.planes.contains(&self.config.target_plane)
            && self.planes.contains(&self.config.block_plane)
            && self.points.all_roles_named()
    }

    // ── Planes ──

    /// Creates or redefines the named plane from a normal and a point in the
    /// volume's local frame, and regenerates its mesh.
    ///
    /// The mesh is the plane's cross-section with the volume bounding box,
    /// handed to the renderer in global coordinates. A plane that does not
    /// cut the box (or only touches an edge or corner) is left as it was.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ZeroVector`] for a zero normal.
    pub fn update_plane(&mut self, name: &str, normal: Vector3, point: Point3) -> Result<PlaneUpdate> {
        let definition = PlaneDefinition::new(normal, point)?;
        let aabb = self.host.bounding_box();
        let outline = IntersectBox::new(&definition, &aabb).execute();
        if outline.len() < 3 {
            warn!(
                plane = name,
                points = outline.len(),
                "plane does not cut the volume, keeping previous state"
            );
            return Ok(PlaneUpdate::EmptyIntersection);
        }

        let centre = centroid(&outline)
            .ok_or_else(|| GeometryError::Degenerate("empty intersection outline".into()))?;
        let mesh = TriangulatePolygon::new(&outline, *definition.normal()).execute()?;

        let created = !self.planes.contains(name);
        let id = self.planes.upsert(
            name,
            definition,
            centre,
            self.config.colour_for(name),
            self.config.default_transparency,
        );
        let plane = self.planes.plane(id)?;
        let (colour, transparency, visible) = (plane.colour, plane.transparency, plane.visible);

        let placement = self.host.local_transform();
        let global = mesh.map_vertices(|p| placement.to_global(p));
        self.host.remove_mesh(name);
        self.host.add_mesh(name, &global, colour, transparency);
        self.host.set_mesh_visible(name, visible);

        debug!(
            plane = name,
            created,
            outline = outline.len(),
            triangles = global.triangle_count(),
            "plane updated"
        );
        Ok(PlaneUpdate::Updated {
            id,
            created,
            outline_points: outline.len(),
        })
    }

    /// Redefines the named plane as the viewing plane of `transform`.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform is not invertible.
    pub fn update_plane_on_transform_change(
        &mut self,
        transform: &ViewTransform,
        name: &str,
    ) -> Result<PlaneUpdate> {
        let view_plane = sync::plane_from_view_transform(transform)?;
        self.update_plane(name, *view_plane.normal(), *view_plane.point())
    }

    /// Redefines the named plane as the host's current viewing plane.
    ///
    /// # Errors
    ///
    /// Returns an error if the view transform is not invertible.
    pub fn update_plane_current_view(&mut self, name: &str) -> Result<PlaneUpdate> {
        let transform = self.host.view_transform();
        self.update_plane_on_transform_change(&transform, name)
    }

    /// Regenerates every plane's mesh, e.g. after the volume was moved.
    ///
    /// # Errors
    ///
    /// Propagates the first failing [`update_plane`](Self::update_plane).
    pub fn redraw_current_planes(&mut self) -> Result<()> {
        for name in self.planes.names() {
            let definition = *self.planes.get(&name)?.definition();
            self.update_plane(&name, *definition.normal(), *definition.point())?;
        }
        Ok(())
    }

    /// Deletes the named plane and its mesh. Removing the block plane also
    /// drops every block vertex, and tracking of the plane ends.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn remove_named_plane(&mut self, name: &str) -> Result<()> {
        self.planes.remove(name)?;
        if name == self.config.block_plane {
            self.remove_all_block_vertices();
        }
        if self.tracked_plane_name() == Some(name) {
            info!(plane = name, "tracked plane removed, tracking stopped");
            self.tracking = TrackingState::Idle;
        }
        self.host.remove_mesh(name);
        debug!(plane = name, "plane removed");
        Ok(())
    }

    /// Shows or hides the named plane; returns the new visibility.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn toggle_plane_visibility(&mut self, name: &str) -> Result<bool> {
        let visible = self.planes.toggle_visibility(name)?;
        self.host.set_mesh_visible(name, visible);
        Ok(visible)
    }

    /// Sets the stored colour of the named plane.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn set_plane_colour(&mut self, name: &str, colour: Colour) -> Result<()> {
        self.planes.set_colour(name, colour)?;
        self.host.set_mesh_colour(name, colour);
        Ok(())
    }

    /// Sets the transparency of the named plane.
    ///
    /// # Errors
    ///
    /// Returns [`GeometryError::ParameterOutOfRange`] outside `[0, 1]`, or an
    /// error for an unknown name.
    pub fn set_plane_transparency(&mut self, name: &str, transparency: f32) -> Result<()> {
        self.planes.set_transparency(name, transparency)?;
        self.host.set_mesh_transparency(name, transparency);
        Ok(())
    }

    /// Shows the named plane in the aligned colour, keeping its stored colour.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn set_plane_colour_to_aligned(&mut self, name: &str) -> Result<()> {
        self.planes.get(name)?;
        self.host.set_mesh_colour(name, self.config.aligned_colour);
        Ok(())
    }

    /// Restores the stored colour of the named plane in the renderer.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name.
    pub fn set_plane_colour_to_unaligned(&mut self, name: &str) -> Result<()> {
        let colour = self.planes.get(name)?.colour;
        self.host.set_mesh_colour(name, colour);
        Ok(())
    }

    /// Fits the named plane through the free points.
    ///
    /// Refitting the block plane invalidates the block vertices pinned to it,
    /// so they are removed once the new plane is in place.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotPermitted`] while tracking or in microtome
    /// mode, [`OperationError::InvalidInput`] for fewer than 3 points and
    /// [`GeometryError::DegeneratePlaneFit`] for collinear points.
    pub fn fit_plane_to_points(&mut self, name: &str) -> Result<PlaneUpdate> {
        self.ensure_editable("fit a plane")?;
        let fitted = FitPlane::new(self.points.points_to_fit())
            .execute()
            .inspect_err(|err| warn!(plane = name, %err, "plane fit failed"))?;

        let update = self.update_plane(name, *fitted.normal(), *fitted.point())?;
        if matches!(update, PlaneUpdate::Updated { .. })
            && name == self.config.block_plane
            && !self.points.block_vertices().is_empty()
        {
            info!("block plane refitted, block vertices removed");
            self.remove_all_block_vertices();
        }
        Ok(update)
    }

    // ── View ──

    /// The data-space plane the viewer currently shows.
    ///
    /// # Errors
    ///
    /// Returns an error if the view transform is not invertible.
    pub fn current_view_plane(&self) -> Result<PlaneDefinition> {
        sync::plane_from_view_transform(&self.host.view_transform())
    }

    /// The data-space point under the window centre.
    ///
    /// # Errors
    ///
    /// Returns an error if the view transform is not invertible.
    pub fn global_view_centre(&self) -> Result<Point3> {
        sync::global_view_centre(&self.host.view_transform(), &self.host.window_centre())
    }

    /// Moves the view onto the named plane.
    ///
    /// Does nothing when the view already shows the plane. Otherwise the
    /// plane's centroid is brought to the window centre and, if the normals
    /// differ, the view is rotated about the window centre to match.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name, or an
    /// error if the view transform is not invertible.
    pub fn move_view_to_named_plane(&mut self, name: &str) -> Result<ViewMove> {
        let plane = self.planes.get(name)?;
        let (target, target_centroid) = (*plane.definition(), *plane.centroid());

        let current = self.host.view_transform();
        let view_plane = sync::plane_from_view_transform(&current)?;
        if target.coincides_with(&view_plane, self.config.plane_distance_threshold) {
            info!(plane = name, "already at plane");
            return Ok(ViewMove::AlreadyAligned);
        }

        let parallel = are_parallel(target.normal(), view_plane.normal());
        let centre = self.host.window_centre();
        let moved = sync::move_to_position(&current, &target_centroid, &centre);
        self.host.set_view_transform(moved);
        if !parallel {
            let levelled = sync::level_view(&moved, target.normal(), &centre)?;
            self.host.set_view_transform(levelled);
        }
        debug!(plane = name, levelled = !parallel, "view moved to plane");
        Ok(ViewMove::Moved { levelled: !parallel })
    }

    // ── Tracking ──

    /// Starts tracking the named plane, or stops if it is already tracked.
    ///
    /// Tracking starts only for a visible plane outside microtome mode. Starting
    /// to track the block plane removes the block vertices, which are no
    /// longer pinned once the plane follows the view.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::PlaneNotFound`] for an unknown name and
    /// [`OperationError::NotPermitted`] when another plane is tracked, the
    /// plane is hidden or microtome mode is active.
    pub fn toggle_tracking(&mut self, name: &str) -> Result<&TrackingState> {
        match self.tracked_plane_name().map(str::to_owned) {
            Some(current) if current == name => {
                info!(plane = name, "tracking stopped");
                self.tracking = TrackingState::Idle;
            }
            Some(current) => {
                return Err(OperationError::NotPermitted(format!(
                    "cannot track {name:?} while tracking {current:?}"
                ))
                .into());
            }
            None => {
                if !self.planes.get(name)?.visible {
                    return Err(OperationError::NotPermitted(format!(
                        "plane {name:?} must be visible to track it"
                    ))
                    .into());
                }
                if self.host.microtome_mode_active() {
                    return Err(
                        OperationError::NotPermitted("cannot track planes in microtome mode".into()).into(),
                    );
                }
                if name == self.config.block_plane && !self.points.block_vertices().is_empty() {
                    info!("block plane tracking, block vertices removed");
                    self.remove_all_block_vertices();
                }
                info!(plane = name, "tracking started");
                self.tracking = TrackingState::Tracking(name.to_owned());
            }
        }
        Ok(&self.tracking)
    }

    /// Host callback for a changed view transform; redefines the tracked plane.
    ///
    /// Returns `None` when no plane is tracked.
    ///
    /// # Errors
    ///
    /// Returns an error if the transform is not invertible.
    pub fn on_view_transform_changed(&mut self, transform: &ViewTransform) -> Result<Option<PlaneUpdate>> {
        let TrackingState::Tracking(name) = &self.tracking else {
            return Ok(None);
        };
        let name = name.clone();
        self.update_plane_on_transform_change(transform, &name).map(Some)
    }

    // ── Points ──

    /// Adds a free point for plane fitting, or removes the one near it on screen.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotPermitted`] while tracking or in microtome mode.
    pub fn add_remove_point_to_fit_plane(&mut self, point: Point3) -> Result<Toggle> {
        self.ensure_editable("edit points")?;
        let view = self.host.view_transform();
        let toggle = self
            .points
            .toggle_point_to_fit(point, &view, self.config.pick_radius);
        debug!(?toggle, "point to fit toggled");
        self.mirror(toggle);
        Ok(toggle)
    }

    /// Adds a block vertex, or removes the one near it on screen.
    ///
    /// The point must lie on the block plane.
    ///
    /// # Errors
    ///
    /// Returns [`OperationError::NotPermitted`] while tracking or in microtome
    /// mode, [`RegistryError::PlaneNotFound`] without a block plane and
    /// [`RegistryError::VertexConstraintViolation`] for a point off the block
    /// plane. No state changes on error.
    pub fn add_remove_block_vertex(&mut self, point: Point3) -> Result<Toggle> {
        self.ensure_editable("edit block vertices")?;
        let block = self.planes.get(&self.config.block_plane)?;
        let distance = distance_to_plane(&point, block.definition());
        let threshold = self.config.plane_distance_threshold;
        if distance > threshold {
            warn!(distance, threshold, "block vertex must lie on the block plane");
            return Err(RegistryError::VertexConstraintViolation { distance, threshold }.into());
        }

        let view = self.host.view_transform();
        let toggle = self
            .points
            .toggle_block_vertex(point, &view, self.config.pick_radius);
        debug!(?toggle, "block vertex toggled");
        self.mirror(toggle);
        Ok(toggle)
    }

    /// Selects the block vertex under the cursor, or deselects it.
    pub fn toggle_selection(&mut self) -> SelectionChange {
        let cursor = self.host.cursor_position();
        let view = self.host.view_transform();
        let change = self
            .points
            .toggle_selection(&cursor, &view, self.config.pick_radius);
        if change != SelectionChange::Unchanged {
            debug!(?change, "vertex selection changed");
            self.host.request_repaint();
        }
        change
    }

    /// Names the selected vertex with a corner role, e.g. `"Top Left"`.
    ///
    /// The mirrored point takes the role's short label; any other mirrored
    /// point with that label loses it.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownVertexRole`] for an unrecognised role
    /// and [`RegistryError::NoVertexSelected`] without a selection.
    pub fn name_selected_vertex(&mut self, role_name: &str) -> Result<VertexRole> {
        let role: VertexRole = role_name.parse()?;
        let point = self.points.name_selected_vertex(role)?;
        self.host.clear_label(role.label());
        self.host.rename_point(&point, role.label());
        self.host.request_repaint();
        debug!(%role, ?point, "vertex named");
        Ok(role)
    }

    /// Removes every block vertex, with names and selection, from the session and the mirror.
    pub fn remove_all_block_vertices(&mut self) {
        let removed = self.points.clear_block_vertices();
        for point in &removed {
            self.host.remove_point(point);
        }
        if !removed.is_empty() {
            self.host.request_repaint();
        }
        debug!(count = removed.len(), "block vertices removed");
    }

    /// Removes every free point from the session and the mirror.
    pub fn remove_all_points_to_fit_plane(&mut self) {
        let removed = self.points.clear_points_to_fit();
        for point in &removed {
            self.host.remove_point(point);
        }
        if !removed.is_empty() {
            self.host.request_repaint();
        }
        debug!(count = removed.len(), "points to fit removed");
    }

    fn mirror(&mut self, toggle: Toggle) {
        match toggle {
            Toggle::Added(point) => self.host.add_point(&point),
            Toggle::Removed(point) => self.host.remove_point(&point),
        }
        self.host.request_repaint();
    }

    /// Points and planes are frozen while a plane follows the view or the
    /// microtome is in use.
    fn ensure_editable(&self, action: &str) -> Result<()> {
        if let TrackingState::Tracking(name) = &self.tracking {
            return Err(OperationError::NotPermitted(format!("cannot {action} while tracking {name:?}")).into());
        }
        if self.host.microtome_mode_active() {
            return Err(OperationError::NotPermitted(format!("cannot {action} in microtome mode")).into());
        }
        Ok(())
    }
}
