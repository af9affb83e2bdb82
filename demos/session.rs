//! Headless walk-through of a targeting session.
//!
//! Run with `cargo run --example session`; set `RUST_LOG=crosshair=debug`
//! to see every plane update and point toggle.

use crosshair::geometry::Aabb;
use crosshair::host::{MeshRenderer, PointMirror, Viewer, VolumeSource};
use crosshair::math::{LocalTransform, Point3, Vector3, ViewTransform};
use crosshair::store::{Colour, VertexRole};
use crosshair::tessellation::TriangleMesh;
use crosshair::{CrosshairError, TargetingSession};
use nalgebra::UnitQuaternion;
use tracing::info;

/// A host without a screen: keeps the camera and logs renderer calls.
struct HeadlessHost {
    transform: ViewTransform,
    cursor: Point3,
    volume: Aabb,
    placement: LocalTransform,
}

impl HeadlessHost {
    fn new() -> Self {
        Self {
            // Viewing plane at data z = 40.
            transform: ViewTransform::identity().translated(&Vector3::new(0.0, 0.0, -40.0)),
            cursor: Point3::origin(),
            volume: Aabb::new(Point3::origin(), Point3::new(200.0, 200.0, 100.0)),
            placement: LocalTransform::new(UnitQuaternion::identity(), Vector3::new(-100.0, -100.0, 0.0)),
        }
    }
}

impl Viewer for HeadlessHost {
    fn view_transform(&self) -> ViewTransform {
        self.transform
    }

    fn set_view_transform(&mut self, transform: ViewTransform) {
        info!(matrix = ?transform.matrix(), "viewer moved");
        self.transform = transform;
    }

    fn window_centre(&self) -> Point3 {
        Point3::new(400.0, 300.0, 0.0)
    }

    fn cursor_position(&self) -> Point3 {
        self.cursor
    }

    fn request_repaint(&mut self) {}
}

impl MeshRenderer for HeadlessHost {
    fn add_mesh(&mut self, name: &str, mesh: &TriangleMesh, colour: Colour, transparency: f32) {
        info!(
            name,
            triangles = mesh.triangle_count(),
            area = mesh.area(),
            ?colour,
            transparency,
            "mesh added"
        );
    }

    fn remove_mesh(&mut self, name: &str) {
        info!(name, "mesh removed");
    }

    fn set_mesh_visible(&mut self, name: &str, visible: bool) {
        info!(name, visible, "mesh visibility");
    }

    fn set_mesh_colour(&mut self, name: &str, colour: Colour) {
        info!(name, ?colour, "mesh colour");
    }

    fn set_mesh_transparency(&mut self, name: &str, transparency: f32) {
        info!(name, transparency, "mesh transparency");
    }
}

impl VolumeSource for HeadlessHost {
    fn bounding_box(&self) -> Aabb {
        self.volume
    }

    fn local_transform(&self) -> LocalTransform {
        self.placement
    }
}

impl PointMirror for HeadlessHost {
    fn add_point(&mut self, point: &Point3) {
        info!(?point, "landmark added");
    }

    fn remove_point(&mut self, point: &Point3) {
        info!(?point, "landmark removed");
    }

    fn rename_point(&mut self, point: &Point3, label: &str) {
        info!(?point, label, "landmark renamed");
    }

    fn clear_label(&mut self, label: &str) {
        info!(label, "landmark label cleared");
    }
}

fn main() -> Result<(), CrosshairError> {
    // Default: WARN for everything, INFO for this demo and the engine.
    // Override with RUST_LOG (e.g. RUST_LOG=crosshair=debug).
    let env_filter = tracing_subscriber::EnvFilter::from_default_env()
        .add_directive(tracing_subscriber::filter::LevelFilter::WARN.into())
        .add_directive("session=info".parse().unwrap_or_default())
        .add_directive("crosshair=info".parse().unwrap_or_default());
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let mut session = TargetingSession::new(HeadlessHost::new());

    // The block face is the plane currently in view.
    session.update_plane_current_view("block")?;
    let corners = [
        (VertexRole::TopLeft, Point3::new(20.0, 180.0, 40.0)),
        (VertexRole::TopRight, Point3::new(180.0, 180.0, 40.0)),
        (VertexRole::BottomLeft, Point3::new(20.0, 20.0, 40.0)),
        (VertexRole::BottomRight, Point3::new(180.0, 20.0, 40.0)),
    ];
    for (role, corner) in corners {
        session.add_remove_block_vertex(corner)?;
        session.host_mut().cursor = corner;
        session.toggle_selection();
        session.name_selected_vertex(role.name())?;
    }

    // Landmarks marking the structure to cut towards, on a tilted plane.
    for (x, y) in [(30.0, 30.0), (170.0, 40.0), (60.0, 160.0), (150.0, 150.0), (100.0, 100.0)] {
        session.add_remove_point_to_fit_plane(Point3::new(x, y, 55.0 + 0.1 * x - 0.05 * y))?;
    }
    session.fit_plane_to_points("target")?;
    let target = session.plane("target")?;
    info!(normal = ?target.normal(), centroid = ?target.centroid(), "target plane fitted");

    let moved = session.move_view_to_named_plane("target")?;
    info!(?moved, "view moved to target");
    let again = session.move_view_to_named_plane("target")?;
    info!(?again, "second move");

    // Follow the view with the target plane for one camera step.
    session.toggle_tracking("target")?;
    let nudged = session
        .host()
        .view_transform()
        .translated(&Vector3::new(0.0, 0.0, 3.0));
    session.host_mut().set_view_transform(nudged);
    let update = session.on_view_transform_changed(&nudged)?;
    info!(?update, "tracked plane updated");
    session.toggle_tracking("target")?;

    info!(
        ready = session.all_planes_and_vertices_defined(),
        view_centre = ?session.global_view_centre()?,
        "session state"
    );
    Ok(())
}
