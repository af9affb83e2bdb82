//! Interfaces the hosting viewer provides to a [`TargetingSession`](crate::session::TargetingSession).
//!
//! The host owns the 2D slice viewer (camera / view transform), the 3D
//! renderer showing plane meshes and landmark points, and the loaded volume.
//! All calls are fire-and-forget; no acknowledgement is expected.

use crate::geometry::Aabb;
use crate::math::{LocalTransform, Point3, ViewTransform};
use crate::store::Colour;
use crate::tessellation::TriangleMesh;

/// The interactive slice viewer.
pub trait Viewer {
    /// Current data -> viewer transform.
    fn view_transform(&self) -> ViewTransform;

    /// Replaces the view transform, e.g. to move the camera onto a plane.
    fn set_view_transform(&mut self, transform: ViewTransform);

    /// Centre of the viewer window, in viewer coordinates.
    fn window_centre(&self) -> Point3;

    /// Position of the mouse cursor in data coordinates.
    fn cursor_position(&self) -> Point3;

    /// Hint that overlays (points, selections) changed.
    fn request_repaint(&mut self);

    /// Whether the host is in microtome mode, which freezes planes and points.
    fn microtome_mode_active(&self) -> bool {
        false
    }
}

/// The 3D renderer showing one mesh per named plane.
pub trait MeshRenderer {
    /// Adds (or replaces) the mesh called `name`, in global coordinates.
    fn add_mesh(&mut self, name: &str, mesh: &TriangleMesh, colour: Colour, transparency: f32);

    fn remove_mesh(&mut self, name: &str);

    fn set_mesh_visible(&mut self, name: &str, visible: bool);

    fn set_mesh_colour(&mut self, name: &str, colour: Colour);

    fn set_mesh_transparency(&mut self, name: &str, transparency: f32);
}

/// The volume planes are cut through.
pub trait VolumeSource {
    /// Bounding box in the volume's local frame.
    fn bounding_box(&self) -> Aabb;

    /// Current placement of the volume in the renderer's global frame.
    fn local_transform(&self) -> LocalTransform;
}

/// The renderer's own landmark list, mirrored from the session's points.
///
/// Points are located by position in the volume's local frame.
pub trait PointMirror {
    fn add_point(&mut self, point: &Point3);

    fn remove_point(&mut self, point: &Point3);

    /// Gives the point at `point` the label `label`.
    fn rename_point(&mut self, point: &Point3, label: &str);

    /// Clears `label` from whichever point carries it.
    fn clear_label(&mut self, label: &str);
}

/// Everything a session needs from its host.
pub trait Host: Viewer + MeshRenderer + VolumeSource + PointMirror {}

impl<T: Viewer + MeshRenderer + VolumeSource + PointMirror> Host for T {}

#[cfg(test)]
pub(crate) mod recording {
    //! In-memory host recording every call, for session tests.

    use std::collections::BTreeMap;

    use super::{MeshRenderer, PointMirror, Viewer, VolumeSource};
    use crate::geometry::Aabb;
    use crate::math::{LocalTransform, Point3, ViewTransform};
    use crate::store::Colour;
    use crate::tessellation::TriangleMesh;

    #[derive(Debug, Clone)]
    pub struct RenderedMesh {
        pub mesh: TriangleMesh,
        pub colour: Colour,
        pub transparency: f32,
        pub visible: bool,
    }

    #[derive(Debug)]
    pub struct RecordingHost {
        pub transform: ViewTransform,
        pub transform_sets: usize,
        pub centre: Point3,
        pub cursor: Point3,
        pub repaints: usize,
        pub microtome: bool,
        pub aabb: Aabb,
        pub placement: LocalTransform,
        pub meshes: BTreeMap<String, RenderedMesh>,
        pub landmarks: Vec<(Point3, String)>,
    }

    impl RecordingHost {
        /// A 10 x 10 x 10 volume at the origin, identity view, 200 x 100 window.
        pub fn new() -> Self {
            Self {
                transform: ViewTransform::identity(),
                transform_sets: 0,
                centre: Point3::new(100.0, 50.0, 0.0),
                cursor: Point3::origin(),
                repaints: 0,
                microtome: false,
                aabb: Aabb::new(Point3::origin(), Point3::new(10.0, 10.0, 10.0)),
                placement: LocalTransform::identity(),
                meshes: BTreeMap::new(),
                landmarks: Vec::new(),
            }
        }

        pub fn label_of(&self, point: &Point3) -> Option<&str> {
            self.landmarks
                .iter()
                .find(|(p, _)| p == point)
                .map(|(_, label)| label.as_str())
        }
    }

    impl Viewer for RecordingHost {
        fn view_transform(&self) -> ViewTransform {
            self.transform
        }

        fn set_view_transform(&mut self, transform: ViewTransform) {
            self.transform = transform;
            self.transform_sets += 1;
        }

        fn window_centre(&self) -> Point3 {
            self.centre
        }

        fn cursor_position(&self) -> Point3 {
            self.cursor
        }

        fn request_repaint(&mut self) {
            self.repaints += 1;
        }

        fn microtome_mode_active(&self) -> bool {
            self.microtome
        }
    }

    impl MeshRenderer for RecordingHost {
        fn add_mesh(&mut self, name: &str, mesh: &TriangleMesh, colour: Colour, transparency: f32) {
            self.meshes.insert(
                name.to_owned(),
                RenderedMesh {
                    mesh: mesh.clone(),
                    colour,
                    transparency,
                    visible: true,
                },
            );
        }

        fn remove_mesh(&mut self, name: &str) {
            self.meshes.remove(name);
        }

        fn set_mesh_visible(&mut self, name: &str, visible: bool) {
            if let Some(rendered) = self.meshes.get_mut(name) {
                rendered.visible = visible;
            }
        }

        fn set_mesh_colour(&mut self, name: &str, colour: Colour) {
            if let Some(rendered) = self.meshes.get_mut(name) {
                rendered.colour = colour;
            }
        }

        fn set_mesh_transparency(&mut self, name: &str, transparency: f32) {
            if let Some(rendered) = self.meshes.get_mut(name) {
                rendered.transparency = transparency;
            }
        }
    }

    impl VolumeSource for RecordingHost {
        fn bounding_box(&self) -> Aabb {
            self.aabb
        }

        fn local_transform(&self) -> LocalTransform {
            self.placement
        }
    }

    impl PointMirror for RecordingHost {
        fn add_point(&mut self, point: &Point3) {
            self.landmarks.push((*point, String::new()));
        }

        fn remove_point(&mut self, point: &Point3) {
            self.landmarks.retain(|(p, _)| p != point);
        }

        fn rename_point(&mut self, point: &Point3, label: &str) {
            if let Some((_, existing)) = self.landmarks.iter_mut().find(|(p, _)| p == point) {
                label.clone_into(existing);
            }
        }

        fn clear_label(&mut self, label: &str) {
            for (_, existing) in &mut self.landmarks {
                if existing == label {
                    existing.clear();
                }
            }
        }
    }
}
