//! Two-way mapping between the viewer's camera and plane definitions.
//!
//! The viewing plane is the viewer-space plane `z = 0`. Pulling three of its
//! points back through the inverse view transform gives that plane in data
//! space; pushing a plane the other way means translating its centroid to the
//! window centre and rotating the view about that centre until the normals
//! agree.

use crate::error::Result;
use crate::geometry::PlaneDefinition;
use crate::math::vector_3d::normalize;
use crate::math::{Point3, Vector3, ViewTransform, TOLERANCE};

/// Viewer-space points spanning the viewing plane. The first one becomes the
/// plane point; the winding makes an identity view face `+z`.
const VIEWER_REFERENCE_POINTS: [[f64; 3]; 3] = [[0.0, 0.0, 0.0], [0.0, 100.0, 0.0], [100.0, 0.0, 0.0]];

/// The data-space plane currently shown by a viewer with this transform.
///
/// # Errors
///
/// Returns an error if the transform is not invertible.
pub fn plane_from_view_transform(transform: &ViewTransform) -> Result<PlaneDefinition> {
    let inverse = transform.inverse()?;
    let [a, b, c] = VIEWER_REFERENCE_POINTS.map(|[x, y, z]| inverse.apply(&Point3::new(x, y, z)));
    PlaneDefinition::from_points(&a, &b, &c)
}

/// Translates the view so that the data-space `position` appears at `window_centre`.
#[must_use]
pub fn move_to_position(current: &ViewTransform, position: &Point3, window_centre: &Point3) -> ViewTransform {
    let shown_at = current.apply(position);
    current.translated(&(window_centre - shown_at))
}

/// Rotates the view about `window_centre` until its normal matches `target_normal`.
///
/// The rotation axis `current x target` is taken in data space and carried
/// into viewer space by the view's rotation; the view is turned by
/// `-acos(current . target)`. An already (anti-)parallel view is returned
/// unchanged.
///
/// # Errors
///
/// Returns an error if the transform is not invertible or `target_normal` is zero.
pub fn level_view(
    current: &ViewTransform,
    target_normal: &Vector3,
    window_centre: &Point3,
) -> Result<ViewTransform> {
    let target = normalize(target_normal)?;
    let view_normal = *plane_from_view_transform(current)?.normal();

    let axis = view_normal.cross(&target);
    if axis.norm() < TOLERANCE {
        return Ok(*current);
    }
    let axis_in_viewer = current.rotation() * axis.normalize();
    let angle = -view_normal.dot(&target).clamp(-1.0, 1.0).acos();

    let rotation = ViewTransform::rotation_about(window_centre, &axis_in_viewer, angle)?;
    Ok(current.pre_concatenate(&rotation))
}

/// The data-space point under the window centre.
///
/// # Errors
///
/// Returns an error if the transform is not invertible.
pub fn global_view_centre(transform: &ViewTransform, window_centre: &Point3) -> Result<Point3> {
    Ok(transform.inverse()?.apply(window_centre))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::{assert_abs_diff_eq, assert_relative_eq};
    use nalgebra::UnitQuaternion;

    use super::*;
    use crate::math::Matrix4;

    fn p(x: f64, y: f64, z: f64) -> Point3 {
        Point3::new(x, y, z)
    }

    fn v(x: f64, y: f64, z: f64) -> Vector3 {
        Vector3::new(x, y, z)
    }

    /// A zoomed, tilted and shifted camera.
    fn oblique_view() -> ViewTransform {
        let rotation = UnitQuaternion::from_euler_angles(0.4, -0.7, 1.1).to_homogeneous();
        ViewTransform::new(
            Matrix4::new_translation(&v(120.0, -35.0, 8.0)) * rotation * Matrix4::new_scaling(3.0),
        )
    }

    #[test]
    fn identity_view_shows_z_plane() {
        let plane = plane_from_view_transform(&ViewTransform::identity()).unwrap();
        assert_relative_eq!(*plane.normal(), Vector3::z());
        assert_eq!(*plane.point(), p(0.0, 0.0, 0.0));
    }

    #[test]
    fn translated_view_moves_plane_point() {
        let view = ViewTransform::identity().translated(&v(-3.0, -4.0, -5.0));
        let plane = plane_from_view_transform(&view).unwrap();
        assert_relative_eq!(*plane.point(), p(3.0, 4.0, 5.0));
        assert_relative_eq!(*plane.normal(), Vector3::z());
    }

    #[test]
    fn singular_view_is_an_error() {
        let flat = ViewTransform::new(Matrix4::new_nonuniform_scaling(&v(1.0, 1.0, 0.0)));
        assert!(plane_from_view_transform(&flat).is_err());
    }

    #[test]
    fn view_plane_is_reproducible() {
        let view = oblique_view();
        let plane = plane_from_view_transform(&view).unwrap();
        let again = plane_from_view_transform(&view).unwrap();
        assert!(plane.coincides_with(&again, 1e-9));

        let shifted = PlaneDefinition::new(*plane.normal(), plane.point() + plane.normal() * 0.5).unwrap();
        assert!(!shifted.coincides_with(&again, 1e-9));
    }

    #[test]
    fn move_puts_position_at_window_centre() {
        let centre = p(200.0, 150.0, 0.0);
        let target = p(4.0, 6.0, 9.0);
        let moved = move_to_position(&oblique_view(), &target, &centre);
        assert_relative_eq!(moved.apply(&target), centre, epsilon = 1e-9);
        // Orientation is untouched.
        let before = plane_from_view_transform(&oblique_view()).unwrap();
        let after = plane_from_view_transform(&moved).unwrap();
        assert_relative_eq!(*before.normal(), *after.normal(), epsilon = 1e-12);
    }

    #[test]
    fn level_turns_view_normal_onto_target() {
        let centre = p(200.0, 150.0, 0.0);
        let target = v(1.0, 0.0, 1.0).normalize();

        for view in [ViewTransform::identity(), oblique_view()] {
            let levelled = level_view(&view, &target, &centre).unwrap();
            let normal = *plane_from_view_transform(&levelled).unwrap().normal();
            assert_abs_diff_eq!(normal.dot(&target), 1.0, epsilon = 1e-9);
            // The window centre stays over the same data point.
            assert_relative_eq!(
                global_view_centre(&levelled, &centre).unwrap(),
                global_view_centre(&view, &centre).unwrap(),
                epsilon = 1e-9
            );
        }
    }

    #[test]
    fn level_keeps_parallel_view() {
        let view = oblique_view();
        let normal = *plane_from_view_transform(&view).unwrap().normal();
        assert_eq!(level_view(&view, &-normal, &p(0.0, 0.0, 0.0)).unwrap(), view);
    }

    #[test]
    fn window_centre_maps_into_data_space() {
        let view = ViewTransform::new(Matrix4::new_scaling(2.0));
        assert_relative_eq!(
            global_view_centre(&view, &p(100.0, 50.0, 0.0)).unwrap(),
            p(50.0, 25.0, 0.0)
        );
    }
}
