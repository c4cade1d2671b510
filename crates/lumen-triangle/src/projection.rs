//! Camera math for the triangle view.

use cgmath::{EuclideanSpace, Matrix4, Point3, Rad};
use lumen_engine::engine::{Camera, Projection, Viewport};

/// Clipping planes of an orthographic projection.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct OrthoBounds {
    pub left: f32,
    pub right: f32,
    pub bottom: f32,
    pub top: f32,
    pub near: f32,
    pub far: f32,
}

impl OrthoBounds {
    /// `zoom` world units above and below the center, widened by the
    /// viewport aspect ratio. Depth range is `[0, 1]`.
    pub fn from_viewport(viewport: Viewport, zoom: f32) -> Self {
        let aspect = viewport.aspect();
        Self {
            left: -aspect * zoom,
            right: aspect * zoom,
            bottom: -zoom,
            top: zoom,
            near: 0.0,
            far: 1.0,
        }
    }

    pub fn apply(&self, camera: &mut Camera) {
        camera.set_projection(
            Projection::Ortho,
            self.left,
            self.right,
            self.bottom,
            self.top,
            self.near,
            self.far,
        );
    }
}

/// Model matrix of a camera at `eye` looking towards `at`, without roll.
///
/// `pitch = atan2(dy, -dz)`, `yaw = atan2(dx, |(dy, dz)|)` and the result is
/// `T(eye) * Ry(yaw) * Rx(pitch)`.
pub fn look_from_at(eye: Point3<f32>, at: Point3<f32>) -> Matrix4<f32> {
    let dt = at - eye;
    let pitch = dt.y.atan2(-dt.z);
    let yaw = dt.x.atan2(dt.y.hypot(dt.z));

    let rotation = Matrix4::from_angle_y(Rad(yaw)) * Matrix4::from_angle_x(Rad(pitch)) * Matrix4::from_angle_z(Rad(0.0));
    Matrix4::from_translation(eye.to_vec()) * rotation
}

#[cfg(test)]
mod tests {
    use cgmath::{InnerSpace, SquareMatrix, Vector4};

    use super::*;

    const ZOOM: f32 = 1.5;

    fn close(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-5
    }

    // ── ortho bounds ──────────────────────────────────────────────────────

    #[test]
    fn square_viewport_bounds() {
        let b = OrthoBounds::from_viewport(Viewport::full(512, 512), ZOOM);
        assert_eq!(
            b,
            OrthoBounds { left: -1.5, right: 1.5, bottom: -1.5, top: 1.5, near: 0.0, far: 1.0 }
        );
    }

    #[test]
    fn wide_viewport_widens_horizontally() {
        let b = OrthoBounds::from_viewport(Viewport::full(1024, 512), ZOOM);
        assert_eq!((b.left, b.right, b.bottom, b.top), (-3.0, 3.0, -1.5, 1.5));
    }

    #[test]
    fn apply_sets_ortho_camera() {
        let mut camera = Camera::default();
        OrthoBounds::from_viewport(Viewport::full(512, 512), ZOOM).apply(&mut camera);
        assert_eq!(camera.projection_kind(), Projection::Ortho);
        assert_eq!((camera.near(), camera.far()), (0.0, 1.0));
    }

    // ── look-from/look-at ─────────────────────────────────────────────────

    #[test]
    fn looking_down_negative_z_is_identity() {
        let m = look_from_at(Point3::new(0.0, 0.0, 0.0), Point3::new(0.0, 0.0, -1.0));
        assert_eq!(m, Matrix4::identity());
    }

    #[test]
    fn pitch_maps_forward_onto_look_direction() {
        let eye = Point3::new(0.0, 0.0, 0.0);
        let at = Point3::new(0.0, 1.0, -1.0);
        let forward = look_from_at(eye, at) * Vector4::new(0.0, 0.0, -1.0, 0.0);
        let expected = (at - eye).normalize();

        assert!(close(forward.x, expected.x));
        assert!(close(forward.y, expected.y));
        assert!(close(forward.z, expected.z));
    }

    #[test]
    fn eye_becomes_translation() {
        let m = look_from_at(Point3::new(1.0, 2.0, 3.0), Point3::new(1.0, 2.0, 2.0));
        assert_eq!(m.w.truncate(), cgmath::Vector3::new(1.0, 2.0, 3.0));
    }
}
