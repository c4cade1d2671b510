use cgmath::{Deg, Matrix4, SquareMatrix};

/// Converts OpenGL clip space (z in [-1, 1]) to wgpu clip space (z in [0, 1]).
#[rustfmt::skip]
pub const OPENGL_TO_WGPU_MATRIX: Matrix4<f32> = Matrix4::new(
    1.0, 0.0, 0.0, 0.0,
    0.0, 1.0, 0.0, 0.0,
    0.0, 0.0, 0.5, 0.0,
    0.0, 0.0, 0.5, 1.0,
);

/// Projection family used by [`Camera::set_projection`].
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum Projection {
    Ortho,
    Perspective,
}

/// A camera: a model matrix placing it in the world plus a projection.
///
/// The camera looks down its local -Z axis. The view matrix is the inverse
/// of the model matrix.
#[derive(Debug, Clone)]
pub struct Camera {
    model: Matrix4<f32>,
    kind: Projection,
    projection: Matrix4<f32>,
    near: f32,
    far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        let mut camera = Self {
            model: Matrix4::identity(),
            kind: Projection::Ortho,
            projection: Matrix4::identity(),
            near: 0.0,
            far: 1.0,
        };
        camera.set_projection(Projection::Ortho, -1.0, 1.0, -1.0, 1.0, 0.0, 1.0);
        camera
    }
}

impl Camera {
    pub fn set_model_matrix(&mut self, model: Matrix4<f32>) {
        self.model = model;
    }

    pub fn model_matrix(&self) -> Matrix4<f32> {
        self.model
    }

    /// World-to-camera transform. A singular model matrix yields identity.
    pub fn view_matrix(&self) -> Matrix4<f32> {
        self.model.invert().unwrap_or_else(|| {
            log::warn!("camera model matrix is singular; using identity view");
            Matrix4::identity()
        })
    }

    /// Sets the projection from the six clipping planes.
    ///
    /// `near`/`far` are distances along the viewing direction.
    #[allow(clippy::too_many_arguments)]
    pub fn set_projection(
        &mut self,
        kind: Projection,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        let gl = match kind {
            Projection::Ortho => cgmath::ortho(left, right, bottom, top, near, far),
            Projection::Perspective => cgmath::frustum(left, right, bottom, top, near, far),
        };

        self.kind = kind;
        self.projection = OPENGL_TO_WGPU_MATRIX * gl;
        self.near = near;
        self.far = far;
    }

    /// Symmetric perspective projection from a vertical field of view in degrees.
    pub fn set_lens_projection(&mut self, fov_y_deg: f32, aspect: f32, near: f32, far: f32) {
        self.kind = Projection::Perspective;
        self.projection = OPENGL_TO_WGPU_MATRIX * cgmath::perspective(Deg(fov_y_deg), aspect, near, far);
        self.near = near;
        self.far = far;
    }

    pub fn projection_kind(&self) -> Projection {
        self.kind
    }

    pub fn projection_matrix(&self) -> Matrix4<f32> {
        self.projection
    }

    pub fn near(&self) -> f32 {
        self.near
    }

    pub fn far(&self) -> f32 {
        self.far
    }

    pub fn view_projection(&self) -> Matrix4<f32> {
        self.projection * self.view_matrix()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cgmath::{Vector3, Vector4};

    fn approx(a: Vector4<f32>, b: Vector4<f32>) -> bool {
        (a - b).x.abs() < 1e-5 && (a - b).y.abs() < 1e-5 && (a - b).z.abs() < 1e-5 && (a - b).w.abs() < 1e-5
    }

    #[test]
    fn ortho_maps_bounds_to_clip_corners() {
        let mut cam = Camera::default();
        cam.set_projection(Projection::Ortho, -1.5, 1.5, -1.5, 1.5, 0.0, 1.0);
        let p = cam.projection_matrix();

        assert!(approx(p * Vector4::new(1.5, 1.5, 0.0, 1.0), Vector4::new(1.0, 1.0, 0.0, 1.0)));
        assert!(approx(p * Vector4::new(-1.5, -1.5, -1.0, 1.0), Vector4::new(-1.0, -1.0, 1.0, 1.0)));
    }

    #[test]
    fn set_projection_records_kind_and_planes() {
        let mut cam = Camera::default();
        cam.set_projection(Projection::Perspective, -1.0, 1.0, -1.0, 1.0, 0.1, 10.0);
        assert_eq!(cam.projection_kind(), Projection::Perspective);
        assert_eq!(cam.near(), 0.1);
        assert_eq!(cam.far(), 10.0);
    }

    #[test]
    fn view_is_inverse_of_model() {
        let mut cam = Camera::default();
        cam.set_model_matrix(Matrix4::from_translation(Vector3::new(0.0, 0.0, 5.0)));
        let v = cam.view_matrix() * Vector4::new(0.0, 0.0, 5.0, 1.0);
        assert!(approx(v, Vector4::new(0.0, 0.0, 0.0, 1.0)));
    }

    #[test]
    fn lens_projection_is_perspective() {
        let mut cam = Camera::default();
        cam.set_lens_projection(65.0, 1.0, 0.1, 11.0);
        assert_eq!(cam.projection_kind(), Projection::Perspective);
        // Perspective divides by -z: w of a point at z = -2 is 2.
        let clip = cam.projection_matrix() * Vector4::new(0.0, 0.0, -2.0, 1.0);
        assert!((clip.w - 2.0).abs() < 1e-5);
    }
}
