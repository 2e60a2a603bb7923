use glam::Mat4;

/// Symmetric perspective frustum.
///
/// The aspect ratio is a fixed parameter; it does not follow the window size.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Perspective {
    pub fov_y_degrees: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Perspective {
    fn default() -> Self {
        Self {
            fov_y_degrees: 60.0,
            aspect: 4.0 / 3.0,
            near: 0.1,
            far: 100.0,
        }
    }
}

impl Perspective {
    /// Right-handed projection with OpenGL clip depth.
    pub fn matrix(&self) -> Mat4 {
        Mat4::perspective_rh_gl(
            self.fov_y_degrees.to_radians(),
            self.aspect,
            self.near,
            self.far,
        )
    }
}
