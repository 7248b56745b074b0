//! Camera and view management.

use glam::{Mat4, Vec3};

/// Projection/view matrix supplier for rendering.
///
/// Matrices use right-handed coordinates with a [0, 1] clip-space depth
/// range, matching the depth attachment and pipeline configuration.
#[derive(Debug, Clone)]
pub struct Camera {
    projection: Mat4,
    view: Mat4,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            projection: Mat4::IDENTITY,
            view: Mat4::IDENTITY,
        }
    }
}

impl Camera {
    /// Create a camera with identity matrices.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a perspective projection.
    pub fn set_perspective_projection(&mut self, fovy: f32, aspect: f32, near: f32, far: f32) {
        assert!(aspect > 0.0, "aspect ratio must be positive");
        self.projection = Mat4::perspective_rh(fovy, aspect, near, far);
    }

    /// Set an orthographic projection.
    pub fn set_orthographic_projection(
        &mut self,
        left: f32,
        right: f32,
        bottom: f32,
        top: f32,
        near: f32,
        far: f32,
    ) {
        self.projection = Mat4::orthographic_rh(left, right, bottom, top, near, far);
    }

    /// Point the camera at `target` from `position`.
    pub fn set_view_target(&mut self, position: Vec3, target: Vec3, up: Vec3) {
        self.view = Mat4::look_at_rh(position, target, up);
    }

    /// Point the camera along `direction` from `position`.
    pub fn set_view_direction(&mut self, position: Vec3, direction: Vec3, up: Vec3) {
        self.view = Mat4::look_to_rh(position, direction, up);
    }

    /// Get the projection matrix.
    pub fn projection(&self) -> Mat4 {
        self.projection
    }

    /// Get the view matrix.
    pub fn view(&self) -> Mat4 {
        self.view
    }

    /// Get the combined projection-view matrix.
    pub fn projection_view(&self) -> Mat4 {
        self.projection * self.view
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use glam::Vec4;

    #[test]
    fn perspective_maps_near_and_far_to_unit_depth() {
        let mut camera = Camera::new();
        camera.set_perspective_projection(std::f32::consts::FRAC_PI_2, 1.0, 0.1, 100.0);

        let near = camera.projection() * Vec4::new(0.0, 0.0, -0.1, 1.0);
        let far = camera.projection() * Vec4::new(0.0, 0.0, -100.0, 1.0);

        assert_relative_eq!(near.z / near.w, 0.0, epsilon = 1e-5);
        assert_relative_eq!(far.z / far.w, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn orthographic_maps_corners_to_clip_space() {
        let mut camera = Camera::new();
        camera.set_orthographic_projection(-2.0, 2.0, -1.0, 1.0, 0.0, 10.0);

        let corner = camera.projection() * Vec4::new(2.0, 1.0, -10.0, 1.0);
        assert_relative_eq!(corner.x, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corner.y, 1.0, epsilon = 1e-5);
        assert_relative_eq!(corner.z, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn view_target_looks_down_the_line_of_sight() {
        let mut camera = Camera::new();
        camera.set_view_target(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO, Vec3::Y);

        // The target lands on the negative view-space z axis.
        let target = camera.view() * Vec4::new(0.0, 0.0, 0.0, 1.0);
        assert_relative_eq!(target.x, 0.0, epsilon = 1e-5);
        assert_relative_eq!(target.y, 0.0, epsilon = 1e-5);
        assert_relative_eq!(target.z, -5.0, epsilon = 1e-5);
    }
}
