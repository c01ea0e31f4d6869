//! Perspective camera

use glam::{Mat4, Vec3};

/// Perspective camera looking from `position` at `target`.
///
/// `fov` is the vertical field of view in degrees. The projection matrix is
/// cached and only rebuilt by [`PerspectiveCamera::update_projection_matrix`],
/// so callers changing `fov`, `aspect`, `near` or `far` must call it.
#[derive(Debug, Clone)]
pub struct PerspectiveCamera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    pub fov: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,
    projection_matrix: Mat4,
}

impl Default for PerspectiveCamera {
    fn default() -> Self {
        Self::new(50.0, 1.0, 0.1, 2000.0)
    }
}

impl PerspectiveCamera {
    pub fn new(fov: f32, aspect: f32, near: f32, far: f32) -> Self {
        let mut camera = Self {
            position: Vec3::ZERO,
            target: Vec3::NEG_Z,
            up: Vec3::Y,
            fov,
            aspect,
            near,
            far,
            projection_matrix: Mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera
    }

    pub fn set_position(&mut self, position: Vec3) {
        self.position = position;
    }

    pub fn look_at(&mut self, target: Vec3) {
        self.target = target;
    }

    pub fn update_projection_matrix(&mut self) {
        self.projection_matrix =
            Mat4::perspective_rh(self.fov.to_radians(), self.aspect, self.near, self.far);
    }

    pub fn projection_matrix(&self) -> Mat4 {
        self.projection_matrix
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.target, self.up)
    }

    pub fn build_view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix * self.view_matrix()
    }

    /// Distance between the camera and its target
    pub fn distance_to_target(&self) -> f32 {
        (self.target - self.position).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_projection_is_cached_until_updated() {
        let mut camera = PerspectiveCamera::new(45.0, 1.0, 1.0, 1000.0);
        let before = camera.projection_matrix();

        camera.fov = 60.0;
        assert_eq!(camera.projection_matrix(), before);

        camera.update_projection_matrix();
        assert_ne!(camera.projection_matrix(), before);
        let expected = Mat4::perspective_rh(60f32.to_radians(), 1.0, 1.0, 1000.0);
        assert_eq!(camera.projection_matrix(), expected);
    }

    #[test]
    fn test_target_projects_to_center() {
        let mut camera = PerspectiveCamera::new(45.0, 16.0 / 9.0, 1.0, 1000.0);
        camera.set_position(Vec3::new(4.0, 5.0, 11.0));
        camera.look_at(Vec3::ZERO);

        let clip = camera.build_view_projection_matrix().project_point3(Vec3::ZERO);
        assert!(clip.x.abs() < 1e-5);
        assert!(clip.y.abs() < 1e-5);
        assert!(clip.z > 0.0 && clip.z < 1.0);
    }
}
