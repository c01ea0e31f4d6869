//! Orbit camera controls
//!
//! Rotates the camera around a target point on a sphere, with optional
//! damping so motion eases out after the pointer is released. Distance and
//! polar angle are clamped on every update.

use std::f32::consts::PI;

use glam::Vec3;

use crate::constants;
use crate::scene::PerspectiveCamera;

const EPS: f32 = 1e-6;

/// Spherical coordinates around the Y axis. `phi` is the polar angle from +Y,
/// `theta` the azimuth measured from +Z towards +X.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
struct Spherical {
    radius: f32,
    phi: f32,
    theta: f32,
}

impl Spherical {
    fn from_offset(offset: Vec3) -> Self {
        let radius = offset.length();
        if radius < EPS {
            return Self::default();
        }
        Self {
            radius,
            theta: offset.x.atan2(offset.z),
            phi: (offset.y / radius).clamp(-1.0, 1.0).acos(),
        }
    }

    fn to_offset(self) -> Vec3 {
        let sin_phi_radius = self.phi.sin() * self.radius;
        Vec3::new(
            sin_phi_radius * self.theta.sin(),
            self.phi.cos() * self.radius,
            sin_phi_radius * self.theta.cos(),
        )
    }

    /// Keep phi away from the poles so the view direction never lines up with `up`
    fn make_safe(&mut self) {
        self.phi = self.phi.clamp(EPS, PI - EPS);
    }
}

#[derive(Debug, Clone)]
pub struct OrbitControls {
    pub target: Vec3,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_rotate: bool,
    pub enable_zoom: bool,
    pub enable_pan: bool,
    pub min_distance: f32,
    pub max_distance: f32,
    pub min_polar_angle: f32,
    pub max_polar_angle: f32,
    pub auto_rotate: bool,
    /// Full turns per minute at 60 frames per second
    pub auto_rotate_speed: f32,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,

    spherical_delta: Spherical,
    scale: f32,
    pan_offset: Vec3,
}

impl Default for OrbitControls {
    fn default() -> Self {
        Self {
            target: Vec3::ZERO,
            enable_damping: false,
            damping_factor: constants::controls::DAMPING_FACTOR,
            enable_rotate: true,
            enable_zoom: true,
            enable_pan: true,
            min_distance: 0.0,
            max_distance: f32::INFINITY,
            min_polar_angle: 0.0,
            max_polar_angle: PI,
            auto_rotate: false,
            auto_rotate_speed: 2.0,
            rotate_speed: constants::controls::ROTATE_SPEED,
            zoom_speed: constants::controls::ZOOM_SPEED,
            pan_speed: 1.0,
            spherical_delta: Spherical::default(),
            scale: 1.0,
            pan_offset: Vec3::ZERO,
        }
    }
}

impl OrbitControls {
    pub fn new() -> Self {
        Self::default()
    }

    /// Controls configured for the model viewer: damped, no panning, distance
    /// 5..20, full polar range, orbiting a point just above the origin
    pub fn for_viewer() -> Self {
        Self {
            target: Vec3::from(constants::controls::TARGET),
            enable_damping: true,
            enable_pan: false,
            min_distance: constants::controls::MIN_DISTANCE,
            max_distance: constants::controls::MAX_DISTANCE,
            min_polar_angle: constants::controls::MIN_POLAR_ANGLE,
            max_polar_angle: constants::controls::MAX_POLAR_ANGLE,
            auto_rotate: false,
            ..Self::default()
        }
    }

    pub fn rotate_left(&mut self, angle: f32) {
        self.spherical_delta.theta -= angle;
    }

    pub fn rotate_up(&mut self, angle: f32) {
        self.spherical_delta.phi -= angle;
    }

    /// Multiply the orbit radius by `factor` on the next update
    pub fn dolly(&mut self, factor: f32) {
        if self.enable_zoom && factor > 0.0 {
            self.scale *= factor;
        }
    }

    /// Move the target and camera together in view space. Ignored while
    /// panning is disabled.
    pub fn pan(&mut self, camera: &PerspectiveCamera, delta_x: f32, delta_y: f32) {
        if !self.enable_pan {
            return;
        }
        let forward = (camera.target - camera.position).normalize_or_zero();
        let right = forward.cross(camera.up).normalize_or_zero();
        let up = right.cross(forward).normalize_or_zero();
        self.pan_offset += (right * delta_x + up * delta_y) * self.pan_speed;
    }

    /// Translate a pointer drag (in logical pixels) into rotation. A drag
    /// across the full viewport height is one full turn.
    pub fn handle_drag(&mut self, delta_x: f32, delta_y: f32, viewport_height: f32) {
        if !self.enable_rotate || viewport_height <= 0.0 {
            return;
        }
        let turn = 2.0 * PI * self.rotate_speed / viewport_height;
        self.rotate_left(delta_x * turn);
        self.rotate_up(delta_y * turn);
    }

    /// Translate scroll input into dolly. Positive `delta` scrolls towards
    /// the target.
    pub fn handle_scroll(&mut self, delta: f32) {
        if delta == 0.0 {
            return;
        }
        let step = 0.95f32.powf(self.zoom_speed);
        if delta > 0.0 {
            self.dolly(step);
        } else {
            self.dolly(1.0 / step);
        }
    }

    /// Apply pending input to the camera. Returns whether the camera moved.
    pub fn update(&mut self, camera: &mut PerspectiveCamera) -> bool {
        let previous_position = camera.position;

        let offset = camera.position - self.target;
        let mut spherical = Spherical::from_offset(offset);

        if self.auto_rotate {
            self.rotate_left(2.0 * PI / 60.0 / 60.0 * self.auto_rotate_speed);
        }

        if self.enable_damping {
            spherical.theta += self.spherical_delta.theta * self.damping_factor;
            spherical.phi += self.spherical_delta.phi * self.damping_factor;
        } else {
            spherical.theta += self.spherical_delta.theta;
            spherical.phi += self.spherical_delta.phi;
        }

        spherical.phi = spherical.phi.clamp(self.min_polar_angle, self.max_polar_angle);
        spherical.make_safe();

        spherical.radius = (spherical.radius * self.scale).clamp(self.min_distance, self.max_distance);

        if self.enable_damping {
            self.target += self.pan_offset * self.damping_factor;
        } else {
            self.target += self.pan_offset;
        }

        camera.position = self.target + spherical.to_offset();
        camera.look_at(self.target);

        if self.enable_damping {
            self.spherical_delta.theta *= 1.0 - self.damping_factor;
            self.spherical_delta.phi *= 1.0 - self.damping_factor;
            self.pan_offset *= 1.0 - self.damping_factor;
        } else {
            self.spherical_delta = Spherical::default();
            self.pan_offset = Vec3::ZERO;
        }
        self.scale = 1.0;

        previous_position.distance_squared(camera.position) > EPS
    }

    /// Current orbit radius for `camera`
    pub fn distance(&self, camera: &PerspectiveCamera) -> f32 {
        (camera.position - self.target).length()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn viewer_camera() -> PerspectiveCamera {
        let mut camera = PerspectiveCamera::new(45.0, 1.5, 1.0, 1000.0);
        camera.set_position(Vec3::new(4.0, 5.0, 11.0));
        camera.look_at(Vec3::ZERO);
        camera
    }

    #[test]
    fn test_initial_update_keeps_position_and_retargets() {
        let mut camera = viewer_camera();
        let mut controls = OrbitControls::for_viewer();

        controls.update(&mut camera);

        assert!((camera.position - Vec3::new(4.0, 5.0, 11.0)).length() < 1e-4);
        assert_eq!(camera.target, Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_distance_clamped() {
        let mut camera = viewer_camera();
        let mut controls = OrbitControls::for_viewer();

        controls.dolly(100.0);
        controls.update(&mut camera);
        assert!((controls.distance(&camera) - 20.0).abs() < 1e-3);

        controls.dolly(0.001);
        controls.update(&mut camera);
        assert!((controls.distance(&camera) - 5.0).abs() < 1e-3);
    }

    #[test]
    fn test_scroll_steps_toward_target() {
        let mut camera = viewer_camera();
        let mut controls = OrbitControls::for_viewer();
        controls.update(&mut camera);
        let start = controls.distance(&camera);

        controls.handle_scroll(1.0);
        controls.update(&mut camera);
        assert!((controls.distance(&camera) - start * 0.95).abs() < 1e-3);
    }

    #[test]
    fn test_pan_disabled() {
        let mut camera = viewer_camera();
        let mut controls = OrbitControls::for_viewer();
        controls.update(&mut camera);

        let snapshot = camera.clone();
        controls.pan(&snapshot, 3.0, 3.0);
        controls.update(&mut camera);

        assert_eq!(controls.target, Vec3::new(0.0, 1.0, 0.0));
        assert!((camera.position - snapshot.position).length() < 1e-4);
    }

    #[test]
    fn test_damping_eases_out() {
        let mut camera = viewer_camera();
        let mut controls = OrbitControls::for_viewer();
        controls.update(&mut camera);

        controls.rotate_left(1.0);
        let mut steps = Vec::new();
        for _ in 0..5 {
            let before = camera.position;
            assert!(controls.update(&mut camera));
            steps.push(before.distance(camera.position));
        }
        for pair in steps.windows(2) {
            assert!(pair[1] < pair[0]);
        }
        // Rotation never changes the radius
        assert!((controls.distance(&camera) - 153f32.sqrt()).abs() < 1e-3);
    }

    #[test]
    fn test_undamped_rotation_applies_at_once() {
        let mut camera = viewer_camera();
        let mut controls = OrbitControls::new();
        controls.target = Vec3::ZERO;
        camera.set_position(Vec3::new(0.0, 0.0, 10.0));

        controls.rotate_left(-PI / 2.0);
        assert!(controls.update(&mut camera));
        assert!((camera.position - Vec3::new(10.0, 0.0, 0.0)).length() < 1e-3);

        // No residual motion without damping
        assert!(!controls.update(&mut camera));
    }

    #[test]
    fn test_polar_angle_stays_off_the_poles() {
        let mut camera = viewer_camera();
        let mut controls = OrbitControls::for_viewer();
        controls.enable_damping = false;

        controls.rotate_up(10.0);
        controls.update(&mut camera);
        let offset = camera.position - controls.target;
        assert!(offset.y > 0.0);
        assert!(offset.x.abs() + offset.z.abs() > 0.0);

        controls.rotate_up(-20.0);
        controls.update(&mut camera);
        let offset = camera.position - controls.target;
        assert!(offset.y < 0.0);
    }
}
