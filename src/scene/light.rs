//! Light sources and the directional light helper

use glam::Vec3;

use super::Color;

/// Cone light with smooth falloff at the edge
#[derive(Debug, Clone, PartialEq)]
pub struct SpotLight {
    pub color: Color,
    pub intensity: f32,
    /// Range beyond which the light contributes nothing; 0 means unlimited
    pub distance: f32,
    /// Half-angle of the cone in radians
    pub angle: f32,
    /// Fraction of the cone that fades out, 0..=1
    pub penumbra: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl SpotLight {
    pub fn new(color: Color, intensity: f32, distance: f32, angle: f32, penumbra: f32) -> Self {
        Self {
            color,
            intensity,
            distance,
            angle,
            penumbra: penumbra.clamp(0.0, 1.0),
            position: Vec3::new(0.0, 1.0, 0.0),
            target: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Y)
    }

    /// Cosines of the inner and outer cone edges
    pub fn cone_cosines(&self) -> (f32, f32) {
        let outer = self.angle.cos();
        let inner = (self.angle * (1.0 - self.penumbra)).cos();
        (inner, outer)
    }
}

/// Uniform light from every direction
#[derive(Debug, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: Color,
    pub intensity: f32,
}

impl AmbientLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self { color, intensity }
    }
}

/// Parallel light shining from `position` towards `target`
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLight {
    pub color: Color,
    pub intensity: f32,
    pub position: Vec3,
    pub target: Vec3,
}

impl DirectionalLight {
    pub fn new(color: Color, intensity: f32) -> Self {
        Self {
            color,
            intensity,
            position: Vec3::new(0.0, 1.0, 0.0),
            target: Vec3::ZERO,
        }
    }

    pub fn with_position(mut self, position: Vec3) -> Self {
        self.position = position;
        self
    }

    /// Direction the light travels in
    pub fn direction(&self) -> Vec3 {
        (self.target - self.position).try_normalize().unwrap_or(Vec3::NEG_Y)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum Light {
    Spot(SpotLight),
    Ambient(AmbientLight),
    Directional(DirectionalLight),
}

impl From<SpotLight> for Light {
    fn from(light: SpotLight) -> Self {
        Light::Spot(light)
    }
}

impl From<AmbientLight> for Light {
    fn from(light: AmbientLight) -> Self {
        Light::Ambient(light)
    }
}

impl From<DirectionalLight> for Light {
    fn from(light: DirectionalLight) -> Self {
        Light::Directional(light)
    }
}

/// Debug visual for a directional light: a square facing the target and a
/// line towards it
#[derive(Debug, Clone, PartialEq)]
pub struct DirectionalLightHelper {
    /// Index of the light in [`super::Scene::lights`]
    pub light_index: usize,
    pub size: f32,
}

impl DirectionalLightHelper {
    pub fn new(light_index: usize, size: f32) -> Self {
        Self { light_index, size }
    }

    /// World-space line segments for `light`
    pub fn lines(&self, light: &DirectionalLight) -> Vec<[Vec3; 2]> {
        let forward = light.direction();
        let reference = if forward.abs().dot(Vec3::Y) > 0.999 { Vec3::Z } else { Vec3::Y };
        let right = forward.cross(reference).normalize() * self.size;
        let up = right.cross(forward).normalize() * self.size;

        let p = light.position;
        let corners = [p - right + up, p + right + up, p + right - up, p - right - up];

        let mut lines: Vec<[Vec3; 2]> = (0..4).map(|i| [corners[i], corners[(i + 1) % 4]]).collect();
        lines.push([p, light.target]);
        lines
    }
}
