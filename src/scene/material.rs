//! Standard metallic-roughness material

use super::texture::CubeTexture;
use super::Color;
use crate::constants;

/// Physically based material parameters used by the mesh pipeline
#[derive(Debug, Clone)]
pub struct StandardMaterial {
    pub color: Color,
    pub metalness: f32,
    pub roughness: f32,
    pub opacity: f32,
    pub transparent: bool,
    pub env_map: Option<CubeTexture>,
    pub env_map_intensity: f32,
    /// Set when the GPU copy of this material must be rebuilt
    pub needs_update: bool,
}

impl Default for StandardMaterial {
    fn default() -> Self {
        Self {
            color: Color::WHITE,
            metalness: 0.0,
            roughness: 1.0,
            opacity: 1.0,
            transparent: false,
            env_map: None,
            env_map_intensity: 1.0,
            needs_update: false,
        }
    }
}

impl StandardMaterial {
    /// The light grey, fully metallic, near-mirror finish applied to every
    /// sub-mesh of the loaded model
    pub fn reflective(env_map: Option<CubeTexture>) -> Self {
        Self {
            color: Color::from_hex(constants::material::COLOR),
            metalness: constants::material::METALNESS,
            roughness: constants::material::ROUGHNESS,
            opacity: 1.0,
            transparent: false,
            env_map,
            env_map_intensity: constants::material::ENV_MAP_INTENSITY,
            needs_update: true,
        }
    }

    pub fn with_color(mut self, color: Color) -> Self {
        self.color = color;
        self
    }

    pub fn with_metalness(mut self, metalness: f32) -> Self {
        self.metalness = metalness.clamp(0.0, 1.0);
        self
    }

    pub fn with_roughness(mut self, roughness: f32) -> Self {
        self.roughness = roughness.clamp(0.0, 1.0);
        self
    }

    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    pub fn with_transparent(mut self, transparent: bool) -> Self {
        self.transparent = transparent;
        self
    }
}
