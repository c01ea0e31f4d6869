//! Per-frame snapshot of the scene
//!
//! Flattening the scene graph into world-space draw items happens once per
//! frame on the UI thread; the GPU callback only consumes the snapshot.

use std::sync::Arc;

use glam::{Mat4, Vec3};

use super::SurfaceSettings;
use crate::scene::{Color, CubeTexture, Light, MeshGeometry, PerspectiveCamera, Scene, StandardMaterial};

/// Maximum lights of each kind passed to the shader
pub const MAX_DIRECTIONAL_LIGHTS: usize = 4;
pub const MAX_SPOT_LIGHTS: usize = 4;

/// Spot light distance decay exponent
pub const SPOT_DECAY: f32 = 2.0;

/// Material parameters in the form the shader consumes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialParams {
    /// Linear base colour
    pub base_color: [f32; 3],
    pub opacity: f32,
    pub metalness: f32,
    pub roughness: f32,
    pub env_map_intensity: f32,
    pub transparent: bool,
}

impl From<&StandardMaterial> for MaterialParams {
    fn from(material: &StandardMaterial) -> Self {
        Self {
            base_color: material.color.to_linear(),
            opacity: material.opacity,
            metalness: material.metalness,
            roughness: material.roughness,
            env_map_intensity: material.env_map_intensity,
            transparent: material.transparent,
        }
    }
}

#[derive(Debug, Clone)]
pub struct DrawItem {
    pub geometry: Arc<MeshGeometry>,
    pub model: Mat4,
    pub material: MaterialParams,
    pub env_map: Option<CubeTexture>,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectionalParams {
    /// Direction the light travels in
    pub direction: Vec3,
    /// Linear colour multiplied by intensity
    pub radiance: [f32; 3],
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SpotParams {
    pub position: Vec3,
    pub direction: Vec3,
    pub radiance: [f32; 3],
    pub distance: f32,
    pub cone_cos: f32,
    pub penumbra_cos: f32,
}

/// Lights reduced to what the shader needs
#[derive(Debug, Clone, Default, PartialEq)]
pub struct LightRig {
    pub ambient: [f32; 3],
    pub directional: Vec<DirectionalParams>,
    pub spots: Vec<SpotParams>,
}

impl LightRig {
    pub fn from_lights(lights: &[Light]) -> Self {
        let mut rig = LightRig::default();
        for light in lights {
            match light {
                Light::Ambient(ambient) => {
                    let radiance = radiance(ambient.color, ambient.intensity);
                    for (sum, value) in rig.ambient.iter_mut().zip(radiance) {
                        *sum += value;
                    }
                }
                Light::Directional(directional) => {
                    if rig.directional.len() == MAX_DIRECTIONAL_LIGHTS {
                        log::warn!("Ignoring directional light beyond {}", MAX_DIRECTIONAL_LIGHTS);
                        continue;
                    }
                    rig.directional.push(DirectionalParams {
                        direction: directional.direction(),
                        radiance: radiance(directional.color, directional.intensity),
                    });
                }
                Light::Spot(spot) => {
                    if rig.spots.len() == MAX_SPOT_LIGHTS {
                        log::warn!("Ignoring spot light beyond {}", MAX_SPOT_LIGHTS);
                        continue;
                    }
                    let (penumbra_cos, cone_cos) = spot.cone_cosines();
                    rig.spots.push(SpotParams {
                        position: spot.position,
                        direction: spot.direction(),
                        radiance: radiance(spot.color, spot.intensity),
                        distance: spot.distance,
                        cone_cos,
                        penumbra_cos,
                    });
                }
            }
        }
        rig
    }
}

fn radiance(color: Color, intensity: f32) -> [f32; 3] {
    color.to_linear().map(|c| c * intensity)
}

/// Line vertex for debug helpers
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineVertex {
    pub position: Vec3,
    pub color: [f32; 3],
}

/// Everything needed to draw one frame
#[derive(Debug, Clone)]
pub struct FrameSnapshot {
    pub view_proj: Mat4,
    pub camera_position: Vec3,
    pub background: Color,
    pub settings: SurfaceSettings,
    pub draws: Vec<DrawItem>,
    pub lines: Vec<LineVertex>,
    pub lights: LightRig,
}

impl FrameSnapshot {
    pub fn capture(scene: &Scene, camera: &PerspectiveCamera, settings: SurfaceSettings) -> Self {
        let mut draws = Vec::new();
        for node in &scene.nodes {
            node.visit_primitives(Mat4::IDENTITY, &mut |model, primitive| {
                draws.push(DrawItem {
                    geometry: Arc::clone(&primitive.geometry),
                    model,
                    material: MaterialParams::from(&primitive.material),
                    env_map: primitive.material.env_map.clone(),
                });
            });
        }
        // Opaque first, blended geometry on top
        draws.sort_by_key(|draw| draw.material.transparent);

        let mut lines = Vec::new();
        for helper in &scene.helpers {
            let Some(Light::Directional(light)) = scene.lights.get(helper.light_index) else {
                continue;
            };
            let color = light.color.to_linear();
            for [a, b] in helper.lines(light) {
                lines.push(LineVertex { position: a, color });
                lines.push(LineVertex { position: b, color });
            }
        }

        Self {
            view_proj: camera.build_view_projection_matrix(),
            camera_position: camera.position,
            background: scene.background.unwrap_or(settings.clear_color),
            settings,
            draws,
            lines,
            lights: LightRig::from_lights(&scene.lights),
        }
    }

    /// Environment map used for this frame: the first one attached to any draw
    pub fn environment(&self) -> Option<&CubeTexture> {
        self.draws.iter().find_map(|draw| draw.env_map.as_ref())
    }
}
