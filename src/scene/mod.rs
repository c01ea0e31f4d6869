//! Scene graph the viewer draws every frame
//!
//! The scene is a small retained structure: a background colour, top-level
//! nodes (each possibly carrying a mesh), a list of lights and debug helpers.
//!
//! - [`camera`] - perspective camera with a cached projection matrix
//! - [`node`] - nodes, transforms and mesh geometry
//! - [`material`] - standard PBR material parameters
//! - [`light`] - spot, ambient and directional lights
//! - [`texture`] - shared cube map handle filled in asynchronously

pub mod camera;
pub mod light;
pub mod material;
pub mod node;
pub mod texture;

pub use camera::PerspectiveCamera;
pub use light::{AmbientLight, DirectionalLight, DirectionalLightHelper, Light, SpotLight};
pub use material::StandardMaterial;
pub use node::{Mesh, MeshGeometry, MeshPrimitive, SceneNode, Transform};
pub use texture::{CubeMapImage, CubeTexture};

/// RGB colour with components in 0..=1, stored in sRGB space
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Color {
    pub const WHITE: Color = Color { r: 1.0, g: 1.0, b: 1.0 };

    pub const fn new(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b }
    }

    /// Build a colour from a `0xRRGGBB` value
    pub fn from_hex(hex: u32) -> Self {
        Self {
            r: ((hex >> 16) & 0xff) as f32 / 255.0,
            g: ((hex >> 8) & 0xff) as f32 / 255.0,
            b: (hex & 0xff) as f32 / 255.0,
        }
    }

    /// Build a colour from linear components, as stored in glTF files
    pub fn from_linear(rgb: [f32; 3]) -> Self {
        Self {
            r: linear_to_srgb(rgb[0]),
            g: linear_to_srgb(rgb[1]),
            b: linear_to_srgb(rgb[2]),
        }
    }

    /// Convert to linear space for lighting
    pub fn to_linear(self) -> [f32; 3] {
        [srgb_to_linear(self.r), srgb_to_linear(self.g), srgb_to_linear(self.b)]
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.r, self.g, self.b]
    }

    pub fn to_color32(self) -> egui::Color32 {
        egui::Color32::from_rgb(
            (self.r * 255.0).round() as u8,
            (self.g * 255.0).round() as u8,
            (self.b * 255.0).round() as u8,
        )
    }
}

fn srgb_to_linear(c: f32) -> f32 {
    if c <= 0.04045 {
        c / 12.92
    } else {
        ((c + 0.055) / 1.055).powf(2.4)
    }
}

fn linear_to_srgb(c: f32) -> f32 {
    let c = c.clamp(0.0, 1.0);
    if c <= 0.0031308 {
        c * 12.92
    } else {
        1.055 * c.powf(1.0 / 2.4) - 0.055
    }
}

/// Root container for everything that gets rendered
#[derive(Debug, Clone)]
pub struct Scene {
    pub background: Option<Color>,
    pub nodes: Vec<SceneNode>,
    pub lights: Vec<Light>,
    pub helpers: Vec<DirectionalLightHelper>,
}

impl Default for Scene {
    fn default() -> Self {
        Self::new()
    }
}

impl Scene {
    pub fn new() -> Self {
        Self {
            background: None,
            nodes: Vec::new(),
            lights: Vec::new(),
            helpers: Vec::new(),
        }
    }

    /// Attach a top-level node, returning its index
    pub fn add(&mut self, node: SceneNode) -> usize {
        self.nodes.push(node);
        self.nodes.len() - 1
    }

    /// Attach a light, returning its index
    pub fn add_light(&mut self, light: impl Into<Light>) -> usize {
        self.lights.push(light.into());
        self.lights.len() - 1
    }

    pub fn add_helper(&mut self, helper: DirectionalLightHelper) {
        self.helpers.push(helper);
    }

    /// Total number of mesh primitives in the scene
    pub fn primitive_count(&self) -> usize {
        self.nodes.iter().map(SceneNode::primitive_count).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_from_hex() {
        let c = Color::from_hex(0xe5e5e5);
        assert!((c.r - 229.0 / 255.0).abs() < 1e-6);
        assert_eq!(c.r, c.g);
        assert_eq!(c.g, c.b);

        let red = Color::from_hex(0xff0000);
        assert_eq!(red.to_array(), [1.0, 0.0, 0.0]);
    }

    #[test]
    fn test_linear_conversion_endpoints() {
        assert_eq!(Color::WHITE.to_linear(), [1.0, 1.0, 1.0]);
        let grey = Color::from_hex(0x404040).to_linear();
        assert!(grey[0] > 0.05 && grey[0] < 0.06);
    }

    #[test]
    fn test_scene_add_returns_indices() {
        let mut scene = Scene::new();
        assert_eq!(scene.add(SceneNode::new("a")), 0);
        assert_eq!(scene.add(SceneNode::new("b")), 1);
        assert_eq!(scene.add_light(AmbientLight::new(Color::WHITE, 1.0)), 0);
        assert_eq!(scene.primitive_count(), 0);
    }
}
