//! Rendering surface abstraction
//!
//! The viewer core only talks to a [`RenderSurface`]. The GPU implementation
//! lives in [`crate::gpu`]; tests use a recording double.

pub mod frame;

pub use frame::{DrawItem, FrameSnapshot, LightRig, LineVertex, MaterialParams};

use crate::scene::{Color, PerspectiveCamera, Scene};

/// Output settings shared by every surface implementation
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceSettings {
    /// Output size in logical pixels
    pub size: (f32, f32),
    pub pixel_ratio: f32,
    pub clear_color: Color,
    /// Whether the target converts linear output to sRGB on write; when it
    /// does not, shaders encode the colour themselves
    pub srgb_output: bool,
}

impl Default for SurfaceSettings {
    fn default() -> Self {
        Self {
            size: (1.0, 1.0),
            pixel_ratio: 1.0,
            clear_color: Color::new(0.0, 0.0, 0.0),
            srgb_output: true,
        }
    }
}

/// Something the viewer can draw a scene into
pub trait RenderSurface {
    /// Set the output size in logical pixels
    fn set_size(&mut self, width: f32, height: f32);

    fn set_pixel_ratio(&mut self, pixel_ratio: f32);

    fn set_clear_color(&mut self, color: Color);

    /// Current output size in logical pixels
    fn size(&self) -> (f32, f32);

    /// Draw one frame
    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera);
}
