//! [`RenderSurface`] backed by the egui wgpu paint callback

use std::sync::Arc;

use super::config::GraphicsConfig;
use super::scene_callback::SceneRenderCallback;
use crate::render::{FrameSnapshot, RenderSurface, SurfaceSettings};
use crate::scene::{Color, PerspectiveCamera, Scene};

/// Captures a frame snapshot per `render` call; the host hands it to egui as
/// a paint callback
#[derive(Debug, Default)]
pub struct EguiSurface {
    settings: SurfaceSettings,
    frame: Option<Arc<FrameSnapshot>>,
}

impl EguiSurface {
    pub fn new(config: Option<&GraphicsConfig>) -> Self {
        let settings = SurfaceSettings {
            srgb_output: config.is_some_and(GraphicsConfig::srgb_target),
            ..SurfaceSettings::default()
        };
        Self { settings, frame: None }
    }

    pub fn settings(&self) -> &SurfaceSettings {
        &self.settings
    }

    /// Most recent frame, if one has been rendered
    pub fn frame(&self) -> Option<&FrameSnapshot> {
        self.frame.as_deref()
    }

    /// Colour the area behind the scene should be filled with
    pub fn background(&self) -> Color {
        self.frame
            .as_ref()
            .map_or(self.settings.clear_color, |frame| frame.background)
    }

    /// Paint callback for the most recent frame
    pub fn paint_callback(&self, rect: egui::Rect) -> Option<egui::PaintCallback> {
        let frame = self.frame.clone()?;
        Some(SceneRenderCallback::new(frame).into_paint_callback(rect))
    }
}

impl RenderSurface for EguiSurface {
    fn set_size(&mut self, width: f32, height: f32) {
        self.settings.size = (width, height);
    }

    fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
        self.settings.pixel_ratio = pixel_ratio;
    }

    fn set_clear_color(&mut self, color: Color) {
        self.settings.clear_color = color;
    }

    fn size(&self) -> (f32, f32) {
        self.settings.size
    }

    fn render(&mut self, scene: &Scene, camera: &PerspectiveCamera) {
        self.frame = Some(Arc::new(FrameSnapshot::capture(scene, camera, self.settings)));
    }
}
