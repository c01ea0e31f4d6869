//! Scene rendering callback for wgpu integration with egui
//!
//! The [`SceneRenderer`] lives in egui's callback resources; each frame gets a
//! callback carrying that frame's snapshot.

use std::sync::Arc;

use egui_wgpu::CallbackTrait;
use eframe::wgpu;

use super::config::GraphicsConfig;
use super::scene_renderer::SceneRenderer;
use crate::render::FrameSnapshot;

/// Create the scene renderer and register it with eframe's wgpu renderer.
///
/// Returns the graphics configuration in use, or `None` when eframe is not
/// running on wgpu.
pub fn install_renderer(cc: &eframe::CreationContext<'_>) -> Option<GraphicsConfig> {
    let render_state = cc.wgpu_render_state.as_ref()?;
    let config = GraphicsConfig::for_target(render_state.target_format);
    let renderer = SceneRenderer::new(&render_state.device, &render_state.queue, config);

    render_state
        .renderer
        .write()
        .callback_resources
        .insert(renderer);
    log::info!(
        "Scene renderer installed ({:?}, adapter {})",
        config.texture_format,
        render_state.adapter.get_info().name
    );
    Some(config)
}

/// Paint callback for one frame of the scene
pub struct SceneRenderCallback {
    frame: Arc<FrameSnapshot>,
}

impl SceneRenderCallback {
    pub fn new(frame: Arc<FrameSnapshot>) -> Self {
        Self { frame }
    }

    /// Wrap into an egui paint callback covering `rect`
    pub fn into_paint_callback(self, rect: egui::Rect) -> egui::PaintCallback {
        egui_wgpu::Callback::new_paint_callback(rect, self)
    }
}

impl CallbackTrait for SceneRenderCallback {
    fn prepare(
        &self,
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        _screen_descriptor: &egui_wgpu::ScreenDescriptor,
        _egui_encoder: &mut wgpu::CommandEncoder,
        callback_resources: &mut egui_wgpu::CallbackResources,
    ) -> Vec<wgpu::CommandBuffer> {
        match callback_resources.get_mut::<SceneRenderer>() {
            Some(renderer) => renderer.prepare(device, queue, &self.frame),
            None => log::warn!("Scene renderer missing from callback resources"),
        }
        Vec::new()
    }

    fn paint(
        &self,
        _info: egui::PaintCallbackInfo,
        render_pass: &mut wgpu::RenderPass<'static>,
        callback_resources: &egui_wgpu::CallbackResources,
    ) {
        if let Some(renderer) = callback_resources.get::<SceneRenderer>() {
            renderer.paint(render_pass);
        }
    }
}
