//! eframe application hosting the viewer

use eframe::egui;

use crate::config::ViewerConfig;
use crate::gpu::{self, EguiSurface};
use crate::viewer::Viewer;
use crate::viewport::ViewportSize;

pub struct ViewerApp {
    viewer: Viewer<EguiSurface>,
}

impl ViewerApp {
    pub fn new(cc: &eframe::CreationContext<'_>, config: ViewerConfig) -> Self {
        let graphics = gpu::install_renderer(cc);
        if graphics.is_none() {
            log::error!("No wgpu render state available; the scene will not be drawn");
        }

        let [width, height] = config.window_size;
        let viewport = ViewportSize::new(width, height, cc.egui_ctx.pixels_per_point());
        let surface = EguiSurface::new(graphics.as_ref());

        Self {
            viewer: Viewer::new(&config, surface, viewport),
        }
    }

    pub fn viewer(&self) -> &Viewer<EguiSurface> {
        &self.viewer
    }

    fn handle_input(&mut self, ui: &egui::Ui, response: &egui::Response, height: f32) {
        if response.dragged() {
            let delta = response.drag_delta();
            self.viewer.controls_mut().handle_drag(delta.x, delta.y, height);
        }

        if response.hovered() {
            let scroll = ui.input(|i| i.raw_scroll_delta.y);
            if scroll != 0.0 {
                self.viewer.controls_mut().handle_scroll(scroll);
            }
        }
    }
}

impl eframe::App for ViewerApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        egui::CentralPanel::default()
            .frame(egui::Frame::NONE)
            .show(ctx, |ui| {
                let rect = ui.max_rect();
                let viewport = ViewportSize::new(rect.width(), rect.height(), ctx.pixels_per_point());
                if viewport != self.viewer.viewport() {
                    self.viewer.resize(viewport);
                }

                let response = ui.allocate_rect(rect, egui::Sense::drag());
                self.handle_input(ui, &response, rect.height());

                self.viewer.tick();

                let painter = ui.painter_at(rect);
                painter.rect_filled(rect, 0.0, self.viewer.surface().background().to_color32());
                if let Some(callback) = self.viewer.surface().paint_callback(rect) {
                    painter.add(callback);
                }
            });

        // Redraw every display refresh
        ctx.request_repaint();
    }
}
