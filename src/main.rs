//! Cage Viewer - a minimal native 3D model viewer
//!
//! Opens a window, loads `cage.glb` and shows it with a reflective metal
//! finish under orbit controls.

use cage_viewer::app::ViewerApp;
use cage_viewer::config::ViewerConfig;
use cage_viewer::{constants, gpu};
use eframe::egui;

fn main() -> Result<(), eframe::Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = ViewerConfig::discover();

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(constants::window::TITLE)
            .with_inner_size(config.window_size),
        renderer: eframe::Renderer::Wgpu,
        multisampling: gpu::global_sample_count() as u16,
        depth_buffer: gpu::DEPTH_BUFFER_BITS,
        ..Default::default()
    };

    eframe::run_native(
        constants::window::TITLE,
        options,
        Box::new(move |cc| Ok(Box::new(ViewerApp::new(cc, config)))),
    )
}
