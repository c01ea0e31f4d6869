//! Cage Viewer library
//!
//! The viewer core ([`viewer::Viewer`]) is independent of the window system:
//! it drives any [`render::RenderSurface`]. [`app::ViewerApp`] hosts it in
//! eframe with the wgpu surface from [`gpu`].

pub mod app;
pub mod assets;
pub mod config;
pub mod constants;
pub mod controls;
pub mod error;
pub mod gpu;
pub mod render;
pub mod scene;
pub mod viewer;
pub mod viewport;

// Re-export commonly used types
pub use config::ViewerConfig;
pub use controls::OrbitControls;
pub use error::{Result, ViewerError};
pub use render::RenderSurface;
pub use viewer::Viewer;
pub use viewport::{ViewportProfile, ViewportSize};
