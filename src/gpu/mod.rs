//! GPU rendering module
//!
//! Everything that touches wgpu lives here. The rest of the crate talks to
//! [`EguiSurface`] through the [`crate::render::RenderSurface`] trait.
//!
//! ## Architecture
//!
//! - [`config`] - sample count, target and depth formats
//! - [`scene_renderer`] - pipelines, buffers and the environment cube map
//! - [`scene_callback`] - egui paint callback integration
//! - [`surface`] - render surface feeding the callback
//! - `shaders/` - WGSL shaders for lit meshes and debug lines

pub mod config;
pub mod scene_callback;
pub mod scene_renderer;
pub mod surface;

pub use config::{global_sample_count, GraphicsConfig, DEPTH_BUFFER_BITS};
pub use scene_callback::{install_renderer, SceneRenderCallback};
pub use scene_renderer::{SceneRenderer, Vertex3D};
pub use surface::EguiSurface;
