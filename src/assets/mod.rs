//! Asset loading
//!
//! - [`load`] - one-shot background load handles
//! - [`gltf_loader`] - glTF/GLB import into scene nodes
//! - [`cube_texture_loader`] - six-face environment maps

pub mod cube_texture_loader;
pub mod gltf_loader;
pub mod load;

pub use cube_texture_loader::CubeTextureLoader;
pub use gltf_loader::GltfLoader;
pub use load::LoadHandle;
