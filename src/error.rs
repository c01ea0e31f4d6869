//! Error type shared by the asset loaders and configuration

use thiserror::Error;

/// Errors raised while loading the viewer's inputs
#[derive(Debug, Error)]
pub enum ViewerError {
    #[error("Failed to load glTF file: {0}")]
    Gltf(#[from] gltf::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Missing position data for mesh: {0}")]
    MissingPositions(String),

    #[error("Failed to fetch {url}: {source}")]
    Fetch {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("Request for {url} returned status {status}")]
    HttpStatus { url: String, status: u16 },

    #[error("Failed to decode image: {0}")]
    Image(#[from] image::ImageError),

    #[error("Cube face {face} is {width}x{height}, expected {expected}x{expected}")]
    CubeFaceSize {
        face: usize,
        width: u32,
        height: u32,
        expected: u32,
    },

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    #[error("Loader thread exited before reporting a result")]
    Disconnected,
}

pub type Result<T> = std::result::Result<T, ViewerError>;
