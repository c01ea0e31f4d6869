//! Viewer configuration
//!
//! Every field defaults to the built-in constants, so the viewer runs without
//! any configuration file. An optional JSON file can override individual
//! fields; it is searched in the working directory first and then in the
//! user's config directory.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::constants;
use crate::error::Result;

/// File name looked up in the working directory
pub const LOCAL_CONFIG_FILE: &str = "cage-viewer.json";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Directory the model file is resolved against
    pub asset_dir: PathBuf,
    pub model_file: String,
    /// Base URL (or directory) the cube map faces are resolved against
    pub environment_base: String,
    /// Cube map faces in +X, -X, +Y, -Y, +Z, -Z order
    pub environment_faces: [String; 6],
    pub window_size: [f32; 2],
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            asset_dir: PathBuf::from(constants::model::ASSET_DIR),
            model_file: constants::model::FILE_NAME.to_string(),
            environment_base: constants::environment::BASE_URL.to_string(),
            environment_faces: constants::environment::FACES.map(str::to_string),
            window_size: constants::window::DEFAULT_SIZE,
        }
    }
}

impl ViewerConfig {
    /// Parse a configuration from JSON text
    pub fn from_json(text: &str) -> Result<Self> {
        Ok(serde_json::from_str(text)?)
    }

    /// Read a configuration file
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Candidate configuration files, in lookup order
    pub fn search_paths() -> Vec<PathBuf> {
        let mut paths = vec![PathBuf::from(LOCAL_CONFIG_FILE)];
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("cage-viewer").join("config.json"));
        }
        paths
    }

    /// Load the first configuration file found, falling back to defaults.
    ///
    /// A malformed file is reported and skipped rather than aborting startup.
    pub fn discover() -> Self {
        for path in Self::search_paths() {
            if !path.is_file() {
                continue;
            }
            match Self::load_from_file(&path) {
                Ok(config) => {
                    log::info!("Loaded configuration from {}", path.display());
                    return config;
                }
                Err(e) => {
                    log::warn!("Ignoring configuration {}: {}", path.display(), e);
                }
            }
        }
        log::debug!("No configuration file found, using defaults");
        Self::default()
    }
}
