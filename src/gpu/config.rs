//! Centralized graphics configuration for consistent eframe::wgpu settings

use eframe::wgpu;

use crate::constants;

/// Depth buffer format requested from eframe and used by every pipeline
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Bits of depth requested in the native options
pub const DEPTH_BUFFER_BITS: u8 = 32;

/// Graphics configuration shared by the scene pipelines
#[derive(Debug, Clone, Copy)]
pub struct GraphicsConfig {
    pub sample_count: u32,
    pub texture_format: wgpu::TextureFormat,
    pub depth_format: wgpu::TextureFormat,
}

impl GraphicsConfig {
    /// Configuration for the given eframe target format
    pub fn for_target(texture_format: wgpu::TextureFormat) -> Self {
        Self {
            sample_count: global_sample_count(),
            texture_format,
            depth_format: DEPTH_FORMAT,
        }
    }

    /// Whether the target applies sRGB encoding on write
    pub fn srgb_target(&self) -> bool {
        self.texture_format.is_srgb()
    }

    /// Create multisample state from config
    pub fn multisample_state(&self) -> wgpu::MultisampleState {
        wgpu::MultisampleState {
            count: self.sample_count,
            mask: !0,
            alpha_to_coverage_enabled: false,
        }
    }

    /// Create color target state from config
    pub fn color_target_state(&self, blend: wgpu::BlendState) -> wgpu::ColorTargetState {
        wgpu::ColorTargetState {
            format: self.texture_format,
            blend: Some(blend),
            write_mask: wgpu::ColorWrites::ALL,
        }
    }

    /// Depth test state; blended geometry tests but does not write depth
    pub fn depth_stencil_state(&self, depth_write_enabled: bool) -> wgpu::DepthStencilState {
        wgpu::DepthStencilState {
            format: self.depth_format,
            depth_write_enabled,
            depth_compare: wgpu::CompareFunction::Less,
            stencil: wgpu::StencilState::default(),
            bias: wgpu::DepthBiasState::default(),
        }
    }
}

/// Get the global sample count (for eframe configuration)
pub fn global_sample_count() -> u32 {
    constants::renderer::MSAA_SAMPLES
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_matches_native_options() {
        let config = GraphicsConfig::for_target(wgpu::TextureFormat::Bgra8Unorm);
        assert_eq!(config.sample_count, 4);
        assert_eq!(config.multisample_state().count, 4);
        assert_eq!(config.depth_format, wgpu::TextureFormat::Depth32Float);
        assert!(!config.srgb_target());
        assert!(GraphicsConfig::for_target(wgpu::TextureFormat::Bgra8UnormSrgb).srgb_target());
    }

    #[test]
    fn test_blended_depth_state_is_read_only() {
        let config = GraphicsConfig::for_target(wgpu::TextureFormat::Rgba8Unorm);
        assert!(config.depth_stencil_state(true).depth_write_enabled);
        assert!(!config.depth_stencil_state(false).depth_write_enabled);
    }
}
