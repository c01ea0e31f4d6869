//! Viewport dimensions and the responsive layout rule
//!
//! The viewer picks between two presets depending on how wide the viewport
//! is: a wider field of view and a smaller model on narrow screens.

use crate::constants::{self, MOBILE_BREAKPOINT};

/// Host viewport dimensions in logical pixels
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ViewportSize {
    pub width: f32,
    pub height: f32,
    /// Physical pixels per logical pixel
    pub pixel_ratio: f32,
}

impl ViewportSize {
    pub fn new(width: f32, height: f32, pixel_ratio: f32) -> Self {
        Self { width, height, pixel_ratio }
    }

    /// Width over height; a collapsed viewport reports 1.0
    pub fn aspect(&self) -> f32 {
        if self.height > 0.0 {
            self.width / self.height
        } else {
            1.0
        }
    }

    /// Size in physical pixels, never zero
    pub fn physical_size(&self) -> (u32, u32) {
        let width = (self.width * self.pixel_ratio).round().max(1.0) as u32;
        let height = (self.height * self.pixel_ratio).round().max(1.0) as u32;
        (width, height)
    }

    pub fn profile(&self) -> ViewportProfile {
        ViewportProfile::for_width(self.width)
    }
}

/// Layout preset derived from the viewport width
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewportProfile {
    Mobile,
    Desktop,
}

impl ViewportProfile {
    pub fn for_width(width: f32) -> Self {
        if width < MOBILE_BREAKPOINT {
            ViewportProfile::Mobile
        } else {
            ViewportProfile::Desktop
        }
    }

    /// Camera vertical field of view in degrees
    pub fn fov_degrees(self) -> f32 {
        match self {
            ViewportProfile::Mobile => constants::camera::MOBILE_FOV,
            ViewportProfile::Desktop => constants::camera::DESKTOP_FOV,
        }
    }

    /// Uniform scale applied to the loaded model
    pub fn model_scale(self) -> f32 {
        match self {
            ViewportProfile::Mobile => constants::model::MOBILE_SCALE,
            ViewportProfile::Desktop => constants::model::DESKTOP_SCALE,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_profile() {
        for width in [600.0, 601.0, 1280.0, 3840.0] {
            let profile = ViewportProfile::for_width(width);
            assert_eq!(profile, ViewportProfile::Desktop);
            assert_eq!(profile.fov_degrees(), 45.0);
            assert_eq!(profile.model_scale(), 0.1);
        }
    }

    #[test]
    fn test_mobile_profile() {
        for width in [0.0, 320.0, 599.0, 599.99] {
            let profile = ViewportProfile::for_width(width);
            assert_eq!(profile, ViewportProfile::Mobile);
            assert_eq!(profile.fov_degrees(), 60.0);
            assert_eq!(profile.model_scale(), 0.05);
        }
    }

    #[test]
    fn test_aspect_and_physical_size() {
        let size = ViewportSize::new(800.0, 400.0, 2.0);
        assert_eq!(size.aspect(), 2.0);
        assert_eq!(size.physical_size(), (1600, 800));

        let collapsed = ViewportSize::new(800.0, 0.0, 1.0);
        assert_eq!(collapsed.aspect(), 1.0);
        assert_eq!(collapsed.physical_size(), (800, 1));
    }
}
