//! Application-wide constants and default values
//!
//! Centralized location for all hard-coded values used by the viewer

/// Viewport widths below this are treated as a mobile-sized viewport
pub const MOBILE_BREAKPOINT: f32 = 600.0;

/// Window constants
pub mod window {
    /// Title of the native window
    pub const TITLE: &str = "Cage Viewer";

    /// Initial inner size of the native window
    pub const DEFAULT_SIZE: [f32; 2] = [1280.0, 800.0];
}

/// Renderer output settings
pub mod renderer {
    /// Clear colour of the rendering surface
    pub const CLEAR_COLOR: u32 = 0xe5e5e5;

    /// Multisample count, the viewer always renders antialiased
    pub const MSAA_SAMPLES: u32 = 4;
}

/// Scene-level settings
pub mod scene {
    /// Scene background, painted over the clear colour
    pub const BACKGROUND: u32 = 0xffffff;
}

/// Camera defaults
pub mod camera {
    /// Vertical field of view on narrow viewports (degrees)
    pub const MOBILE_FOV: f32 = 60.0;

    /// Vertical field of view on wide viewports (degrees)
    pub const DESKTOP_FOV: f32 = 45.0;

    pub const NEAR: f32 = 1.0;
    pub const FAR: f32 = 1000.0;

    /// Start position, the camera looks at the origin from here
    pub const POSITION: [f32; 3] = [4.0, 5.0, 11.0];
}

/// Orbit controls configuration
pub mod controls {
    pub const DAMPING_FACTOR: f32 = 0.05;
    pub const MIN_DISTANCE: f32 = 5.0;
    pub const MAX_DISTANCE: f32 = 20.0;
    pub const MIN_POLAR_ANGLE: f32 = 0.0;
    pub const MAX_POLAR_ANGLE: f32 = std::f32::consts::PI;
    pub const TARGET: [f32; 3] = [0.0, 1.0, 0.0];

    /// Radians of rotation per pixel of pointer drag, before viewport scaling
    pub const ROTATE_SPEED: f32 = 1.0;

    /// Dolly step per scroll notch
    pub const ZOOM_SPEED: f32 = 1.0;
}

/// Light rig
pub mod lights {
    pub const SPOT_COLOR: u32 = 0xffffff;
    pub const SPOT_INTENSITY: f32 = 3.0;
    pub const SPOT_DISTANCE: f32 = 100.0;
    pub const SPOT_ANGLE: f32 = 0.2;
    pub const SPOT_PENUMBRA: f32 = 0.5;
    pub const SPOT_POSITION: [f32; 3] = [0.0, 25.0, 0.0];

    pub const AMBIENT_COLOR: u32 = 0x404040;
    pub const AMBIENT_INTENSITY: f32 = 2.0;

    pub const DIRECTIONAL_COLOR: u32 = 0xffffff;
    pub const DIRECTIONAL_INTENSITY: f32 = 3.0;
    pub const DIRECTIONAL_POSITION: [f32; 3] = [5.0, 10.0, 5.0];

    /// Edge length of the directional light helper plane
    pub const HELPER_SIZE: f32 = 2.0;
}

/// Model asset placement
pub mod model {
    pub const ASSET_DIR: &str = "./assets/";
    pub const FILE_NAME: &str = "cage.glb";

    /// Translation applied to the loaded scene root
    pub const OFFSET: [f32; 3] = [0.0, 1.05, -1.0];

    /// Uniform scale on narrow viewports
    pub const MOBILE_SCALE: f32 = 0.05;

    /// Uniform scale on wide viewports
    pub const DESKTOP_SCALE: f32 = 0.1;
}

/// Reflective material override
pub mod material {
    pub const COLOR: u32 = 0xaaaaaa;
    pub const METALNESS: f32 = 1.0;
    pub const ROUGHNESS: f32 = 0.1;
    pub const ENV_MAP_INTENSITY: f32 = 1.0;
}

/// Environment cube map
pub mod environment {
    pub const BASE_URL: &str = "https://threejs.org/examples/textures/cube/Bridge2/";

    /// Faces in +X, -X, +Y, -Y, +Z, -Z order
    #[rustfmt::skip]
    pub const FACES: [&str; 6] = [
        "posx.jpg", "negx.jpg",
        "posy.jpg", "negy.jpg",
        "posz.jpg", "negz.jpg",
    ];

    /// Timeout for a single face request in seconds
    pub const FETCH_TIMEOUT_SECS: u64 = 30;
}
