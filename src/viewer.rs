//! Viewer core
//!
//! Owns the scene, camera, orbit controls and pending asset loads, and drives
//! a [`RenderSurface`]. Nothing here touches the window system or the GPU, so
//! the whole lifecycle can be exercised with a recording surface.

use glam::Vec3;

use crate::assets::{CubeTextureLoader, GltfLoader, LoadHandle};
use crate::config::ViewerConfig;
use crate::constants;
use crate::controls::OrbitControls;
use crate::error::ViewerError;
use crate::render::RenderSurface;
use crate::scene::{
    AmbientLight, Color, CubeTexture, DirectionalLight, DirectionalLightHelper, PerspectiveCamera, Scene,
    SceneNode, SpotLight, StandardMaterial,
};
use crate::viewport::{ViewportProfile, ViewportSize};

pub struct Viewer<S: RenderSurface> {
    surface: S,
    scene: Scene,
    camera: PerspectiveCamera,
    controls: OrbitControls,
    viewport: ViewportSize,
    environment: CubeTexture,
    pending_model: Option<LoadHandle<SceneNode>>,
    model_index: Option<usize>,
    diagnostics: Vec<String>,
    frames: u64,
}

impl<S: RenderSurface> Viewer<S> {
    /// Set up the surface, scene, camera, controls and lights, then start
    /// loading the model and the environment map in the background
    pub fn new(config: &ViewerConfig, mut surface: S, viewport: ViewportSize) -> Self {
        surface.set_clear_color(Color::from_hex(constants::renderer::CLEAR_COLOR));
        surface.set_pixel_ratio(viewport.pixel_ratio);
        surface.set_size(viewport.width, viewport.height);

        let mut scene = Scene::new();
        scene.background = Some(Color::from_hex(constants::scene::BACKGROUND));

        let profile = viewport.profile();
        let mut camera = PerspectiveCamera::new(
            profile.fov_degrees(),
            viewport.aspect(),
            constants::camera::NEAR,
            constants::camera::FAR,
        );
        camera.set_position(Vec3::from(constants::camera::POSITION));
        camera.look_at(Vec3::ZERO);

        let mut controls = OrbitControls::for_viewer();
        controls.update(&mut camera);

        add_lights(&mut scene);

        let pending_model = GltfLoader::new()
            .with_path(config.asset_dir.clone())
            .load(&config.model_file);
        let environment = CubeTextureLoader::new()
            .with_path(config.environment_base.clone())
            .load(&config.environment_faces);

        log::info!(
            "Viewer initialized at {}x{} ({:?} layout, fov {})",
            viewport.width,
            viewport.height,
            profile,
            camera.fov
        );

        Self {
            surface,
            scene,
            camera,
            controls,
            viewport,
            environment,
            pending_model: Some(pending_model),
            model_index: None,
            diagnostics: Vec::new(),
            frames: 0,
        }
    }

    /// Check the model load and apply its result once it arrives
    pub fn poll_loads(&mut self) {
        let Some(handle) = self.pending_model.as_mut() else {
            return;
        };
        match handle.poll() {
            Some(Ok(node)) => {
                self.pending_model = None;
                self.on_model_loaded(node);
            }
            Some(Err(e)) => {
                self.pending_model = None;
                self.on_model_failed(e);
            }
            None => {}
        }
    }

    /// Place the model, attach it and swap every sub-mesh material for the
    /// reflective one. Returns the node's index in the scene.
    pub fn on_model_loaded(&mut self, mut node: SceneNode) -> usize {
        let scale = ViewportProfile::for_width(self.viewport.width).model_scale();
        node.transform.translation = Vec3::from(constants::model::OFFSET);
        node.transform.set_uniform_scale(scale);

        if !self.environment.is_ready() {
            log::warn!("Environment map not loaded yet; reflections use a neutral fallback until it arrives");
        }

        let name = node.name.clone();
        let mut replaced = 0;
        node.traverse_mut(&mut |child| {
            if let Some(mesh) = child.mesh.as_mut() {
                for primitive in &mut mesh.primitives {
                    primitive.material = StandardMaterial::reflective(Some(self.environment.clone()));
                    replaced += 1;
                }
            }
        });

        let index = self.scene.add(node);
        self.model_index = Some(index);
        log::info!("Model '{}' added at scale {} ({} materials replaced)", name, scale, replaced);
        index
    }

    pub fn on_model_failed(&mut self, error: ViewerError) {
        log::error!("Failed to load model: {}", error);
        self.diagnostics.push(error.to_string());
    }

    /// Apply a new viewport size: field of view, aspect and surface size follow
    /// it; the model keeps the scale it was loaded with
    pub fn resize(&mut self, viewport: ViewportSize) {
        self.camera.fov = viewport.profile().fov_degrees();
        self.camera.aspect = viewport.aspect();
        self.camera.update_projection_matrix();

        if viewport.pixel_ratio != self.viewport.pixel_ratio {
            self.surface.set_pixel_ratio(viewport.pixel_ratio);
        }
        self.surface.set_size(viewport.width, viewport.height);
        self.viewport = viewport;
        log::debug!("Resized to {}x{} (fov {})", viewport.width, viewport.height, self.camera.fov);
    }

    /// One display refresh: poll loads, step the controls, draw
    pub fn tick(&mut self) {
        self.poll_loads();
        self.controls.update(&mut self.camera);
        self.surface.render(&self.scene, &self.camera);
        self.frames += 1;
    }

    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    pub fn camera(&self) -> &PerspectiveCamera {
        &self.camera
    }

    pub fn controls(&self) -> &OrbitControls {
        &self.controls
    }

    pub fn controls_mut(&mut self) -> &mut OrbitControls {
        &mut self.controls
    }

    pub fn surface(&self) -> &S {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    pub fn environment(&self) -> &CubeTexture {
        &self.environment
    }

    /// Scene index of the loaded model, if it has arrived
    pub fn model_index(&self) -> Option<usize> {
        self.model_index
    }

    pub fn is_loading(&self) -> bool {
        self.pending_model.is_some()
    }

    /// Errors reported by asset loads
    pub fn diagnostics(&self) -> &[String] {
        &self.diagnostics
    }

    pub fn frames_rendered(&self) -> u64 {
        self.frames
    }
}

fn add_lights(scene: &mut Scene) {
    use constants::lights;

    let spot = SpotLight::new(
        Color::from_hex(lights::SPOT_COLOR),
        lights::SPOT_INTENSITY,
        lights::SPOT_DISTANCE,
        lights::SPOT_ANGLE,
        lights::SPOT_PENUMBRA,
    )
    .with_position(Vec3::from(lights::SPOT_POSITION));
    scene.add_light(spot);

    scene.add_light(AmbientLight::new(Color::from_hex(lights::AMBIENT_COLOR), lights::AMBIENT_INTENSITY));

    let directional = DirectionalLight::new(Color::from_hex(lights::DIRECTIONAL_COLOR), lights::DIRECTIONAL_INTENSITY)
        .with_position(Vec3::from(lights::DIRECTIONAL_POSITION));
    let index = scene.add_light(directional);
    scene.add_helper(DirectionalLightHelper::new(index, lights::HELPER_SIZE));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::{Light, Mesh, MeshGeometry, MeshPrimitive};
    use std::sync::Arc;
    use std::time::{Duration, Instant};

    /// Surface double that records what the viewer asked of it
    #[derive(Default)]
    struct RecordingSurface {
        size: (f32, f32),
        pixel_ratio: f32,
        clear_color: Option<Color>,
        renders: usize,
        last_node_count: usize,
    }

    impl RenderSurface for RecordingSurface {
        fn set_size(&mut self, width: f32, height: f32) {
            self.size = (width, height);
        }

        fn set_pixel_ratio(&mut self, pixel_ratio: f32) {
            self.pixel_ratio = pixel_ratio;
        }

        fn set_clear_color(&mut self, color: Color) {
            self.clear_color = Some(color);
        }

        fn size(&self) -> (f32, f32) {
            self.size
        }

        fn render(&mut self, scene: &Scene, _camera: &PerspectiveCamera) {
            self.renders += 1;
            self.last_node_count = scene.nodes.len();
        }
    }

    fn offline_config() -> ViewerConfig {
        let missing = std::env::temp_dir().join("cage-viewer-tests-missing");
        ViewerConfig {
            asset_dir: missing.clone(),
            environment_base: missing.to_string_lossy().into_owned(),
            ..ViewerConfig::default()
        }
    }

    fn viewer(width: f32, height: f32) -> Viewer<RecordingSurface> {
        Viewer::new(&offline_config(), RecordingSurface::default(), ViewportSize::new(width, height, 2.0))
    }

    fn model() -> SceneNode {
        let geometry = Arc::new(MeshGeometry::new(vec![Vec3::ZERO, Vec3::X, Vec3::Y], None, None, None));
        let primitive = |color| MeshPrimitive {
            geometry: Arc::clone(&geometry),
            material: StandardMaterial::default().with_color(color),
        };
        let bars = SceneNode::new("bars").with_mesh(Mesh {
            name: "bars".into(),
            primitives: vec![primitive(Color::new(1.0, 0.0, 0.0)), primitive(Color::new(0.0, 1.0, 0.0))],
        });
        let base = SceneNode::new("base").with_mesh(Mesh {
            name: "base".into(),
            primitives: vec![primitive(Color::new(0.0, 0.0, 1.0))],
        });
        SceneNode::new("cage").with_child(bars).with_child(base)
    }

    fn wait_for_load(viewer: &mut Viewer<RecordingSurface>) {
        let deadline = Instant::now() + Duration::from_secs(5);
        while viewer.is_loading() {
            assert!(Instant::now() < deadline, "model load never finished");
            viewer.poll_loads();
            std::thread::sleep(Duration::from_millis(5));
        }
    }

    #[test]
    fn test_initialization() {
        let viewer = viewer(1280.0, 800.0);

        assert_eq!(viewer.surface().size(), (1280.0, 800.0));
        assert_eq!(viewer.surface().pixel_ratio, 2.0);
        assert_eq!(viewer.surface().clear_color, Some(Color::from_hex(0xe5e5e5)));
        assert_eq!(viewer.scene().background, Some(Color::WHITE));

        let camera = viewer.camera();
        assert_eq!(camera.fov, 45.0);
        assert_eq!(camera.aspect, 1.6);
        assert_eq!((camera.near, camera.far), (1.0, 1000.0));
        assert_eq!(viewer.controls().target, Vec3::new(0.0, 1.0, 0.0));

        let lights = &viewer.scene().lights;
        assert_eq!(lights.len(), 3);
        assert!(matches!(lights[0], Light::Spot(_)));
        assert!(matches!(lights[1], Light::Ambient(_)));
        assert!(matches!(lights[2], Light::Directional(_)));
        assert_eq!(viewer.scene().helpers.len(), 1);
        assert!(viewer.scene().nodes.is_empty());
    }

    #[test]
    fn test_narrow_viewport_uses_mobile_fov() {
        assert_eq!(viewer(599.0, 800.0).camera().fov, 60.0);
        assert_eq!(viewer(600.0, 800.0).camera().fov, 45.0);
    }

    #[test]
    fn test_failed_load_adds_no_node() {
        let mut viewer = viewer(1280.0, 800.0);
        wait_for_load(&mut viewer);

        assert!(viewer.scene().nodes.is_empty());
        assert_eq!(viewer.model_index(), None);
        assert_eq!(viewer.diagnostics().len(), 1);

        // No retry on later frames
        viewer.tick();
        viewer.tick();
        assert_eq!(viewer.diagnostics().len(), 1);
        assert!(viewer.scene().nodes.is_empty());
    }

    #[test]
    fn test_loaded_model_placement_and_materials() {
        let mut viewer = viewer(1280.0, 800.0);
        let index = viewer.on_model_loaded(model());

        assert_eq!(viewer.scene().nodes.len(), 1);
        let node = &viewer.scene().nodes[index];
        assert_eq!(node.transform.translation, Vec3::new(0.0, 1.05, -1.0));
        assert_eq!(node.transform.scale, Vec3::splat(0.1));

        let mut materials = 0;
        node.visit_primitives(glam::Mat4::IDENTITY, &mut |_, primitive| {
            let material = &primitive.material;
            assert_eq!(material.color, Color::from_hex(0xaaaaaa));
            assert_eq!(material.metalness, 1.0);
            assert_eq!(material.roughness, 0.1);
            assert_eq!(material.env_map_intensity, 1.0);
            let env = material.env_map.as_ref().expect("env map attached");
            assert!(env.same_as(viewer.environment()));
            materials += 1;
        });
        assert_eq!(materials, 3);
    }

    #[test]
    fn test_model_load_from_asset_dir() {
        const CAGE_GLTF: &str = r#"{
            "asset": { "version": "2.0" },
            "scenes": [{ "name": "Cage", "nodes": [0] }],
            "nodes": [{ "name": "Bars", "mesh": 0 }],
            "meshes": [{ "primitives": [{ "attributes": { "POSITION": 0 }, "material": 0 }] }],
            "materials": [{ "pbrMetallicRoughness": { "baseColorFactor": [1.0, 0.0, 0.0, 1.0] } }],
            "buffers": [{
                "byteLength": 36,
                "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAA"
            }],
            "bufferViews": [{ "buffer": 0, "byteLength": 36 }],
            "accessors": [{ "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
                            "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] }]
        }"#;

        let dir = std::env::temp_dir().join(format!("cage-viewer-assets-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("cage.gltf"), CAGE_GLTF).unwrap();

        let config = ViewerConfig {
            asset_dir: dir.clone(),
            model_file: "cage.gltf".into(),
            ..offline_config()
        };
        let mut viewer = Viewer::new(&config, RecordingSurface::default(), ViewportSize::new(1280.0, 800.0, 1.0));
        wait_for_load(&mut viewer);
        let _ = std::fs::remove_dir_all(&dir);

        assert!(viewer.diagnostics().is_empty(), "{:?}", viewer.diagnostics());
        assert_eq!(viewer.scene().nodes.len(), 1);
        assert_eq!(viewer.model_index(), Some(0));

        let node = &viewer.scene().nodes[0];
        assert_eq!(node.name, "Cage");
        assert_eq!(node.transform.translation, Vec3::new(0.0, 1.05, -1.0));
        assert_eq!(node.transform.scale, Vec3::splat(0.1));

        let mut materials = 0;
        node.visit_primitives(glam::Mat4::IDENTITY, &mut |_, primitive| {
            let material = &primitive.material;
            assert_eq!(material.color, Color::from_hex(0xaaaaaa));
            assert_eq!(material.metalness, 1.0);
            assert_eq!(material.roughness, 0.1);
            let env = material.env_map.as_ref().expect("env map attached");
            assert!(env.same_as(viewer.environment()));
            materials += 1;
        });
        assert_eq!(materials, 1);

        viewer.tick();
        assert_eq!(viewer.surface().last_node_count, 1);
    }

    #[test]
    fn test_narrow_viewport_model_scale() {
        let mut viewer = viewer(400.0, 800.0);
        let index = viewer.on_model_loaded(model());
        assert_eq!(viewer.scene().nodes[index].transform.scale, Vec3::splat(0.05));
    }

    #[test]
    fn test_resize() {
        let mut viewer = viewer(1280.0, 800.0);
        let index = viewer.on_model_loaded(model());

        viewer.resize(ViewportSize::new(500.0, 1000.0, 2.0));
        assert_eq!(viewer.surface().size(), (500.0, 1000.0));
        assert_eq!(viewer.camera().fov, 60.0);
        assert_eq!(viewer.camera().aspect, 0.5);
        // Scale is fixed at load time
        assert_eq!(viewer.scene().nodes[index].transform.scale, Vec3::splat(0.1));

        viewer.resize(ViewportSize::new(1920.0, 1080.0, 1.0));
        assert_eq!(viewer.surface().size(), (1920.0, 1080.0));
        assert_eq!(viewer.surface().pixel_ratio, 1.0);
        assert_eq!(viewer.camera().fov, 45.0);
    }

    #[test]
    fn test_every_tick_renders_once() {
        let mut viewer = viewer(1280.0, 800.0);
        for _ in 0..25 {
            viewer.tick();
        }
        assert_eq!(viewer.surface().renders, 25);
        assert_eq!(viewer.frames_rendered(), 25);
    }

    #[test]
    fn test_model_visible_in_next_frame() {
        let mut viewer = viewer(1280.0, 800.0);
        viewer.tick();
        assert_eq!(viewer.surface().last_node_count, 0);

        viewer.on_model_loaded(model());
        viewer.tick();
        assert_eq!(viewer.surface().last_node_count, 1);
    }

    #[test]
    fn test_controls_keep_camera_in_range() {
        let mut viewer = viewer(1280.0, 800.0);
        for _ in 0..50 {
            viewer.controls_mut().handle_scroll(-1.0);
            viewer.tick();
        }
        let distance = viewer.controls().distance(viewer.camera());
        assert!(distance <= 20.0 + 1e-3);
    }
}
