//! glTF model loader
//!
//! Loads .glb/.gltf files into a [`SceneNode`] hierarchy:
//! - one root node per imported scene, named after the scene
//! - node transforms are kept as translation/rotation/scale
//! - every triangle primitive becomes a [`MeshPrimitive`] with its own
//!   geometry and a [`StandardMaterial`] built from the PBR factors
//! - only buffers are imported; image data is never decoded, so a broken or
//!   unsupported texture cannot fail the load

use std::path::{Path, PathBuf};
use std::sync::Arc;

use glam::{Quat, Vec2, Vec3};

use super::load::LoadHandle;
use crate::error::{Result, ViewerError};
use crate::scene::{Color, Mesh, MeshGeometry, MeshPrimitive, SceneNode, StandardMaterial, Transform};

/// Starts model loads relative to a base directory
#[derive(Debug, Clone, Default)]
pub struct GltfLoader {
    path: PathBuf,
}

impl GltfLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Directory that file names passed to [`GltfLoader::load`] are resolved against
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.path = path.into();
        self
    }

    pub fn resolve(&self, file: &str) -> PathBuf {
        self.path.join(file)
    }

    /// Load `file` on a background thread
    pub fn load(&self, file: &str) -> LoadHandle<SceneNode> {
        let path = self.resolve(file);
        log::debug!("Loading model from {}", path.display());
        LoadHandle::spawn(file, move || load_gltf_scene(&path))
    }
}

/// Load a glTF/GLB file synchronously
pub fn load_gltf_scene(path: impl AsRef<Path>) -> Result<SceneNode> {
    let path = path.as_ref();
    let gltf::Gltf { document, blob } = gltf::Gltf::open(path)?;
    let buffers = gltf::import_buffers(&document, path.parent(), blob)?;
    log_skipped_images(&document);
    build_scene(&document, &buffers)
}

/// Load glTF data from memory; external buffer files cannot be resolved
pub fn load_gltf_scene_from_bytes(data: &[u8]) -> Result<SceneNode> {
    let gltf::Gltf { document, blob } = gltf::Gltf::from_slice(data)?;
    let buffers = gltf::import_buffers(&document, None, blob)?;
    log_skipped_images(&document);
    build_scene(&document, &buffers)
}

fn log_skipped_images(document: &gltf::Document) {
    let count = document.images().count();
    if count > 0 {
        log::debug!("Skipping {} embedded image(s); materials are replaced after load", count);
    }
}

/// Convert the default scene (or the first one) into a node tree
fn build_scene(document: &gltf::Document, buffers: &[gltf::buffer::Data]) -> Result<SceneNode> {
    let Some(scene) = document.default_scene().or_else(|| document.scenes().next()) else {
        log::warn!("glTF document contains no scenes");
        return Ok(SceneNode::new("Scene"));
    };

    let mut root = SceneNode::new(scene.name().unwrap_or("Scene"));
    for node in scene.nodes() {
        root.children.push(process_node(&node, buffers)?);
    }

    log::debug!(
        "Imported glTF scene '{}': {} meshes, {} primitives",
        root.name,
        root.mesh_count(),
        root.primitive_count()
    );
    Ok(root)
}

/// Process a glTF node and its children recursively
fn process_node(node: &gltf::Node, buffers: &[gltf::buffer::Data]) -> Result<SceneNode> {
    let (translation, rotation, scale) = node.transform().decomposed();
    let mut scene_node = SceneNode::new(node.name().unwrap_or("node"));
    scene_node.transform = Transform {
        translation: Vec3::from(translation),
        rotation: Quat::from_array(rotation),
        scale: Vec3::from(scale),
    };

    if let Some(mesh) = node.mesh() {
        let name = mesh.name().unwrap_or("unnamed").to_string();
        let mut primitives = Vec::new();

        for primitive in mesh.primitives() {
            if primitive.mode() != gltf::mesh::Mode::Triangles {
                log::warn!("Skipping non-triangle primitive in mesh '{}' ({:?})", name, primitive.mode());
                continue;
            }
            let geometry = extract_geometry(&primitive, buffers, &name)?;
            primitives.push(MeshPrimitive {
                geometry: Arc::new(geometry),
                material: convert_material(&primitive.material()),
            });
        }

        scene_node.mesh = Some(Mesh { name, primitives });
    }

    for child in node.children() {
        scene_node.children.push(process_node(&child, buffers)?);
    }

    Ok(scene_node)
}

/// Extract vertex attributes and indices from a glTF primitive
fn extract_geometry(
    primitive: &gltf::Primitive,
    buffers: &[gltf::buffer::Data],
    mesh_name: &str,
) -> Result<MeshGeometry> {
    let reader = primitive.reader(|buffer| Some(&buffers[buffer.index()]));

    let positions: Vec<Vec3> = reader
        .read_positions()
        .ok_or_else(|| ViewerError::MissingPositions(mesh_name.to_string()))?
        .map(Vec3::from)
        .collect();

    let normals = reader
        .read_normals()
        .map(|iter| iter.map(Vec3::from).collect::<Vec<_>>());

    let uvs = reader
        .read_tex_coords(0)
        .map(|coords| coords.into_f32().map(Vec2::from).collect::<Vec<_>>());

    let indices = reader
        .read_indices()
        .map(|iter| iter.into_u32().collect::<Vec<_>>());

    Ok(MeshGeometry::new(positions, normals, uvs, indices))
}

/// Map glTF metallic-roughness factors onto a standard material
fn convert_material(material: &gltf::Material) -> StandardMaterial {
    let pbr = material.pbr_metallic_roughness();
    let [r, g, b, a] = pbr.base_color_factor();

    StandardMaterial::default()
        .with_color(Color::from_linear([r, g, b]))
        .with_metalness(pbr.metallic_factor())
        .with_roughness(pbr.roughness_factor())
        .with_opacity(a)
        .with_transparent(material.alpha_mode() == gltf::material::AlphaMode::Blend)
}

#[cfg(test)]
mod tests {
    use super::*;

    const TRIANGLE_GLTF: &str = r#"{
        "asset": { "version": "2.0" },
        "scene": 0,
        "scenes": [{ "name": "Root", "nodes": [0] }],
        "nodes": [
            { "name": "Cage", "translation": [1.0, 0.0, 0.0], "children": [1], "mesh": 0 },
            { "name": "Bars", "scale": [2.0, 2.0, 2.0], "mesh": 0 }
        ],
        "meshes": [{
            "name": "Bar",
            "primitives": [{ "attributes": { "POSITION": 0 }, "indices": 1, "material": 0 }]
        }],
        "materials": [{
            "name": "Glass",
            "pbrMetallicRoughness": {
                "baseColorFactor": [1.0, 0.0, 0.0, 0.5],
                "metallicFactor": 0.2,
                "roughnessFactor": 0.7
            },
            "alphaMode": "BLEND"
        }],
        "buffers": [{
            "byteLength": 42,
            "uri": "data:application/octet-stream;base64,AAAAAAAAAAAAAAAAAACAPwAAAAAAAAAAAAAAAAAAgD8AAAAAAAABAAIA"
        }],
        "bufferViews": [
            { "buffer": 0, "byteOffset": 0, "byteLength": 36 },
            { "buffer": 0, "byteOffset": 36, "byteLength": 6 }
        ],
        "accessors": [
            { "bufferView": 0, "componentType": 5126, "count": 3, "type": "VEC3",
              "min": [0.0, 0.0, 0.0], "max": [1.0, 1.0, 0.0] },
            { "bufferView": 1, "componentType": 5123, "count": 3, "type": "SCALAR" }
        ]
    }"#;

    #[test]
    fn test_import_hierarchy() {
        let root = load_gltf_scene_from_bytes(TRIANGLE_GLTF.as_bytes()).unwrap();

        assert_eq!(root.name, "Root");
        assert_eq!(root.children.len(), 1);
        let cage = &root.children[0];
        assert_eq!(cage.name, "Cage");
        assert_eq!(cage.transform.translation, Vec3::new(1.0, 0.0, 0.0));
        assert_eq!(cage.children[0].name, "Bars");
        assert_eq!(cage.children[0].transform.scale, Vec3::splat(2.0));

        assert_eq!(root.mesh_count(), 2);
        assert_eq!(root.primitive_count(), 2);
    }

    #[test]
    fn test_import_geometry_and_material() {
        let root = load_gltf_scene_from_bytes(TRIANGLE_GLTF.as_bytes()).unwrap();
        let mesh = root.children[0].mesh.as_ref().unwrap();
        let primitive = &mesh.primitives[0];

        assert_eq!(mesh.name, "Bar");
        assert_eq!(primitive.geometry.positions, vec![Vec3::ZERO, Vec3::X, Vec3::Y]);
        assert_eq!(primitive.geometry.indices, vec![0, 1, 2]);
        // Normals were absent and get generated from the face
        assert!((primitive.geometry.normals[0] - Vec3::Z).length() < 1e-6);

        let material = &primitive.material;
        assert!((material.color.r - 1.0).abs() < 1e-5);
        assert_eq!(material.color.g, 0.0);
        assert_eq!(material.color.b, 0.0);
        assert!((material.metalness - 0.2).abs() < 1e-6);
        assert!((material.roughness - 0.7).abs() < 1e-6);
        assert_eq!(material.opacity, 0.5);
        assert!(material.transparent);
    }

    #[test]
    fn test_load_from_disk() {
        let dir = std::env::temp_dir().join(format!("cage-viewer-gltf-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("triangle.gltf"), TRIANGLE_GLTF).unwrap();

        let root = GltfLoader::new().with_path(&dir).load("triangle.gltf").wait().unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.primitive_count(), 2);

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_undecodable_texture_does_not_fail_load() {
        // Same triangle, textured with an image that is not a valid PNG
        let textured = TRIANGLE_GLTF
            .replace(
                r#""metallicFactor": 0.2,"#,
                r#""metallicFactor": 0.2, "baseColorTexture": { "index": 0 },"#,
            )
            .replace(
                r#""buffers": ["#,
                r#""textures": [{ "source": 0 }],
        "images": [{ "uri": "data:image/png;base64,AAAAAAAA" }],
        "buffers": ["#,
            );
        assert!(textured.contains("baseColorTexture"));
        assert!(textured.contains("\"images\""));

        let root = load_gltf_scene_from_bytes(textured.as_bytes()).unwrap();
        assert_eq!(root.primitive_count(), 2);

        let dir = std::env::temp_dir().join(format!("cage-viewer-gltf-texture-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        std::fs::write(dir.join("textured.gltf"), &textured).unwrap();

        let loaded = GltfLoader::new().with_path(&dir).load("textured.gltf").wait();
        let _ = std::fs::remove_dir_all(&dir);
        let root = loaded.unwrap();
        assert_eq!(root.name, "Root");
        assert_eq!(root.primitive_count(), 2);
    }

    #[test]
    fn test_missing_file_fails() {
        let loader = GltfLoader::new().with_path(std::env::temp_dir().join("cage-viewer-missing"));
        let handle = loader.load("nothing.glb");
        assert!(handle.wait().is_err());
    }

    #[test]
    fn test_resolve_joins_base_path() {
        let loader = GltfLoader::new().with_path("./assets/");
        assert_eq!(loader.resolve("cage.glb"), PathBuf::from("./assets/cage.glb"));
    }
}
