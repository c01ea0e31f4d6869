//! Scene nodes, transforms and mesh geometry

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use glam::{Mat4, Quat, Vec2, Vec3};

use super::material::StandardMaterial;

static NEXT_GEOMETRY_ID: AtomicU64 = AtomicU64::new(1);

/// Translation, rotation and scale of a node relative to its parent
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    pub translation: Vec3,
    pub rotation: Quat,
    pub scale: Vec3,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            translation: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            scale: Vec3::ONE,
        }
    }
}

impl Transform {
    pub fn matrix(&self) -> Mat4 {
        Mat4::from_scale_rotation_translation(self.scale, self.rotation, self.translation)
    }

    pub fn set_uniform_scale(&mut self, scale: f32) {
        self.scale = Vec3::splat(scale);
    }
}

/// Immutable vertex data shared between the scene and the GPU cache
#[derive(Debug)]
pub struct MeshGeometry {
    id: u64,
    pub positions: Vec<Vec3>,
    pub normals: Vec<Vec3>,
    pub uvs: Vec<Vec2>,
    pub indices: Vec<u32>,
}

impl MeshGeometry {
    /// Build geometry, filling in missing normals, uvs and indices.
    ///
    /// Missing normals are computed per vertex from the triangle faces.
    pub fn new(
        positions: Vec<Vec3>,
        normals: Option<Vec<Vec3>>,
        uvs: Option<Vec<Vec2>>,
        indices: Option<Vec<u32>>,
    ) -> Self {
        let indices = indices.unwrap_or_else(|| (0..positions.len() as u32).collect());
        let normals = match normals {
            Some(normals) if normals.len() == positions.len() => normals,
            _ => compute_vertex_normals(&positions, &indices),
        };
        let uvs = match uvs {
            Some(uvs) if uvs.len() == positions.len() => uvs,
            _ => vec![Vec2::ZERO; positions.len()],
        };

        Self {
            id: NEXT_GEOMETRY_ID.fetch_add(1, Ordering::Relaxed),
            positions,
            normals,
            uvs,
            indices,
        }
    }

    /// Process-unique identifier used to key GPU buffers
    pub fn id(&self) -> u64 {
        self.id
    }

    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

fn compute_vertex_normals(positions: &[Vec3], indices: &[u32]) -> Vec<Vec3> {
    let mut normals = vec![Vec3::ZERO; positions.len()];
    for tri in indices.chunks_exact(3) {
        let [a, b, c] = [tri[0] as usize, tri[1] as usize, tri[2] as usize];
        if a >= positions.len() || b >= positions.len() || c >= positions.len() {
            continue;
        }
        // Area-weighted face normal
        let face = (positions[b] - positions[a]).cross(positions[c] - positions[a]);
        normals[a] += face;
        normals[b] += face;
        normals[c] += face;
    }
    normals
        .into_iter()
        .map(|n| n.try_normalize().unwrap_or(Vec3::Y))
        .collect()
}

/// One drawable piece of a mesh: geometry plus the material it is drawn with
#[derive(Debug, Clone)]
pub struct MeshPrimitive {
    pub geometry: Arc<MeshGeometry>,
    pub material: StandardMaterial,
}

#[derive(Debug, Clone)]
pub struct Mesh {
    pub name: String,
    pub primitives: Vec<MeshPrimitive>,
}

/// Node in the scene hierarchy
#[derive(Debug, Clone)]
pub struct SceneNode {
    pub name: String,
    pub transform: Transform,
    pub mesh: Option<Mesh>,
    pub children: Vec<SceneNode>,
}

impl SceneNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            mesh: None,
            children: Vec::new(),
        }
    }

    pub fn with_mesh(mut self, mesh: Mesh) -> Self {
        self.mesh = Some(mesh);
        self
    }

    pub fn with_child(mut self, child: SceneNode) -> Self {
        self.children.push(child);
        self
    }

    /// Visit this node and every descendant, depth first
    pub fn traverse(&self, visit: &mut impl FnMut(&SceneNode)) {
        visit(self);
        for child in &self.children {
            child.traverse(visit);
        }
    }

    /// Mutable depth-first traversal
    pub fn traverse_mut(&mut self, visit: &mut impl FnMut(&mut SceneNode)) {
        visit(self);
        for child in &mut self.children {
            child.traverse_mut(visit);
        }
    }

    /// Visit every primitive of every mesh in the subtree together with its
    /// world matrix, given the matrix of this node's parent
    pub fn visit_primitives(&self, parent: Mat4, visit: &mut impl FnMut(Mat4, &MeshPrimitive)) {
        let world = parent * self.transform.matrix();
        if let Some(mesh) = &self.mesh {
            for primitive in &mesh.primitives {
                visit(world, primitive);
            }
        }
        for child in &self.children {
            child.visit_primitives(world, visit);
        }
    }

    /// Number of nodes carrying a mesh in this subtree
    pub fn mesh_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if node.mesh.is_some() {
                count += 1;
            }
        });
        count
    }

    /// Number of primitives in this subtree
    pub fn primitive_count(&self) -> usize {
        let mut count = 0;
        self.traverse(&mut |node| {
            if let Some(mesh) = &node.mesh {
                count += mesh.primitives.len();
            }
        });
        count
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn triangle() -> Arc<MeshGeometry> {
        Arc::new(MeshGeometry::new(
            vec![Vec3::ZERO, Vec3::X, Vec3::Y],
            None,
            None,
            None,
        ))
    }

    fn mesh_node(name: &str, primitives: usize) -> SceneNode {
        let primitives = (0..primitives)
            .map(|_| MeshPrimitive {
                geometry: triangle(),
                material: StandardMaterial::default(),
            })
            .collect();
        SceneNode::new(name).with_mesh(Mesh {
            name: name.to_string(),
            primitives,
        })
    }

    #[test]
    fn test_geometry_defaults() {
        let geometry = triangle();
        assert_eq!(geometry.indices, vec![0, 1, 2]);
        assert_eq!(geometry.uvs.len(), 3);
        for normal in &geometry.normals {
            assert!((*normal - Vec3::Z).length() < 1e-6);
        }
        assert_eq!(geometry.triangle_count(), 1);
    }

    #[test]
    fn test_geometry_ids_are_unique() {
        assert_ne!(triangle().id(), triangle().id());
    }

    #[test]
    fn test_counts_cover_descendants() {
        let root = SceneNode::new("root")
            .with_child(mesh_node("a", 2))
            .with_child(SceneNode::new("group").with_child(mesh_node("b", 1)));

        assert_eq!(root.mesh_count(), 2);
        assert_eq!(root.primitive_count(), 3);
    }

    #[test]
    fn test_visit_primitives_composes_transforms() {
        let mut child = mesh_node("child", 1);
        child.transform.translation = Vec3::new(1.0, 0.0, 0.0);
        let mut root = SceneNode::new("root").with_child(child);
        root.transform.set_uniform_scale(2.0);

        let mut worlds = Vec::new();
        root.visit_primitives(Mat4::IDENTITY, &mut |world, _| worlds.push(world));

        assert_eq!(worlds.len(), 1);
        let origin = worlds[0].transform_point3(Vec3::ZERO);
        assert!((origin - Vec3::new(2.0, 0.0, 0.0)).length() < 1e-6);
    }
}
