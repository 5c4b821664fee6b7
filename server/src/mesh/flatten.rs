use glam::{DMat3, DMat4, DVec2, DVec3, UVec3};
use log::warn;

use scenecast_shared::MeshShape;

use super::asset::{AssetMesh, AssetNode, AssetScene, TextureSource};

const SINGULAR_DETERMINANT: f64 = 1e-12;

/// An asset collapsed into one vertex/face buffer, with one texture region
/// per submesh
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FlattenedMesh {
    pub vertices: Vec<DVec3>,
    pub vertex_normals: Vec<DVec3>,
    pub faces: Vec<UVec3>,
    pub uv: Vec<DVec2>,
    /// Texture key per region, empty for an untextured region
    pub textures: Vec<String>,
    /// Flat face index (three per triangle) where each region starts
    pub texture_start_indices: Vec<usize>,
    /// Every distinct texture the regions reference, with where to load it
    pub texture_sources: Vec<(String, TextureSource)>,
}

impl FlattenedMesh {
    pub fn into_mesh_shape(self, key: impl Into<String>) -> MeshShape {
        let mut mesh = MeshShape::new(key);
        mesh.vertices = self.vertices;
        mesh.vertex_normals = self.vertex_normals;
        mesh.faces = self.faces;
        mesh.uv = self.uv;
        mesh.textures = self.textures;
        mesh.texture_start_indices = self.texture_start_indices;
        mesh
    }

    /// Turns every region textured with `key` into an untextured one
    pub fn untexture(&mut self, key: &str) {
        for texture in self.textures.iter_mut().filter(|texture| *texture == key) {
            texture.clear();
        }
        self.texture_sources.retain(|(source_key, _)| source_key != key);
    }
}

/// Walks `scene` depth first, composing node transforms, and appends each
/// submesh it reaches to one flat mesh.
///
/// Structural problems degrade rather than fail: empty submeshes and dangling
/// mesh indices are skipped, faces pointing past their submesh's vertices
/// are dropped, missing normals and UVs are zero filled, and a submesh
/// without a usable material becomes an untextured region.
pub fn flatten(scene: &AssetScene) -> FlattenedMesh {
    let mut flat = FlattenedMesh::default();
    visit(scene, &scene.root, DMat4::IDENTITY, &mut flat);
    flat
}

fn visit(scene: &AssetScene, node: &AssetNode, parent: DMat4, flat: &mut FlattenedMesh) {
    let transform = parent * node.transform;

    for &index in &node.meshes {
        match scene.meshes.get(index) {
            Some(mesh) => append(scene, &node.name, mesh, transform, flat),
            None => warn!("Node '{}' references missing mesh {}", node.name, index),
        }
    }

    for child in &node.children {
        visit(scene, child, transform, flat);
    }
}

fn append(
    scene: &AssetScene,
    node_name: &str,
    mesh: &AssetMesh,
    transform: DMat4,
    flat: &mut FlattenedMesh,
) {
    let vertex_count = mesh.vertices.len();
    let faces: Vec<UVec3> = mesh
        .faces
        .iter()
        .copied()
        .filter(|face| face.max_element() < vertex_count as u32)
        .collect();
    if faces.len() < mesh.faces.len() {
        warn!(
            "Dropped {} faces with out-of-range indices in node '{}'",
            mesh.faces.len() - faces.len(),
            node_name
        );
    }
    if vertex_count == 0 || faces.is_empty() {
        warn!("Skipping empty submesh in node '{}'", node_name);
        return;
    }

    let normal_matrix = normal_matrix(transform);
    let base = flat.vertices.len() as u32;

    flat.vertices.extend(
        mesh.vertices
            .iter()
            .map(|vertex| transform.transform_point3(*vertex)),
    );
    flat.vertex_normals.extend((0..vertex_count).map(|i| {
        mesh.normals
            .get(i)
            .map(|normal| (normal_matrix * *normal).normalize_or_zero())
            .unwrap_or(DVec3::ZERO)
    }));
    flat.uv
        .extend((0..vertex_count).map(|i| mesh.uvs.get(i).copied().unwrap_or(DVec2::ZERO)));

    flat.texture_start_indices.push(flat.faces.len() * 3);
    flat.faces
        .extend(faces.iter().map(|face| *face + UVec3::splat(base)));

    let texture = mesh.material.and_then(|material| scene.texture_for(material));
    match texture {
        Some((key, source)) => {
            if !flat.texture_sources.iter().any(|(known, _)| *known == key) {
                flat.texture_sources.push((key.clone(), source));
            }
            flat.textures.push(key);
        }
        None => flat.textures.push(String::new()),
    }
}

fn normal_matrix(transform: DMat4) -> DMat3 {
    let linear = DMat3::from_mat4(transform);
    if linear.determinant().abs() < SINGULAR_DETERMINANT {
        linear
    } else {
        linear.inverse().transpose()
    }
}
