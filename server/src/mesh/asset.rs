use std::path::PathBuf;

use glam::{DMat4, DVec2, DVec3, UVec3};

/// A 3-D asset as handed over by an importer: a node hierarchy whose nodes
/// reference submeshes by index, each submesh referencing a material by
/// index
#[derive(Clone, Debug, Default)]
pub struct AssetScene {
    pub root: AssetNode,
    pub meshes: Vec<AssetMesh>,
    pub materials: Vec<AssetMaterial>,
    /// Directory relative texture paths are resolved against, usually the
    /// directory the asset was loaded from
    pub base_dir: Option<PathBuf>,
}

#[derive(Clone, Debug)]
pub struct AssetNode {
    pub name: String,
    /// Transform relative to the parent node
    pub transform: DMat4,
    /// Indices into [`AssetScene::meshes`]
    pub meshes: Vec<usize>,
    pub children: Vec<AssetNode>,
}

impl Default for AssetNode {
    fn default() -> Self {
        Self {
            name: String::new(),
            transform: DMat4::IDENTITY,
            meshes: Vec::new(),
            children: Vec::new(),
        }
    }
}

/// One submesh. `normals` and `uvs` run parallel to `vertices` and may be
/// shorter (or empty) when the importer did not provide them.
#[derive(Clone, Debug, Default)]
pub struct AssetMesh {
    pub vertices: Vec<DVec3>,
    pub normals: Vec<DVec3>,
    pub uvs: Vec<DVec2>,
    pub faces: Vec<UVec3>,
    /// Index into [`AssetScene::materials`]
    pub material: Option<usize>,
}

#[derive(Clone, Debug, Default)]
pub struct AssetMaterial {
    pub name: String,
    pub texture: Option<TextureSource>,
}

/// Where a material's diffuse image comes from
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextureSource {
    /// Image data shipped inside the asset
    Embedded { key: String, base64: String },
    /// Image file on disk, relative to [`AssetScene::base_dir`] unless
    /// absolute
    File(PathBuf),
}

impl AssetScene {
    /// The texture key and resolved source for a material, if it has an image
    pub(crate) fn texture_for(&self, material: usize) -> Option<(String, TextureSource)> {
        let source = self.materials.get(material)?.texture.as_ref()?;
        Some(match source {
            TextureSource::Embedded { key, .. } => (key.clone(), source.clone()),
            TextureSource::File(path) => {
                let path = match &self.base_dir {
                    Some(base_dir) if path.is_relative() => base_dir.join(path),
                    _ => path.clone(),
                };
                (
                    path.to_string_lossy().into_owned(),
                    TextureSource::File(path),
                )
            }
        })
    }
}
