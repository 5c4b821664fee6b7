pub mod asset;
pub mod flatten;

use glam::DVec3;
use log::warn;

use self::{
    asset::{AssetScene, TextureSource},
    flatten::flatten,
};
use crate::GuiServer;

impl GuiServer {
    /// Flattens `asset` into one mesh under `key`, first creating any texture
    /// it references that does not exist yet. A texture file that cannot be
    /// read leaves its region untextured.
    #[allow(clippy::too_many_arguments)]
    pub fn create_mesh_from_asset(
        &self,
        key: &str,
        asset: &AssetScene,
        pos: DVec3,
        euler: DVec3,
        scale: DVec3,
        color: DVec3,
        cast_shadows: bool,
        receive_shadows: bool,
    ) -> &Self {
        let mut flat = flatten(asset);

        let mut unreadable = Vec::new();
        for (texture_key, source) in &flat.texture_sources {
            if self.has_object(texture_key) {
                continue;
            }
            match source {
                TextureSource::Embedded { base64, .. } => {
                    self.create_texture(texture_key, base64);
                }
                TextureSource::File(path) => {
                    if let Err(error) = self.create_texture_from_file(texture_key, path) {
                        warn!("Mesh '{}' loses a texture: {}", key, error);
                        unreadable.push(texture_key.clone());
                    }
                }
            }
        }
        for texture_key in &unreadable {
            flat.untexture(texture_key);
        }

        let mesh = flat
            .into_mesh_shape(key)
            .with_transform(pos, euler, scale)
            .with_color(color)
            .with_shadows(cast_shadows, receive_shadows);
        self.create_mesh(key, mesh)
    }
}
