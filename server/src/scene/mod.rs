mod scene_store;
pub(crate) use scene_store::SceneStore;
