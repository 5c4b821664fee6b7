use glam::{DVec2, DVec3, DMat4, UVec3};

use scenecast_server::{
    AssetMaterial, AssetMesh, AssetNode, AssetScene, GuiServer, ServerConfig, TextureSource,
};
use scenecast_shared::Command;

use crate::local_socket::{LocalSocket, LocalWire};

pub const TEST_PORT: u16 = 8070;

pub fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// A server already serving over a [`LocalSocket`]
pub fn serving_server(config: ServerConfig) -> (GuiServer, LocalWire) {
    init_logging();
    let server = GuiServer::new(config);
    let (socket, wire) = LocalSocket::new();
    server
        .serve_with(TEST_PORT, socket)
        .expect("local socket always listens");
    (server, wire)
}

pub fn buffered_config() -> ServerConfig {
    ServerConfig {
        autoflush: false,
        ..ServerConfig::default()
    }
}

/// Parses one outbound message back into its commands
pub fn decode(message: &str) -> Vec<Command> {
    serde_json::from_str(message).expect("outbound message is a JSON array of commands")
}

pub fn opcodes(message: &str) -> Vec<&'static str> {
    decode(message).iter().map(Command::opcode).collect()
}

pub fn keys(message: &str) -> Vec<String> {
    decode(message)
        .iter()
        .filter_map(|command| command.key().map(str::to_string))
        .collect()
}

/// Every command across `messages`, in order
pub fn flatten_messages(messages: &[String]) -> Vec<Command> {
    messages.iter().flat_map(|message| decode(message)).collect()
}

/// A submesh of `vertex_count` vertices along x, with unit z normals
pub fn strip_mesh(vertex_count: usize, faces: &[[u32; 3]], material: Option<usize>) -> AssetMesh {
    AssetMesh {
        vertices: (0..vertex_count)
            .map(|i| DVec3::new(i as f64, (i % 2) as f64, 0.0))
            .collect(),
        normals: vec![DVec3::Z; vertex_count],
        uvs: vec![DVec2::new(0.5, 0.5); vertex_count],
        faces: faces.iter().map(|face| UVec3::from_array(*face)).collect(),
        material,
    }
}

/// One node holding a 3-vertex/1-face submesh and a 4-vertex/2-face
/// submesh, the first textured with `texture`
pub fn two_part_asset(texture: TextureSource) -> AssetScene {
    AssetScene {
        root: AssetNode {
            name: "root".to_string(),
            transform: DMat4::IDENTITY,
            meshes: vec![0, 1],
            children: Vec::new(),
        },
        meshes: vec![
            strip_mesh(3, &[[0, 1, 2]], Some(0)),
            strip_mesh(4, &[[0, 1, 2], [1, 3, 2]], None),
        ],
        materials: vec![AssetMaterial {
            name: "decal".to_string(),
            texture: Some(texture),
        }],
        base_dir: None,
    }
}

/// Where a viewer that applied `commands` in order would show `key`
pub fn last_position(commands: &[Command], key: &str) -> Option<DVec3> {
    commands.iter().rev().find_map(|command| match command {
        Command::SetObjectPos { key: target, pos } if target == key => Some(*pos),
        Command::CreateSphere(sphere) if sphere.key == key => Some(sphere.pos),
        Command::CreateBox(shape) if shape.key == key => Some(shape.pos),
        _ => None,
    })
}
