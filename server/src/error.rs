use std::{io, path::PathBuf};

use thiserror::Error;

/// Errors surfaced synchronously by the server. Scene reads and writes never
/// fail; these cover starting the transport and reading files from disk.
#[derive(Debug, Error)]
pub enum ScenecastServerError {
    /// The transport could not listen on the requested port
    #[error("Failed to bind port {port}: {source}")]
    Bind {
        port: u16,
        #[source]
        source: io::Error,
    },

    /// The background network thread could not be started
    #[error("Failed to spawn the network thread: {0}")]
    ThreadSpawn(#[source] io::Error),

    /// The async runtime backing the transport could not be built
    #[error("Failed to build the network runtime: {0}")]
    Runtime(#[source] io::Error),

    /// The network thread went away before reporting that it was listening
    #[error("Network thread exited before the transport was ready")]
    TransportDetached,

    /// A texture image could not be read from disk
    #[error("Failed to read texture '{}': {source}", path.display())]
    TextureRead {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}
