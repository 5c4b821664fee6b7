use thiserror::Error;

/// Errors that can occur while encoding commands for, or decoding messages
/// from, the browser viewer
#[derive(Debug, Error)]
pub enum ProtocolError {
    /// An inbound text message was not valid JSON, or did not match any
    /// known client message shape
    #[error("Malformed client message ({len} bytes): {source}")]
    MalformedClientMessage {
        len: usize,
        #[source]
        source: serde_json::Error,
    },

    /// A command could not be serialized
    #[error("Failed to encode '{opcode}' command: {source}")]
    Encode {
        opcode: &'static str,
        #[source]
        source: serde_json::Error,
    },
}
