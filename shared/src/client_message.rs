use glam::{DVec3, IVec2};
use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// An input event reported by the browser viewer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientMessage {
    Keydown { key: String },
    Keyup { key: String },
    /// An object with mouse interaction enabled was dragged to `pos`
    Drag { key: String, pos: DVec3 },
    ScreenResize { size: IVec2 },
    ButtonClick { key: String },
    SliderSetValue { key: String, value: f64 },
}

impl ClientMessage {
    pub fn parse(text: &str) -> Result<Self, ProtocolError> {
        serde_json::from_str(text).map_err(|source| ProtocolError::MalformedClientMessage {
            len: text.len(),
            source,
        })
    }
}
