use glam::{DVec3, IVec2};
use serde::{Deserialize, Serialize};

use crate::{
    error::ProtocolError,
    object::{
        shapes::{BoxShape, CapsuleShape, LineShape, MeshShape, SphereShape, Texture},
        ui::{finite_series, Button, Plot, Slider, Text},
    },
};

/// One self-contained mutation of the viewer's scene.
///
/// Serialized as a JSON object whose `type` field carries the opcode, with
/// the payload fields alongside it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Command {
    CreateBox(BoxShape),
    CreateSphere(SphereShape),
    CreateCapsule(CapsuleShape),
    CreateLine(LineShape),
    CreateMesh(MeshShape),
    CreateTexture(Texture),
    CreateText(Text),
    CreateButton(Button),
    CreateSlider(Slider),
    CreatePlot(Plot),
    SetObjectPos {
        key: String,
        pos: DVec3,
    },
    SetObjectRotation {
        key: String,
        euler: DVec3,
    },
    SetObjectColor {
        key: String,
        color: DVec3,
    },
    SetObjectScale {
        key: String,
        scale: DVec3,
    },
    EnableMouse {
        key: String,
    },
    DeleteObject {
        key: String,
    },
    SetTextContents {
        key: String,
        contents: String,
    },
    SetButtonLabel {
        key: String,
        label: String,
    },
    SetSliderValue {
        key: String,
        value: f64,
    },
    SetSliderMin {
        key: String,
        value: f64,
    },
    SetSliderMax {
        key: String,
        value: f64,
    },
    SetPlotData {
        key: String,
        #[serde(serialize_with = "finite_series")]
        xs: Vec<f64>,
        min_x: f64,
        max_x: f64,
        #[serde(serialize_with = "finite_series")]
        ys: Vec<f64>,
        min_y: f64,
        max_y: f64,
    },
    SetUiElemPos {
        key: String,
        from_top_left: IVec2,
    },
    SetUiElemSize {
        key: String,
        size: IVec2,
    },
    DeleteUiElem {
        key: String,
    },
    ClearAll,
}

impl Command {
    /// The wire opcode, as written into the `type` field
    pub fn opcode(&self) -> &'static str {
        match self {
            Command::CreateBox(_) => "create_box",
            Command::CreateSphere(_) => "create_sphere",
            Command::CreateCapsule(_) => "create_capsule",
            Command::CreateLine(_) => "create_line",
            Command::CreateMesh(_) => "create_mesh",
            Command::CreateTexture(_) => "create_texture",
            Command::CreateText(_) => "create_text",
            Command::CreateButton(_) => "create_button",
            Command::CreateSlider(_) => "create_slider",
            Command::CreatePlot(_) => "create_plot",
            Command::SetObjectPos { .. } => "set_object_pos",
            Command::SetObjectRotation { .. } => "set_object_rotation",
            Command::SetObjectColor { .. } => "set_object_color",
            Command::SetObjectScale { .. } => "set_object_scale",
            Command::EnableMouse { .. } => "enable_mouse",
            Command::DeleteObject { .. } => "delete_object",
            Command::SetTextContents { .. } => "set_text_contents",
            Command::SetButtonLabel { .. } => "set_button_label",
            Command::SetSliderValue { .. } => "set_slider_value",
            Command::SetSliderMin { .. } => "set_slider_min",
            Command::SetSliderMax { .. } => "set_slider_max",
            Command::SetPlotData { .. } => "set_plot_data",
            Command::SetUiElemPos { .. } => "set_ui_elem_pos",
            Command::SetUiElemSize { .. } => "set_ui_elem_size",
            Command::DeleteUiElem { .. } => "delete_ui_elem",
            Command::ClearAll => "clear_all",
        }
    }

    /// The key of the object this command touches, if any
    pub fn key(&self) -> Option<&str> {
        match self {
            Command::CreateBox(inner) => Some(&inner.key),
            Command::CreateSphere(inner) => Some(&inner.key),
            Command::CreateCapsule(inner) => Some(&inner.key),
            Command::CreateLine(inner) => Some(&inner.key),
            Command::CreateMesh(inner) => Some(&inner.key),
            Command::CreateTexture(inner) => Some(&inner.key),
            Command::CreateText(inner) => Some(&inner.key),
            Command::CreateButton(inner) => Some(&inner.key),
            Command::CreateSlider(inner) => Some(&inner.key),
            Command::CreatePlot(inner) => Some(&inner.key),
            Command::SetObjectPos { key, .. }
            | Command::SetObjectRotation { key, .. }
            | Command::SetObjectColor { key, .. }
            | Command::SetObjectScale { key, .. }
            | Command::EnableMouse { key }
            | Command::DeleteObject { key }
            | Command::SetTextContents { key, .. }
            | Command::SetButtonLabel { key, .. }
            | Command::SetSliderValue { key, .. }
            | Command::SetSliderMin { key, .. }
            | Command::SetSliderMax { key, .. }
            | Command::SetPlotData { key, .. }
            | Command::SetUiElemPos { key, .. }
            | Command::SetUiElemSize { key, .. }
            | Command::DeleteUiElem { key } => Some(key),
            Command::ClearAll => None,
        }
    }

    /// Serializes this command into one JSON object
    pub fn encode(&self) -> Result<String, ProtocolError> {
        serde_json::to_string(self).map_err(|source| ProtocolError::Encode {
            opcode: self.opcode(),
            source,
        })
    }
}

/// Joins already-encoded commands into the JSON array sent as one message
pub fn batch<S: AsRef<str>>(encoded: &[S]) -> String {
    let body_len: usize = encoded.iter().map(|command| command.as_ref().len() + 1).sum();
    let mut message = String::with_capacity(body_len + 2);
    message.push('[');
    for (index, command) in encoded.iter().enumerate() {
        if index > 0 {
            message.push(',');
        }
        message.push_str(command.as_ref());
    }
    message.push(']');
    message
}
