use glam::IVec2;
use serde::{Deserialize, Serialize, Serializer};

// Screen-space elements. `from_top_left` and `size` are in CSS pixels.

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Text {
    pub key: String,
    pub contents: String,
    pub from_top_left: IVec2,
    pub size: IVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Button {
    pub key: String,
    pub label: String,
    pub from_top_left: IVec2,
    pub size: IVec2,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Slider {
    pub key: String,
    pub from_top_left: IVec2,
    pub size: IVec2,
    pub min: f64,
    pub max: f64,
    pub value: f64,
    pub only_ints: bool,
    pub horizontal: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Plot {
    pub key: String,
    pub from_top_left: IVec2,
    pub size: IVec2,
    #[serde(serialize_with = "finite_series")]
    pub xs: Vec<f64>,
    pub min_x: f64,
    pub max_x: f64,
    #[serde(serialize_with = "finite_series")]
    pub ys: Vec<f64>,
    pub min_y: f64,
    pub max_y: f64,
    pub plot_type: String,
}

/// Writes a data series with every NaN or infinity replaced by `0.0`, so the
/// viewer always receives parseable JSON.
#[allow(clippy::ptr_arg)]
pub(crate) fn finite_series<S: Serializer>(values: &Vec<f64>, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.collect_seq(
        values
            .iter()
            .map(|value| if value.is_finite() { *value } else { 0.0 }),
    )
}
