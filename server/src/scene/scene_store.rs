use std::collections::{HashMap, HashSet};

use glam::{DVec3, IVec2};
use log::debug;

use scenecast_shared::{Command, ObjectKind, SceneObject};

/// Canonical state of every addressable object, keyed by one namespace
/// shared across all kinds.
///
/// Reads degrade to a zero value when the key is absent or the kind lacks
/// the field. Writes return the command describing the change, or `None`
/// when nothing changed.
#[derive(Default)]
pub(crate) struct SceneStore {
    objects: HashMap<String, SceneObject>,
    mouse_enabled: HashSet<String>,
}

impl SceneStore {
    pub fn new() -> Self {
        Self::default()
    }

    // Creation

    /// Inserts `object`, replacing whatever was stored under its key,
    /// whatever its kind
    pub fn insert(&mut self, object: SceneObject) -> Command {
        let command = object.create_command();
        let key = object.key().to_string();
        let kind = object.kind();
        if let Some(previous) = self.objects.insert(key, object) {
            if previous.kind() != kind {
                debug!(
                    "Key '{}' changed kind from {:?} to {:?}",
                    previous.key(),
                    previous.kind(),
                    kind
                );
            }
        }
        command
    }

    pub fn enable_mouse(&mut self, key: &str) -> Command {
        self.mouse_enabled.insert(key.to_string());
        Command::EnableMouse {
            key: key.to_string(),
        }
    }

    // Queries

    pub fn contains(&self, key: &str) -> bool {
        self.objects.contains_key(key)
    }

    #[cfg(test)]
    pub fn get(&self, key: &str) -> Option<&SceneObject> {
        self.objects.get(key)
    }

    pub fn kind_of(&self, key: &str) -> Option<ObjectKind> {
        self.objects.get(key).map(SceneObject::kind)
    }

    #[cfg(test)]
    pub fn is_mouse_enabled(&self, key: &str) -> bool {
        self.mouse_enabled.contains(key)
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.objects.len()
    }

    #[cfg(test)]
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.objects.keys().map(String::as_str)
    }

    pub fn position(&self, key: &str) -> DVec3 {
        self.objects
            .get(key)
            .and_then(SceneObject::position)
            .unwrap_or(DVec3::ZERO)
    }

    pub fn rotation(&self, key: &str) -> DVec3 {
        self.objects
            .get(key)
            .and_then(SceneObject::rotation)
            .unwrap_or(DVec3::ZERO)
    }

    pub fn color(&self, key: &str) -> DVec3 {
        self.objects
            .get(key)
            .and_then(SceneObject::color)
            .unwrap_or(DVec3::ZERO)
    }

    pub fn scale(&self, key: &str) -> DVec3 {
        self.objects
            .get(key)
            .and_then(SceneObject::scale)
            .unwrap_or(DVec3::ZERO)
    }

    // 3-D mutation

    pub fn set_position(&mut self, key: &str, pos: DVec3) -> Option<Command> {
        let object = self.objects.get_mut(key)?;
        object.set_position(pos).then(|| Command::SetObjectPos {
            key: key.to_string(),
            pos,
        })
    }

    pub fn set_rotation(&mut self, key: &str, euler: DVec3) -> Option<Command> {
        let object = self.objects.get_mut(key)?;
        object.set_rotation(euler).then(|| Command::SetObjectRotation {
            key: key.to_string(),
            euler,
        })
    }

    pub fn set_color(&mut self, key: &str, color: DVec3) -> Option<Command> {
        let object = self.objects.get_mut(key)?;
        object.set_color(color).then(|| Command::SetObjectColor {
            key: key.to_string(),
            color,
        })
    }

    pub fn set_scale(&mut self, key: &str, scale: DVec3) -> Option<Command> {
        let object = self.objects.get_mut(key)?;
        object.set_scale(scale).then(|| Command::SetObjectScale {
            key: key.to_string(),
            scale,
        })
    }

    /// Records a position the viewer already shows (after a drag), so no
    /// command is produced
    pub fn record_position(&mut self, key: &str, pos: DVec3) -> bool {
        self.objects
            .get_mut(key)
            .map(|object| object.set_position(pos))
            .unwrap_or(false)
    }

    // UI mutation

    pub fn set_text_contents(&mut self, key: &str, contents: &str) -> Option<Command> {
        match self.objects.get_mut(key)? {
            SceneObject::Text(text) => {
                text.contents = contents.to_string();
                Some(Command::SetTextContents {
                    key: key.to_string(),
                    contents: contents.to_string(),
                })
            }
            _ => None,
        }
    }

    pub fn set_button_label(&mut self, key: &str, label: &str) -> Option<Command> {
        match self.objects.get_mut(key)? {
            SceneObject::Button(button) => {
                button.label = label.to_string();
                Some(Command::SetButtonLabel {
                    key: key.to_string(),
                    label: label.to_string(),
                })
            }
            _ => None,
        }
    }

    pub fn set_slider_value(&mut self, key: &str, value: f64) -> Option<Command> {
        self.record_slider_value(key, value)
            .then(|| Command::SetSliderValue {
                key: key.to_string(),
                value,
            })
    }

    /// Records a slider value the viewer already shows, so no command is
    /// produced
    pub fn record_slider_value(&mut self, key: &str, value: f64) -> bool {
        match self.objects.get_mut(key) {
            Some(SceneObject::Slider(slider)) => {
                slider.value = value;
                true
            }
            _ => false,
        }
    }

    pub fn set_slider_min(&mut self, key: &str, value: f64) -> Option<Command> {
        match self.objects.get_mut(key)? {
            SceneObject::Slider(slider) => {
                slider.min = value;
                Some(Command::SetSliderMin {
                    key: key.to_string(),
                    value,
                })
            }
            _ => None,
        }
    }

    pub fn set_slider_max(&mut self, key: &str, value: f64) -> Option<Command> {
        match self.objects.get_mut(key)? {
            SceneObject::Slider(slider) => {
                slider.max = value;
                Some(Command::SetSliderMax {
                    key: key.to_string(),
                    value,
                })
            }
            _ => None,
        }
    }

    #[allow(clippy::too_many_arguments)]
    pub fn set_plot_data(
        &mut self,
        key: &str,
        xs: &[f64],
        min_x: f64,
        max_x: f64,
        ys: &[f64],
        min_y: f64,
        max_y: f64,
    ) -> Option<Command> {
        match self.objects.get_mut(key)? {
            SceneObject::Plot(plot) => {
                plot.xs = xs.to_vec();
                plot.min_x = min_x;
                plot.max_x = max_x;
                plot.ys = ys.to_vec();
                plot.min_y = min_y;
                plot.max_y = max_y;
                Some(Command::SetPlotData {
                    key: key.to_string(),
                    xs: xs.to_vec(),
                    min_x,
                    max_x,
                    ys: ys.to_vec(),
                    min_y,
                    max_y,
                })
            }
            _ => None,
        }
    }

    pub fn set_ui_element_position(&mut self, key: &str, from_top_left: IVec2) -> Option<Command> {
        let slot = match self.objects.get_mut(key)? {
            SceneObject::Text(text) => &mut text.from_top_left,
            SceneObject::Button(button) => &mut button.from_top_left,
            SceneObject::Slider(slider) => &mut slider.from_top_left,
            SceneObject::Plot(plot) => &mut plot.from_top_left,
            _ => return None,
        };
        *slot = from_top_left;
        Some(Command::SetUiElemPos {
            key: key.to_string(),
            from_top_left,
        })
    }

    pub fn set_ui_element_size(&mut self, key: &str, size: IVec2) -> Option<Command> {
        let slot = match self.objects.get_mut(key)? {
            SceneObject::Text(text) => &mut text.size,
            SceneObject::Button(button) => &mut button.size,
            SceneObject::Slider(slider) => &mut slider.size,
            SceneObject::Plot(plot) => &mut plot.size,
            _ => return None,
        };
        *slot = size;
        Some(Command::SetUiElemSize {
            key: key.to_string(),
            size,
        })
    }

    // Removal

    /// Removes the object under `key` along with its mouse-interaction flag
    pub fn remove(&mut self, key: &str) -> Option<SceneObject> {
        let removed = self.objects.remove(key)?;
        self.mouse_enabled.remove(key);
        Some(removed)
    }

    /// Removes every object whose key starts with `prefix`, in key order
    pub fn remove_by_prefix(&mut self, prefix: &str) -> Vec<SceneObject> {
        let mut keys: Vec<String> = self
            .objects
            .keys()
            .filter(|key| key.starts_with(prefix))
            .cloned()
            .collect();
        keys.sort();
        keys.iter().filter_map(|key| self.remove(key)).collect()
    }

    pub fn clear(&mut self) {
        self.objects.clear();
        self.mouse_enabled.clear();
    }

    // Replay

    /// Commands that rebuild the whole scene on a freshly connected viewer:
    /// textures, then 3-D objects, then UI elements, each group ordered by
    /// key, followed by the mouse-interaction flags of objects that still
    /// exist
    pub fn replay(&self) -> Vec<Command> {
        let mut objects: Vec<&SceneObject> = self.objects.values().collect();
        objects.sort_by(|a, b| {
            (replay_group(a.kind()), a.key()).cmp(&(replay_group(b.kind()), b.key()))
        });

        let mut mouse_enabled: Vec<&String> = self
            .mouse_enabled
            .iter()
            .filter(|key| self.objects.contains_key(key.as_str()))
            .collect();
        mouse_enabled.sort();

        objects
            .into_iter()
            .map(SceneObject::create_command)
            .chain(mouse_enabled.into_iter().map(|key| Command::EnableMouse {
                key: key.clone(),
            }))
            .collect()
    }
}

fn replay_group(kind: ObjectKind) -> u8 {
    match kind {
        ObjectKind::Texture => 0,
        kind if kind.is_ui_element() => 2,
        _ => 1,
    }
}
