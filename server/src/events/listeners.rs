use std::{
    collections::{HashMap, HashSet},
    panic::{self, AssertUnwindSafe},
    sync::Arc,
};

use glam::{DVec3, IVec2};
use log::warn;

/// Called on connect, on shutdown and on button clicks
pub type Listener = Arc<dyn Fn() + Send + Sync>;
/// Called with the key name on key-down / key-up
pub type KeyListener = Arc<dyn Fn(&str) + Send + Sync>;
/// Called with the position an object was dragged to
pub type DragListener = Arc<dyn Fn(DVec3) + Send + Sync>;
/// Called with the new viewer size
pub type ScreenResizeListener = Arc<dyn Fn(IVec2) + Send + Sync>;
/// Called with a slider's new value
pub type SliderListener = Arc<dyn Fn(f64) + Send + Sync>;

/// Registry of application callbacks, plus the input state the viewer
/// reports (keys held down, screen size).
///
/// Lives under the scene lock. Dispatch never runs a callback under that
/// lock: callers clone the relevant handles out, release the lock, then call
/// [`fire_all`].
#[derive(Default)]
pub(crate) struct Listeners {
    connection: Vec<Listener>,
    shutdown: Vec<Listener>,
    keydown: Vec<KeyListener>,
    keyup: Vec<KeyListener>,
    drag: HashMap<String, Vec<DragListener>>,
    screen_resize: Vec<ScreenResizeListener>,
    button_click: HashMap<String, Listener>,
    slider_change: HashMap<String, SliderListener>,
    keys_down: HashSet<String>,
    screen_size: IVec2,
}

impl Listeners {
    pub fn new() -> Self {
        Self::default()
    }

    // Registration

    pub fn add_connection(&mut self, listener: Listener) {
        self.connection.push(listener);
    }

    pub fn add_shutdown(&mut self, listener: Listener) {
        self.shutdown.push(listener);
    }

    pub fn add_keydown(&mut self, listener: KeyListener) {
        self.keydown.push(listener);
    }

    pub fn add_keyup(&mut self, listener: KeyListener) {
        self.keyup.push(listener);
    }

    pub fn add_drag(&mut self, key: &str, listener: DragListener) {
        self.drag.entry(key.to_string()).or_default().push(listener);
    }

    pub fn add_screen_resize(&mut self, listener: ScreenResizeListener) {
        self.screen_resize.push(listener);
    }

    pub fn set_button_click(&mut self, key: &str, listener: Listener) {
        self.button_click.insert(key.to_string(), listener);
    }

    pub fn set_slider_change(&mut self, key: &str, listener: SliderListener) {
        self.slider_change.insert(key.to_string(), listener);
    }

    /// Drops the click / change callback bound to a UI element
    pub fn forget_widget(&mut self, key: &str) {
        self.button_click.remove(key);
        self.slider_change.remove(key);
    }

    /// Drops every registry except connection and shutdown listeners, and
    /// resets the input state
    pub fn clear(&mut self) {
        self.keydown.clear();
        self.keyup.clear();
        self.drag.clear();
        self.screen_resize.clear();
        self.button_click.clear();
        self.slider_change.clear();
        self.keys_down.clear();
    }

    // Input state

    /// Records a key press and returns the key-down listeners to notify
    pub fn press_key(&mut self, key: &str) -> Vec<KeyListener> {
        self.keys_down.insert(key.to_string());
        self.keydown.clone()
    }

    /// Records a key release and returns the key-up listeners to notify
    pub fn release_key(&mut self, key: &str) -> Vec<KeyListener> {
        self.keys_down.remove(key);
        self.keyup.clone()
    }

    pub fn resize_screen(&mut self, size: IVec2) -> Vec<ScreenResizeListener> {
        self.screen_size = size;
        self.screen_resize.clone()
    }

    pub fn keys_down(&self) -> &HashSet<String> {
        &self.keys_down
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.keys_down.contains(key)
    }

    pub fn screen_size(&self) -> IVec2 {
        self.screen_size
    }

    // Snapshots for dispatch

    pub fn connection(&self) -> Vec<Listener> {
        self.connection.clone()
    }

    pub fn shutdown(&self) -> Vec<Listener> {
        self.shutdown.clone()
    }

    pub fn drag(&self, key: &str) -> Vec<DragListener> {
        self.drag.get(key).cloned().unwrap_or_default()
    }

    pub fn button_click(&self, key: &str) -> Option<Listener> {
        self.button_click.get(key).cloned()
    }

    pub fn slider_change(&self, key: &str) -> Option<SliderListener> {
        self.slider_change.get(key).cloned()
    }
}

/// Invokes every listener in registration order. A panicking listener is
/// logged and skipped; the rest still run.
pub(crate) fn fire_all<L: ?Sized>(event: &str, listeners: &[Arc<L>], invoke: impl Fn(&L)) {
    for (index, listener) in listeners.iter().enumerate() {
        let outcome = panic::catch_unwind(AssertUnwindSafe(|| invoke(listener.as_ref())));
        if outcome.is_err() {
            warn!("{} listener #{} panicked, continuing with the rest", event, index);
        }
    }
}
