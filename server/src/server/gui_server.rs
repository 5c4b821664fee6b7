use std::{collections::HashSet, fs, net::SocketAddr, path::Path, sync::Arc};

use glam::{DVec3, IVec2};
use log::{debug, info, warn};
use parking_lot::Mutex;

use scenecast_shared::{
    BoxShape, Button, CapsuleShape, Command, LineShape, MeshShape, ObjectKind, Plot, SceneObject,
    Slider, SphereShape, Text, Texture,
};

use super::{
    inbound::InboundRouter,
    lifecycle::{Lifecycle, Wake},
    ServerConfig, ServingState,
};
use crate::{
    command_queue::CommandQueue,
    events::listeners::{
        fire_all, DragListener, KeyListener, Listener, Listeners, ScreenResizeListener,
        SliderListener,
    },
    scene::SceneStore,
    transport::Socket,
    ScenecastServerError,
};

/// The authoritative scene plus a connection to the viewers that mirror it.
///
/// Every mutator updates the stored state and queues exactly one command
/// (or none, when the key is absent or the kind lacks the field). With
/// autoflush on each command goes out as its own message; with it off,
/// commands wait for [`GuiServer::flush`].
///
/// `GuiServer` is a cheap handle: clones share the same scene.
#[derive(Clone)]
pub struct GuiServer {
    inner: Arc<ServerInner>,
}

pub(crate) struct ServerInner {
    pub(super) config: ServerConfig,
    pub(super) scene: Mutex<SceneState>,
    pub(super) queue: CommandQueue,
    /// Held from the moment a message is taken off the queue (or a replay is
    /// snapshotted) until it is handed to the transport, so messages reach
    /// the transport in the order the store changed. May be taken while
    /// holding the scene lock, never the other way around.
    pub(super) send_order: Mutex<()>,
    pub(super) lifecycle: Lifecycle,
}

pub(crate) struct SceneState {
    pub store: SceneStore,
    pub listeners: Listeners,
}

impl GuiServer {
    pub fn new(config: ServerConfig) -> Self {
        let queue = CommandQueue::new(config.autoflush);
        Self {
            inner: Arc::new(ServerInner {
                config,
                scene: Mutex::new(SceneState {
                    store: SceneStore::new(),
                    listeners: Listeners::new(),
                }),
                queue,
                send_order: Mutex::new(()),
                lifecycle: Lifecycle::new(),
            }),
        }
    }

    // Lifecycle

    /// Starts the WebSocket transport on `port` and returns once it is
    /// listening. Does nothing if the server is already serving.
    #[cfg(feature = "transport_websocket")]
    pub fn serve(&self, port: u16) -> Result<(), ScenecastServerError> {
        self.serve_with(port, crate::transport::websocket::Socket::default())
    }

    /// Like `serve`, over any transport
    pub fn serve_with(
        &self,
        port: u16,
        socket: impl Into<Box<dyn Socket>>,
    ) -> Result<(), ScenecastServerError> {
        let router = Arc::new(InboundRouter::new(Arc::downgrade(&self.inner)));
        self.inner.lifecycle.serve(port, socket.into(), router)
    }

    /// Fires the shutdown listeners (unless a shutdown signal already did),
    /// closes the transport and waits for its thread to exit. Commands still
    /// waiting for a flush are discarded.
    ///
    /// Must not be called from a listener, which runs on the network thread
    /// this call joins.
    pub fn stop_serving(&self) {
        let Some(stopping) = self.inner.lifecycle.begin_stop() else {
            debug!("stop_serving() called while not serving");
            return;
        };
        info!("Stopping server");
        if !stopping.shutdown_fired {
            self.inner.fire_shutdown();
        }
        stopping.handle.close();

        let dropped = self.inner.queue.discard();
        if dropped > 0 {
            debug!("Discarded {} unflushed commands", dropped);
        }
        self.inner.lifecycle.finish_stop();
    }

    pub fn is_serving(&self) -> bool {
        self.inner.lifecycle.phase() == ServingState::Serving
    }

    pub fn serving_state(&self) -> ServingState {
        self.inner.lifecycle.phase()
    }

    /// The address the transport bound, when serving over a network socket
    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.inner.lifecycle.local_addr()
    }

    /// Parks the calling thread while the server is serving, waking every
    /// `signal_poll_interval` to run `check_for_signals`.
    ///
    /// Returns `Ok` once the server stops. A shutdown signal from the
    /// transport stops the server and returns `Ok`. An error from
    /// `check_for_signals` is returned as is, with the server still running.
    pub fn block_while_serving<E>(
        &self,
        mut check_for_signals: impl FnMut() -> Result<(), E>,
    ) -> Result<(), E> {
        loop {
            match self
                .inner
                .lifecycle
                .wait(self.inner.config.signal_poll_interval)
            {
                Wake::Stopped => return Ok(()),
                Wake::ShutdownRequested => {
                    info!("Shutdown signal received");
                    self.stop_serving();
                    return Ok(());
                }
                Wake::Poll => check_for_signals()?,
            }
        }
    }

    // Listeners

    pub fn register_connection_listener(&self, listener: impl Fn() + Send + Sync + 'static) {
        let listener: Listener = Arc::new(listener);
        self.inner.scene.lock().listeners.add_connection(listener);
    }

    pub fn register_shutdown_listener(&self, listener: impl Fn() + Send + Sync + 'static) {
        let listener: Listener = Arc::new(listener);
        self.inner.scene.lock().listeners.add_shutdown(listener);
    }

    pub fn register_keydown_listener(&self, listener: impl Fn(&str) + Send + Sync + 'static) {
        let listener: KeyListener = Arc::new(listener);
        self.inner.scene.lock().listeners.add_keydown(listener);
    }

    pub fn register_keyup_listener(&self, listener: impl Fn(&str) + Send + Sync + 'static) {
        let listener: KeyListener = Arc::new(listener);
        self.inner.scene.lock().listeners.add_keyup(listener);
    }

    pub fn register_screen_resize_listener(
        &self,
        listener: impl Fn(IVec2) + Send + Sync + 'static,
    ) {
        let listener: ScreenResizeListener = Arc::new(listener);
        self.inner.scene.lock().listeners.add_screen_resize(listener);
    }

    /// Enables mouse interaction on `key` and calls `listener` with the new
    /// position whenever the viewer drags it
    pub fn register_drag_listener(
        &self,
        key: &str,
        listener: impl Fn(DVec3) + Send + Sync + 'static,
    ) -> &Self {
        let listener: DragListener = Arc::new(listener);
        self.inner.apply(|scene| {
            scene.listeners.add_drag(key, listener);
            Some(scene.store.enable_mouse(key))
        });
        self
    }

    pub fn get_keys_down(&self) -> HashSet<String> {
        self.inner.scene.lock().listeners.keys_down().clone()
    }

    pub fn is_key_down(&self, key: &str) -> bool {
        self.inner.scene.lock().listeners.is_key_down(key)
    }

    /// The viewer's last reported size, zero until it reports one
    pub fn get_screen_size(&self) -> IVec2 {
        self.inner.scene.lock().listeners.screen_size()
    }

    // Flushing

    pub fn set_autoflush(&self, autoflush: bool) {
        let _order = self.inner.send_order.lock();
        if let Some(message) = self.inner.queue.set_autoflush(autoflush) {
            self.inner.transmit(&message);
        }
    }

    pub fn get_autoflush(&self) -> bool {
        self.inner.queue.autoflush()
    }

    /// Sends every queued command as one message. Does nothing if the queue
    /// is empty.
    pub fn flush(&self) {
        let _order = self.inner.send_order.lock();
        if let Some(message) = self.inner.queue.take() {
            self.inner.transmit(&message);
        }
    }

    /// Deletes every object and UI element and forgets every listener except
    /// the connection and shutdown listeners
    pub fn clear(&self) -> &Self {
        self.inner.apply(|scene| {
            scene.store.clear();
            scene.listeners.clear();
            Some(Command::ClearAll)
        });
        self
    }

    // 3-D objects

    #[allow(clippy::too_many_arguments)]
    pub fn create_box(
        &self,
        key: &str,
        size: DVec3,
        pos: DVec3,
        euler: DVec3,
        color: DVec3,
        cast_shadows: bool,
        receive_shadows: bool,
    ) -> &Self {
        self.create(SceneObject::Box(
            BoxShape::new(key, size, pos, euler)
                .with_color(color)
                .with_shadows(cast_shadows, receive_shadows),
        ))
    }

    pub fn create_sphere(
        &self,
        key: &str,
        radius: f64,
        pos: DVec3,
        color: DVec3,
        cast_shadows: bool,
        receive_shadows: bool,
    ) -> &Self {
        self.create(SceneObject::Sphere(
            SphereShape::new(key, radius, pos)
                .with_color(color)
                .with_shadows(cast_shadows, receive_shadows),
        ))
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_capsule(
        &self,
        key: &str,
        radius: f64,
        height: f64,
        pos: DVec3,
        euler: DVec3,
        color: DVec3,
        cast_shadows: bool,
        receive_shadows: bool,
    ) -> &Self {
        self.create(SceneObject::Capsule(
            CapsuleShape::new(key, radius, height, pos, euler)
                .with_color(color)
                .with_shadows(cast_shadows, receive_shadows),
        ))
    }

    pub fn create_line(&self, key: &str, points: &[DVec3], color: DVec3) -> &Self {
        self.create(SceneObject::Line(
            LineShape::new(key, points.to_vec()).with_color(color),
        ))
    }

    /// Creates a mesh from data already in the flat layout. `mesh.key` is
    /// replaced by `key`.
    pub fn create_mesh(&self, key: &str, mut mesh: MeshShape) -> &Self {
        mesh.key = key.to_string();
        self.create(SceneObject::Mesh(mesh))
    }

    pub fn create_texture(&self, key: &str, base64: &str) -> &Self {
        self.create(SceneObject::Texture(Texture::new(key, base64)))
    }

    /// Reads an image from disk and creates a texture from it
    pub fn create_texture_from_file(
        &self,
        key: &str,
        path: impl AsRef<Path>,
    ) -> Result<&Self, ScenecastServerError> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|source| ScenecastServerError::TextureRead {
            path: path.to_path_buf(),
            source,
        })?;
        Ok(self.create_texture(key, &base64::encode(bytes)))
    }

    pub fn has_object(&self, key: &str) -> bool {
        self.inner.scene.lock().store.contains(key)
    }

    /// The kind of object stored under `key`, if any
    pub fn get_object_kind(&self, key: &str) -> Option<ObjectKind> {
        self.inner.scene.lock().store.kind_of(key)
    }

    /// Zero if `key` is absent or has no position (lines, textures, UI)
    pub fn get_object_position(&self, key: &str) -> DVec3 {
        self.inner.scene.lock().store.position(key)
    }

    /// Zero if `key` is absent or has no orientation (spheres, lines)
    pub fn get_object_rotation(&self, key: &str) -> DVec3 {
        self.inner.scene.lock().store.rotation(key)
    }

    pub fn get_object_color(&self, key: &str) -> DVec3 {
        self.inner.scene.lock().store.color(key)
    }

    /// Box size, mesh scale, `[r, r, r]` for a sphere and `[r, r, h]` for a
    /// capsule. Zero for lines and absent keys.
    pub fn get_object_scale(&self, key: &str) -> DVec3 {
        self.inner.scene.lock().store.scale(key)
    }

    pub fn set_object_position(&self, key: &str, pos: DVec3) -> &Self {
        self.inner.apply(|scene| scene.store.set_position(key, pos));
        self
    }

    pub fn set_object_rotation(&self, key: &str, euler: DVec3) -> &Self {
        self.inner.apply(|scene| scene.store.set_rotation(key, euler));
        self
    }

    pub fn set_object_color(&self, key: &str, color: DVec3) -> &Self {
        self.inner.apply(|scene| scene.store.set_color(key, color));
        self
    }

    /// Sphere radius comes from `scale.x`; capsule radius from `scale.x` and
    /// height from `scale.z`. No effect on lines.
    pub fn set_object_scale(&self, key: &str, scale: DVec3) -> &Self {
        self.inner.apply(|scene| scene.store.set_scale(key, scale));
        self
    }

    /// Deletes whatever object or UI element is stored under `key`
    pub fn delete_object(&self, key: &str) -> &Self {
        self.inner.apply(|scene| {
            scene.listeners.forget_widget(key);
            scene
                .store
                .remove(key)
                .map(|removed| removed.delete_command())
        });
        self
    }

    /// Deletes every object and UI element whose key starts with `prefix`
    pub fn delete_objects_by_prefix(&self, prefix: &str) -> &Self {
        self.inner.apply(|scene| {
            let removed = scene.store.remove_by_prefix(prefix);
            for object in &removed {
                scene.listeners.forget_widget(object.key());
            }
            removed
                .iter()
                .map(SceneObject::delete_command)
                .collect::<Vec<_>>()
        });
        self
    }

    // UI elements

    pub fn create_text(
        &self,
        key: &str,
        contents: &str,
        from_top_left: IVec2,
        size: IVec2,
    ) -> &Self {
        self.create(SceneObject::Text(Text {
            key: key.to_string(),
            contents: contents.to_string(),
            from_top_left,
            size,
        }))
    }

    pub fn set_text_contents(&self, key: &str, contents: &str) -> &Self {
        self.inner
            .apply(|scene| scene.store.set_text_contents(key, contents));
        self
    }

    pub fn create_button(
        &self,
        key: &str,
        label: &str,
        from_top_left: IVec2,
        size: IVec2,
        on_click: impl Fn() + Send + Sync + 'static,
    ) -> &Self {
        let on_click: Listener = Arc::new(on_click);
        let button = SceneObject::Button(Button {
            key: key.to_string(),
            label: label.to_string(),
            from_top_left,
            size,
        });
        self.inner.apply(|scene| {
            let command = ServerInner::insert(scene, button);
            scene.listeners.set_button_click(key, on_click);
            Some(command)
        });
        self
    }

    pub fn set_button_label(&self, key: &str, label: &str) -> &Self {
        self.inner
            .apply(|scene| scene.store.set_button_label(key, label));
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_slider(
        &self,
        key: &str,
        from_top_left: IVec2,
        size: IVec2,
        min: f64,
        max: f64,
        value: f64,
        only_ints: bool,
        horizontal: bool,
        on_change: impl Fn(f64) + Send + Sync + 'static,
    ) -> &Self {
        let on_change: SliderListener = Arc::new(on_change);
        let slider = SceneObject::Slider(Slider {
            key: key.to_string(),
            from_top_left,
            size,
            min,
            max,
            value,
            only_ints,
            horizontal,
        });
        self.inner.apply(|scene| {
            let command = ServerInner::insert(scene, slider);
            scene.listeners.set_slider_change(key, on_change);
            Some(command)
        });
        self
    }

    pub fn set_slider_value(&self, key: &str, value: f64) -> &Self {
        self.inner
            .apply(|scene| scene.store.set_slider_value(key, value));
        self
    }

    pub fn set_slider_min(&self, key: &str, min: f64) -> &Self {
        self.inner.apply(|scene| scene.store.set_slider_min(key, min));
        self
    }

    pub fn set_slider_max(&self, key: &str, max: f64) -> &Self {
        self.inner.apply(|scene| scene.store.set_slider_max(key, max));
        self
    }

    #[allow(clippy::too_many_arguments)]
    pub fn create_plot(
        &self,
        key: &str,
        from_top_left: IVec2,
        size: IVec2,
        xs: &[f64],
        min_x: f64,
        max_x: f64,
        ys: &[f64],
        min_y: f64,
        max_y: f64,
        plot_type: &str,
    ) -> &Self {
        self.create(SceneObject::Plot(Plot {
            key: key.to_string(),
            from_top_left,
            size,
            xs: xs.to_vec(),
            min_x,
            max_x,
            ys: ys.to_vec(),
            min_y,
            max_y,
            plot_type: plot_type.to_string(),
        }))
    }

    /// Replaces a plot's series and display bounds. Non-finite samples are
    /// sent as `0.0`.
    #[allow(clippy::too_many_arguments)]
    pub fn set_plot_data(
        &self,
        key: &str,
        xs: &[f64],
        min_x: f64,
        max_x: f64,
        ys: &[f64],
        min_y: f64,
        max_y: f64,
    ) -> &Self {
        self.inner.apply(|scene| {
            scene
                .store
                .set_plot_data(key, xs, min_x, max_x, ys, min_y, max_y)
        });
        self
    }

    pub fn set_ui_element_position(&self, key: &str, from_top_left: IVec2) -> &Self {
        self.inner
            .apply(|scene| scene.store.set_ui_element_position(key, from_top_left));
        self
    }

    pub fn set_ui_element_size(&self, key: &str, size: IVec2) -> &Self {
        self.inner
            .apply(|scene| scene.store.set_ui_element_size(key, size));
        self
    }

    /// Deletes `key` only if it is a UI element
    pub fn delete_ui_element(&self, key: &str) -> &Self {
        self.inner.apply(|scene| {
            let is_ui = scene
                .store
                .kind_of(key)
                .map_or(false, |kind| kind.is_ui_element());
            if !is_ui {
                return None;
            }
            scene.listeners.forget_widget(key);
            scene
                .store
                .remove(key)
                .map(|removed| removed.delete_command())
        });
        self
    }

    fn create(&self, object: SceneObject) -> &Self {
        self.inner
            .apply(|scene| Some(ServerInner::insert(scene, object)));
        self
    }
}

impl Default for GuiServer {
    fn default() -> Self {
        Self::new(ServerConfig::default())
    }
}

impl ServerInner {
    /// Runs `mutate` under the scene lock and queues the commands it returns
    /// before releasing it, so queue order matches mutation order. The send
    /// order is claimed before the scene lock is let go, so messages that
    /// became ready are transmitted ahead of any later mutation's.
    pub(super) fn apply<I>(&self, mutate: impl FnOnce(&mut SceneState) -> I)
    where
        I: IntoIterator<Item = Command>,
    {
        let (ready, _order) = {
            let mut scene = self.scene.lock();
            let ready: Vec<String> = mutate(&mut scene)
                .into_iter()
                .filter_map(|command| self.queue.push(&command))
                .collect();
            if ready.is_empty() {
                return;
            }
            (ready, self.send_order.lock())
        };
        for message in ready {
            self.transmit(&message);
        }
    }

    /// A new object under an existing key takes over that key, so callbacks
    /// bound to the old widget are dropped
    fn insert(scene: &mut SceneState, object: SceneObject) -> Command {
        scene.listeners.forget_widget(object.key());
        scene.store.insert(object)
    }

    pub(super) fn transmit(&self, message: &str) {
        match self.lifecycle.sender() {
            Some(sender) => {
                if sender.broadcast(message).is_err() {
                    warn!("Failed to broadcast a {} byte message", message.len());
                }
            }
            None => debug!("Not serving, dropping a {} byte message", message.len()),
        }
    }

    pub(super) fn fire_shutdown(&self) {
        let listeners = self.scene.lock().listeners.shutdown();
        fire_all("shutdown", &listeners, |listener| listener());
    }
}
