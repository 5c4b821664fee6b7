use std::sync::{Arc, Weak};

use log::{debug, info, warn};

use scenecast_shared::{batch, ClientMessage};

use super::gui_server::ServerInner;
use crate::{
    events::listeners::fire_all,
    transport::{ConnectionId, InboundSink},
};

/// Routes everything the transport hears into the server.
///
/// Holds the server weakly: the transport thread must not keep the scene
/// alive after every `GuiServer` handle is gone.
pub(crate) struct InboundRouter {
    server: Weak<ServerInner>,
}

impl InboundRouter {
    pub fn new(server: Weak<ServerInner>) -> Self {
        Self { server }
    }

    fn server(&self) -> Option<Arc<ServerInner>> {
        let server = self.server.upgrade();
        if server.is_none() {
            debug!("Inbound event after the server was dropped");
        }
        server
    }
}

impl InboundSink for InboundRouter {
    fn on_connect(&self, connection: ConnectionId) {
        let Some(server) = self.server() else {
            return;
        };
        info!("Client {} connected", connection);

        if server.config.replay_on_connect {
            server.replay_to(connection);
        }

        let listeners = server.scene.lock().listeners.connection();
        fire_all("connection", &listeners, |listener| listener());
    }

    fn on_disconnect(&self, connection: ConnectionId) {
        info!("Client {} disconnected", connection);
    }

    fn on_message(&self, connection: ConnectionId, text: &str) {
        let Some(server) = self.server() else {
            return;
        };
        match ClientMessage::parse(text) {
            Ok(message) => server.dispatch(message),
            Err(error) => warn!("Dropping message from client {}: {}", connection, error),
        }
    }

    fn on_shutdown_signal(&self) {
        let Some(server) = self.server() else {
            return;
        };
        if server.lifecycle.claim_shutdown() {
            server.fire_shutdown();
        }
        server.lifecycle.request_shutdown();
    }
}

impl ServerInner {
    /// Sends the whole current scene to one client as a single message. The
    /// send order is claimed while the snapshot is still current, so any
    /// mutation made after it reaches this client after the replay.
    fn replay_to(&self, connection: ConnectionId) {
        let (encoded, _order) = {
            let scene = self.scene.lock();
            let encoded: Vec<String> = scene
                .store
                .replay()
                .iter()
                .filter_map(|command| match command.encode() {
                    Ok(encoded) => Some(encoded),
                    Err(error) => {
                        warn!("Skipping {} during replay: {}", command.opcode(), error);
                        None
                    }
                })
                .collect();
            if encoded.is_empty() {
                return;
            }
            (encoded, self.send_order.lock())
        };

        let Some(sender) = self.lifecycle.sender() else {
            return;
        };
        debug!("Replaying {} commands to client {}", encoded.len(), connection);
        if sender.send_to(connection, &batch(&encoded)).is_err() {
            warn!("Failed to replay the scene to client {}", connection);
        }
    }

    /// Updates input state, then runs the matching callbacks outside the
    /// scene lock
    fn dispatch(&self, message: ClientMessage) {
        match message {
            ClientMessage::Keydown { key } => {
                let listeners = self.scene.lock().listeners.press_key(&key);
                fire_all("keydown", &listeners, |listener| listener(key.as_str()));
            }
            ClientMessage::Keyup { key } => {
                let listeners = self.scene.lock().listeners.release_key(&key);
                fire_all("keyup", &listeners, |listener| listener(key.as_str()));
            }
            ClientMessage::Drag { key, pos } => {
                let listeners = {
                    let mut scene = self.scene.lock();
                    scene.store.record_position(&key, pos);
                    scene.listeners.drag(&key)
                };
                fire_all("drag", &listeners, |listener| listener(pos));
            }
            ClientMessage::ScreenResize { size } => {
                let listeners = self.scene.lock().listeners.resize_screen(size);
                fire_all("screen resize", &listeners, |listener| listener(size));
            }
            ClientMessage::ButtonClick { key } => {
                let listener = self.scene.lock().listeners.button_click(&key);
                match listener {
                    Some(listener) => fire_all("button click", &[listener], |listener| listener()),
                    None => debug!("Click on '{}', which has no button callback", key),
                }
            }
            ClientMessage::SliderSetValue { key, value } => {
                let listener = {
                    let mut scene = self.scene.lock();
                    scene.store.record_slider_value(&key, value);
                    scene.listeners.slider_change(&key)
                };
                match listener {
                    Some(listener) => {
                        fire_all("slider change", &[listener], |listener| listener(value))
                    }
                    None => debug!("Slider '{}' changed, but has no callback", key),
                }
            }
        }
    }
}
