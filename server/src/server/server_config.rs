use std::{default::Default, time::Duration};

/// Contains Config properties which will be used by the Server
#[derive(Clone, Debug)]
pub struct ServerConfig {
    /// When true, every command is sent as its own message as soon as it is
    /// queued. When false, commands accumulate until `flush()`.
    pub autoflush: bool,
    /// How often `block_while_serving` wakes up to run its signal check
    pub signal_poll_interval: Duration,
    /// Whether a newly connected client is sent the full current scene
    pub replay_on_connect: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            autoflush: true,
            signal_poll_interval: Duration::from_millis(100),
            replay_on_connect: true,
        }
    }
}
