use std::mem;

use log::{debug, warn};
use parking_lot::Mutex;

use scenecast_shared::{batch, Command};

/// Buffers encoded commands and decides when they become an outbound
/// message.
///
/// Guarded by its own lock, separate from the scene lock. Callers may take
/// this lock while holding the scene lock, never the other way around.
/// Nothing here touches the network: every method hands back the message to
/// transmit once the lock has been released.
pub(crate) struct CommandQueue {
    state: Mutex<QueueState>,
}

struct QueueState {
    autoflush: bool,
    pending: Vec<String>,
}

impl CommandQueue {
    pub fn new(autoflush: bool) -> Self {
        Self {
            state: Mutex::new(QueueState {
                autoflush,
                pending: Vec::new(),
            }),
        }
    }

    /// Encodes `command` and queues it. With autoflush on, returns the
    /// message carrying just this command.
    pub fn push(&self, command: &Command) -> Option<String> {
        let encoded = match command.encode() {
            Ok(encoded) => encoded,
            Err(error) => {
                warn!("Dropping command: {}", error);
                return None;
            }
        };

        let mut state = self.state.lock();
        if state.autoflush {
            Some(batch(&[encoded]))
        } else {
            state.pending.push(encoded);
            None
        }
    }

    /// Takes every pending command as one message, or `None` if nothing is
    /// pending
    pub fn take(&self) -> Option<String> {
        let mut state = self.state.lock();
        Self::drain(&mut state)
    }

    /// Switching autoflush on releases whatever was pending as one message.
    /// The flag flips and the buffer drains under one lock, so a command
    /// pushed concurrently lands either in that message or after it.
    pub fn set_autoflush(&self, autoflush: bool) -> Option<String> {
        let mut state = self.state.lock();
        state.autoflush = autoflush;
        if autoflush {
            Self::drain(&mut state)
        } else {
            None
        }
    }

    fn drain(state: &mut QueueState) -> Option<String> {
        if state.pending.is_empty() {
            return None;
        }
        let pending = mem::take(&mut state.pending);
        debug!("Flushing {} queued commands", pending.len());
        Some(batch(&pending))
    }

    pub fn autoflush(&self) -> bool {
        self.state.lock().autoflush
    }

    /// Drops every pending command, returning how many were dropped
    pub fn discard(&self) -> usize {
        let mut state = self.state.lock();
        let dropped = state.pending.len();
        state.pending.clear();
        dropped
    }

    #[cfg(test)]
    pub fn pending_len(&self) -> usize {
        self.state.lock().pending.len()
    }
}
