use std::{net::SocketAddr, sync::Arc, time::Duration};

use log::{info, warn};
use parking_lot::{Condvar, Mutex};

use crate::{
    transport::{InboundSink, MessageSender, Socket, SocketHandle},
    ScenecastServerError,
};

/// Where the server is in its serve / stop cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ServingState {
    Idle,
    Starting,
    Serving,
    Stopping,
}

/// Why a wait in [`Lifecycle::wait`] ended
#[derive(Debug, PartialEq, Eq)]
pub(crate) enum Wake {
    /// The poll interval elapsed with nothing else happening
    Poll,
    /// A shutdown signal arrived and is now consumed
    ShutdownRequested,
    /// The server is no longer serving
    Stopped,
}

/// Owns the transport handle and the state machine around it.
///
/// The transport is started and joined without holding this lock, so the
/// network thread can always take it (to report a shutdown signal) while
/// the application thread is waiting on it.
pub(crate) struct Lifecycle {
    state: Mutex<LifecycleState>,
    changed: Condvar,
}

struct LifecycleState {
    phase: ServingState,
    local_addr: Option<SocketAddr>,
    handle: Option<Box<dyn SocketHandle>>,
    sender: Option<Arc<dyn MessageSender>>,
    shutdown_requested: bool,
    shutdown_fired: bool,
}

/// A transport that has been detached from the lifecycle and must be closed
pub(crate) struct Stopping {
    pub handle: Box<dyn SocketHandle>,
    /// Shutdown listeners already ran for this serving session
    pub shutdown_fired: bool,
}

impl Lifecycle {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(LifecycleState {
                phase: ServingState::Idle,
                local_addr: None,
                handle: None,
                sender: None,
                shutdown_requested: false,
                shutdown_fired: false,
            }),
            changed: Condvar::new(),
        }
    }

    /// Attaches `socket` on `port`. A no-op while another session is live.
    pub fn serve(
        &self,
        port: u16,
        socket: Box<dyn Socket>,
        inbound: Arc<dyn InboundSink>,
    ) -> Result<(), ScenecastServerError> {
        {
            let mut state = self.state.lock();
            if state.phase != ServingState::Idle {
                info!("serve({}) ignored, server is {:?}", port, state.phase);
                return Ok(());
            }
            state.phase = ServingState::Starting;
        }

        let listened = socket.listen(port, inbound);

        let mut state = self.state.lock();
        let result = match listened {
            Ok(handle) => {
                state.local_addr = handle.local_addr();
                state.sender = Some(handle.sender());
                state.handle = Some(handle);
                state.shutdown_requested = false;
                state.shutdown_fired = false;
                state.phase = ServingState::Serving;
                info!("Serving on port {}", port);
                Ok(())
            }
            Err(error) => {
                state.phase = ServingState::Idle;
                Err(error)
            }
        };
        self.changed.notify_all();
        result
    }

    /// Detaches the live transport, if any, and moves to `Stopping`. The
    /// caller closes it and then calls [`Lifecycle::finish_stop`].
    pub fn begin_stop(&self) -> Option<Stopping> {
        let mut state = self.state.lock();
        if state.phase != ServingState::Serving {
            return None;
        }
        let handle = state.handle.take()?;
        state.phase = ServingState::Stopping;
        state.sender = None;
        self.changed.notify_all();
        Some(Stopping {
            handle,
            shutdown_fired: state.shutdown_fired,
        })
    }

    pub fn finish_stop(&self) {
        let mut state = self.state.lock();
        state.phase = ServingState::Idle;
        state.local_addr = None;
        state.shutdown_requested = false;
        info!("Server stopped");
        self.changed.notify_all();
    }

    /// Claims the right to fire shutdown listeners for this session. Returns
    /// false if they already fired or nothing is being served.
    pub fn claim_shutdown(&self) -> bool {
        let mut state = self.state.lock();
        if state.phase != ServingState::Serving || state.shutdown_fired {
            return false;
        }
        state.shutdown_fired = true;
        true
    }

    /// Wakes any thread in [`Lifecycle::wait`] so it can tear the server down
    pub fn request_shutdown(&self) {
        let mut state = self.state.lock();
        if state.phase == ServingState::Serving {
            state.shutdown_requested = true;
            self.changed.notify_all();
        } else {
            warn!("Shutdown requested while {:?}, ignoring", state.phase);
        }
    }

    pub fn sender(&self) -> Option<Arc<dyn MessageSender>> {
        self.state.lock().sender.clone()
    }

    pub fn phase(&self) -> ServingState {
        self.state.lock().phase
    }

    pub fn local_addr(&self) -> Option<SocketAddr> {
        self.state.lock().local_addr
    }

    /// Parks for at most `interval`, returning early on any state change
    pub fn wait(&self, interval: Duration) -> Wake {
        let mut state = self.state.lock();
        if let Some(wake) = Self::settled(&mut state) {
            return wake;
        }
        self.changed.wait_for(&mut state, interval);
        Self::settled(&mut state).unwrap_or(Wake::Poll)
    }

    fn settled(state: &mut LifecycleState) -> Option<Wake> {
        match state.phase {
            ServingState::Idle | ServingState::Stopping => Some(Wake::Stopped),
            ServingState::Serving if state.shutdown_requested => {
                state.shutdown_requested = false;
                Some(Wake::ShutdownRequested)
            }
            _ => None,
        }
    }
}
