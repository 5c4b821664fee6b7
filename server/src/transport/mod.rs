cfg_if! {
    if #[cfg(feature = "transport_websocket")] {
        pub mod websocket;
    } else {}
}

pub use inner::{ConnectionId, InboundSink, MessageSender, SendError, Socket, SocketHandle};

mod inner {

    use std::{net::SocketAddr, sync::Arc};

    use crate::ScenecastServerError;

    /// Identifies one connected viewer for the lifetime of its connection
    pub type ConnectionId = u64;

    #[derive(Debug)]
    pub struct SendError;

    pub trait Socket: Send {
        /// Starts accepting viewers on `port` on a background thread and
        /// returns once the port is bound. Inbound traffic is handed to
        /// `inbound` from that thread.
        fn listen(
            self: Box<Self>,
            port: u16,
            inbound: Arc<dyn InboundSink>,
        ) -> Result<Box<dyn SocketHandle>, ScenecastServerError>;
    }

    pub trait SocketHandle: Send {
        /// Get a sender for outbound text messages
        fn sender(&self) -> Arc<dyn MessageSender>;
        /// The address actually bound, if the transport has one
        fn local_addr(&self) -> Option<SocketAddr>;
        /// Stops accepting, drops every connection and joins the background
        /// thread
        fn close(self: Box<Self>);
    }

    pub trait MessageSender: Send + Sync {
        /// Sends a text message to every connected viewer. Having no viewers
        /// is not an error.
        fn broadcast(&self, message: &str) -> Result<(), SendError>;
        /// Sends a text message to one viewer
        fn send_to(&self, connection: ConnectionId, message: &str) -> Result<(), SendError>;
    }

    /// Receives everything the transport hears from viewers. Called on the
    /// network thread.
    pub trait InboundSink: Send + Sync {
        fn on_connect(&self, connection: ConnectionId);
        fn on_disconnect(&self, connection: ConnectionId);
        fn on_message(&self, connection: ConnectionId, text: &str);
        /// The process was asked to shut down (e.g. Ctrl+C)
        fn on_shutdown_signal(&self);
    }
}
