use std::{
    net::{IpAddr, Ipv4Addr, SocketAddr},
    sync::{
        atomic::{AtomicU64, Ordering},
        mpsc, Arc,
    },
    thread::JoinHandle,
    time::Duration,
};

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        State,
    },
    response::IntoResponse,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use tokio::sync::{broadcast, broadcast::error::RecvError, oneshot, watch};

use super::{
    ConnectionId, InboundSink, MessageSender, SendError, Socket as TransportSocket, SocketHandle,
};
use crate::ScenecastServerError;

const RUNTIME_SHUTDOWN_TIMEOUT: Duration = Duration::from_millis(500);

// Configuration
#[derive(Clone, Debug)]
pub struct WebsocketConfig {
    /// IP Address to listen on
    pub bind_ip: IpAddr,
    /// HTTP path the viewer upgrades on
    pub path: String,
    /// How many outbound messages a slow viewer may fall behind before its
    /// connection is closed
    pub outbound_buffer: usize,
    /// Whether Ctrl+C is reported as a shutdown signal
    pub handle_ctrl_c: bool,
}

impl Default for WebsocketConfig {
    fn default() -> Self {
        Self {
            bind_ip: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            path: "/".to_string(),
            outbound_buffer: 1024,
            handle_ctrl_c: true,
        }
    }
}

// Socket
pub struct Socket {
    config: WebsocketConfig,
}

impl Socket {
    pub fn new(config: WebsocketConfig) -> Self {
        Self { config }
    }
}

impl Default for Socket {
    fn default() -> Self {
        Self::new(WebsocketConfig::default())
    }
}

impl From<Socket> for Box<dyn TransportSocket> {
    fn from(socket: Socket) -> Self {
        Box::new(socket)
    }
}

impl TransportSocket for Socket {
    fn listen(
        self: Box<Self>,
        port: u16,
        inbound: Arc<dyn InboundSink>,
    ) -> Result<Box<dyn SocketHandle>, ScenecastServerError> {
        let listen_addr = SocketAddr::new(self.config.bind_ip, port);
        let (outbound, _) = broadcast::channel(self.config.outbound_buffer.max(1));
        let (closing_tx, closing_rx) = watch::channel(false);
        let (stop_tx, stop_rx) = oneshot::channel();
        let (ready_tx, ready_rx) = mpsc::channel();

        let shared = Arc::new(SharedState {
            inbound,
            outbound: outbound.clone(),
            closing: closing_rx,
            next_connection: AtomicU64::new(1),
        });
        let config = self.config;

        log::info!("Spawning websocket acceptor thread for {}", listen_addr);
        let thread = std::thread::Builder::new()
            .name("scenecast-net".to_string())
            .spawn(move || {
                run_acceptor(listen_addr, config, shared, ready_tx, stop_rx, closing_tx)
            })
            .map_err(ScenecastServerError::ThreadSpawn)?;

        let local_addr = match ready_rx.recv() {
            Ok(Ok(local_addr)) => local_addr,
            Ok(Err(error)) => {
                let _ = thread.join();
                return Err(error);
            }
            Err(_) => {
                let _ = thread.join();
                return Err(ScenecastServerError::TransportDetached);
            }
        };

        Ok(Box::new(WebsocketHandle {
            local_addr,
            sender: Arc::new(WebsocketSender { outbound }),
            stop: stop_tx,
            thread,
        }))
    }
}

// Runs on the network thread until `stop_rx` fires
fn run_acceptor(
    listen_addr: SocketAddr,
    config: WebsocketConfig,
    shared: Arc<SharedState>,
    ready_tx: mpsc::Sender<Result<SocketAddr, ScenecastServerError>>,
    stop_rx: oneshot::Receiver<()>,
    closing_tx: watch::Sender<bool>,
) {
    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(error) => {
            log::error!("Failed to create tokio runtime: {}", error);
            let _ = ready_tx.send(Err(ScenecastServerError::Runtime(error)));
            return;
        }
    };

    runtime.block_on(async move {
        let listener = match tokio::net::TcpListener::bind(listen_addr).await {
            Ok(listener) => listener,
            Err(source) => {
                let _ = ready_tx.send(Err(ScenecastServerError::Bind {
                    port: listen_addr.port(),
                    source,
                }));
                return;
            }
        };
        let local_addr = listener.local_addr().unwrap_or(listen_addr);
        let _ = ready_tx.send(Ok(local_addr));
        log::info!("Websocket server listening on ws://{}{}", local_addr, config.path);

        if config.handle_ctrl_c {
            let inbound = shared.inbound.clone();
            tokio::spawn(async move {
                if tokio::signal::ctrl_c().await.is_ok() {
                    log::info!("Caught Ctrl+C");
                    inbound.on_shutdown_signal();
                }
            });
        }

        let app = Router::new()
            .route(&config.path, get(upgrade_viewer))
            .with_state(shared);

        let shutdown = async move {
            let _ = stop_rx.await;
            let _ = closing_tx.send(true);
        };

        if let Err(error) = axum::serve(listener, app)
            .with_graceful_shutdown(shutdown)
            .await
        {
            log::error!("Websocket server error: {}", error);
        }
    });

    runtime.shutdown_timeout(RUNTIME_SHUTDOWN_TIMEOUT);
    log::info!("Websocket acceptor thread stopped");
}

struct SharedState {
    inbound: Arc<dyn InboundSink>,
    outbound: broadcast::Sender<Outbound>,
    closing: watch::Receiver<bool>,
    next_connection: AtomicU64,
}

#[derive(Clone, Debug)]
enum Outbound {
    All(Arc<str>),
    To(ConnectionId, Arc<str>),
}

enum Delivery {
    Send(Arc<str>),
    Skip,
    /// The viewer missed messages and must resync by reconnecting
    Close,
    Stop,
}

// What one viewer does with the next item off the broadcast channel
fn delivery(connection: ConnectionId, recv_res: Result<Outbound, RecvError>) -> Delivery {
    match recv_res {
        Ok(Outbound::All(text)) => Delivery::Send(text),
        Ok(Outbound::To(target, text)) if target == connection => Delivery::Send(text),
        Ok(Outbound::To(..)) => Delivery::Skip,
        Err(RecvError::Lagged(skipped)) => {
            log::warn!(
                "Viewer {} fell {} messages behind, closing it",
                connection,
                skipped
            );
            Delivery::Close
        }
        Err(RecvError::Closed) => Delivery::Stop,
    }
}

async fn upgrade_viewer(
    ws: WebSocketUpgrade,
    State(shared): State<Arc<SharedState>>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_viewer(socket, shared))
}

async fn handle_viewer(socket: WebSocket, shared: Arc<SharedState>) {
    let connection = shared.next_connection.fetch_add(1, Ordering::Relaxed);
    let (mut sender, mut receiver) = socket.split();
    // subscribe before announcing the connection, so a replay sent from
    // on_connect is not missed
    let mut outbound = shared.outbound.subscribe();
    let mut closing = shared.closing.clone();

    log::info!("Viewer {} connected", connection);
    shared.inbound.on_connect(connection);

    loop {
        tokio::select! {
            recv_res = outbound.recv() => {
                let text = match delivery(connection, recv_res) {
                    Delivery::Send(text) => text,
                    Delivery::Skip => continue,
                    Delivery::Close => {
                        let _ = sender.send(Message::Close(None)).await;
                        break;
                    }
                    Delivery::Stop => break,
                };
                if sender.send(Message::Text(text.to_string())).await.is_err() {
                    log::info!("Viewer {} disconnected (send failed)", connection);
                    break;
                }
            }

            msg = receiver.next() => {
                match msg {
                    Some(Ok(Message::Text(text))) => shared.inbound.on_message(connection, &text),
                    Some(Ok(Message::Close(_))) | None => {
                        log::info!("Viewer {} disconnected", connection);
                        break;
                    }
                    Some(Err(error)) => {
                        log::warn!("Viewer {} disconnected (error): {}", connection, error);
                        break;
                    }
                    Some(Ok(_)) => continue,
                }
            }

            _ = closing.changed() => {
                let _ = sender.send(Message::Close(None)).await;
                break;
            }
        }
    }

    shared.inbound.on_disconnect(connection);
}

// Sender
struct WebsocketSender {
    outbound: broadcast::Sender<Outbound>,
}

impl MessageSender for WebsocketSender {
    fn broadcast(&self, message: &str) -> Result<(), SendError> {
        // no receivers just means no viewer is connected
        let _ = self.outbound.send(Outbound::All(message.into()));
        Ok(())
    }

    fn send_to(&self, connection: ConnectionId, message: &str) -> Result<(), SendError> {
        self.outbound
            .send(Outbound::To(connection, message.into()))
            .map(|_| ())
            .map_err(|_| SendError)
    }
}

// Handle
struct WebsocketHandle {
    local_addr: SocketAddr,
    sender: Arc<WebsocketSender>,
    stop: oneshot::Sender<()>,
    thread: JoinHandle<()>,
}

impl SocketHandle for WebsocketHandle {
    fn sender(&self) -> Arc<dyn MessageSender> {
        self.sender.clone()
    }

    fn local_addr(&self) -> Option<SocketAddr> {
        Some(self.local_addr)
    }

    fn close(self: Box<Self>) {
        let WebsocketHandle { stop, thread, .. } = *self;
        let _ = stop.send(());
        if thread.join().is_err() {
            log::error!("Websocket acceptor thread panicked");
        }
    }
}
