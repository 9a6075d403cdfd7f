use std::collections::HashMap;
use std::io;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
use tokio::net::{TcpListener, TcpStream};
use tokio::runtime::Runtime;
use tokio::sync::mpsc::error::TrySendError;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;

use super::codec::{decode_message, encode_frame, FrameDecoder, LENGTH_PREFIX_SIZE};
use super::protocol::Message;
use super::stats::{NetworkStats, StatsCounters};
use super::transport::{PeerId, Role, Transport, TransportEvent};

pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(5);
pub const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(1);
const READ_BUFFER_SIZE: usize = 4096;
const ACCEPT_BACKOFF: Duration = Duration::from_millis(100);
/// Frames queued per link before new ones are dropped. A peer that stops
/// reading loses updates instead of growing the queue.
pub const OUTBOUND_QUEUE_FRAMES: usize = 256;

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("failed to start network runtime: {0}")]
    Runtime(io::Error),
    #[error("failed to bind {addr}: {source}")]
    Bind { addr: String, source: io::Error },
    #[error("failed to connect to {addr}: {source}")]
    Connect { addr: String, source: io::Error },
    #[error("timed out connecting to {0}")]
    ConnectTimeout(String),
}

struct Link {
    outbound: mpsc::Sender<Vec<u8>>,
}

/// State handed to every background task.
#[derive(Clone)]
struct Shared {
    links: Arc<Mutex<HashMap<PeerId, Link>>>,
    tasks: Arc<Mutex<Vec<JoinHandle<()>>>>,
    events: mpsc::UnboundedSender<TransportEvent>,
    stats: Arc<StatsCounters>,
    shutdown: watch::Receiver<bool>,
    next_peer: Arc<AtomicU32>,
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

impl Shared {
    fn new() -> (
        Self,
        mpsc::UnboundedReceiver<TransportEvent>,
        watch::Sender<bool>,
    ) {
        let (events, inbound) = mpsc::unbounded_channel();
        let (shutdown_tx, shutdown) = watch::channel(false);
        let shared = Self {
            links: Arc::new(Mutex::new(HashMap::new())),
            tasks: Arc::new(Mutex::new(Vec::new())),
            events,
            stats: Arc::new(StatsCounters::default()),
            shutdown,
            next_peer: Arc::new(AtomicU32::new(1)),
        };
        (shared, inbound, shutdown_tx)
    }

    /// Registers a stream as a link and starts its reader and writer.
    /// Must run inside the transport's runtime.
    fn attach(&self, stream: TcpStream, addr: SocketAddr) -> PeerId {
        let peer = self.next_peer.fetch_add(1, Ordering::Relaxed);
        if let Err(err) = stream.set_nodelay(true) {
            log::debug!("Failed to set TCP_NODELAY for peer {peer}: {err}");
        }

        let (reader, writer) = stream.into_split();
        let (outbound, outbound_rx) = mpsc::channel(OUTBOUND_QUEUE_FRAMES);
        lock(&self.links).insert(peer, Link { outbound });
        let _ = self.events.send(TransportEvent::PeerConnected { peer, addr });

        let read_task = tokio::spawn(read_loop(self.clone(), peer, reader));
        let write_task = tokio::spawn(write_loop(
            Arc::clone(&self.stats),
            peer,
            writer,
            outbound_rx,
        ));
        let mut tasks = lock(&self.tasks);
        tasks.retain(|task| !task.is_finished());
        tasks.extend([read_task, write_task]);
        peer
    }
}

async fn accept_loop(shared: Shared, listener: TcpListener) {
    let mut shutdown = shared.shutdown.clone();
    loop {
        tokio::select! {
            _ = shutdown.changed() => break,
            accepted = listener.accept() => match accepted {
                Ok((stream, addr)) => {
                    let peer = shared.attach(stream, addr);
                    log::info!("Peer {peer} connected from {addr}");
                }
                Err(err) => {
                    log::warn!("Accept failed: {err}");
                    tokio::time::sleep(ACCEPT_BACKOFF).await;
                }
            },
        }
    }
}

async fn read_loop(shared: Shared, peer: PeerId, mut reader: OwnedReadHalf) {
    let mut shutdown = shared.shutdown.clone();
    let mut decoder = FrameDecoder::new();
    let mut buf = [0u8; READ_BUFFER_SIZE];

    'read: loop {
        let read = tokio::select! {
            _ = shutdown.changed() => break,
            read = reader.read(&mut buf) => read,
        };

        let n = match read {
            Ok(0) => {
                log::info!("Peer {peer} closed the connection");
                break;
            }
            Ok(n) => n,
            Err(err) => {
                log::debug!("Read from peer {peer} failed: {err}");
                break;
            }
        };

        decoder.extend(&buf[..n]);
        loop {
            match decoder.next_frame() {
                Ok(Some(body)) => match decode_message(&body) {
                    Ok(message) => {
                        shared.stats.record_received(LENGTH_PREFIX_SIZE + body.len());
                        if shared
                            .events
                            .send(TransportEvent::Message { peer, message })
                            .is_err()
                        {
                            break 'read;
                        }
                    }
                    Err(err) => {
                        shared.stats.record_malformed();
                        log::debug!("Dropping malformed message from peer {peer}: {err}");
                    }
                },
                Ok(None) => break,
                Err(err) => {
                    log::warn!("Closing link to peer {peer}: {err}");
                    break 'read;
                }
            }
        }
    }

    lock(&shared.links).remove(&peer);
    let _ = shared.events.send(TransportEvent::PeerDisconnected { peer });
}

/// Drains queued frames until the link is removed, then closes the socket.
async fn write_loop(
    stats: Arc<StatsCounters>,
    peer: PeerId,
    mut writer: OwnedWriteHalf,
    mut outbound: mpsc::Receiver<Vec<u8>>,
) {
    while let Some(frame) = outbound.recv().await {
        if let Err(err) = writer.write_all(&frame).await {
            stats.record_send_failure();
            log::debug!("Write to peer {peer} failed: {err}");
            break;
        }
        stats.record_sent(frame.len());
    }
    let _ = writer.shutdown().await;
}

fn build_runtime() -> Result<Runtime, TransportError> {
    tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("linkfire-net")
        .enable_all()
        .build()
        .map_err(TransportError::Runtime)
}

/// Length-prefixed JSON over TCP. The host accepts any number of clients,
/// a client holds exactly one link to its host.
pub struct TcpTransport {
    role: Role,
    local_addr: SocketAddr,
    remote_addr: Option<SocketAddr>,
    runtime: Option<Runtime>,
    shared: Shared,
    inbound: mpsc::UnboundedReceiver<TransportEvent>,
    shutdown_tx: watch::Sender<bool>,
}

impl TcpTransport {
    pub fn host(bind_addr: &str) -> Result<Self, TransportError> {
        let runtime = build_runtime()?;
        let bind_error = |source| TransportError::Bind {
            addr: bind_addr.to_string(),
            source,
        };
        let listener = runtime
            .block_on(TcpListener::bind(bind_addr))
            .map_err(bind_error)?;
        let local_addr = listener.local_addr().map_err(bind_error)?;

        let (shared, inbound, shutdown_tx) = Shared::new();
        let accept_task = runtime.spawn(accept_loop(shared.clone(), listener));
        lock(&shared.tasks).push(accept_task);
        log::info!("Hosting on {local_addr}");

        Ok(Self {
            role: Role::Host,
            local_addr,
            remote_addr: None,
            runtime: Some(runtime),
            shared,
            inbound,
            shutdown_tx,
        })
    }

    pub fn join(addr: &str) -> Result<Self, TransportError> {
        let runtime = build_runtime()?;
        let (shared, inbound, shutdown_tx) = Shared::new();
        let connect_error = |source| TransportError::Connect {
            addr: addr.to_string(),
            source,
        };

        let (local_addr, remote_addr) = runtime.block_on(async {
            let stream = tokio::time::timeout(CONNECT_TIMEOUT, TcpStream::connect(addr))
                .await
                .map_err(|_| TransportError::ConnectTimeout(addr.to_string()))?
                .map_err(connect_error)?;
            let local_addr = stream.local_addr().map_err(connect_error)?;
            let remote_addr = stream.peer_addr().map_err(connect_error)?;
            shared.attach(stream, remote_addr);
            Ok::<_, TransportError>((local_addr, remote_addr))
        })?;
        log::info!("Connected to host at {remote_addr}");

        Ok(Self {
            role: Role::Client,
            local_addr,
            remote_addr: Some(remote_addr),
            runtime: Some(runtime),
            shared,
            inbound,
            shutdown_tx,
        })
    }

    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn peer_count(&self) -> usize {
        lock(&self.shared.links).len()
    }
}

impl Transport for TcpTransport {
    fn role(&self) -> Role {
        self.role
    }

    fn send(&mut self, message: &Message) {
        let frame = match encode_frame(message) {
            Ok(frame) => frame,
            Err(err) => {
                log::warn!("Failed to encode {}: {err}", message.kind());
                return;
            }
        };

        let links = lock(&self.shared.links);
        for (peer, link) in links.iter() {
            match link.outbound.try_send(frame.clone()) {
                Ok(()) => {}
                Err(TrySendError::Full(_)) => {
                    self.shared.stats.record_send_failure();
                    log::debug!("Queue to peer {peer} is full; dropping {}", message.kind());
                }
                Err(TrySendError::Closed(_)) => {
                    self.shared.stats.record_send_failure();
                    log::debug!("Link to peer {peer} is closed; dropping {}", message.kind());
                }
            }
        }
    }

    fn poll(&mut self) -> Vec<TransportEvent> {
        let mut events = Vec::new();
        while let Ok(event) = self.inbound.try_recv() {
            events.push(event);
        }
        events
    }

    fn is_connected(&self) -> bool {
        self.runtime.is_some() && self.peer_count() > 0
    }

    fn status(&self) -> String {
        if self.runtime.is_none() {
            return "Disconnected".to_string();
        }
        match (self.role, self.remote_addr) {
            (Role::Host, _) => format!(
                "Hosting on {} ({} connected)",
                self.local_addr,
                self.peer_count()
            ),
            (_, Some(remote)) if self.peer_count() > 0 => format!("Connected to {remote}"),
            _ => "Disconnected from host".to_string(),
        }
    }

    fn stats(&self) -> NetworkStats {
        self.shared.stats.snapshot()
    }

    fn shutdown(&mut self) {
        let Some(runtime) = self.runtime.take() else {
            return;
        };

        let _ = self.shutdown_tx.send(true);
        // Dropping the senders lets each writer flush what is queued and close.
        lock(&self.shared.links).clear();
        let tasks: Vec<_> = lock(&self.shared.tasks).drain(..).collect();

        runtime.block_on(async {
            for task in tasks {
                if tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await.is_err() {
                    log::warn!("Network task did not stop within {SHUTDOWN_TIMEOUT:?}; abandoning it");
                }
            }
        });
        runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
        log::info!("Network transport stopped");
    }
}

impl Drop for TcpTransport {
    fn drop(&mut self) {
        self.shutdown();
    }
}
