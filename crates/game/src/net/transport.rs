use std::net::SocketAddr;

use super::protocol::Message;
use super::stats::NetworkStats;

pub type PeerId = u32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    Offline,
    Host,
    Client,
}

#[derive(Debug, Clone, PartialEq)]
pub enum TransportEvent {
    PeerConnected { peer: PeerId, addr: SocketAddr },
    PeerDisconnected { peer: PeerId },
    Message { peer: PeerId, message: Message },
}

/// Link between this peer and the rest of the session.
///
/// `send` never blocks the caller and never fails loudly: a dead link is
/// reported through `poll` and `status` instead.
pub trait Transport: Send {
    fn role(&self) -> Role;

    /// Delivers to every live link. A host reaches all clients, a client reaches the host.
    fn send(&mut self, message: &Message);

    /// Drains events received since the previous call, in arrival order.
    fn poll(&mut self) -> Vec<TransportEvent>;

    fn is_connected(&self) -> bool;

    fn status(&self) -> String;

    fn stats(&self) -> NetworkStats;

    /// Stops all background work. Safe to call more than once.
    fn shutdown(&mut self);
}

/// Single-player stand-in used when no network is configured or joining failed.
#[derive(Debug, Clone)]
pub struct NullTransport {
    status: String,
}

impl NullTransport {
    pub fn new() -> Self {
        Self::with_status("Offline")
    }

    pub fn with_status(status: impl Into<String>) -> Self {
        Self {
            status: status.into(),
        }
    }
}

impl Default for NullTransport {
    fn default() -> Self {
        Self::new()
    }
}

impl Transport for NullTransport {
    fn role(&self) -> Role {
        Role::Offline
    }

    fn send(&mut self, _message: &Message) {}

    fn poll(&mut self) -> Vec<TransportEvent> {
        Vec::new()
    }

    fn is_connected(&self) -> bool {
        false
    }

    fn status(&self) -> String {
        self.status.clone()
    }

    fn stats(&self) -> NetworkStats {
        NetworkStats::default()
    }

    fn shutdown(&mut self) {}
}
