//! ClientChannel port - delivering events to live connections.
//!
//! The transport hands each connection an unbounded queue of
//! [`OutboundFrame`]s when it opens. Everything that needs to talk back to
//! clients (gateway, heartbeat checks, error-action handlers) goes through
//! this trait instead of touching sockets.

use async_trait::async_trait;
use tokio::sync::mpsc;

use crate::domain::booking_session::ServerEvent;
use crate::domain::foundation::ConnectionId;

/// One item on a connection's outbound queue.
#[derive(Debug, Clone, PartialEq)]
pub enum OutboundFrame {
    /// Serialize and send this event.
    Event(ServerEvent),
    /// Close the socket. Nothing after this frame is delivered.
    Close,
}

/// Sending half of a connection's outbound queue.
pub type OutboundSender = mpsc::UnboundedSender<OutboundFrame>;

/// Receiving half, drained by the transport.
pub type OutboundReceiver = mpsc::UnboundedReceiver<OutboundFrame>;

#[async_trait]
pub trait ClientChannel: Send + Sync {
    /// Sends to one connection. Returns false if it is unknown or its queue
    /// is closed.
    async fn send(&self, connection_id: &ConnectionId, event: ServerEvent) -> bool;

    /// Sends to every live connection. Returns how many accepted it.
    async fn broadcast(&self, event: ServerEvent) -> usize;

    /// Closes the connection and releases everything it holds. Safe to call
    /// for an unknown or already-closed connection.
    async fn disconnect(&self, connection_id: &ConnectionId);
}
