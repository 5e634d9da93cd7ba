//! Connection manager: handles connection lifecycle and per-user message routing.

use std::sync::Arc;

use tokio::sync::mpsc;
use tracing::{debug, error, info, warn};

use natsinternal_core::config::RealtimeConfig;
use natsinternal_core::types::UserId;

use crate::message::types::{InboundMessage, OutboundMessage};
use crate::notification::transport::DeliveryReport;

use super::handle::{ConnectionHandle, ConnectionId};
use super::pool::ConnectionPool;

/// Manages all active hub connections.
#[derive(Debug)]
pub struct ConnectionManager {
    /// Connection pool.
    pool: Arc<ConnectionPool>,
    /// Configuration.
    config: RealtimeConfig,
}

impl ConnectionManager {
    /// Creates a new connection manager.
    pub fn new(config: RealtimeConfig) -> Self {
        Self {
            pool: Arc::new(ConnectionPool::new()),
            config,
        }
    }

    /// Registers a new authenticated connection.
    ///
    /// Returns the connection handle and a receiver for outbound frames.
    /// When the user is already at the connection limit, their oldest
    /// connection is closed.
    pub fn register(
        &self,
        user_id: UserId,
        user_name: String,
    ) -> (Arc<ConnectionHandle>, mpsc::Receiver<String>) {
        let (tx, rx) = mpsc::channel(self.config.channel_buffer_size.max(1));
        let handle = Arc::new(ConnectionHandle::new(user_id, user_name, tx));

        if let Some(oldest) = self.pool.add(handle.clone(), self.config.max_connections_per_user) {
            oldest.mark_closed();
            warn!(
                user_id = %user_id,
                evicted = %oldest.id,
                max = self.config.max_connections_per_user,
                "User at max connections, oldest replaced"
            );
        }

        info!(
            conn_id = %handle.id,
            user_id = %user_id,
            user_name = %handle.user_name,
            "Hub connection registered"
        );

        (handle, rx)
    }

    /// Unregisters a connection.
    pub fn unregister(&self, conn_id: &ConnectionId) {
        if let Some(handle) = self.pool.remove(conn_id) {
            handle.mark_closed();
            info!(
                conn_id = %conn_id,
                user_id = %handle.user_id,
                "Hub connection unregistered"
            );
        }
    }

    /// Processes an inbound frame from a client.
    pub fn handle_inbound(&self, conn_id: &ConnectionId, raw_message: &str) {
        let Some(handle) = self.pool.get(conn_id) else {
            warn!(conn_id = %conn_id, "Message from unknown connection");
            return;
        };

        let reply = match serde_json::from_str::<InboundMessage>(raw_message) {
            Ok(InboundMessage::Ping { timestamp }) => {
                debug!(conn_id = %conn_id, "Ping received");
                OutboundMessage::pong(timestamp)
            }
            Err(e) => OutboundMessage::error(
                "INVALID_MESSAGE",
                format!("Failed to parse message: {e}"),
            ),
        };

        match serde_json::to_string(&reply) {
            Ok(frame) => {
                if let Err(e) = handle.send(frame) {
                    debug!(conn_id = %conn_id, error = %e, "Failed to reply to client");
                }
            }
            Err(e) => error!(error = %e, "Failed to serialize reply"),
        }
    }

    /// Sends a message to every live connection of a user.
    ///
    /// The message is serialized once. A user with no live connection
    /// receives nothing.
    pub fn send_to_user(&self, user_id: UserId, message: &OutboundMessage) -> DeliveryReport {
        let connections = self.pool.get_user_connections(user_id);
        if connections.is_empty() {
            return DeliveryReport::default();
        }

        let frame = match serde_json::to_string(message) {
            Ok(frame) => frame,
            Err(e) => {
                error!(error = %e, event = message.event_name(), "Failed to serialize outbound message");
                return DeliveryReport {
                    delivered: 0,
                    failed: connections.len(),
                };
            }
        };

        let mut report = DeliveryReport::default();
        for conn in &connections {
            match conn.send(frame.clone()) {
                Ok(()) => report.delivered += 1,
                Err(e) => {
                    warn!(conn_id = %conn.id, user_id = %user_id, error = %e, "Failed to send to user connection");
                    report.failed += 1;
                }
            }
        }

        report
    }

    /// Closes all connections.
    pub fn close_all(&self) {
        let all = self.pool.all_connections();
        for conn in &all {
            conn.mark_closed();
            self.pool.remove(&conn.id);
        }
        info!(count = all.len(), "All hub connections closed");
    }

    /// Returns the total connection count.
    pub fn connection_count(&self) -> usize {
        self.pool.connection_count()
    }

    /// Returns the number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.pool.user_count()
    }

    /// Returns all connected user IDs.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        self.pool.connected_user_ids()
    }

    /// Checks if a user is currently connected.
    pub fn is_user_connected(&self, user_id: UserId) -> bool {
        !self.pool.get_user_connections(user_id).is_empty()
    }

    /// Returns a reference to the connection pool.
    pub fn pool(&self) -> &Arc<ConnectionPool> {
        &self.pool
    }
}
