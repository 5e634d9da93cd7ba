//! Individual hub connection handle.

use std::sync::atomic::{AtomicBool, Ordering};

use tokio::sync::mpsc;
use uuid::Uuid;

use natsinternal_core::types::UserId;

/// Unique connection identifier
pub type ConnectionId = Uuid;

/// Why a frame could not be queued for a connection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum SendError {
    /// The connection is closed or its socket task has gone away.
    #[error("connection closed")]
    Closed,
    /// The outbound queue is full.
    #[error("send buffer full")]
    Full,
}

/// A handle to a single WebSocket connection.
///
/// Holds the sender for pushing serialized frames to the socket task,
/// plus metadata about the connected user.
#[derive(Debug)]
pub struct ConnectionHandle {
    /// Unique connection ID
    pub id: ConnectionId,
    /// User who owns this connection
    pub user_id: UserId,
    /// User name from the access token
    pub user_name: String,
    /// Sender for outbound frames
    sender: mpsc::Sender<String>,
    /// Whether the connection is still alive
    alive: AtomicBool,
}

impl ConnectionHandle {
    /// Create a new connection handle
    pub fn new(user_id: UserId, user_name: String, sender: mpsc::Sender<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            user_id,
            user_name,
            sender,
            alive: AtomicBool::new(true),
        }
    }

    /// Queue a serialized frame for this connection without waiting.
    pub fn send(&self, frame: String) -> Result<(), SendError> {
        if !self.is_alive() {
            return Err(SendError::Closed);
        }
        match self.sender.try_send(frame) {
            Ok(()) => Ok(()),
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(conn_id = %self.id, "Connection send buffer full, dropping frame");
                Err(SendError::Full)
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                self.mark_closed();
                Err(SendError::Closed)
            }
        }
    }

    /// Check if connection is alive
    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::SeqCst)
    }

    /// Mark connection as closed
    pub fn mark_closed(&self) {
        self.alive.store(false, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_send_reports_full_and_closed() {
        let (tx, mut rx) = mpsc::channel(1);
        let handle = ConnectionHandle::new(UserId::new(1), "alice".to_string(), tx);

        assert_eq!(handle.send("a".to_string()), Ok(()));
        assert_eq!(handle.send("b".to_string()), Err(SendError::Full));
        assert_eq!(rx.recv().await.as_deref(), Some("a"));

        drop(rx);
        assert_eq!(handle.send("c".to_string()), Err(SendError::Closed));
        assert!(!handle.is_alive());
    }

    #[tokio::test]
    async fn test_closed_handle_rejects_without_queueing() {
        let (tx, mut rx) = mpsc::channel(4);
        let handle = ConnectionHandle::new(UserId::new(1), "alice".to_string(), tx);
        handle.mark_closed();

        assert_eq!(handle.send("a".to_string()), Err(SendError::Closed));
        assert!(rx.try_recv().is_err());
        assert!(!handle.is_alive());
    }
}
