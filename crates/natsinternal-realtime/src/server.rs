//! Top-level real-time engine that ties the hub subsystems together.

use std::sync::Arc;

use tokio::sync::broadcast;
use tracing::info;

use natsinternal_core::config::RealtimeConfig;
use natsinternal_service::notification::NotificationStore;

use crate::connection::manager::ConnectionManager;
use crate::notification::notifier::Notifier;

/// Central real-time engine: the connection registry and the notifier
/// that pushes through it.
#[derive(Debug, Clone)]
pub struct RealtimeEngine {
    /// Connection manager.
    pub connections: Arc<ConnectionManager>,
    /// Notification pipeline.
    pub notifier: Arc<Notifier>,
    /// Shutdown signal sender.
    shutdown_tx: broadcast::Sender<()>,
}

impl RealtimeEngine {
    /// Creates a new real-time engine.
    pub fn new(config: RealtimeConfig, store: Arc<dyn NotificationStore>) -> Self {
        let (shutdown_tx, _) = broadcast::channel(1);

        let connections = Arc::new(ConnectionManager::new(config));
        let notifier = Arc::new(Notifier::new(store, connections.clone()));

        info!("Real-time engine initialized");

        Self {
            connections,
            notifier,
            shutdown_tx,
        }
    }

    /// Returns a shutdown receiver for graceful shutdown coordination.
    pub fn shutdown_receiver(&self) -> broadcast::Receiver<()> {
        self.shutdown_tx.subscribe()
    }

    /// Signals socket tasks to stop and closes every connection.
    pub fn shutdown(&self) {
        info!("Shutting down real-time engine");
        let _ = self.shutdown_tx.send(());
        self.connections.close_all();
        info!("Real-time engine shut down");
    }
}
