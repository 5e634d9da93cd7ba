//! Application state shared across all handlers.

use std::sync::Arc;

use natsinternal_core::config::AppConfig;
use natsinternal_database::DatabaseProvider;
use natsinternal_realtime::RealtimeEngine;
use natsinternal_service::NotificationService;

use crate::auth::JwtDecoder;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are cheap to clone across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    /// Application configuration
    pub config: Arc<AppConfig>,
    /// Persistence backend
    pub database: DatabaseProvider,
    /// Access token decoder
    pub jwt_decoder: Arc<JwtDecoder>,
    /// Notification service
    pub notification_service: Arc<NotificationService>,
    /// Notification hub and notifier
    pub realtime: RealtimeEngine,
}

impl AppState {
    /// Wires the service, the hub and the notifier over a database provider.
    pub fn new(config: AppConfig, database: DatabaseProvider) -> Self {
        let notification_service = Arc::new(NotificationService::from_provider(
            &database,
            &config.notifications,
        ));
        let realtime = RealtimeEngine::new(config.realtime.clone(), notification_service.clone());
        let jwt_decoder = Arc::new(JwtDecoder::new(&config.auth));

        Self {
            config: Arc::new(config),
            database,
            jwt_decoder,
            notification_service,
            realtime,
        }
    }
}
