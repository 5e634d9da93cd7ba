//! Repository provider that dispatches to the configured persistence backend.

use std::sync::Arc;

use tracing::info;

use natsinternal_core::config::DatabaseConfig;
use natsinternal_core::error::AppError;
use natsinternal_core::result::AppResult;

use crate::connection::DatabasePool;
use crate::memory::{MemoryNotificationRepository, MemoryUserDirectory};
use crate::repositories::{
    NotificationRepository, PgNotificationRepository, PgUserDirectory, UserDirectory,
};

/// The repositories selected by `database.provider`.
#[derive(Debug, Clone)]
pub struct DatabaseProvider {
    /// Notification storage.
    pub notifications: Arc<dyn NotificationRepository>,
    /// User and permission lookups.
    pub users: Arc<dyn UserDirectory>,
    /// The PostgreSQL pool, when that provider is active.
    pool: Option<DatabasePool>,
}

impl DatabaseProvider {
    /// Connect the configured provider, running migrations when enabled.
    pub async fn connect(config: &DatabaseConfig) -> AppResult<Self> {
        match config.provider.as_str() {
            "postgres" => {
                let pool = DatabasePool::connect(config).await?;
                if config.run_migrations {
                    pool.migrate().await?;
                }
                Ok(Self {
                    notifications: Arc::new(PgNotificationRepository::new(pool.pool().clone())),
                    users: Arc::new(PgUserDirectory::new(pool.pool().clone())),
                    pool: Some(pool),
                })
            }
            "memory" => {
                let users = MemoryUserDirectory::from_seeds(&config.memory_users)?;
                info!(
                    seeded_users = config.memory_users.len(),
                    "Using in-memory persistence; notifications are lost on restart"
                );
                Ok(Self::from_repositories(
                    Arc::new(MemoryNotificationRepository::new()),
                    Arc::new(users),
                ))
            }
            other => Err(AppError::configuration(format!(
                "Unknown database provider: '{other}'. Supported: postgres, memory"
            ))),
        }
    }

    /// Build a provider from existing repositories (for testing).
    pub fn from_repositories(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserDirectory>,
    ) -> Self {
        Self {
            notifications,
            users,
            pool: None,
        }
    }

    /// Name of the active backend, for health reporting.
    pub fn backend(&self) -> &'static str {
        if self.pool.is_some() {
            "postgres"
        } else {
            "memory"
        }
    }

    /// Check connectivity. In-memory storage is always reachable.
    pub async fn health_check(&self) -> AppResult<bool> {
        match &self.pool {
            Some(pool) => pool.health_check().await,
            None => Ok(true),
        }
    }

    /// Release database connections.
    pub async fn close(&self) {
        if let Some(pool) = &self.pool {
            pool.close().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use natsinternal_core::config::MemoryUserSeed;
    use natsinternal_core::error::ErrorKind;
    use natsinternal_core::types::UserId;
    use natsinternal_entity::user::Permission;

    use super::*;

    fn seed(id: i32, name: &str, permissions: &[&str]) -> MemoryUserSeed {
        MemoryUserSeed {
            id,
            user_name: name.to_string(),
            display_name: String::new(),
            permissions: permissions.iter().map(|p| p.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn test_memory_provider() {
        let config = DatabaseConfig {
            provider: "memory".to_string(),
            ..DatabaseConfig::default()
        };
        let provider = DatabaseProvider::connect(&config).await.unwrap();
        assert_eq!(provider.backend(), "memory");
        assert!(provider.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unknown_provider_is_rejected() {
        let config = DatabaseConfig {
            provider: "sqlite".to_string(),
            ..DatabaseConfig::default()
        };
        let err = DatabaseProvider::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
    }

    #[tokio::test]
    async fn test_memory_provider_loads_seed_users() {
        let config = DatabaseConfig {
            provider: "memory".to_string(),
            memory_users: vec![
                seed(1, "admin", &["GetCustomerDetail", "GetOrderDetail"]),
                seed(2, "staff", &["GetCustomerDetail"]),
                seed(3, "viewer", &[]),
            ],
            ..DatabaseConfig::default()
        };
        let provider = DatabaseProvider::connect(&config).await.unwrap();

        assert_eq!(
            provider
                .users
                .find_ids_with_permission(Permission::GetCustomerDetail)
                .await
                .unwrap(),
            vec![UserId::new(1), UserId::new(2)]
        );
        assert_eq!(provider.users.find_active_ids().await.unwrap().len(), 3);

        let staff = provider.users.find_by_id(UserId::new(2)).await.unwrap().unwrap();
        assert_eq!(staff.display_name, "staff");
    }

    #[tokio::test]
    async fn test_unknown_seed_permission_is_rejected() {
        let config = DatabaseConfig {
            provider: "memory".to_string(),
            memory_users: vec![seed(1, "admin", &["DeleteEverything"])],
            ..DatabaseConfig::default()
        };
        let err = DatabaseProvider::connect(&config).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Configuration);
        assert!(err.message.contains("DeleteEverything"));
    }
}
