//! User lookups needed for recipient resolution and content rendering.

use async_trait::async_trait;
use sqlx::PgPool;

use natsinternal_core::error::{AppError, ErrorKind};
use natsinternal_core::result::AppResult;
use natsinternal_core::types::UserId;
use natsinternal_entity::user::{Permission, User};

/// Read-only view of back-office users and their permissions.
#[async_trait]
pub trait UserDirectory: Send + Sync + std::fmt::Debug + 'static {
    /// Find a user by id, deleted or not.
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>>;

    /// Ids of every non-deleted user, ascending.
    async fn find_active_ids(&self) -> AppResult<Vec<UserId>>;

    /// Ids of non-deleted users granted a permission through their role, ascending.
    async fn find_ids_with_permission(&self, permission: Permission) -> AppResult<Vec<UserId>>;
}

/// PostgreSQL-backed user directory.
#[derive(Debug, Clone)]
pub struct PgUserDirectory {
    pool: PgPool,
}

impl PgUserDirectory {
    /// Create a new user directory.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserDirectory for PgUserDirectory {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, user_name, display_name, is_deleted FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find user", e))
    }

    async fn find_active_ids(&self) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>("SELECT id FROM users WHERE is_deleted = FALSE ORDER BY id")
            .fetch_all(&self.pool)
            .await
            .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list users", e))
    }

    async fn find_ids_with_permission(&self, permission: Permission) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT DISTINCT u.id FROM users u \
             JOIN role_permissions rp ON rp.role_id = u.role_id \
             WHERE rp.permission = $1 AND u.is_deleted = FALSE \
             ORDER BY u.id",
        )
        .bind(permission.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to find permission holders", e)
        })
    }
}
