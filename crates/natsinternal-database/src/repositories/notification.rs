//! Notification repository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use natsinternal_core::error::{AppError, ErrorKind};
use natsinternal_core::result::AppResult;
use natsinternal_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use natsinternal_entity::notification::{
    NewNotification, Notification, NotificationReceipt, ReceivedNotification,
};

/// Durable storage of notifications and their per-recipient receipts.
#[async_trait]
pub trait NotificationRepository: Send + Sync + std::fmt::Debug + 'static {
    /// Persist a notification and one unread receipt per recipient, atomically.
    async fn insert(
        &self,
        notification: &NewNotification,
        recipients: &[UserId],
    ) -> AppResult<Notification>;

    /// Find a notification by id.
    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>>;

    /// Find the receipt of a notification for one recipient.
    async fn find_receipt(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<NotificationReceipt>>;

    /// List the notifications a user received, newest first.
    async fn find_for_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ReceivedNotification>>;

    /// Count unread notifications for a user.
    async fn count_unread(&self, user_id: UserId) -> AppResult<i64>;

    /// Mark one notification read for a recipient. Keeps the first read time.
    /// Returns `false` when the user is not a recipient.
    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<bool>;

    /// Mark every unread notification of a user read. Returns the count changed.
    async fn mark_all_read(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<u64>;

    /// Recipients of a notification, ascending.
    async fn recipients_of(&self, id: NotificationId) -> AppResult<Vec<UserId>>;
}

const NOTIFICATION_COLUMNS: &str =
    "n.id, n.notification_type, n.resource_ids, n.created_user_id, n.created_at";

/// PostgreSQL-backed notification repository.
#[derive(Debug, Clone)]
pub struct PgNotificationRepository {
    pool: PgPool,
}

impl PgNotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationRepository for PgNotificationRepository {
    async fn insert(
        &self,
        notification: &NewNotification,
        recipients: &[UserId],
    ) -> AppResult<Notification> {
        let mut tx = self.pool.begin().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to begin transaction", e)
        })?;

        let created = sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (notification_type, resource_ids, created_user_id, created_at) \
             VALUES ($1, $2, $3, $4) \
             RETURNING id, notification_type, resource_ids, created_user_id, created_at",
        )
        .bind(notification.notification_type)
        .bind(&notification.resource_ids)
        .bind(notification.created_user_id)
        .bind(notification.created_at)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to create notification", e))?;

        if !recipients.is_empty() {
            let user_ids: Vec<i32> = recipients.iter().map(|id| id.value()).collect();
            sqlx::query(
                "INSERT INTO notification_receipts (notification_id, user_id) \
                 SELECT $1, UNNEST($2::INTEGER[])",
            )
            .bind(created.id)
            .bind(&user_ids)
            .execute(&mut *tx)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to create receipts", e)
            })?;
        }

        tx.commit().await.map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to commit notification", e)
        })?;

        Ok(created)
    }

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS} FROM notifications n WHERE n.id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find notification", e))
    }

    async fn find_receipt(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<NotificationReceipt>> {
        sqlx::query_as::<_, NotificationReceipt>(
            "SELECT notification_id, user_id, read_at FROM notification_receipts \
             WHERE notification_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to find receipt", e))
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ReceivedNotification>> {
        let total: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM notification_receipts WHERE user_id = $1")
                .bind(user_id)
                .fetch_one(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(ErrorKind::Database, "Failed to count notifications", e)
                })?;

        let items = sqlx::query_as::<_, ReceivedNotification>(&format!(
            "SELECT {NOTIFICATION_COLUMNS}, r.read_at \
             FROM notification_receipts r JOIN notifications n ON n.id = r.notification_id \
             WHERE r.user_id = $1 \
             ORDER BY n.created_at DESC, n.id DESC LIMIT $2 OFFSET $3"
        ))
        .bind(user_id)
        .bind(page.limit() as i64)
        .bind(i64::try_from(page.offset()).unwrap_or(i64::MAX))
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list notifications", e))?;

        Ok(PageResponse::new(
            items,
            page.page,
            page.page_size,
            total as u64,
        ))
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        sqlx::query_scalar(
            "SELECT COUNT(*) FROM notification_receipts WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to count unread", e))
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let result = sqlx::query(
            "UPDATE notification_receipts SET read_at = COALESCE(read_at, $3) \
             WHERE notification_id = $1 AND user_id = $2",
        )
        .bind(id)
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark read", e))?;

        Ok(result.rows_affected() > 0)
    }

    async fn mark_all_read(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        let result = sqlx::query(
            "UPDATE notification_receipts SET read_at = $2 \
             WHERE user_id = $1 AND read_at IS NULL",
        )
        .bind(user_id)
        .bind(at)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to mark all read", e))?;

        Ok(result.rows_affected())
    }

    async fn recipients_of(&self, id: NotificationId) -> AppResult<Vec<UserId>> {
        sqlx::query_scalar::<_, UserId>(
            "SELECT user_id FROM notification_receipts WHERE notification_id = $1 ORDER BY user_id",
        )
        .bind(id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Failed to list recipients", e))
    }
}
