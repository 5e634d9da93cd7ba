//! The store contract the notifier drives.

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use natsinternal_core::result::AppResult;
use natsinternal_core::types::{NotificationId, UserId};
use natsinternal_entity::notification::{NotificationEvent, NotificationView};

/// Result of persisting a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedNotification {
    /// Identifier assigned to the new notification.
    pub notification_id: NotificationId,
    /// Users the notification is addressed to. Duplicate-free, ascending.
    pub recipient_ids: Vec<UserId>,
}

/// Persists notifications and serves their broadcast view.
#[async_trait]
pub trait NotificationStore: Send + Sync + fmt::Debug + 'static {
    /// Persist the notification of an event together with one receipt per
    /// resolved recipient.
    async fn create(&self, event: &NotificationEvent) -> AppResult<CreatedNotification>;

    /// The broadcast view of one notification. Fails with not-found for an
    /// unknown id. Has no side effects.
    async fn get_single(&self, id: NotificationId) -> AppResult<NotificationView>;
}
