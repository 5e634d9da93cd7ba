//! Notification entity models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use natsinternal_core::types::{NotificationId, UserId};

use super::kind::NotificationType;

/// A persisted notification. Immutable once created.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: NotificationId,
    /// Domain event this notification records.
    pub notification_type: NotificationType,
    /// Identifiers of the resources involved; meaning depends on the type.
    pub resource_ids: Vec<i32>,
    /// The user whose action triggered the event, if any.
    pub created_user_id: Option<UserId>,
    /// When the notification was created.
    pub created_at: DateTime<Utc>,
}

/// Data required to persist a new notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewNotification {
    /// Domain event type.
    pub notification_type: NotificationType,
    /// Resource identifiers.
    pub resource_ids: Vec<i32>,
    /// Acting user.
    pub created_user_id: Option<UserId>,
    /// Creation timestamp.
    pub created_at: DateTime<Utc>,
}

impl NewNotification {
    /// Attach the identifier assigned by the store.
    pub fn into_notification(self, id: NotificationId) -> Notification {
        Notification {
            id,
            notification_type: self.notification_type,
            resource_ids: self.resource_ids,
            created_user_id: self.created_user_id,
            created_at: self.created_at,
        }
    }
}

/// Delivery record linking a notification to one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct NotificationReceipt {
    /// The notification delivered.
    pub notification_id: NotificationId,
    /// The recipient.
    pub user_id: UserId,
    /// When the recipient read the notification.
    pub read_at: Option<DateTime<Utc>>,
}

impl NotificationReceipt {
    /// Check if the recipient has read the notification.
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}

/// A notification as seen by one recipient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct ReceivedNotification {
    /// The notification itself.
    #[sqlx(flatten)]
    pub notification: Notification,
    /// When this recipient read it.
    pub read_at: Option<DateTime<Utc>>,
}

impl ReceivedNotification {
    /// Check if the recipient has read the notification.
    pub fn is_read(&self) -> bool {
        self.read_at.is_some()
    }
}
