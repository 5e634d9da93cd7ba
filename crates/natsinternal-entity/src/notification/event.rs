//! Semantic domain event from which notifications are built.

use serde::{Deserialize, Serialize};

use natsinternal_core::types::UserId;

use super::kind::NotificationType;

/// A domain event detected by application code, e.g. "order 12 created by user 3".
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationEvent {
    /// Event type.
    pub kind: NotificationType,
    /// Identifiers of the resources involved.
    pub resource_ids: Vec<i32>,
    /// The user who caused the event, when it was caused by a user.
    pub actor_id: Option<UserId>,
}

impl NotificationEvent {
    /// Create an event with no acting user (scheduled events such as birthdays).
    pub fn new(kind: NotificationType, resource_ids: impl Into<Vec<i32>>) -> Self {
        Self {
            kind,
            resource_ids: resource_ids.into(),
            actor_id: None,
        }
    }

    /// Attribute the event to a user.
    pub fn by(mut self, actor_id: UserId) -> Self {
        self.actor_id = Some(actor_id);
        self
    }

    /// The first resource id, which names the primary resource for most types.
    pub fn primary_resource_id(&self) -> Option<i32> {
        self.resource_ids.first().copied()
    }
}
