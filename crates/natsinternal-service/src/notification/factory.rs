//! Builds notification records from domain events.

use chrono::{DateTime, Utc};

use natsinternal_entity::notification::{NewNotification, NotificationEvent};

/// Turns a semantic event into the record to persist.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotificationFactory;

impl NotificationFactory {
    /// Creates a new factory.
    pub fn new() -> Self {
        Self
    }

    /// Builds the record of an event emitted now.
    pub fn build(&self, event: &NotificationEvent) -> NewNotification {
        self.build_at(event, Utc::now())
    }

    /// Builds the record of an event emitted at `at`.
    pub fn build_at(&self, event: &NotificationEvent, at: DateTime<Utc>) -> NewNotification {
        NewNotification {
            notification_type: event.kind,
            resource_ids: event.resource_ids.clone(),
            created_user_id: event.actor_id,
            created_at: at,
        }
    }
}
