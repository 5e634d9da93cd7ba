//! Request DTOs with validation.

use serde::{Deserialize, Serialize};
use validator::Validate;

use natsinternal_core::error::AppError;
use natsinternal_core::result::AppResult;
use natsinternal_entity::notification::{NotificationEvent, NotificationType};

/// Domain event reported by a CRUD service: `{ "type", "resourceIds" }`.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct NotificationEventRequest {
    /// Notification type, as its variant or snake_case name.
    #[serde(rename = "type")]
    #[validate(length(min = 1, max = 64, message = "Notification type is required"))]
    pub notification_type: String,
    /// Identifiers of the resources involved.
    #[serde(default)]
    #[validate(length(max = 32, message = "At most 32 resource ids are accepted"))]
    pub resource_ids: Vec<i32>,
}

impl NotificationEventRequest {
    /// Validate the request and turn it into an unattributed event.
    pub fn into_event(self) -> AppResult<NotificationEvent> {
        self.validate()
            .map_err(|e| AppError::validation(e.to_string()))?;
        let kind: NotificationType = self.notification_type.parse()?;
        Ok(NotificationEvent::new(kind, self.resource_ids))
    }
}
