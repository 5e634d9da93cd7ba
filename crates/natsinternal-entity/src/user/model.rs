//! User entity model.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use natsinternal_core::types::UserId;

/// A back-office user, as far as notifications are concerned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, FromRow)]
pub struct User {
    /// Unique user identifier.
    pub id: UserId,
    /// Login name.
    pub user_name: String,
    /// Full name shown in notification content.
    pub display_name: String,
    /// Soft-deletion flag. Deleted users receive nothing.
    pub is_deleted: bool,
}

impl User {
    /// Check if the user can still receive notifications.
    pub fn is_active(&self) -> bool {
        !self.is_deleted
    }

    /// Name to show in content, falling back to the login name.
    pub fn name_for_display(&self) -> &str {
        if self.display_name.trim().is_empty() {
            &self.user_name
        } else {
            &self.display_name
        }
    }
}
