//! Transport-ready notification representation.

use serde::{Deserialize, Serialize};

use natsinternal_core::types::NotificationId;

/// The serialized form of a notification pushed to clients and returned by
/// the API: `{ id, content, emittedDeltaText, isRead }`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NotificationView {
    /// Notification identifier.
    pub id: NotificationId,
    /// Human-readable content text.
    pub content: String,
    /// Relative time since emission, e.g. "5 minutes ago".
    pub emitted_delta_text: String,
    /// Whether the viewing user has read it.
    pub is_read: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wire_shape() {
        let view = NotificationView {
            id: NotificationId::new(12),
            content: "Alice created a new customer (#42).".to_string(),
            emitted_delta_text: "just now".to_string(),
            is_read: false,
        };

        let json = serde_json::to_value(&view).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "id": 12,
                "content": "Alice created a new customer (#42).",
                "emittedDeltaText": "just now",
                "isRead": false,
            })
        );
    }
}
