//! Notification content formatting.

use chrono::{DateTime, Utc};

use natsinternal_entity::notification::{Notification, NotificationAction, NotificationView};

/// Name used when an event has no acting user.
const SYSTEM_ACTOR: &str = "The system";

/// Formats notification content and relative emission times.
pub struct NotificationFormatter;

impl NotificationFormatter {
    /// Builds the view of a notification as seen at `now`.
    pub fn view(
        notification: &Notification,
        actor_name: Option<&str>,
        is_read: bool,
        now: DateTime<Utc>,
    ) -> NotificationView {
        NotificationView {
            id: notification.id,
            content: Self::content(notification, actor_name),
            emitted_delta_text: Self::emitted_delta_text(notification.created_at, now),
            is_read,
        }
    }

    /// Human-readable content, e.g. "Alice created a new customer (#42)."
    pub fn content(notification: &Notification, actor_name: Option<&str>) -> String {
        let kind = notification.notification_type;
        let noun = kind.resource().noun();
        let actor = actor_name.unwrap_or(SYSTEM_ACTOR);
        let reference = notification
            .resource_ids
            .first()
            .map(|id| format!(" #{id}"))
            .unwrap_or_default();

        match kind.action() {
            NotificationAction::Creation => match notification.resource_ids.first() {
                Some(id) => format!("{actor} created a new {noun} (#{id})."),
                None => format!("{actor} created a new {noun}."),
            },
            NotificationAction::Modification => format!("{actor} updated {noun}{reference}."),
            NotificationAction::Deletion => format!("{actor} deleted {noun}{reference}."),
            NotificationAction::Birthday => {
                format!("Today is the birthday of {noun}{reference}.")
            }
            NotificationAction::JoiningDateAnniversary => {
                format!("Today is the joining date anniversary of {noun}{reference}.")
            }
        }
    }

    /// Relative time between emission and `now`: "just now", "5 minutes ago",
    /// "1 day ago", and so on. Months are 30 days and years 365 days.
    pub fn emitted_delta_text(created_at: DateTime<Utc>, now: DateTime<Utc>) -> String {
        let delta = now.signed_duration_since(created_at);
        let minutes = delta.num_minutes();
        if minutes < 1 {
            return "just now".to_string();
        }

        let hours = delta.num_hours();
        let days = delta.num_days();
        let (amount, unit) = if hours < 1 {
            (minutes, "minute")
        } else if days < 1 {
            (hours, "hour")
        } else if days < 30 {
            (days, "day")
        } else if days < 365 {
            (days / 30, "month")
        } else {
            (days / 365, "year")
        };

        if amount == 1 {
            format!("1 {unit} ago")
        } else {
            format!("{amount} {unit}s ago")
        }
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;
    use natsinternal_core::types::{NotificationId, UserId};
    use natsinternal_entity::notification::NotificationType;

    use super::*;

    fn notification(kind: NotificationType, resource_ids: Vec<i32>) -> Notification {
        Notification {
            id: NotificationId::new(1),
            notification_type: kind,
            resource_ids,
            created_user_id: Some(UserId::new(3)),
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_content_per_action() {
        let created = notification(NotificationType::CustomerCreation, vec![42]);
        assert_eq!(
            NotificationFormatter::content(&created, Some("Alice")),
            "Alice created a new customer (#42)."
        );

        let updated = notification(NotificationType::DebtPaymentModification, vec![8, 42]);
        assert_eq!(
            NotificationFormatter::content(&updated, Some("Bob")),
            "Bob updated debt payment #8."
        );

        let deleted = notification(NotificationType::ProductCategoryDeletion, vec![]);
        assert_eq!(
            NotificationFormatter::content(&deleted, None),
            "The system deleted product category."
        );

        let birthday = notification(NotificationType::UserBirthday, vec![12]);
        assert_eq!(
            NotificationFormatter::content(&birthday, None),
            "Today is the birthday of user #12."
        );
    }

    #[test]
    fn test_emitted_delta_text() {
        let now = Utc::now();
        let ago = |delta: Duration| NotificationFormatter::emitted_delta_text(now - delta, now);

        assert_eq!(ago(Duration::seconds(0)), "just now");
        assert_eq!(ago(Duration::seconds(59)), "just now");
        assert_eq!(ago(Duration::minutes(1)), "1 minute ago");
        assert_eq!(ago(Duration::minutes(45)), "45 minutes ago");
        assert_eq!(ago(Duration::hours(1)), "1 hour ago");
        assert_eq!(ago(Duration::hours(23)), "23 hours ago");
        assert_eq!(ago(Duration::days(2)), "2 days ago");
        assert_eq!(ago(Duration::days(65)), "2 months ago");
        assert_eq!(ago(Duration::days(800)), "2 years ago");
    }

    #[test]
    fn test_future_timestamps_read_as_just_now() {
        let now = Utc::now();
        let text = NotificationFormatter::emitted_delta_text(now + Duration::minutes(5), now);
        assert_eq!(text, "just now");
    }
}
