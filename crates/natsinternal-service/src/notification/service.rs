//! Notification creation and recipient-facing queries.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use chrono::Utc;
use tracing::info;

use natsinternal_core::config::NotificationsConfig;
use natsinternal_core::error::AppError;
use natsinternal_core::result::AppResult;
use natsinternal_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use natsinternal_database::DatabaseProvider;
use natsinternal_database::repositories::{NotificationRepository, UserDirectory};
use natsinternal_entity::notification::{Notification, NotificationEvent, NotificationView};

use super::factory::NotificationFactory;
use super::formatter::NotificationFormatter;
use super::rules::NotificationRules;
use super::store::{CreatedNotification, NotificationStore};
use crate::context::RequestContext;

/// Creates notifications and serves them to their recipients.
#[derive(Debug, Clone)]
pub struct NotificationService {
    /// Notification repository.
    notifications: Arc<dyn NotificationRepository>,
    /// User lookups for actor names.
    users: Arc<dyn UserDirectory>,
    /// Recipient rules.
    rules: Arc<NotificationRules>,
    /// Record factory.
    factory: NotificationFactory,
}

impl NotificationService {
    /// Creates a new notification service.
    pub fn new(
        notifications: Arc<dyn NotificationRepository>,
        users: Arc<dyn UserDirectory>,
        rules: NotificationRules,
    ) -> Self {
        Self {
            notifications,
            users,
            rules: Arc::new(rules),
            factory: NotificationFactory::new(),
        }
    }

    /// Creates a service over the configured provider with the default rules.
    pub fn from_provider(provider: &DatabaseProvider, config: &NotificationsConfig) -> Self {
        let rules = NotificationRules::with_defaults(provider.users.clone(), config.exclude_actor);
        Self::new(provider.notifications.clone(), provider.users.clone(), rules)
    }

    /// Lists the current user's notifications, newest first.
    pub async fn list_notifications(
        &self,
        ctx: &RequestContext,
        page: PageRequest,
    ) -> AppResult<PageResponse<NotificationView>> {
        let received = self.notifications.find_for_user(ctx.user_id, &page).await?;

        let mut actor_names: HashMap<UserId, String> = HashMap::new();
        for item in &received.items {
            let Some(actor_id) = item.notification.created_user_id else {
                continue;
            };
            if actor_names.contains_key(&actor_id) {
                continue;
            }
            if let Some(name) = self.actor_name(Some(actor_id)).await? {
                actor_names.insert(actor_id, name);
            }
        }

        let now = Utc::now();
        Ok(received.map(|item| {
            let actor_name = item
                .notification
                .created_user_id
                .and_then(|id| actor_names.get(&id))
                .map(String::as_str);
            NotificationFormatter::view(&item.notification, actor_name, item.is_read(), now)
        }))
    }

    /// Gets one notification as seen by the current user. Not-found when the
    /// user is not a recipient.
    pub async fn get_single_for(
        &self,
        ctx: &RequestContext,
        id: NotificationId,
    ) -> AppResult<NotificationView> {
        let receipt = self
            .notifications
            .find_receipt(id, ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))?;

        let notification = self.find_notification(id).await?;
        self.render(&notification, receipt.is_read()).await
    }

    /// Gets the unread notification count.
    pub async fn unread_count(&self, ctx: &RequestContext) -> AppResult<i64> {
        self.notifications.count_unread(ctx.user_id).await
    }

    /// Marks a notification as read. Reading twice keeps the first read time.
    pub async fn mark_read(&self, ctx: &RequestContext, id: NotificationId) -> AppResult<()> {
        let marked = self
            .notifications
            .mark_read(id, ctx.user_id, Utc::now())
            .await?;
        if !marked {
            return Err(AppError::not_found(format!("Notification {id} not found")));
        }
        Ok(())
    }

    /// Marks all notifications as read for the current user.
    pub async fn mark_all_read(&self, ctx: &RequestContext) -> AppResult<u64> {
        let count = self
            .notifications
            .mark_all_read(ctx.user_id, Utc::now())
            .await?;
        info!(user_id = %ctx.user_id, count, "Marked all notifications read");
        Ok(count)
    }

    /// Recipients of a notification, ascending.
    pub async fn recipients_of(&self, id: NotificationId) -> AppResult<Vec<UserId>> {
        self.notifications.recipients_of(id).await
    }

    async fn find_notification(&self, id: NotificationId) -> AppResult<Notification> {
        self.notifications
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Notification {id} not found")))
    }

    async fn actor_name(&self, actor_id: Option<UserId>) -> AppResult<Option<String>> {
        let Some(actor_id) = actor_id else {
            return Ok(None);
        };
        Ok(self
            .users
            .find_by_id(actor_id)
            .await?
            .map(|user| user.name_for_display().to_string()))
    }

    async fn render(&self, notification: &Notification, is_read: bool) -> AppResult<NotificationView> {
        let actor_name = self.actor_name(notification.created_user_id).await?;
        Ok(NotificationFormatter::view(
            notification,
            actor_name.as_deref(),
            is_read,
            Utc::now(),
        ))
    }
}

#[async_trait]
impl NotificationStore for NotificationService {
    async fn create(&self, event: &NotificationEvent) -> AppResult<CreatedNotification> {
        let recipient_ids = self.rules.resolve(event).await?;
        let record = self.factory.build(event);
        let notification = self.notifications.insert(&record, &recipient_ids).await?;

        info!(
            notification_id = %notification.id,
            notification_type = %notification.notification_type,
            recipients = recipient_ids.len(),
            "Notification created"
        );

        Ok(CreatedNotification {
            notification_id: notification.id,
            recipient_ids,
        })
    }

    async fn get_single(&self, id: NotificationId) -> AppResult<NotificationView> {
        let notification = self.find_notification(id).await?;
        self.render(&notification, false).await
    }
}
