//! Notifier: persists a notification, then pushes it to its recipients.

use std::sync::Arc;

use futures::future::join_all;
use serde::{Deserialize, Serialize};
use tokio::task::JoinHandle;
use tracing::{error, info, warn};

use natsinternal_core::result::AppResult;
use natsinternal_core::types::{NotificationId, UserId};
use natsinternal_entity::notification::{NotificationEvent, NotificationType};
use natsinternal_service::notification::NotificationStore;

use crate::message::types::OutboundMessage;

use super::transport::{DeliveryReport, PushTransport};

/// What a completed notify call did.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotifyOutcome {
    /// The persisted notification.
    pub notification_id: NotificationId,
    /// Users it was addressed to.
    pub recipient_ids: Vec<UserId>,
    /// Live connections the view was queued on.
    pub delivered_connections: usize,
}

/// Orchestrates create → fetch → deliver for domain events.
///
/// Delivery happens strictly after the notification is persisted, so a
/// client never receives a push for a notification it cannot query. When
/// creating or fetching fails nothing is pushed. Individual push failures
/// are logged and never retried.
#[derive(Debug, Clone)]
pub struct Notifier {
    store: Arc<dyn NotificationStore>,
    transport: Arc<dyn PushTransport>,
}

impl Notifier {
    /// Creates a notifier over a store and a transport.
    pub fn new(store: Arc<dyn NotificationStore>, transport: Arc<dyn PushTransport>) -> Self {
        Self { store, transport }
    }

    /// Notifies about an event that has no acting user.
    pub async fn notify(
        &self,
        kind: NotificationType,
        resource_ids: impl Into<Vec<i32>>,
    ) -> AppResult<NotifyOutcome> {
        self.notify_event(&NotificationEvent::new(kind, resource_ids))
            .await
    }

    /// Persists the notification of an event and pushes its view to every
    /// live connection of each recipient.
    pub async fn notify_event(&self, event: &NotificationEvent) -> AppResult<NotifyOutcome> {
        let created = self.store.create(event).await?;
        let view = self.store.get_single(created.notification_id).await?;
        let message = OutboundMessage::NotificationDistributed(view);

        let reports = join_all(
            created
                .recipient_ids
                .iter()
                .map(|user_id| self.transport.send_to_user(*user_id, &message)),
        )
        .await;

        let mut total = DeliveryReport::default();
        for report in reports {
            total += report;
        }

        if total.failed > 0 {
            warn!(
                notification_id = %created.notification_id,
                failed = total.failed,
                "Some notification pushes failed"
            );
        }

        info!(
            notification_id = %created.notification_id,
            notification_type = %event.kind,
            recipients = created.recipient_ids.len(),
            delivered = total.delivered,
            "Notification distributed"
        );

        Ok(NotifyOutcome {
            notification_id: created.notification_id,
            recipient_ids: created.recipient_ids,
            delivered_connections: total.delivered,
        })
    }

    /// Runs [`Notifier::notify_event`] on a background task. Failures are
    /// logged only.
    pub fn spawn_notify(&self, event: NotificationEvent) -> JoinHandle<()> {
        let notifier = self.clone();
        tokio::spawn(async move {
            if let Err(e) = notifier.notify_event(&event).await {
                error!(
                    notification_type = %event.kind,
                    error = %e,
                    "Failed to distribute notification"
                );
            }
        })
    }
}
