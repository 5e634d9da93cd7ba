//! In-memory notification repository.

use std::collections::BTreeMap;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;

use natsinternal_core::result::AppResult;
use natsinternal_core::types::{NotificationId, PageRequest, PageResponse, UserId};
use natsinternal_entity::notification::{
    NewNotification, Notification, NotificationReceipt, ReceivedNotification,
};

use crate::repositories::NotificationRepository;

#[derive(Debug, Default)]
struct State {
    last_id: i32,
    notifications: BTreeMap<NotificationId, Notification>,
    /// (notification, recipient) → read time.
    receipts: BTreeMap<(NotificationId, UserId), Option<DateTime<Utc>>>,
}

/// Notification repository kept in process memory.
#[derive(Debug, Default)]
pub struct MemoryNotificationRepository {
    state: RwLock<State>,
}

impl MemoryNotificationRepository {
    /// Create an empty repository.
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl NotificationRepository for MemoryNotificationRepository {
    async fn insert(
        &self,
        notification: &NewNotification,
        recipients: &[UserId],
    ) -> AppResult<Notification> {
        let mut state = self.state.write().await;
        state.last_id += 1;
        let created = notification
            .clone()
            .into_notification(NotificationId::new(state.last_id));

        state.notifications.insert(created.id, created.clone());
        for user_id in recipients {
            state.receipts.insert((created.id, *user_id), None);
        }

        Ok(created)
    }

    async fn find_by_id(&self, id: NotificationId) -> AppResult<Option<Notification>> {
        Ok(self.state.read().await.notifications.get(&id).cloned())
    }

    async fn find_receipt(
        &self,
        id: NotificationId,
        user_id: UserId,
    ) -> AppResult<Option<NotificationReceipt>> {
        let state = self.state.read().await;
        Ok(state
            .receipts
            .get(&(id, user_id))
            .map(|read_at| NotificationReceipt {
                notification_id: id,
                user_id,
                read_at: *read_at,
            }))
    }

    async fn find_for_user(
        &self,
        user_id: UserId,
        page: &PageRequest,
    ) -> AppResult<PageResponse<ReceivedNotification>> {
        let state = self.state.read().await;

        let mut received: Vec<ReceivedNotification> = state
            .receipts
            .iter()
            .filter(|((_, recipient), _)| *recipient == user_id)
            .filter_map(|((id, _), read_at)| {
                state
                    .notifications
                    .get(id)
                    .map(|notification| ReceivedNotification {
                        notification: notification.clone(),
                        read_at: *read_at,
                    })
            })
            .collect();

        received.sort_by(|a, b| {
            b.notification
                .created_at
                .cmp(&a.notification.created_at)
                .then(b.notification.id.cmp(&a.notification.id))
        });

        let total = received.len() as u64;
        let items = received
            .into_iter()
            .skip(usize::try_from(page.offset()).unwrap_or(usize::MAX))
            .take(page.limit() as usize)
            .collect();

        Ok(PageResponse::new(items, page.page, page.page_size, total))
    }

    async fn count_unread(&self, user_id: UserId) -> AppResult<i64> {
        let state = self.state.read().await;
        Ok(state
            .receipts
            .iter()
            .filter(|((_, recipient), read_at)| *recipient == user_id && read_at.is_none())
            .count() as i64)
    }

    async fn mark_read(
        &self,
        id: NotificationId,
        user_id: UserId,
        at: DateTime<Utc>,
    ) -> AppResult<bool> {
        let mut state = self.state.write().await;
        match state.receipts.get_mut(&(id, user_id)) {
            Some(read_at) => {
                read_at.get_or_insert(at);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn mark_all_read(&self, user_id: UserId, at: DateTime<Utc>) -> AppResult<u64> {
        let mut state = self.state.write().await;
        let mut changed = 0;
        for ((_, recipient), read_at) in state.receipts.iter_mut() {
            if *recipient == user_id && read_at.is_none() {
                *read_at = Some(at);
                changed += 1;
            }
        }
        Ok(changed)
    }

    async fn recipients_of(&self, id: NotificationId) -> AppResult<Vec<UserId>> {
        let state = self.state.read().await;
        Ok(state
            .receipts
            .keys()
            .filter(|(notification_id, _)| *notification_id == id)
            .map(|(_, user_id)| *user_id)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use chrono::Duration;

    use natsinternal_entity::notification::NotificationType;

    use super::*;

    fn new_notification(kind: NotificationType, at: DateTime<Utc>) -> NewNotification {
        NewNotification {
            notification_type: kind,
            resource_ids: vec![42],
            created_user_id: Some(UserId::new(1)),
            created_at: at,
        }
    }

    #[tokio::test]
    async fn test_insert_assigns_sequential_ids_and_receipts() {
        let repo = MemoryNotificationRepository::new();
        let now = Utc::now();

        let first = repo
            .insert(
                &new_notification(NotificationType::CustomerCreation, now),
                &[UserId::new(9), UserId::new(7)],
            )
            .await
            .unwrap();
        let second = repo
            .insert(&new_notification(NotificationType::OrderCreation, now), &[])
            .await
            .unwrap();

        assert_eq!(first.id, NotificationId::new(1));
        assert_eq!(second.id, NotificationId::new(2));
        assert_eq!(
            repo.recipients_of(first.id).await.unwrap(),
            vec![UserId::new(7), UserId::new(9)]
        );
        assert!(repo.recipients_of(second.id).await.unwrap().is_empty());
        assert_eq!(repo.find_by_id(first.id).await.unwrap(), Some(first));
    }

    #[tokio::test]
    async fn test_read_state_is_per_recipient() {
        let repo = MemoryNotificationRepository::new();
        let now = Utc::now();
        let created = repo
            .insert(
                &new_notification(NotificationType::SupplyCreation, now),
                &[UserId::new(7), UserId::new(9)],
            )
            .await
            .unwrap();

        assert!(repo.mark_read(created.id, UserId::new(7), now).await.unwrap());
        assert!(!repo.mark_read(created.id, UserId::new(8), now).await.unwrap());

        let seven = repo.find_receipt(created.id, UserId::new(7)).await.unwrap().unwrap();
        let nine = repo.find_receipt(created.id, UserId::new(9)).await.unwrap().unwrap();
        assert!(seven.is_read());
        assert!(!nine.is_read());
        assert_eq!(repo.count_unread(UserId::new(9)).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_mark_read_keeps_first_read_time() {
        let repo = MemoryNotificationRepository::new();
        let now = Utc::now();
        let created = repo
            .insert(
                &new_notification(NotificationType::ExpenseCreation, now),
                &[UserId::new(3)],
            )
            .await
            .unwrap();

        repo.mark_read(created.id, UserId::new(3), now).await.unwrap();
        repo.mark_read(created.id, UserId::new(3), now + Duration::hours(1))
            .await
            .unwrap();

        let receipt = repo.find_receipt(created.id, UserId::new(3)).await.unwrap().unwrap();
        assert_eq!(receipt.read_at, Some(now));
    }

    #[tokio::test]
    async fn test_find_for_user_is_newest_first_and_paged() {
        let repo = MemoryNotificationRepository::new();
        let base = Utc::now();
        for minutes in 0..5 {
            repo.insert(
                &new_notification(NotificationType::OrderCreation, base + Duration::minutes(minutes)),
                &[UserId::new(4)],
            )
            .await
            .unwrap();
        }

        let page = repo
            .find_for_user(UserId::new(4), &PageRequest::new(1, 2))
            .await
            .unwrap();
        assert_eq!(page.total_items, 5);
        assert_eq!(page.total_pages, 3);
        let ids: Vec<i32> = page.items.iter().map(|r| r.notification.id.value()).collect();
        assert_eq!(ids, vec![5, 4]);

        let changed = repo.mark_all_read(UserId::new(4), base).await.unwrap();
        assert_eq!(changed, 5);
        assert_eq!(repo.count_unread(UserId::new(4)).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_page_beyond_the_end_is_empty() {
        let repo = MemoryNotificationRepository::new();
        repo.insert(
            &new_notification(NotificationType::OrderCreation, Utc::now()),
            &[UserId::new(4)],
        )
        .await
        .unwrap();

        let page = repo
            .find_for_user(UserId::new(4), &PageRequest::new(u64::MAX, 50))
            .await
            .unwrap();
        assert!(page.items.is_empty());
        assert_eq!(page.total_items, 1);
        assert!(!page.has_next);
    }
}
