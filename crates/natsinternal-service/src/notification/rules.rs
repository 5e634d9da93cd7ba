//! Notification recipient rules: determines who should receive which notifications.
//!
//! Each [`NotificationType`] is mapped to one [`RecipientResolver`] through a
//! lookup table. Supporting a new type means registering a resolver for it.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use tracing::debug;

use natsinternal_core::error::AppError;
use natsinternal_core::result::AppResult;
use natsinternal_core::types::UserId;
use natsinternal_database::repositories::UserDirectory;
use natsinternal_entity::notification::{NotificationEvent, NotificationType};
use natsinternal_entity::user::Permission;

/// Policy that maps an event to the users who should be notified.
///
/// Implementations return active users only. Duplicates and ordering are
/// handled by [`NotificationRules`].
#[async_trait]
pub trait RecipientResolver: Send + Sync + fmt::Debug {
    /// Resolve the candidate recipients of an event.
    async fn resolve(
        &self,
        event: &NotificationEvent,
        users: &dyn UserDirectory,
    ) -> AppResult<Vec<UserId>>;
}

/// Every active user holding a permission.
#[derive(Debug, Clone, Copy)]
pub struct PermissionHolders(pub Permission);

#[async_trait]
impl RecipientResolver for PermissionHolders {
    async fn resolve(
        &self,
        _event: &NotificationEvent,
        users: &dyn UserDirectory,
    ) -> AppResult<Vec<UserId>> {
        users.find_ids_with_permission(self.0).await
    }
}

/// Every active user.
#[derive(Debug, Clone, Copy)]
pub struct AllActiveUsers;

#[async_trait]
impl RecipientResolver for AllActiveUsers {
    async fn resolve(
        &self,
        _event: &NotificationEvent,
        users: &dyn UserDirectory,
    ) -> AppResult<Vec<UserId>> {
        users.find_active_ids().await
    }
}

/// Permission holders plus the user the event is about (the first resource id).
#[derive(Debug, Clone, Copy)]
pub struct PermissionHoldersAndSubject(pub Permission);

#[async_trait]
impl RecipientResolver for PermissionHoldersAndSubject {
    async fn resolve(
        &self,
        event: &NotificationEvent,
        users: &dyn UserDirectory,
    ) -> AppResult<Vec<UserId>> {
        let mut recipients = users.find_ids_with_permission(self.0).await?;

        if let Some(subject_id) = event.primary_resource_id().map(UserId::new) {
            let subject = users.find_by_id(subject_id).await?;
            if subject.is_some_and(|user| user.is_active()) {
                recipients.push(subject_id);
            }
        }

        Ok(recipients)
    }
}

/// Resolves which users should receive the notification of an event.
#[derive(Debug, Clone)]
pub struct NotificationRules {
    /// User and permission lookups.
    users: Arc<dyn UserDirectory>,
    /// Resolver per notification type.
    resolvers: HashMap<NotificationType, Arc<dyn RecipientResolver>>,
    /// Whether the acting user is left out of the recipients.
    exclude_actor: bool,
}

impl NotificationRules {
    /// Creates a rules table with no resolvers registered.
    pub fn new(users: Arc<dyn UserDirectory>, exclude_actor: bool) -> Self {
        Self {
            users,
            resolvers: HashMap::new(),
            exclude_actor,
        }
    }

    /// Creates a rules table with the default resolver for every type.
    pub fn with_defaults(users: Arc<dyn UserDirectory>, exclude_actor: bool) -> Self {
        let mut rules = Self::new(users, exclude_actor);
        for kind in NotificationType::ALL {
            rules.register(*kind, default_resolver(*kind));
        }
        rules
    }

    /// Registers (or replaces) the resolver of a notification type.
    pub fn register(
        &mut self,
        kind: NotificationType,
        resolver: Arc<dyn RecipientResolver>,
    ) -> &mut Self {
        self.resolvers.insert(kind, resolver);
        self
    }

    /// Whether a resolver is registered for a type.
    pub fn supports(&self, kind: NotificationType) -> bool {
        self.resolvers.contains_key(&kind)
    }

    /// Resolves the recipients of an event: duplicate-free, ascending, and
    /// without the actor when actor exclusion is enabled.
    pub async fn resolve(&self, event: &NotificationEvent) -> AppResult<Vec<UserId>> {
        let resolver = self.resolvers.get(&event.kind).ok_or_else(|| {
            AppError::validation(format!(
                "No recipient rule registered for notification type '{}'",
                event.kind
            ))
        })?;

        let mut recipients: BTreeSet<UserId> = resolver
            .resolve(event, self.users.as_ref())
            .await?
            .into_iter()
            .collect();

        if self.exclude_actor {
            if let Some(actor_id) = event.actor_id {
                recipients.remove(&actor_id);
            }
        }

        debug!(
            notification_type = %event.kind,
            recipients = recipients.len(),
            "Resolved notification recipients"
        );

        Ok(recipients.into_iter().collect())
    }
}

/// The default policy of a notification type.
pub fn default_resolver(kind: NotificationType) -> Arc<dyn RecipientResolver> {
    let permission = Permission::to_view(kind.resource());
    match kind {
        NotificationType::UserBirthday | NotificationType::UserJoiningDateAnniversary => {
            Arc::new(AllActiveUsers)
        }
        NotificationType::UserCreation | NotificationType::UserModification => {
            Arc::new(PermissionHoldersAndSubject(permission))
        }
        _ => Arc::new(PermissionHolders(permission)),
    }
}

#[cfg(test)]
mod tests {
    use natsinternal_core::error::ErrorKind;
    use natsinternal_database::memory::MemoryUserDirectory;
    use natsinternal_entity::user::User;

    use super::*;

    fn user(id: i32, deleted: bool) -> User {
        User {
            id: UserId::new(id),
            user_name: format!("user{id}"),
            display_name: String::new(),
            is_deleted: deleted,
        }
    }

    fn directory() -> Arc<MemoryUserDirectory> {
        let directory = MemoryUserDirectory::new();
        directory.insert(user(3, false), [Permission::GetCustomerDetail]);
        directory.insert(user(7, false), [Permission::GetCustomerDetail]);
        directory.insert(user(9, false), [Permission::GetCustomerDetail, Permission::GetUserDetail]);
        directory.insert(user(11, true), [Permission::GetCustomerDetail]);
        directory.insert(user(12, false), []);
        directory.insert(user(13, true), []);
        Arc::new(directory)
    }

    fn ids(raw: &[i32]) -> Vec<UserId> {
        raw.iter().copied().map(UserId::new).collect()
    }

    #[tokio::test]
    async fn test_resource_events_go_to_permission_holders_except_actor() {
        let rules = NotificationRules::with_defaults(directory(), true);
        let event = NotificationEvent::new(NotificationType::CustomerCreation, [42]).by(UserId::new(3));

        assert_eq!(rules.resolve(&event).await.unwrap(), ids(&[7, 9]));
    }

    #[tokio::test]
    async fn test_actor_kept_when_exclusion_disabled() {
        let rules = NotificationRules::with_defaults(directory(), false);
        let event = NotificationEvent::new(NotificationType::CustomerCreation, [42]).by(UserId::new(3));

        assert_eq!(rules.resolve(&event).await.unwrap(), ids(&[3, 7, 9]));
    }

    #[tokio::test]
    async fn test_birthday_goes_to_every_active_user() {
        let rules = NotificationRules::with_defaults(directory(), true);
        let event = NotificationEvent::new(NotificationType::UserBirthday, [12]);

        assert_eq!(rules.resolve(&event).await.unwrap(), ids(&[3, 7, 9, 12]));
    }

    #[tokio::test]
    async fn test_user_modification_includes_active_subject_once() {
        let rules = NotificationRules::with_defaults(directory(), true);

        let event = NotificationEvent::new(NotificationType::UserModification, [12]);
        assert_eq!(rules.resolve(&event).await.unwrap(), ids(&[9, 12]));

        let event = NotificationEvent::new(NotificationType::UserModification, [9]);
        assert_eq!(rules.resolve(&event).await.unwrap(), ids(&[9]));

        let event = NotificationEvent::new(NotificationType::UserModification, [13]);
        assert_eq!(rules.resolve(&event).await.unwrap(), ids(&[9]));
    }

    #[tokio::test]
    async fn test_unregistered_type_is_rejected() {
        let rules = NotificationRules::new(directory(), true);
        let event = NotificationEvent::new(NotificationType::OrderDeletion, [1]);

        let err = rules.resolve(&event).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::Validation);
    }

    #[tokio::test]
    async fn test_registered_resolver_replaces_default() {
        #[derive(Debug)]
        struct Fixed;

        #[async_trait]
        impl RecipientResolver for Fixed {
            async fn resolve(
                &self,
                _event: &NotificationEvent,
                _users: &dyn UserDirectory,
            ) -> AppResult<Vec<UserId>> {
                Ok(ids(&[5, 2, 5, 2]))
            }
        }

        let mut rules = NotificationRules::with_defaults(directory(), true);
        rules.register(NotificationType::ExpenseCreation, Arc::new(Fixed));
        assert!(rules.supports(NotificationType::ExpenseCreation));

        let event = NotificationEvent::new(NotificationType::ExpenseCreation, [1]);
        assert_eq!(rules.resolve(&event).await.unwrap(), ids(&[2, 5]));
    }
}
