//! In-memory user directory.

use std::collections::HashSet;

use async_trait::async_trait;
use dashmap::DashMap;

use natsinternal_core::config::MemoryUserSeed;
use natsinternal_core::error::AppError;
use natsinternal_core::result::AppResult;
use natsinternal_core::types::UserId;
use natsinternal_entity::user::{Permission, User};

use crate::repositories::UserDirectory;

/// User directory kept in process memory. Permissions are held per user.
#[derive(Debug, Default)]
pub struct MemoryUserDirectory {
    users: DashMap<UserId, (User, HashSet<Permission>)>,
}

impl MemoryUserDirectory {
    /// Create an empty directory.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a directory from configured seed users. An unknown permission
    /// name is a configuration error.
    pub fn from_seeds(seeds: &[MemoryUserSeed]) -> AppResult<Self> {
        let directory = Self::new();
        for seed in seeds {
            let permissions = seed
                .permissions
                .iter()
                .map(|name| {
                    name.parse::<Permission>().map_err(|_| {
                        AppError::configuration(format!(
                            "database.memory_users: user {} has unknown permission '{name}'",
                            seed.id
                        ))
                    })
                })
                .collect::<AppResult<Vec<_>>>()?;

            let display_name = if seed.display_name.is_empty() {
                seed.user_name.clone()
            } else {
                seed.display_name.clone()
            };
            directory.insert(
                User {
                    id: UserId::new(seed.id),
                    user_name: seed.user_name.clone(),
                    display_name,
                    is_deleted: false,
                },
                permissions,
            );
        }
        Ok(directory)
    }

    /// Add or replace a user together with the permissions granted to them.
    pub fn insert(&self, user: User, permissions: impl IntoIterator<Item = Permission>) {
        self.users
            .insert(user.id, (user, permissions.into_iter().collect()));
    }

    fn sorted_ids(&self, keep: impl Fn(&User, &HashSet<Permission>) -> bool) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self
            .users
            .iter()
            .filter(|entry| {
                let (user, permissions) = entry.value();
                user.is_active() && keep(user, permissions)
            })
            .map(|entry| *entry.key())
            .collect();
        ids.sort();
        ids
    }
}

#[async_trait]
impl UserDirectory for MemoryUserDirectory {
    async fn find_by_id(&self, id: UserId) -> AppResult<Option<User>> {
        Ok(self.users.get(&id).map(|entry| entry.value().0.clone()))
    }

    async fn find_active_ids(&self) -> AppResult<Vec<UserId>> {
        Ok(self.sorted_ids(|_, _| true))
    }

    async fn find_ids_with_permission(&self, permission: Permission) -> AppResult<Vec<UserId>> {
        Ok(self.sorted_ids(|_, permissions| permissions.contains(&permission)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user(id: i32, deleted: bool) -> User {
        User {
            id: UserId::new(id),
            user_name: format!("user{id}"),
            display_name: format!("User {id}"),
            is_deleted: deleted,
        }
    }

    #[tokio::test]
    async fn test_permission_lookup_skips_deleted_users() {
        let directory = MemoryUserDirectory::new();
        directory.insert(user(9, false), [Permission::GetCustomerDetail]);
        directory.insert(user(7, false), [Permission::GetCustomerDetail, Permission::GetOrderDetail]);
        directory.insert(user(8, true), [Permission::GetCustomerDetail]);
        directory.insert(user(5, false), []);

        assert_eq!(
            directory
                .find_ids_with_permission(Permission::GetCustomerDetail)
                .await
                .unwrap(),
            vec![UserId::new(7), UserId::new(9)]
        );
        assert_eq!(
            directory.find_active_ids().await.unwrap(),
            vec![UserId::new(5), UserId::new(7), UserId::new(9)]
        );
        assert!(directory.find_by_id(UserId::new(8)).await.unwrap().is_some());
    }
}
