//! Connection pool: tracks all active connections indexed by user ID.

use std::sync::Arc;

use dashmap::DashMap;

use natsinternal_core::types::UserId;

use super::handle::{ConnectionHandle, ConnectionId};

/// Thread-safe pool of all active hub connections.
#[derive(Debug, Default)]
pub struct ConnectionPool {
    /// User ID → connection handles, oldest first (one user can have several).
    by_user: DashMap<UserId, Vec<Arc<ConnectionHandle>>>,
    /// Connection ID → connection handle for direct lookup.
    by_id: DashMap<ConnectionId, Arc<ConnectionHandle>>,
}

impl ConnectionPool {
    /// Creates a new empty connection pool.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a connection, evicting the user's oldest one when they already
    /// hold `max_per_user`. The check and the insert happen under the user's
    /// entry lock, so concurrent adds for one user cannot exceed the limit.
    pub fn add(
        &self,
        handle: Arc<ConnectionHandle>,
        max_per_user: usize,
    ) -> Option<Arc<ConnectionHandle>> {
        let mut connections = self.by_user.entry(handle.user_id).or_default();

        let evicted = if connections.len() >= max_per_user.max(1) {
            let oldest = connections.remove(0);
            self.by_id.remove(&oldest.id);
            Some(oldest)
        } else {
            None
        };

        self.by_id.insert(handle.id, handle.clone());
        connections.push(handle);
        evicted
    }

    /// Removes a connection from the pool.
    pub fn remove(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        let (_, handle) = self.by_id.remove(conn_id)?;
        self.by_user.remove_if_mut(&handle.user_id, |_, connections| {
            connections.retain(|c| c.id != *conn_id);
            connections.is_empty()
        });
        Some(handle)
    }

    /// Gets all connections for a user, oldest first.
    pub fn get_user_connections(&self, user_id: UserId) -> Vec<Arc<ConnectionHandle>> {
        self.by_user
            .get(&user_id)
            .map(|entry| entry.value().clone())
            .unwrap_or_default()
    }

    /// Gets a specific connection by ID.
    pub fn get(&self, conn_id: &ConnectionId) -> Option<Arc<ConnectionHandle>> {
        self.by_id.get(conn_id).map(|entry| entry.value().clone())
    }

    /// Returns total number of active connections.
    pub fn connection_count(&self) -> usize {
        self.by_id.len()
    }

    /// Returns number of unique connected users.
    pub fn user_count(&self) -> usize {
        self.by_user.len()
    }

    /// Returns all connection handles.
    pub fn all_connections(&self) -> Vec<Arc<ConnectionHandle>> {
        self.by_id
            .iter()
            .map(|entry| entry.value().clone())
            .collect()
    }

    /// Returns all connected user IDs, ascending.
    pub fn connected_user_ids(&self) -> Vec<UserId> {
        let mut ids: Vec<UserId> = self.by_user.iter().map(|entry| *entry.key()).collect();
        ids.sort();
        ids
    }
}

#[cfg(test)]
mod tests {
    use tokio::sync::mpsc;

    use super::*;

    fn handle(user: i32) -> Arc<ConnectionHandle> {
        let (tx, _rx) = mpsc::channel(1);
        Arc::new(ConnectionHandle::new(UserId::new(user), format!("user{user}"), tx))
    }

    #[test]
    fn test_indexes_stay_in_sync() {
        let pool = ConnectionPool::new();
        let first = handle(7);
        let second = handle(7);
        let other = handle(9);
        assert!(pool.add(first.clone(), 5).is_none());
        assert!(pool.add(second.clone(), 5).is_none());
        assert!(pool.add(other.clone(), 5).is_none());

        assert_eq!(pool.connection_count(), 3);
        assert_eq!(pool.user_count(), 2);
        assert_eq!(pool.get_user_connections(UserId::new(7)).len(), 2);

        pool.remove(&first.id);
        assert_eq!(pool.get_user_connections(UserId::new(7))[0].id, second.id);

        pool.remove(&second.id);
        assert_eq!(pool.connected_user_ids(), vec![UserId::new(9)]);
        assert!(pool.remove(&second.id).is_none());
        assert_eq!(pool.connection_count(), 1);
        assert!(pool.get(&other.id).is_some());
    }

    #[test]
    fn test_add_evicts_oldest_at_limit() {
        let pool = ConnectionPool::new();
        let first = handle(7);
        let second = handle(7);
        pool.add(first.clone(), 2);
        pool.add(second.clone(), 2);

        let third = handle(7);
        let evicted = pool.add(third.clone(), 2).expect("oldest is evicted");
        assert_eq!(evicted.id, first.id);
        assert!(pool.get(&first.id).is_none());
        let ids: Vec<_> = pool
            .get_user_connections(UserId::new(7))
            .iter()
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![second.id, third.id]);
    }

    #[test]
    fn test_concurrent_adds_respect_limit() {
        let pool = Arc::new(ConnectionPool::new());
        let threads: Vec<_> = (0..8)
            .map(|_| {
                let pool = pool.clone();
                std::thread::spawn(move || {
                    for _ in 0..50 {
                        pool.add(handle(7), 3);
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        assert_eq!(pool.get_user_connections(UserId::new(7)).len(), 3);
        assert_eq!(pool.connection_count(), 3);
    }
}
