//! Per-user session table: which step each user is on, plus one async lock per active user.
//!
//! Handling for one user is serialized through that user's lock so two quick messages cannot race
//! on the same session; different users never wait on each other.

use dashmap::DashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, OwnedMutexGuard};
use tracing::trace;

#[derive(Default)]
pub(crate) struct SessionTable {
    current: DashMap<i64, String>,
    locks: DashMap<i64, Arc<Mutex<()>>>,
}

impl SessionTable {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Name of the step the user is on, if a session exists.
    pub(crate) fn current(&self, user_id: i64) -> Option<String> {
        self.current.get(&user_id).map(|entry| entry.value().clone())
    }

    pub(crate) fn set(&self, user_id: i64, step: &str) {
        self.current.insert(user_id, step.to_string());
    }

    /// Deletes the user's session. Returns whether one existed.
    pub(crate) fn remove(&self, user_id: i64) -> bool {
        self.current.remove(&user_id).is_some()
    }

    pub(crate) fn len(&self) -> usize {
        self.current.len()
    }

    /// Waits for exclusive access to the user's session.
    pub(crate) async fn lock(&self, user_id: i64) -> SessionGuard<'_> {
        // Clone under the shard lock so cleanup in `Drop` can tell whether anyone else holds it.
        let mutex = self.locks.entry(user_id).or_default().value().clone();
        let guard = mutex.lock_owned().await;
        trace!(user_id = user_id, "session lock acquired");
        SessionGuard {
            locks: &self.locks,
            user_id,
            guard: Some(guard),
        }
    }

    #[cfg(test)]
    pub(crate) fn lock_count(&self) -> usize {
        self.locks.len()
    }
}

/// Holds a user's session lock; drops the lock entry when no other task is waiting on it.
pub(crate) struct SessionGuard<'a> {
    locks: &'a DashMap<i64, Arc<Mutex<()>>>,
    user_id: i64,
    guard: Option<OwnedMutexGuard<()>>,
}

impl Drop for SessionGuard<'_> {
    fn drop(&mut self) {
        self.guard.take();
        self.locks
            .remove_if(&self.user_id, |_, mutex| Arc::strong_count(mutex) == 1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[test]
    fn test_set_current_remove() {
        let table = SessionTable::new();
        assert_eq!(table.current(1), None);

        table.set(1, "ask_name");
        table.set(1, "ask_age");
        assert_eq!(table.current(1).as_deref(), Some("ask_age"));
        assert_eq!(table.len(), 1);

        assert!(table.remove(1));
        assert!(!table.remove(1));
        assert_eq!(table.len(), 0);
    }

    #[tokio::test]
    async fn test_lock_entry_removed_after_release() {
        let table = SessionTable::new();
        {
            let _guard = table.lock(7).await;
            assert_eq!(table.lock_count(), 1);
        }
        assert_eq!(table.lock_count(), 0);
    }

    #[tokio::test]
    async fn test_same_user_is_serialized() {
        let table = Arc::new(SessionTable::new());
        let guard = table.lock(7).await;

        let waiter = {
            let table = table.clone();
            tokio::spawn(async move {
                let _guard = table.lock(7).await;
                table.set(7, "second");
            })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;
        table.set(7, "first");
        assert_eq!(table.current(7).as_deref(), Some("first"));
        drop(guard);

        waiter.await.unwrap();
        assert_eq!(table.current(7).as_deref(), Some("second"));
        assert_eq!(table.lock_count(), 0);
    }

    #[tokio::test]
    async fn test_other_users_do_not_wait() {
        let table = SessionTable::new();
        let _held = table.lock(1).await;
        let other = tokio::time::timeout(Duration::from_millis(100), table.lock(2)).await;
        assert!(other.is_ok());
    }
}
