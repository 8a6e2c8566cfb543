//! Per-user key/value memory.
//!
//! The dialog engine only calls [`Memory::delete`] on its short-term memory when a session starts
//! fresh; steps use the rest of the trait to keep answers between turns.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::error::Result;

/// Key/value store partitioned by user id.
#[async_trait]
pub trait Memory: Send + Sync {
    /// Returns the value stored for `key`, if any.
    async fn get(&self, user_id: i64, key: &str) -> Result<Option<String>>;
    /// Stores `value` under `key`, replacing any previous value.
    async fn set(&self, user_id: i64, key: &str, value: &str) -> Result<()>;
    /// Removes one key.
    async fn remove(&self, user_id: i64, key: &str) -> Result<()>;
    /// Drops everything stored for the user.
    async fn delete(&self, user_id: i64) -> Result<()>;
}

/// Memory held in RAM; lost on restart. Suitable for development and tests.
#[derive(Debug, Clone, Default)]
pub struct EphemeralMemory {
    users: Arc<RwLock<HashMap<i64, HashMap<String, String>>>>,
}

impl EphemeralMemory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with at least one stored key.
    pub async fn user_count(&self) -> usize {
        self.users.read().await.len()
    }
}

#[async_trait]
impl Memory for EphemeralMemory {
    async fn get(&self, user_id: i64, key: &str) -> Result<Option<String>> {
        let users = self.users.read().await;
        Ok(users.get(&user_id).and_then(|store| store.get(key)).cloned())
    }

    async fn set(&self, user_id: i64, key: &str, value: &str) -> Result<()> {
        let mut users = self.users.write().await;
        users
            .entry(user_id)
            .or_default()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    async fn remove(&self, user_id: i64, key: &str) -> Result<()> {
        let mut users = self.users.write().await;
        if let Some(store) = users.get_mut(&user_id) {
            store.remove(key);
            if store.is_empty() {
                users.remove(&user_id);
            }
        }
        Ok(())
    }

    async fn delete(&self, user_id: i64) -> Result<()> {
        self.users.write().await.remove(&user_id);
        Ok(())
    }
}
