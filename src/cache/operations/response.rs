use std::sync::Arc;

use dashmap::DashMap;
use serde_json::Value;

use crate::cache::{
    category::{Category, PolicyTable},
    clock::Clock,
    models::CacheEntry,
};

/// Upstream response cache with per-category TTLs
pub struct ResponseCache {
    entries: DashMap<String, CacheEntry>,
    policies: Arc<PolicyTable>,
    clock: Arc<dyn Clock>,
}

impl ResponseCache {
    pub fn new(policies: Arc<PolicyTable>, clock: Arc<dyn Clock>) -> Self {
        Self {
            entries: DashMap::new(),
            policies,
            clock,
        }
    }

    /// Fetch a live entry. An expired entry counts as a miss and is evicted.
    pub fn get_cached(&self, key: &str, category: Category) -> Option<Value> {
        let now = self.clock.now_millis();

        let expired = match self.entries.get(key) {
            Some(entry) if !entry.is_expired(now) => {
                tracing::debug!("cache hit [{}] {}", category, key);
                return Some(entry.data.clone());
            }
            Some(_) => true,
            None => false,
        };

        if expired {
            // a concurrent set_cache may have refreshed it in between
            self.entries.remove_if(key, |_, entry| entry.is_expired(now));
            tracing::debug!("cache expired [{}] {}", category, key);
        } else {
            tracing::debug!("cache miss [{}] {}", category, key);
        }
        None
    }

    /// Store or overwrite an entry; expiry restarts from now.
    pub fn set_cache(&self, key: impl Into<String>, data: Value, category: Category) {
        let now = self.clock.now_millis();
        let ttl = self.policies.policy(category).ttl_millis();
        self.entries.insert(
            key.into(),
            CacheEntry {
                data,
                stored_at: now,
                expires_at: now + ttl,
            },
        );
    }

    /// Drop every expired entry, returning how many were removed
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let before = self.entries.len();
        self.entries.retain(|_, entry| !entry.is_expired(now));
        before.saturating_sub(self.entries.len())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
