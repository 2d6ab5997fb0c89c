//! In-memory cache and rate-limit records
use serde::Serialize;
use serde_json::Value;

/// Last successful upstream payload for a cache key
#[derive(Debug, Serialize, Clone)]
pub struct CacheEntry {
    pub data: Value,
    pub stored_at: i64,  // Unix millis
    pub expires_at: i64, // Unix millis
}

impl CacheEntry {
    pub fn is_expired(&self, now: i64) -> bool {
        now > self.expires_at
    }
}

/// Fixed-window request counter for one `client:category` bucket
#[derive(Debug, Serialize, Clone)]
pub struct RateLimitWindow {
    pub count: u32,
    pub reset_at: i64, // Unix millis
}

impl RateLimitWindow {
    pub fn open(now: i64, window_millis: i64) -> Self {
        Self {
            count: 1,
            reset_at: now + window_millis,
        }
    }

    pub fn is_expired(&self, now: i64) -> bool {
        now > self.reset_at
    }
}
