use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde_json::Value;
use tokio::task::JoinHandle;

use super::{
    category::{Category, PolicyTable},
    clock::{Clock, SystemClock},
    operations::{RateLimiter, ResponseCache},
};

const MIN_SWEEP_INTERVAL: Duration = Duration::from_secs(1);

/// Where a payload handed back by [`ApiGuard::fetch_through`] came from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheStatus {
    Hit,
    Miss,
}

impl CacheStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CacheStatus::Hit => "HIT",
            CacheStatus::Miss => "MISS",
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum GuardError<E> {
    #[error("rate limit exceeded, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },
    #[error("upstream request failed: {0}")]
    Upstream(E),
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct GuardStats {
    pub cache_entries: usize,
    pub rate_windows: usize,
}

/// Response cache and rate limiter sharing one policy table and clock.
///
/// One instance is built at startup and shared through `AppState`.
pub struct ApiGuard {
    cache: ResponseCache,
    limiter: RateLimiter,
    policies: Arc<PolicyTable>,
}

impl ApiGuard {
    pub fn new(policies: PolicyTable) -> Self {
        Self::with_clock(policies, Arc::new(SystemClock))
    }

    pub fn with_clock(policies: PolicyTable, clock: Arc<dyn Clock>) -> Self {
        let policies = Arc::new(policies);
        Self {
            cache: ResponseCache::new(policies.clone(), clock.clone()),
            limiter: RateLimiter::new(policies.clone(), clock),
            policies,
        }
    }

    pub fn policies(&self) -> &PolicyTable {
        &self.policies
    }

    pub fn get_cached(&self, key: &str, category: Category) -> Option<Value> {
        self.cache.get_cached(key, category)
    }

    pub fn set_cache(&self, key: impl Into<String>, data: Value, category: Category) {
        self.cache.set_cache(key, data, category)
    }

    pub fn check_rate_limit(&self, client_id: &str, category: Category) -> bool {
        self.limiter.check_rate_limit(client_id, category)
    }

    /// Seconds a rejected client is told to wait. Always the full window length.
    pub fn retry_after_secs(&self) -> u64 {
        self.policies.window().as_secs()
    }

    /// Serve `key` from cache, or spend one unit of the client's budget on `fetch` and cache
    /// the result. Cache hits are free. Failed fetches are not cached.
    pub async fn fetch_through<F, Fut, E>(
        &self,
        client_id: &str,
        category: Category,
        key: &str,
        fetch: F,
    ) -> Result<(Value, CacheStatus), GuardError<E>>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<Value, E>>,
    {
        if let Some(data) = self.get_cached(key, category) {
            return Ok((data, CacheStatus::Hit));
        }

        if !self.check_rate_limit(client_id, category) {
            return Err(GuardError::RateLimited {
                retry_after_secs: self.retry_after_secs(),
            });
        }

        let data = fetch().await.map_err(GuardError::Upstream)?;
        self.set_cache(key, data.clone(), category);
        Ok((data, CacheStatus::Miss))
    }

    /// Remove expired cache entries and rate-limit windows
    pub fn sweep(&self) -> GuardStats {
        GuardStats {
            cache_entries: self.cache.sweep(),
            rate_windows: self.limiter.sweep(),
        }
    }

    pub fn stats(&self) -> GuardStats {
        GuardStats {
            cache_entries: self.cache.len(),
            rate_windows: self.limiter.len(),
        }
    }
}

/// Run [`ApiGuard::sweep`] every `every`. Abort the handle to stop it.
///
/// A zero period is raised to one second; `Config::validate` rejects it before startup.
pub fn spawn_sweeper(guard: Arc<ApiGuard>, every: Duration) -> JoinHandle<()> {
    let every = if every.is_zero() {
        tracing::warn!("cache sweep interval is zero, sweeping every second instead");
        MIN_SWEEP_INTERVAL
    } else {
        every
    };
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval_at(tokio::time::Instant::now() + every, every);
        loop {
            ticker.tick().await;
            let removed = guard.sweep();
            let remaining = guard.stats();
            tracing::info!(
                "cache sweep removed {} entries and {} windows ({} entries, {} windows remain)",
                removed.cache_entries,
                removed.rate_windows,
                remaining.cache_entries,
                remaining.rate_windows
            );
        }
    })
}
