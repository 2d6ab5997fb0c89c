use std::sync::Arc;

use dashmap::{DashMap, mapref::entry::Entry};

use crate::cache::{
    category::{Category, PolicyTable},
    clock::Clock,
    keys::rate_limit_key,
    models::RateLimitWindow,
};

/// Fixed-window request counter keyed by `client:category`.
///
/// A window opens on the first request and resets wholesale once its reset time has passed,
/// so up to twice the limit can get through around a window boundary.
pub struct RateLimiter {
    windows: DashMap<String, RateLimitWindow>,
    policies: Arc<PolicyTable>,
    clock: Arc<dyn Clock>,
}

impl RateLimiter {
    pub fn new(policies: Arc<PolicyTable>, clock: Arc<dyn Clock>) -> Self {
        Self {
            windows: DashMap::new(),
            policies,
            clock,
        }
    }

    /// Count one request for this client and category. Returns `false` once the budget for the
    /// current window is spent. A rejected request leaves the counter as it was.
    pub fn check_rate_limit(&self, client_id: &str, category: Category) -> bool {
        let now = self.clock.now_millis();
        let limit = self.policies.policy(category).limit_per_window;
        let window_millis = self.policies.window_millis();

        // entry() holds the shard lock, so check-and-increment is atomic per key
        match self.windows.entry(rate_limit_key(client_id, category)) {
            Entry::Vacant(slot) => {
                slot.insert(RateLimitWindow::open(now, window_millis));
                true
            }
            Entry::Occupied(mut slot) => {
                let window = slot.get_mut();
                if window.is_expired(now) {
                    *window = RateLimitWindow::open(now, window_millis);
                    true
                } else if window.count < limit {
                    window.count += 1;
                    true
                } else {
                    tracing::warn!(
                        "rate limit exceeded for {} on {} ({}/{})",
                        client_id,
                        category,
                        window.count,
                        limit
                    );
                    false
                }
            }
        }
    }

    /// Current request count for a bucket, if it has a live window
    pub fn current_count(&self, client_id: &str, category: Category) -> Option<u32> {
        let now = self.clock.now_millis();
        self.windows
            .get(&rate_limit_key(client_id, category))
            .filter(|w| !w.is_expired(now))
            .map(|w| w.count)
    }

    /// Drop every window whose reset time has passed, returning how many were removed
    pub fn sweep(&self) -> usize {
        let now = self.clock.now_millis();
        let before = self.windows.len();
        self.windows.retain(|_, window| !window.is_expired(now));
        before.saturating_sub(self.windows.len())
    }

    pub fn len(&self) -> usize {
        self.windows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.windows.is_empty()
    }
}
