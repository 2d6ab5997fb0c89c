//! In-process response cache and per-client rate limiting for upstream calls.

pub mod category;
pub mod clock;
pub mod guard;
pub mod keys;
pub mod models;
pub mod operations;

pub use category::{Category, CategoryError, CategoryPolicy, PolicyTable};
pub use clock::{Clock, ManualClock, SystemClock};
pub use guard::{ApiGuard, CacheStatus, GuardError, GuardStats, spawn_sweeper};
pub use keys::generate_cache_key;
