//! Cache and rate-limit operations

pub mod rate_limit;
pub mod response;

pub use rate_limit::RateLimiter;
pub use response::ResponseCache;
