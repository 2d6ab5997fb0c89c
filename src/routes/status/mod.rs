mod handler;

pub use handler::{cache_stats, health};
