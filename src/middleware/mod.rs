mod client_id;
mod error_handler;

pub use client_id::{ClientId, UNKNOWN_CLIENT};
pub use error_handler::log_errors;
