mod handler;
mod model;

pub use handler::{calendar, news, price};
