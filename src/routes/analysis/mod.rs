mod handler;
mod model;

pub use handler::{ai_analysis, translate};
pub use model::Language;
