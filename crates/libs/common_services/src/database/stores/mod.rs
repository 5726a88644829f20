mod history_store;
mod project_store;

pub use history_store::*;
pub use project_store::*;
