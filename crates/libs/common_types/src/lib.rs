#![allow(clippy::missing_errors_doc, clippy::missing_panics_doc)]

mod history;
mod project;
mod search;

pub use history::*;
pub use project::*;
pub use search::*;
