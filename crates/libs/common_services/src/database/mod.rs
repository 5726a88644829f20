mod error;
pub mod stores;
mod utils;

pub use error::*;
pub use stores::*;
pub use utils::*;
