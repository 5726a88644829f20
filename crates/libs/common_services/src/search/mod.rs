mod adapters;
mod cardinality;
mod corpus;
mod error;
mod interfaces;
mod service;
mod text_matcher;
mod thumbnail;
mod timestamp;
mod vector_matcher;

pub use adapters::*;
pub use cardinality::*;
pub use corpus::*;
pub use error::*;
pub use interfaces::*;
pub use service::*;
pub use thumbnail::*;
pub use timestamp::*;
