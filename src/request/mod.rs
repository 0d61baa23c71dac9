pub mod config;
pub mod query;
pub mod validate;

pub use config::RequestConfig;
pub use query::{translate, Direction, QueryDescriptor, RequestedQuery, SortKey};
pub use validate::{validate, ValidationError};
