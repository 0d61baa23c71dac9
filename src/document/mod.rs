pub mod builder;
pub mod error_payload;
pub mod resource;

pub use builder::{build, DocumentContext};
pub use error_payload::{ErrorDocument, ErrorEntry, ErrorObject, ErrorPayload};
pub use resource::{JsonApiDocument, LinkValue, PrimaryData, ResourceObject};
