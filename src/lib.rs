//! JSON:API middleware over pluggable data sources.
//!
//! Register a [`ModelDescriptor`] + [`RequestConfig`] + [`DataSource`] per
//! resource type, mount [`resource_routes`], and the crate validates,
//! translates, and serializes every request into JSON:API documents.

pub mod document;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod model;
pub mod request;
pub mod routes;
pub mod source;
pub mod state;

pub use document::{DocumentContext, JsonApiDocument, LinkValue, PrimaryData, ResourceObject};
pub use error::{ApiError, RegistryError, DEFAULT_ERROR_STATUS};
pub use middleware::MEDIA_TYPE;
pub use model::{Capability, Cardinality, Method, ModelDescriptor, Relation, ResourceRegistry};
pub use request::{
    translate, validate, Direction, QueryDescriptor, RequestConfig, RequestedQuery, SortKey,
    ValidationError,
};
pub use routes::{common_routes, resource_routes};
pub use source::{
    DataSource, LoadedRelation, RelationAttachment, ResourceRecord, SourceError,
};
pub use state::AppState;
