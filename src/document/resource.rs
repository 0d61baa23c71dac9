//! JSON:API document types.
//!
//! The top-level document is a closed struct — exactly `data`, `linked`,
//! `links`, `meta` — rather than a dynamically keyed map; unused members
//! are omitted from serialization.

use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Relationship link. Cardinality alone decides the shape, independent of
/// inclusion: a to-one link is always an object (linkage or reference), a
/// to-many link is always a URL string.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LinkValue {
    /// To-many relations and `self` links.
    Url(String),
    /// Eagerly-included to-one relations: object linkage by type and id.
    Linkage {
        #[serde(rename = "type")]
        kind: String,
        id: String,
    },
    /// To-one relations that were not eagerly loaded: a reference to the
    /// relation URL.
    Reference {
        #[serde(rename = "self")]
        url: String,
    },
}

/// One resource: `type`, string `id`, attributes flattened alongside, and
/// a `links` object mapping relation names (and `self`) to link values.
#[derive(Clone, Debug, Serialize)]
pub struct ResourceObject {
    #[serde(rename = "type")]
    pub kind: String,
    /// Always a string, even for numeric primary keys.
    pub id: String,
    #[serde(flatten)]
    pub attributes: Map<String, Value>,
    #[serde(skip_serializing_if = "BTreeMap::is_empty")]
    pub links: BTreeMap<String, LinkValue>,
}

/// Primary data: a single object or an ordered collection.
#[derive(Clone, Debug, Serialize)]
#[serde(untagged)]
pub enum PrimaryData {
    One(ResourceObject),
    Many(Vec<ResourceObject>),
}

/// Top-level document. `data` is always present; the other members are
/// omitted when empty or unused.
#[derive(Clone, Debug, Serialize)]
pub struct JsonApiDocument {
    pub data: PrimaryData,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub linked: Vec<ResourceObject>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub links: Option<Map<String, Value>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}
