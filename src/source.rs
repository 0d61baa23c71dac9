//! The data-access boundary: what a storage collaborator must expose.
//!
//! The crate translates requests into [`QueryDescriptor`] values and hands
//! them to a [`DataSource`]; it has no knowledge of the engine behind the
//! trait (SQL, document store, in-memory fixtures).

use crate::request::QueryDescriptor;
use async_trait::async_trait;
use serde_json::{Map, Value};
use std::collections::HashMap;
use thiserror::Error;

/// Error raised by a data source. Statusless errors are wrapped with the
/// pipeline default when the error payload is built.
#[derive(Clone, Debug, Error)]
#[error("{title}: {message}")]
pub struct SourceError {
    pub status: Option<u16>,
    pub title: String,
    pub message: String,
}

impl SourceError {
    pub fn new(status: u16, title: impl Into<String>, message: impl Into<String>) -> Self {
        SourceError {
            status: Some(status),
            title: title.into(),
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        SourceError::new(404, "Not Found", message)
    }

    /// An error with no HTTP status of its own; the payload builder assigns
    /// the default.
    pub fn internal(message: impl Into<String>) -> Self {
        SourceError {
            status: None,
            title: "Internal Server Error".into(),
            message: message.into(),
        }
    }
}

/// A fetched entity: scalar attributes (primary key under `id`, foreign
/// keys included) plus any relations the source preloaded, keyed by
/// relation path. Owned by the fetch result for the duration of one
/// request; the document builder only reads it.
#[derive(Clone, Debug, Default)]
pub struct ResourceRecord {
    pub attributes: Map<String, Value>,
    pub relations: HashMap<String, LoadedRelation>,
}

impl ResourceRecord {
    pub fn new(attributes: Map<String, Value>) -> Self {
        ResourceRecord {
            attributes,
            relations: HashMap::new(),
        }
    }

    /// Primary key as a string — the form resource ids take on the wire,
    /// numeric keys included.
    pub fn id_string(&self) -> String {
        match self.attributes.get("id") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Number(n)) => n.to_string(),
            _ => String::new(),
        }
    }
}

/// Relations preloaded by the source for one record.
#[derive(Clone, Debug)]
pub enum LoadedRelation {
    One(Option<ResourceRecord>),
    Many(Vec<ResourceRecord>),
}

/// To-many ids to attach after a create or update. Attachments are an
/// unordered set of independent sub-operations: a failed primary save fails
/// the write, but a failed attachment surfaces as a [`SourceError`] on an
/// otherwise saved record. Sources needing atomicity across both wrap them
/// in their own transaction.
#[derive(Clone, Debug, PartialEq)]
pub struct RelationAttachment {
    pub name: String,
    pub ids: Vec<Value>,
}

/// Storage collaborator for one resource type. The only asynchronous
/// boundary in the pipeline; cancellation follows the caller dropping the
/// future.
#[async_trait]
pub trait DataSource: Send + Sync {
    /// Execute a translated query, returning records in final order with
    /// any requested relations preloaded.
    async fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ResourceRecord>, SourceError>;

    async fn create(
        &self,
        attributes: Map<String, Value>,
        attachments: &[RelationAttachment],
    ) -> Result<ResourceRecord, SourceError>;

    async fn update(
        &self,
        id: &Value,
        attributes: Map<String, Value>,
        attachments: &[RelationAttachment],
    ) -> Result<ResourceRecord, SourceError>;

    async fn destroy(&self, id: &Value) -> Result<(), SourceError>;
}
