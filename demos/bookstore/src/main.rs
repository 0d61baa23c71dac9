//! Example consumer: a read-only bookstore served through jsonapi-sdk.
//!
//! Try:
//!   curl -H 'accept: application/vnd.api+json' localhost:3000/books
//!   curl -H 'accept: application/vnd.api+json' 'localhost:3000/books/1?include=author'

use async_trait::async_trait;
use axum::Router;
use jsonapi_sdk::{
    common_routes, resource_routes, AppState, DataSource, LoadedRelation, Method, ModelDescriptor,
    QueryDescriptor, Relation, RelationAttachment, RequestConfig, ResourceRecord,
    ResourceRegistry, SourceError,
};
use serde_json::{json, Map, Value};
use std::sync::Arc;
use tokio::net::TcpListener;

type Row = Map<String, Value>;

/// Static shelf: books plus their authors, resolved through `author_id`.
struct ShelfSource {
    books: Vec<Row>,
    authors: Vec<Row>,
}

impl ShelfSource {
    fn seed() -> Self {
        ShelfSource {
            books: rows(json!([
                { "id": 1, "title": "The Hobbit", "date_published": "1937-09-21", "author_id": 1 },
                { "id": 2, "title": "The Fellowship of the Ring", "date_published": "1954-07-29", "author_id": 1 },
                { "id": 3, "title": "A Wizard of Earthsea", "date_published": "1968-11-01", "author_id": 2 }
            ])),
            authors: rows(json!([
                { "id": 1, "name": "J. R. R. Tolkien" },
                { "id": 2, "name": "Ursula K. Le Guin" }
            ])),
        }
    }

    fn matches(row: &Row, filter: &Map<String, Value>) -> bool {
        filter.iter().all(|(key, wanted)| {
            let actual = row.get(key).map(text).unwrap_or_default();
            match wanted {
                Value::Array(options) => options.iter().any(|option| text(option) == actual),
                other => text(other) == actual,
            }
        })
    }
}

#[async_trait]
impl DataSource for ShelfSource {
    async fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ResourceRecord>, SourceError> {
        let records = self
            .books
            .iter()
            .filter(|row| Self::matches(row, &query.filter))
            .map(|row| {
                let mut record = ResourceRecord::new(row.clone());
                if query.include.iter().any(|name| name == "author") {
                    let wanted = row.get("author_id").map(text).unwrap_or_default();
                    let author = self
                        .authors
                        .iter()
                        .find(|author| author.get("id").map(text).unwrap_or_default() == wanted)
                        .cloned()
                        .map(ResourceRecord::new);
                    record
                        .relations
                        .insert("author".into(), LoadedRelation::One(author));
                }
                record
            })
            .collect();
        Ok(records)
    }

    async fn create(
        &self,
        _attributes: Map<String, Value>,
        _attachments: &[RelationAttachment],
    ) -> Result<ResourceRecord, SourceError> {
        Err(read_only())
    }

    async fn update(
        &self,
        _id: &Value,
        _attributes: Map<String, Value>,
        _attachments: &[RelationAttachment],
    ) -> Result<ResourceRecord, SourceError> {
        Err(read_only())
    }

    async fn destroy(&self, _id: &Value) -> Result<(), SourceError> {
        Err(read_only())
    }
}

fn read_only() -> SourceError {
    SourceError::new(405, "Method Not Allowed", "the demo shelf is read-only")
}

fn text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        _ => String::new(),
    }
}

fn rows(values: Value) -> Vec<Row> {
    match values {
        Value::Array(items) => items
            .into_iter()
            .filter_map(|item| match item {
                Value::Object(row) => Some(row),
                _ => None,
            })
            .collect(),
        _ => Vec::new(),
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("jsonapi_sdk=debug,bookstore_demo=info")),
        )
        .init();

    let descriptor = ModelDescriptor::new("books")
        .with_filter("title")
        .with_filter("date_published")
        .with_method(Method::Read)
        .with_relation(Relation::to_one("author", "authors"));

    let mut registry = ResourceRegistry::new();
    registry.register(descriptor, RequestConfig::default(), Arc::new(ShelfSource::seed()))?;

    let state = AppState {
        registry: Arc::new(registry),
    };
    let app = Router::new()
        .merge(common_routes())
        .merge(resource_routes(state));

    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    tracing::info!("bookstore listening on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;
    Ok(())
}
