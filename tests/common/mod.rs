//! Shared fixtures: a bookstore model served from an in-memory source.

#![allow(dead_code)]

use async_trait::async_trait;
use axum::{body::Body, http::Request, Router};
use jsonapi_sdk::{
    resource_routes, AppState, DataSource, Direction, LoadedRelation, Method, ModelDescriptor,
    QueryDescriptor, Relation, RelationAttachment, RequestConfig, ResourceRecord,
    ResourceRegistry, SortKey, SourceError, MEDIA_TYPE,
};
use serde_json::{json, Map, Value};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

type Row = Map<String, Value>;

struct ToOneRows {
    fk: String,
    rows: Vec<Row>,
}

/// In-memory stand-in for the storage collaborator. Filters by stringified
/// equality (arrays mean membership), sorts by the translated keys, and
/// resolves to-one includes through foreign keys.
pub struct MemorySource {
    rows: RwLock<Vec<Row>>,
    to_one: HashMap<String, ToOneRows>,
}

impl MemorySource {
    pub fn new(rows: Vec<Row>) -> Self {
        MemorySource {
            rows: RwLock::new(rows),
            to_one: HashMap::new(),
        }
    }

    pub fn with_to_one(mut self, relation: &str, fk: &str, rows: Vec<Row>) -> Self {
        self.to_one.insert(
            relation.to_string(),
            ToOneRows {
                fk: fk.to_string(),
                rows,
            },
        );
        self
    }

    fn to_record(&self, row: Row, include: &[String]) -> ResourceRecord {
        let mut record = ResourceRecord::new(row);
        for name in include {
            let Some(related) = self.to_one.get(name) else {
                continue;
            };
            let fk = record
                .attributes
                .get(&related.fk)
                .map(value_str)
                .unwrap_or_default();
            let found = related
                .rows
                .iter()
                .find(|row| row.get("id").map(value_str).unwrap_or_default() == fk)
                .cloned()
                .map(ResourceRecord::new);
            record
                .relations
                .insert(name.clone(), LoadedRelation::One(found));
        }
        record
    }
}

#[async_trait]
impl DataSource for MemorySource {
    async fn fetch(&self, query: &QueryDescriptor) -> Result<Vec<ResourceRecord>, SourceError> {
        let mut rows: Vec<Row> = self.rows.read().expect("rows lock").clone();
        rows.retain(|row| matches_filters(row, &query.filter));
        sort_rows(&mut rows, &query.sort);
        Ok(rows
            .into_iter()
            .map(|row| self.to_record(row, &query.include))
            .collect())
    }

    async fn create(
        &self,
        mut attributes: Map<String, Value>,
        _attachments: &[RelationAttachment],
    ) -> Result<ResourceRecord, SourceError> {
        let mut rows = self.rows.write().expect("rows lock");
        let next_id = rows
            .iter()
            .filter_map(|row| row.get("id").and_then(Value::as_i64))
            .max()
            .unwrap_or(0)
            + 1;
        attributes.insert("id".into(), Value::from(next_id));
        rows.push(attributes.clone());
        Ok(ResourceRecord::new(attributes))
    }

    async fn update(
        &self,
        id: &Value,
        attributes: Map<String, Value>,
        _attachments: &[RelationAttachment],
    ) -> Result<ResourceRecord, SourceError> {
        let mut rows = self.rows.write().expect("rows lock");
        let wanted = value_str(id);
        let Some(row) = rows
            .iter_mut()
            .find(|row| row.get("id").map(value_str).unwrap_or_default() == wanted)
        else {
            return Err(SourceError::not_found(format!("no record with id {}", wanted)));
        };
        for (key, value) in attributes {
            row.insert(key, value);
        }
        Ok(ResourceRecord::new(row.clone()))
    }

    async fn destroy(&self, id: &Value) -> Result<(), SourceError> {
        let mut rows = self.rows.write().expect("rows lock");
        let wanted = value_str(id);
        let before = rows.len();
        rows.retain(|row| row.get("id").map(value_str).unwrap_or_default() != wanted);
        if rows.len() == before {
            return Err(SourceError::not_found(format!("no record with id {}", wanted)));
        }
        Ok(())
    }
}

fn value_str(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Bool(b) => b.to_string(),
        _ => String::new(),
    }
}

fn matches_filters(row: &Row, filter: &Map<String, Value>) -> bool {
    filter.iter().all(|(key, wanted)| {
        let actual = row.get(key).map(value_str).unwrap_or_default();
        match wanted {
            Value::Array(options) => options.iter().any(|option| value_str(option) == actual),
            other => value_str(other) == actual,
        }
    })
}

fn sort_rows(rows: &mut [Row], keys: &[SortKey]) {
    rows.sort_by(|a, b| {
        for key in keys {
            let ordering = compare(a.get(&key.field), b.get(&key.field));
            let ordering = match key.direction {
                Direction::Ascending => ordering,
                Direction::Descending => ordering.reverse(),
            };
            if ordering != Ordering::Equal {
                return ordering;
            }
        }
        Ordering::Equal
    });
}

fn compare(a: Option<&Value>, b: Option<&Value>) -> Ordering {
    match (a, b) {
        (Some(Value::Number(x)), Some(Value::Number(y))) => x
            .as_f64()
            .partial_cmp(&y.as_f64())
            .unwrap_or(Ordering::Equal),
        _ => value_str(a.unwrap_or(&Value::Null)).cmp(&value_str(b.unwrap_or(&Value::Null))),
    }
}

fn rows(values: Value) -> Vec<Row> {
    values
        .as_array()
        .expect("fixture array")
        .iter()
        .map(|value| value.as_object().expect("fixture object").clone())
        .collect()
}

pub fn books() -> Vec<Row> {
    rows(json!([
        { "id": 1, "title": "The Fellowship of the Ring", "date_published": "1954-07-29", "author_id": 1, "series_id": 1 },
        { "id": 2, "title": "The Two Towers", "date_published": "1954-07-29", "author_id": 1, "series_id": 1 },
        { "id": 3, "title": "The Return of the King", "date_published": "1955-10-20", "author_id": 1, "series_id": 1 },
        { "id": 4, "title": "Harry Potter and the Philosopher's Stone", "date_published": "1997-06-26", "author_id": 2, "series_id": 2 },
        { "id": 5, "title": "Harry Potter and the Chamber of Secrets", "date_published": "1998-07-02", "author_id": 2, "series_id": 2 }
    ]))
}

pub fn authors() -> Vec<Row> {
    rows(json!([
        { "id": 1, "name": "J. R. R. Tolkien" },
        { "id": 2, "name": "J. K. Rowling" }
    ]))
}

pub fn series() -> Vec<Row> {
    rows(json!([
        { "id": 1, "title": "The Lord of the Rings" },
        { "id": 2, "title": "Harry Potter" }
    ]))
}

/// Router with a `books` resource under the given route config and method
/// set, plus a `featured` singleton route (one=true, no default filters).
pub fn bookstore_router(config: RequestConfig, methods: &[Method]) -> Router {
    let source = Arc::new(
        MemorySource::new(books())
            .with_to_one("author", "author_id", authors())
            .with_to_one("series", "series_id", series()),
    );

    let mut descriptor = ModelDescriptor::new("books")
        .with_filter("date_published")
        .with_filter("title")
        .with_relation(Relation::to_one("author", "authors"))
        .with_relation(Relation::to_one("series", "series"))
        .with_relation(Relation::to_many("stores", "stores"))
        .with_relation(Relation::to_many("author.books", "books"));
    for method in methods {
        descriptor = descriptor.with_method(*method);
    }

    let mut registry = ResourceRegistry::new();
    registry
        .register(descriptor, config, source)
        .expect("register books");
    registry
        .register(
            ModelDescriptor::new("featured"),
            RequestConfig {
                one: true,
                ..Default::default()
            },
            Arc::new(MemorySource::new(books())),
        )
        .expect("register featured");

    resource_routes(AppState {
        registry: Arc::new(registry),
    })
}

pub fn bookstore_app() -> Router {
    bookstore_router(
        RequestConfig::default(),
        &[Method::Create, Method::Read, Method::Update, Method::Destroy],
    )
}

pub fn get(uri: &str) -> Request<Body> {
    get_with_accept(uri, MEDIA_TYPE)
}

pub fn get_with_accept(uri: &str, accept: &str) -> Request<Body> {
    Request::builder()
        .uri(uri)
        .header("accept", accept)
        .body(Body::empty())
        .expect("request")
}

pub fn send_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header("accept", MEDIA_TYPE)
        .header("content-type", "application/json")
        .body(Body::from(body.to_string()))
        .expect("request")
}

pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("read body");
    serde_json::from_slice(&bytes).expect("parse body")
}
