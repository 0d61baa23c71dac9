//! Resource pipeline handlers: validate, translate, fetch, build, respond.
//!
//! One request is one sequential pass; validation failures short-circuit
//! before the data source is touched, and every failure path funnels
//! through [`ApiError`] into the same error document shape.

use crate::document::{build, DocumentContext, JsonApiDocument};
use crate::error::ApiError;
use crate::model::{Method, RegisteredResource};
use crate::request::{translate, validate, QueryDescriptor, RequestConfig, RequestedQuery};
use crate::source::{RelationAttachment, ResourceRecord};
use crate::state::AppState;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde_json::{Map, Value};
use std::collections::HashMap;

pub async fn list(
    State(state): State<AppState>,
    Path(resource_type): Path<String>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = lookup(&state, &resource_type)?;
    let requested = RequestedQuery::from_pairs(&params);
    check(Method::Read, resource, &requested)?;

    let query = translate(&resource.config, &requested, None);
    if resource.config.one && !query.filter.contains_key("id") {
        return Err(ApiError::MissingIdentifier);
    }
    tracing::debug!(resource = %resource_type, filter = ?query.filter, sort = ?query.sort, "fetch");
    let records = resource.source.fetch(&query).await?;
    if resource.config.one && records.is_empty() {
        return Err(ApiError::NotFound(resource_type));
    }

    let document = build_document(resource, &records, &query, resource.config.one);
    Ok((StatusCode::OK, Json(document)))
}

pub async fn read(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = lookup(&state, &resource_type)?;
    let requested = RequestedQuery::from_pairs(&params);
    check(Method::Read, resource, &requested)?;

    let query = translate(&resource.config, &requested, Some(&id));
    tracing::debug!(resource = %resource_type, id = %id, "fetch one");
    let records = resource.source.fetch(&query).await?;
    if records.is_empty() {
        return Err(ApiError::NotFound(format!("{}/{}", resource_type, id)));
    }

    let document = build_document(resource, &records, &query, true);
    Ok((StatusCode::OK, Json(document)))
}

pub async fn create(
    State(state): State<AppState>,
    Path(resource_type): Path<String>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = lookup(&state, &resource_type)?;
    let requested = RequestedQuery::from_pairs(&params);
    check(Method::Create, resource, &requested)?;

    let (attributes, attachments) = parse_body(body)?;
    let record = resource.source.create(attributes, &attachments).await?;

    let query = translate(&resource.config, &requested, None);
    let document = build_document(resource, std::slice::from_ref(&record), &query, true);
    Ok((StatusCode::CREATED, Json(document)))
}

pub async fn update(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
    Json(body): Json<Value>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = lookup(&state, &resource_type)?;
    let requested = RequestedQuery::from_pairs(&params);
    check(Method::Update, resource, &requested)?;

    let (attributes, attachments) = parse_body(body)?;
    let record = resource
        .source
        .update(&id_value(&id), attributes, &attachments)
        .await?;

    let query = translate(&resource.config, &requested, Some(&id));
    let document = build_document(resource, std::slice::from_ref(&record), &query, true);
    Ok((StatusCode::OK, Json(document)))
}

pub async fn destroy(
    State(state): State<AppState>,
    Path((resource_type, id)): Path<(String, String)>,
    Query(params): Query<HashMap<String, String>>,
) -> Result<impl IntoResponse, ApiError> {
    let resource = lookup(&state, &resource_type)?;
    let requested = RequestedQuery::from_pairs(&params);
    check(Method::Destroy, resource, &requested)?;

    resource.source.destroy(&id_value(&id)).await?;
    Ok(StatusCode::NO_CONTENT)
}

fn lookup<'a>(state: &'a AppState, resource_type: &str) -> Result<&'a RegisteredResource, ApiError> {
    state
        .registry
        .resource(resource_type)
        .ok_or_else(|| ApiError::UnknownResource(resource_type.to_string()))
}

fn check(
    operation: Method,
    resource: &RegisteredResource,
    requested: &RequestedQuery,
) -> Result<(), ApiError> {
    let effective = effective_config(&resource.config, requested);
    let errors = validate(operation, &resource.descriptor, &effective);
    if errors.is_empty() {
        Ok(())
    } else {
        tracing::warn!(
            resource = %resource.descriptor.name,
            operation = %operation,
            violations = errors.len(),
            "request validation failed"
        );
        Err(ApiError::Validation(errors))
    }
}

/// The validator sees exactly what the fetch would see: route defaults
/// overlaid with the request's parameters.
fn effective_config(config: &RequestConfig, requested: &RequestedQuery) -> RequestConfig {
    let mut filter = config.filter.clone();
    for (key, value) in &requested.filter {
        filter.insert(key.clone(), value.clone());
    }
    RequestConfig {
        filter,
        include: requested
            .include
            .clone()
            .unwrap_or_else(|| config.include.clone()),
        one: config.one,
        fields: config.fields.clone(),
    }
}

fn build_document(
    resource: &RegisteredResource,
    records: &[ResourceRecord],
    query: &QueryDescriptor,
    one: bool,
) -> JsonApiDocument {
    let ctx = DocumentContext {
        one,
        base_url: &resource.base_url,
        descriptor: &resource.descriptor,
        include: &query.include,
        fields: &query.fields,
    };
    build(records, &ctx)
}

/// Body shape: `{"data": {...attributes, "links": {relation: [ids]}}}`.
/// To-many attachments ride under `links`; to-one relations are set
/// through their foreign-key attribute.
fn parse_body(body: Value) -> Result<(Map<String, Value>, Vec<RelationAttachment>), ApiError> {
    let Value::Object(mut top) = body else {
        return Err(ApiError::Body("expected a JSON object".into()));
    };
    let Some(Value::Object(mut data)) = top.remove("data") else {
        return Err(ApiError::Body("expected a \"data\" object".into()));
    };

    let mut attachments = Vec::new();
    if let Some(links) = data.remove("links") {
        let Value::Object(links) = links else {
            return Err(ApiError::Body("\"links\" must be an object".into()));
        };
        for (name, ids) in links {
            let Value::Array(ids) = ids else {
                return Err(ApiError::Body(format!(
                    "link \"{}\" must be an array of ids",
                    name
                )));
            };
            attachments.push(RelationAttachment { name, ids });
        }
    }

    Ok((data, attachments))
}

/// Path ids arrive as strings; numeric keys are handed to sources as
/// numbers.
fn id_value(raw: &str) -> Value {
    raw.parse::<i64>()
        .map(Value::from)
        .unwrap_or_else(|_| Value::String(raw.to_string()))
}
