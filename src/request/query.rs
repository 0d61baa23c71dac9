//! Query-string parsing and translation into a data-access query.

use crate::request::RequestConfig;
use serde_json::{Map, Value};
use std::collections::HashMap;

/// Sort direction: `+` ascending (the default), `-` descending.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// One sort criterion. Earlier keys take precedence; ties are stable.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SortKey {
    pub field: String,
    pub direction: Direction,
}

/// Raw request parameters after query-string parsing, before merging with
/// route defaults.
#[derive(Clone, Debug, Default)]
pub struct RequestedQuery {
    pub filter: Map<String, Value>,
    /// `None` means the parameter was absent, so route defaults apply.
    pub include: Option<Vec<String>>,
    pub sort: Vec<SortKey>,
    pub fields: HashMap<String, Vec<String>>,
}

impl RequestedQuery {
    /// Parse `filter[key]`, `fields[type]`, `sort`, and `include`
    /// parameters. Comma-separated filter values become arrays
    /// (OR-membership); other parameters are ignored.
    pub fn from_pairs(params: &HashMap<String, String>) -> Self {
        let mut requested = RequestedQuery::default();
        for (key, value) in params {
            if let Some(name) = bracketed(key, "filter") {
                requested.filter.insert(name.to_string(), filter_value(value));
            } else if let Some(resource_type) = bracketed(key, "fields") {
                requested
                    .fields
                    .insert(resource_type.to_string(), split_list(value));
            } else if key == "sort" {
                requested.sort = parse_sort(value);
            } else if key == "include" {
                requested.include = Some(split_list(value));
            }
        }
        requested
    }
}

/// Abstract description of the fetch a data source should run: the output
/// of translation, the input of the storage collaborator. Never executes
/// I/O itself.
#[derive(Clone, Debug, Default)]
pub struct QueryDescriptor {
    pub filter: Map<String, Value>,
    pub sort: Vec<SortKey>,
    pub include: Vec<String>,
    /// Per-type sparse fieldsets. Consumed by the document builder; never
    /// used to prune the fetch.
    pub fields: HashMap<String, Vec<String>>,
}

/// Merge route defaults with request parameters into a query descriptor.
/// Request filters win per key; a path id lands under the built-in `id`
/// filter. Entries are assumed to have passed validation already.
///
/// `id` always means membership (`id IN (...)`), whether or not a filter of
/// that name was registered — a fixed built-in, not a registration surprise.
pub fn translate(
    config: &RequestConfig,
    requested: &RequestedQuery,
    path_id: Option<&str>,
) -> QueryDescriptor {
    let mut filter = config.filter.clone();
    for (key, value) in &requested.filter {
        filter.insert(key.clone(), value.clone());
    }
    if let Some(id) = path_id {
        filter.insert("id".into(), Value::String(id.to_string()));
    }
    if let Some(value) = filter.remove("id") {
        filter.insert("id".into(), membership(value));
    }

    let mut fields = config.fields.clone();
    fields.extend(requested.fields.clone());

    QueryDescriptor {
        filter,
        sort: requested.sort.clone(),
        include: requested
            .include
            .clone()
            .unwrap_or_else(|| config.include.clone()),
        fields,
    }
}

fn membership(value: Value) -> Value {
    match value {
        Value::Array(_) => value,
        other => Value::Array(vec![other]),
    }
}

fn bracketed<'a>(key: &'a str, prefix: &str) -> Option<&'a str> {
    key.strip_prefix(prefix)?
        .strip_prefix('[')?
        .strip_suffix(']')
}

fn split_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
        .collect()
}

fn filter_value(value: &str) -> Value {
    if value.contains(',') {
        Value::Array(split_list(value).into_iter().map(Value::String).collect())
    } else {
        Value::String(value.to_string())
    }
}

// Form decoding turns a literal `+` into a space, so tokens are trimmed
// before the sign check.
fn parse_sort(value: &str) -> Vec<SortKey> {
    split_list(value)
        .into_iter()
        .map(|token| {
            if let Some(field) = token.strip_prefix('-') {
                SortKey {
                    field: field.to_string(),
                    direction: Direction::Descending,
                }
            } else {
                let field = token.strip_prefix('+').unwrap_or(&token);
                SortKey {
                    field: field.to_string(),
                    direction: Direction::Ascending,
                }
            }
        })
        .collect()
}
