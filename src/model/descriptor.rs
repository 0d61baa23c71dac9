//! Capability descriptors: what a registered model supports.

use std::collections::HashSet;
use std::fmt;

/// CRUD capability a model may declare. `Read` is a query, not a model
/// method, and is permitted even when undeclared.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Method {
    Create,
    Read,
    Update,
    Destroy,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Method::Create => "create",
            Method::Read => "read",
            Method::Update => "update",
            Method::Destroy => "destroy",
        })
    }
}

/// Relationship cardinality. Drives the link representation: to-one links
/// are objects, to-many links are URL strings.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Cardinality {
    One,
    Many,
}

/// A declared relationship. Names may be dotted nested paths
/// (e.g. `author.books`), declared directly on the owning descriptor.
#[derive(Clone, Debug)]
pub struct Relation {
    pub name: String,
    pub cardinality: Cardinality,
    /// Resource type of the related records.
    pub target: String,
}

impl Relation {
    pub fn to_one(name: impl Into<String>, target: impl Into<String>) -> Self {
        Relation {
            name: name.into(),
            cardinality: Cardinality::One,
            target: target.into(),
        }
    }

    pub fn to_many(name: impl Into<String>, target: impl Into<String>) -> Self {
        Relation {
            name: name.into(),
            cardinality: Cardinality::Many,
            target: target.into(),
        }
    }
}

/// Immutable capability surface of one resource type. Built once at
/// registration and shared read-only by the validator, translator, and
/// document builder.
///
/// Filter keys only declare what the route accepts; the predicate bound to
/// each key lives with the data source that executes it. The identity
/// filter `id` is built in and never declared.
#[derive(Clone, Debug, Default)]
pub struct ModelDescriptor {
    /// Resource type, also the URL path segment (e.g. `books`).
    pub name: String,
    pub filters: Vec<String>,
    pub methods: HashSet<Method>,
    pub relations: Vec<Relation>,
}

impl ModelDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        ModelDescriptor {
            name: name.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, name: impl Into<String>) -> Self {
        self.filters.push(name.into());
        self
    }

    pub fn with_method(mut self, method: Method) -> Self {
        self.methods.insert(method);
        self
    }

    pub fn with_relation(mut self, relation: Relation) -> Self {
        self.relations.push(relation);
        self
    }

    /// `id` is always accepted; it maps to the built-in membership filter.
    pub fn has_filter(&self, key: &str) -> bool {
        key == "id" || self.filters.iter().any(|f| f == key)
    }

    pub fn has_relation(&self, name: &str) -> bool {
        self.relations.iter().any(|r| r.name == name)
    }

    pub fn relation_named(&self, name: &str) -> Option<&Relation> {
        self.relations.iter().find(|r| r.name == name)
    }
}
