//! Assembles JSON:API documents from fetched records.

use crate::document::{JsonApiDocument, LinkValue, PrimaryData, ResourceObject};
use crate::model::{Cardinality, ModelDescriptor};
use crate::source::{LoadedRelation, ResourceRecord};
use serde_json::{json, Map};
use std::collections::{BTreeMap, HashMap, HashSet};

/// Everything the builder needs besides the records themselves.
pub struct DocumentContext<'a> {
    /// Primary data becomes a single object instead of an array. Callers
    /// reject empty single-resource fetches before building.
    pub one: bool,
    /// Collection URL for the primary type, e.g. `/books`.
    pub base_url: &'a str,
    pub descriptor: &'a ModelDescriptor,
    /// Relation paths that were eagerly loaded for this request.
    pub include: &'a [String],
    /// Sparse fieldsets per resource type; applies to primary and linked
    /// resources alike.
    pub fields: &'a HashMap<String, Vec<String>>,
}

/// Build the top-level document: primary data, relationship links, and the
/// compound `linked` section deduplicated by `(type, id)`.
pub fn build(records: &[ResourceRecord], ctx: &DocumentContext<'_>) -> JsonApiDocument {
    let primaries: Vec<ResourceObject> =
        records.iter().map(|record| primary_resource(record, ctx)).collect();

    // Primary identities seed the dedupe set so `linked` never repeats them.
    let mut seen: HashSet<(String, String)> = primaries
        .iter()
        .map(|resource| (resource.kind.clone(), resource.id.clone()))
        .collect();
    let mut linked = Vec::new();
    for record in records {
        collect_linked(record, ctx, &mut seen, &mut linked);
    }

    let meta = (!ctx.one).then(|| json!({ "count": primaries.len() }));
    let data = if ctx.one {
        match primaries.into_iter().next() {
            Some(resource) => PrimaryData::One(resource),
            None => PrimaryData::Many(Vec::new()),
        }
    } else {
        PrimaryData::Many(primaries)
    };

    JsonApiDocument {
        data,
        linked,
        links: None,
        meta,
    }
}

fn primary_resource(record: &ResourceRecord, ctx: &DocumentContext<'_>) -> ResourceObject {
    let id = record.id_string();
    let allowed = ctx.fields.get(&ctx.descriptor.name);

    let mut attributes = Map::new();
    for (key, value) in &record.attributes {
        if key == "id" || is_foreign_key(key, ctx.descriptor) {
            continue;
        }
        if let Some(allowed) = allowed {
            if !allowed.iter().any(|field| field == key) {
                continue;
            }
        }
        attributes.insert(key.clone(), value.clone());
    }

    let self_url = format!("{}/{}", ctx.base_url, id);
    let mut links = BTreeMap::new();
    links.insert("self".to_string(), LinkValue::Url(self_url.clone()));
    // Every declared relation gets a link, requested or not.
    for relation in &ctx.descriptor.relations {
        let link = match relation.cardinality {
            Cardinality::Many => LinkValue::Url(format!("{}/{}", self_url, relation.name)),
            Cardinality::One => to_one_link(record, relation, ctx, &self_url),
        };
        links.insert(relation.name.clone(), link);
    }

    ResourceObject {
        kind: ctx.descriptor.name.clone(),
        id,
        attributes,
        links,
    }
}

/// Included and loaded to-one relations get object linkage; everything
/// else gets a reference object carrying the relation URL.
fn to_one_link(
    record: &ResourceRecord,
    relation: &crate::model::Relation,
    ctx: &DocumentContext<'_>,
    self_url: &str,
) -> LinkValue {
    if ctx.include.iter().any(|path| path == &relation.name) {
        if let Some(LoadedRelation::One(Some(related))) = record.relations.get(&relation.name) {
            return LinkValue::Linkage {
                kind: relation.target.clone(),
                id: related.id_string(),
            };
        }
    }
    LinkValue::Reference {
        url: format!("{}/{}", self_url, relation.name),
    }
}

/// To-many eager loads are never embedded — they surface as URLs only.
fn collect_linked(
    record: &ResourceRecord,
    ctx: &DocumentContext<'_>,
    seen: &mut HashSet<(String, String)>,
    out: &mut Vec<ResourceObject>,
) {
    for path in ctx.include {
        let Some(relation) = ctx.descriptor.relation_named(path) else {
            continue;
        };
        if relation.cardinality != Cardinality::One {
            continue;
        }
        let Some(LoadedRelation::One(Some(related))) = record.relations.get(path) else {
            continue;
        };
        let id = related.id_string();
        if !seen.insert((relation.target.clone(), id)) {
            continue;
        }
        out.push(linked_resource(related, &relation.target, ctx));
    }
}

fn linked_resource(
    record: &ResourceRecord,
    target: &str,
    ctx: &DocumentContext<'_>,
) -> ResourceObject {
    let id = record.id_string();
    let allowed = ctx.fields.get(target);

    let mut attributes = Map::new();
    for (key, value) in &record.attributes {
        if key == "id" {
            continue;
        }
        if let Some(allowed) = allowed {
            if !allowed.iter().any(|field| field == key) {
                continue;
            }
        }
        attributes.insert(key.clone(), value.clone());
    }

    let mut links = BTreeMap::new();
    links.insert(
        "self".to_string(),
        LinkValue::Url(format!("/{}/{}", target, id)),
    );

    ResourceObject {
        kind: target.to_string(),
        id,
        attributes,
        links,
    }
}

/// A scalar named `<relation>_id` is a foreign key when `<relation>` is
/// declared; foreign keys never appear as attributes.
fn is_foreign_key(field: &str, descriptor: &ModelDescriptor) -> bool {
    field
        .strip_suffix("_id")
        .map(|stem| descriptor.has_relation(stem))
        .unwrap_or(false)
}
