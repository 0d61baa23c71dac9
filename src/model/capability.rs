//! Capability checks backing the request validator.

use crate::model::{Method, ModelDescriptor};

/// Outcome of asking whether a model supports something requested.
///
/// `NotRequested` means nothing was asked for, which is distinct from
/// "asked for and missing" — the validator skips the former and reports
/// the latter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Capability {
    NotRequested,
    Supported,
    Missing(Vec<String>),
}

impl Capability {
    pub fn is_missing(&self) -> bool {
        matches!(self, Capability::Missing(_))
    }

    /// Validation message for a missing capability, e.g.
    /// `Model does not have filter publisher`.
    pub fn message(&self, kind: &str) -> Option<String> {
        match self {
            Capability::Missing(keys) => {
                Some(format!("Model does not have {} {}", kind, keys.join(", ")))
            }
            _ => None,
        }
    }
}

/// Membership check of requested filter keys against the declared set.
/// The identity filter `id` is built in and always passes.
pub fn filters(descriptor: &ModelDescriptor, requested: Option<&[&str]>) -> Capability {
    let Some(requested) = requested else {
        return Capability::NotRequested;
    };
    let missing: Vec<String> = requested
        .iter()
        .filter(|key| !descriptor.has_filter(key))
        .map(|key| key.to_string())
        .collect();
    if missing.is_empty() {
        Capability::Supported
    } else {
        Capability::Missing(missing)
    }
}

/// Existence check of a single relation path. A path declared verbatim
/// (including dotted declarations) is supported; otherwise each dot-segment
/// is checked individually.
pub fn relation(descriptor: &ModelDescriptor, requested: Option<&str>) -> Capability {
    let Some(path) = requested else {
        return Capability::NotRequested;
    };
    if descriptor.has_relation(path) {
        return Capability::Supported;
    }
    let missing: Vec<String> = path
        .split('.')
        .filter(|segment| !descriptor.has_relation(segment))
        .map(|segment| segment.to_string())
        .collect();
    if missing.is_empty() {
        Capability::Supported
    } else {
        Capability::Missing(missing)
    }
}

/// Method capability. `Read` is a query, not a model method: always
/// supported regardless of declaration.
pub fn method(descriptor: &ModelDescriptor, method: Method) -> Capability {
    if method == Method::Read || descriptor.methods.contains(&method) {
        Capability::Supported
    } else {
        Capability::Missing(vec![method.to_string()])
    }
}
