//! Request validation against model capabilities.
//!
//! Runs before anything touches a data source; a non-empty result
//! short-circuits the pipeline into a 400-class error document.

use crate::model::{capability, Capability, Method, ModelDescriptor};
use crate::request::RequestConfig;

/// One rejected aspect of a request.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub reason: String,
}

/// Check requested filters, includes, and the operation itself against the
/// model. Returns every violation in order: filter errors, then relation
/// errors, then the method error. An empty vec means the request is valid.
///
/// Pure function of its inputs; never fails out of band.
pub fn validate(
    operation: Method,
    descriptor: &ModelDescriptor,
    config: &RequestConfig,
) -> Vec<ValidationError> {
    let mut errors = Vec::new();

    // Filter keys are checked for every operation, create included.
    let keys: Vec<&str> = config.filter.keys().map(String::as_str).collect();
    if let Capability::Missing(missing) = capability::filters(descriptor, Some(&keys)) {
        for key in missing {
            errors.push(ValidationError {
                reason: format!("Model does not have filter {}", key),
                field: key,
            });
        }
    }

    for path in &config.include {
        if let Capability::Missing(missing) = capability::relation(descriptor, Some(path)) {
            for name in missing {
                errors.push(ValidationError {
                    field: path.clone(),
                    reason: format!("Model does not have relation {}", name),
                });
            }
        }
    }

    if capability::method(descriptor, operation).is_missing() {
        errors.push(ValidationError {
            field: operation.to_string(),
            reason: format!("Model does not support {}", operation),
        });
    }

    errors
}
