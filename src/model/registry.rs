//! Resource registration and lookup.

use crate::error::RegistryError;
use crate::model::{Method, ModelDescriptor};
use crate::request::{validate, RequestConfig};
use crate::source::DataSource;
use std::collections::HashMap;
use std::sync::Arc;

/// A registered resource: its capability surface, route defaults, and the
/// data source serving it.
#[derive(Clone)]
pub struct RegisteredResource {
    pub descriptor: ModelDescriptor,
    pub config: RequestConfig,
    pub source: Arc<dyn DataSource>,
    /// Collection URL, e.g. `/books`; resource self links hang off it.
    pub base_url: String,
}

/// All registered resources, keyed by type name. Immutable once the router
/// is built; requests only read it.
#[derive(Default)]
pub struct ResourceRegistry {
    resources: HashMap<String, RegisteredResource>,
}

impl ResourceRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a resource. Route defaults are checked against the
    /// descriptor here so integrator mistakes fail at startup instead of
    /// surfacing on every request.
    pub fn register(
        &mut self,
        descriptor: ModelDescriptor,
        config: RequestConfig,
        source: Arc<dyn DataSource>,
    ) -> Result<(), RegistryError> {
        let name = descriptor.name.clone();
        if self.resources.contains_key(&name) {
            return Err(RegistryError::DuplicateResource(name));
        }
        // "self" is reserved for the resource's own URL in links objects.
        if descriptor.relations.iter().any(|r| r.name == "self") {
            return Err(RegistryError::ReservedRelation(name));
        }
        let errors = validate(Method::Read, &descriptor, &config);
        if let Some(first) = errors.first() {
            return Err(RegistryError::Config {
                resource: name,
                reason: first.reason.clone(),
            });
        }

        let base_url = format!("/{}", name);
        tracing::info!(resource = %name, "registered resource");
        self.resources.insert(
            name,
            RegisteredResource {
                descriptor,
                config,
                source,
                base_url,
            },
        );
        Ok(())
    }

    pub fn resource(&self, name: &str) -> Option<&RegisteredResource> {
        self.resources.get(name)
    }
}
