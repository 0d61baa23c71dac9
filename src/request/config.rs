//! Per-route request configuration.

use serde_json::{Map, Value};
use std::collections::HashMap;

/// Route-level defaults set by the integrator at registration time.
/// Read-only while requests are in flight; safe to share across them.
#[derive(Clone, Debug, Default)]
pub struct RequestConfig {
    /// Default filters. Request filters are merged on top, winning per key.
    pub filter: Map<String, Value>,
    /// Default relation paths to eager-load. A request `include` parameter
    /// replaces this list rather than merging with it.
    pub include: Vec<String>,
    /// The route addresses a single primary resource.
    pub one: bool,
    /// Default sparse fieldsets per resource type.
    pub fields: HashMap<String, Vec<String>>,
}
