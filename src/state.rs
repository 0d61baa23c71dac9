//! Shared application state for all routes.

use crate::model::ResourceRegistry;
use std::sync::Arc;

/// The registry is immutable after startup, so concurrent requests read it
/// without locking.
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<ResourceRegistry>,
}
