//! Resource routes built over the registry.
//! Paths are parameterized so handlers resolve the resource by type name;
//! every route sits behind the JSON:API media-type check.

use crate::handlers::resource::{create, destroy, list, read, update};
use crate::middleware::require_json_api_accept;
use crate::state::AppState;
use axum::{middleware, routing::get, Router};

pub fn resource_routes(state: AppState) -> Router {
    Router::new()
        .route("/:resource_type", get(list).post(create))
        .route(
            "/:resource_type/:id",
            get(read).patch(update).delete(destroy),
        )
        .layer(middleware::from_fn(require_json_api_accept))
        .with_state(state)
}
