//! Admin resource browser routes.
//! Parameterized paths hand the resource segment to the handlers, which
//! resolve it against the allow-list catalog.

use crate::handlers::admin::{delete as delete_handler, list, meta, patch, read};
use crate::state::AppState;
use axum::{routing::get, Router};

pub fn admin_routes(state: AppState) -> Router {
    Router::new()
        .route("/resources/_meta", get(meta))
        .route("/resources/:resource", get(list))
        .route(
            "/resources/:resource/:id",
            get(read).patch(patch).delete(delete_handler),
        )
        .with_state(state)
}
