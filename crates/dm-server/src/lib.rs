//! HTTP API over the retrieval pipeline (Axum).
//!
//! Exposes index status and rebuild, vector search, grounded prompt
//! composition and delivery-method recommendation.

pub mod error;
pub mod routes;
pub mod state;

use axum::Router;
use state::AppState;

/// Build the application router with a custom state.
pub fn app_with_state(state: AppState) -> Router {
    Router::new()
        .merge(routes::health_routes())
        .merge(routes::index_routes())
        .merge(routes::retrieval_routes())
        .with_state(state)
}
