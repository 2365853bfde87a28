// ABOUTME: Route table wiring handlers onto the axum Router.
// ABOUTME: Adds HTTP tracing via tower-http.

use axum::{routing::get, Router};
use tower_http::trace::TraceLayer;

use crate::handlers;
use crate::state::AppState;

/// Build the application router.
pub fn routes(state: AppState) -> Router {
    Router::new()
        .route("/news", get(handlers::get_news))
        .route("/health", get(handlers::health))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
