// ABOUTME: HTTP service library for newsdesk exposing the aggregation engine over axum.
// ABOUTME: Re-exports the router constructor, shared state, and error wrapper.

pub mod errors;
pub mod handlers;
pub mod routes;
pub mod state;

pub use errors::AppError;
pub use routes::routes;
pub use state::AppState;
