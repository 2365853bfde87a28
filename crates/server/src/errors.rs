// ABOUTME: AppError wrapper translating engine errors into HTTP responses.
// ABOUTME: Configuration errors map to 400/500 with a JSON error body.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use newsdesk_scrape::ConfigError;
use serde_json::json;

/// Application-level error returned from handlers.
///
/// Per-source failures never reach this type; the engine absorbs them and
/// responds with a best-effort list. Only configuration problems become
/// error responses.
#[derive(Debug)]
pub struct AppError(anyhow::Error);

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let error_message = self.0.to_string();

        let status = match self.0.downcast_ref::<ConfigError>() {
            Some(ConfigError::InvalidRequest(_)) => StatusCode::BAD_REQUEST,
            Some(_) => StatusCode::INTERNAL_SERVER_ERROR,
            None => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self(err.into())
    }
}
