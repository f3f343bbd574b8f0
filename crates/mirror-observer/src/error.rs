//! Error types for the observer server.
//!
//! [`ObserverError`] unifies the REST failure modes into a single enum that
//! converts into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use mirror_core::MirrorError;

/// Errors that can occur in the observer REST layer.
#[derive(Debug, thiserror::Error)]
pub enum ObserverError {
    /// The display snapshot could not be produced.
    #[error("mirror error: {0}")]
    Mirror(#[from] MirrorError),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl IntoResponse for ObserverError {
    fn into_response(self) -> Response {
        let status = StatusCode::INTERNAL_SERVER_ERROR;
        let message = match &self {
            Self::Mirror(e) => format!("snapshot error: {e}"),
            Self::Serialization(e) => format!("JSON error: {e}"),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
