use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Rejected update request. The message is what the caller gets back.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UpdateError {
    #[error("Missing {0} param")]
    MissingField(&'static str),
    #[error("Invalid boolean value")]
    InvalidBoolean,
    #[error("Invalid {0} param")]
    InvalidNumber(&'static str),
}

impl IntoResponse for UpdateError {
    fn into_response(self) -> Response {
        tracing::debug!(error = %self, "rejected update");
        (StatusCode::BAD_REQUEST, format!("{self}\n")).into_response()
    }
}
