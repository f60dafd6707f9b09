//! API error responses
//!
//! Bodies carry a fixed message per route. Upstream details are logged,
//! never returned.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt::Display;
use tracing::warn;

#[derive(Debug)]
pub enum ApiError {
    /// No bearer token on a data route
    NoToken,
    BadRequest(&'static str),
    /// Generic 500 with a route-specific message
    Internal(&'static str),
}

impl ApiError {
    /// Log `cause` and hide it behind `message`
    pub fn upstream(message: &'static str, cause: impl Display) -> Self {
        warn!("{}: {}", message, cause);
        ApiError::Internal(message)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            ApiError::NoToken => (StatusCode::UNAUTHORIZED, "No token provided"),
            ApiError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            ApiError::Internal(message) => (StatusCode::INTERNAL_SERVER_ERROR, message),
        };
        (status, Json(json!({ "error": message }))).into_response()
    }
}
