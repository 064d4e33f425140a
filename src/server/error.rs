use axum::response::{IntoResponse, Response};
use axum::Json;
use http::StatusCode;
use serde_json::json;
use tracing::error;

use crate::cache::error::TokenError;
use crate::grocery::error::ApiError;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Token(err) if err.is_issuer_side() => StatusCode::BAD_GATEWAY,
            ApiError::Token(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ApiError::UpstreamUnavailable(_)
            | ApiError::UpstreamRejected { .. }
            | ApiError::UpstreamMalformed(_) => StatusCode::BAD_GATEWAY,
            ApiError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match &self {
            ApiError::BadRequest(message) | ApiError::NotFound(message) => json!({ "message": message }),
            ApiError::Token(TokenError::Configuration(_)) => json!({
                "message": "Internal server configuration error.",
                "error": self.to_string(),
            }),
            _ if status == StatusCode::BAD_GATEWAY => json!({
                "message": "Error communicating with grocery API.",
                "error": self.to_string(),
            }),
            _ => json!({
                "message": "An unexpected server error occurred.",
                "error": self.to_string(),
            }),
        };
        if status.is_server_error() {
            error!("request failed with {}: {}", status, self);
        }
        (status, Json(body)).into_response()
    }
}
