use thiserror::Error;

use crate::cache::error::TokenError;
use crate::storage::StoreError;

/// Request-level failure seen by the HTTP handlers.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    #[error(transparent)]
    Token(#[from] TokenError),

    #[error("grocery api unavailable: {0}")]
    UpstreamUnavailable(#[source] reqwest::Error),

    #[error("grocery api rejected the request with status {status}: {body}")]
    UpstreamRejected { status: u16, body: String },

    #[error("grocery api returned a malformed response: {0}")]
    UpstreamMalformed(String),

    #[error(transparent)]
    Storage(#[from] StoreError),
}
