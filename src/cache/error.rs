use std::sync::Arc;

use thiserror::Error;

pub type BoxError = Arc<dyn std::error::Error + Send + Sync>;

/// Failure to obtain a bearer token.
///
/// `Clone` so that one refresh outcome can be handed to every waiter.
#[derive(Debug, Clone, Error)]
pub enum TokenError {
    /// transport failure or timeout talking to the issuer
    #[error("token issuer unavailable: {message}")]
    IssuerUnavailable {
        message: String,
        #[source]
        source: Option<BoxError>,
    },

    #[error("token issuer rejected the request with status {status}: {body}")]
    IssuerRejected { status: u16, body: String },

    #[error("token issuer returned a malformed response: {reason}")]
    IssuerMalformedResponse { reason: String },

    #[error("token configuration error: {0}")]
    Configuration(String),

    #[error("token refresh aborted: {0}")]
    RefreshAborted(String),
}

impl TokenError {
    pub fn unavailable(message: impl Into<String>) -> Self {
        TokenError::IssuerUnavailable { message: message.into(), source: None }
    }

    /// Errors the caller sees as an upstream (5xx-class) problem.
    pub fn is_issuer_side(&self) -> bool {
        matches!(
            self,
            TokenError::IssuerUnavailable { .. }
                | TokenError::IssuerRejected { .. }
                | TokenError::IssuerMalformedResponse { .. }
        )
    }

    /// Short label for metrics.
    pub fn kind(&self) -> &'static str {
        match self {
            TokenError::IssuerUnavailable { .. } => "unavailable",
            TokenError::IssuerRejected { .. } => "rejected",
            TokenError::IssuerMalformedResponse { .. } => "malformed",
            TokenError::Configuration(_) => "configuration",
            TokenError::RefreshAborted(_) => "aborted",
        }
    }
}

impl From<reqwest::Error> for TokenError {
    fn from(err: reqwest::Error) -> Self {
        TokenError::IssuerUnavailable { message: err.to_string(), source: Some(Arc::new(err)) }
    }
}
