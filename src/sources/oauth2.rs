use std::time::Duration;

use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, error};

use crate::cache::error::TokenError;
use crate::cache::token::{Credentials, IssuedToken};
use crate::config::types::IssuerConfig;
use crate::sources::TokenIssuer;

const GRANT_TYPE: &str = "client_credentials";
const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// OAuth2 client-credentials grant over HTTP Basic auth.
#[derive(Debug, Clone)]
pub struct ClientCredentialsIssuer {
    pub token_url: String,
    pub scope: String,
    pub client: Client,
}

impl ClientCredentialsIssuer {
    pub fn new(token_url: impl Into<String>, scope: impl Into<String>, client: Client) -> Self {
        Self { token_url: token_url.into(), scope: scope.into(), client }
    }

    pub fn from_config(cfg: &IssuerConfig) -> Result<Self, TokenError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(cfg.timeout_ms))
            .build()
            .map_err(|e| TokenError::Configuration(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self::new(cfg.token_url.clone(), cfg.scope.clone(), client))
    }
}

/// `Basic base64(id:secret)`
pub fn basic_authorization(credentials: &Credentials) -> String {
    let raw = format!("{}:{}", credentials.client_id, credentials.client_secret);
    format!("Basic {}", STANDARD.encode(raw))
}

impl TokenIssuer for ClientCredentialsIssuer {
    async fn exchange(&self, credentials: &Credentials) -> Result<IssuedToken, TokenError> {
        if credentials.client_id.is_empty() || credentials.client_secret.is_empty() {
            return Err(TokenError::Configuration("client id and client secret must be set".to_owned()));
        }

        let form = [("grant_type", GRANT_TYPE), ("scope", self.scope.as_str())];
        debug!("requesting token from {}", self.token_url);
        let response = self
            .client
            .post(&self.token_url)
            .header(CONTENT_TYPE, FORM_CONTENT_TYPE)
            .header(AUTHORIZATION, basic_authorization(credentials))
            .form(&form)
            .send()
            .await?;

        let status = response.status();
        let body = response.text().await?;
        if !status.is_success() {
            error!("token request to {} failed: {}", self.token_url, status);
            return Err(TokenError::IssuerRejected { status: status.as_u16(), body });
        }
        parse_token_response(&body)
    }
}

/// Extract `access_token` and `expires_in` from an issuer response body.
pub fn parse_token_response(body: &str) -> Result<IssuedToken, TokenError> {
    let json: Value = serde_json::from_str(body).map_err(|e| TokenError::IssuerMalformedResponse {
        reason: format!("body is not JSON: {}", e),
    })?;

    let access_token = json
        .get("access_token")
        .and_then(Value::as_str)
        .filter(|token| !token.is_empty())
        .ok_or_else(|| TokenError::IssuerMalformedResponse {
            reason: "missing string field 'access_token'".to_owned(),
        })?;
    let expires_in = json
        .get("expires_in")
        .and_then(Value::as_i64)
        .ok_or_else(|| TokenError::IssuerMalformedResponse {
            reason: "missing integer field 'expires_in'".to_owned(),
        })?;

    Ok(IssuedToken { access_token: access_token.to_owned(), expires_in })
}
