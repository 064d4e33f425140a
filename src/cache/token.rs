use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::Deserialize;

/// Bearer token held by the cache.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CachedToken {
    pub value: String,
    /// the token must not be used at or after this instant
    pub expires_at: DateTime<Utc>,
}

impl CachedToken {
    /// Build a cache entry from an issuer answer received at `fetched_at`.
    /// `expires_at = fetched_at + expires_in - safety_margin`
    pub fn from_issued(issued: IssuedToken, fetched_at: DateTime<Utc>, safety_margin_seconds: u64) -> Self {
        let margin = i64::try_from(safety_margin_seconds).unwrap_or(i64::MAX);
        let lifetime = issued.expires_in.saturating_sub(margin);
        let expires_at = TimeDelta::try_seconds(lifetime)
            .and_then(|delta| fetched_at.checked_add_signed(delta))
            .unwrap_or(if lifetime > 0 { DateTime::<Utc>::MAX_UTC } else { DateTime::<Utc>::MIN_UTC });
        Self { value: issued.access_token, expires_at }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    pub fn bearer(&self) -> String {
        format!("Bearer {}", self.value)
    }
}

/// Issuer answer, head of the client-credentials response body.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct IssuedToken {
    pub access_token: String,
    /// seconds; signed so misbehaving issuers can be represented
    pub expires_in: i64,
}

/// OAuth2 client credentials.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self { client_id: client_id.into(), client_secret: client_secret.into() }
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}
