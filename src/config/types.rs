use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::cache::token::Credentials;
use crate::cache::token_cache::CacheSettings;
use crate::config::settings::SettingsConfig;
use crate::utils::constants::{
    DEFAULT_API_TIMEOUT_MS, DEFAULT_EXCHANGE_TIMEOUT_MS, DEFAULT_SAFETY_MARGIN_SECS, DEFAULT_SCOPE,
    DEFAULT_SEARCH_LIMIT,
};

/// ================================
/// Full service configuration
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ServiceConfig {
    pub settings: SettingsConfig,
    pub issuer: IssuerConfig,
    pub api: ApiConfig,
    #[serde(default)]
    pub storage: StorageConfig,
}

impl ServiceConfig {
    pub fn cache_settings(&self) -> CacheSettings {
        CacheSettings {
            safety_margin_seconds: self.settings.safety_margin_seconds.unwrap_or(DEFAULT_SAFETY_MARGIN_SECS),
            exchange_timeout: Duration::from_millis(self.issuer.timeout_ms),
        }
    }
}

/// ================================
/// Token issuer (client-credentials grant)
/// ================================
#[derive(Deserialize, Clone)]
pub struct IssuerConfig {
    pub token_url: String,
    #[serde(default = "default_scope")]
    pub scope: String,
    #[serde(default = "default_exchange_timeout_ms")]
    pub timeout_ms: u64,
    /// usually `${CLIENT_ID}`
    #[serde(default)]
    pub client_id: String,
    /// usually `${CLIENT_SECRET}`
    #[serde(default)]
    pub client_secret: String,
}

impl IssuerConfig {
    pub fn credentials(&self) -> Credentials {
        Credentials::new(self.client_id.trim(), self.client_secret.trim())
    }
}

impl fmt::Debug for IssuerConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("IssuerConfig")
            .field("token_url", &self.token_url)
            .field("scope", &self.scope)
            .field("timeout_ms", &self.timeout_ms)
            .field("client_id", &self.client_id)
            .field("client_secret", &"***")
            .finish()
    }
}

/// ================================
/// Grocery API endpoints
/// ================================
#[derive(Debug, Deserialize, Clone)]
pub struct ApiConfig {
    pub product_url: String,
    pub location_url: String,
    #[serde(default = "default_search_limit")]
    pub search_limit: u32,
    #[serde(default = "default_api_timeout_ms")]
    pub timeout_ms: u64,
}

/// ================================
/// Product storage
/// ================================
#[derive(Debug, Deserialize, Clone, Default, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    #[default]
    Memory,
    /// append-only JSON lines
    File { path: String },
}

fn default_scope() -> String {
    DEFAULT_SCOPE.to_string()
}

fn default_exchange_timeout_ms() -> u64 {
    DEFAULT_EXCHANGE_TIMEOUT_MS
}

fn default_search_limit() -> u32 {
    DEFAULT_SEARCH_LIMIT
}

fn default_api_timeout_ms() -> u64 {
    DEFAULT_API_TIMEOUT_MS
}
