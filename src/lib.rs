//! # Grocery Agent Library
//!
//! Serves grocery product and location searches backed by a third-party
//! API, authenticating with a cached OAuth2 client-credentials token and
//! storing the reshaped product rows.
//!
//! Modules:
//! - `cache`: single-flight bearer token cache
//! - `sources`: token issuers (client-credentials grant)
//! - `grocery`: product/location search client and payload reshaping
//! - `storage`: product table backends
//! - `server`: axum routes and handlers
//! - `config`: service configuration loading and validation

pub mod cache;
pub mod config;
pub mod grocery;
pub mod helpers;
pub mod observability;
pub mod server;
pub mod sources;
pub mod storage;
pub mod utils;

#[cfg(test)]
pub mod tests;

pub use crate::cache::{CacheSettings, CachedToken, Credentials, TokenCache, TokenError};
pub use crate::config::types::ServiceConfig;
