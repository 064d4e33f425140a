//! Configuration validation with aggregated errors.
//! - Aggregates all issues into Vec<String>
//! - Validates:
//!   * settings (server, metrics path, logging level, safety margin)
//!   * issuer url, scope, timeout and credentials presence
//!   * grocery api urls, search limit and timeout
//!   * storage path

use std::path::Path;
use tracing::{error, info};

use crate::config::settings::SettingsConfig;
use crate::config::types::{ApiConfig, IssuerConfig, ServiceConfig, StorageConfig};
use crate::observability::metrics::get_metrics;

/// Public entrypoint: returns Ok(()) or Err(Vec<String>) containing all issues.
pub async fn validate_service_config(cfg: &ServiceConfig) -> Result<(), Vec<String>> {
    let mut errors: Vec<String> = Vec::new();

    validate_settings(&cfg.settings, &mut errors);
    validate_issuer(&cfg.issuer, &mut errors);
    validate_api(&cfg.api, &mut errors);
    validate_storage(&cfg.storage, &mut errors);

    if errors.is_empty() {
        info!("config valid");
        Ok(())
    } else {
        error!("configuration validation errors ({}):", errors.len());
        for e in &errors {
            error!(" - {}", e);
        }
        get_metrics().await.config_validation_errors.inc();
        Err(errors)
    }
}

/// SETTINGS VALIDATION
fn validate_settings(settings: &SettingsConfig, errors: &mut Vec<String>) {
    // safety margin sane bounds
    if let Some(s) = settings.safety_margin_seconds {
        if s > 60 * 60 * 24 {
            errors.push(format!(
                "settings.safety_margin_seconds ({}) is unreasonably large",
                s
            ));
        }
    }

    if settings.server.host.trim().is_empty() {
        errors.push("settings.server.host must not be empty".to_string());
    }
    if settings.server.port.parse::<u16>().is_err() {
        errors.push(format!(
            "settings.server.port '{}' must be an integer in range 0-65535",
            settings.server.port
        ));
    }

    // metrics endpoint start with '/'
    let metrics = &settings.metrics;
    if !metrics.path.starts_with('/') {
        errors.push(format!(
            "settings.metrics.path '{}' must start with '/'",
            metrics.path
        ));
    }

    // logging level
    if let Some(logging) = &settings.logging {
        let valid = ["trace", "debug", "info", "warn", "error"];
        if !valid.contains(&logging.level.to_lowercase().as_str()) {
            errors.push(format!(
                "settings.logging.level '{}' invalid; allowed: {:?}",
                logging.level, valid
            ));
        }
    }
}

/// ISSUER VALIDATION
fn validate_issuer(issuer: &IssuerConfig, errors: &mut Vec<String>) {
    validate_url("issuer.token_url", &issuer.token_url, errors);
    if issuer.scope.trim().is_empty() {
        errors.push("issuer.scope must not be empty".to_string());
    }
    if issuer.timeout_ms == 0 {
        errors.push("issuer.timeout_ms must be greater than 0".to_string());
    }
    // values usually come from ${CLIENT_ID} / ${CLIENT_SECRET}
    if issuer.client_id.trim().is_empty() {
        errors.push("issuer.client_id is missing; set it through the environment".to_string());
    }
    if issuer.client_secret.trim().is_empty() {
        errors.push("issuer.client_secret is missing; set it through the environment".to_string());
    }
}

/// API VALIDATION
fn validate_api(api: &ApiConfig, errors: &mut Vec<String>) {
    validate_url("api.product_url", &api.product_url, errors);
    validate_url("api.location_url", &api.location_url, errors);
    if api.search_limit == 0 {
        errors.push("api.search_limit must be greater than 0".to_string());
    }
    if api.timeout_ms == 0 {
        errors.push("api.timeout_ms must be greater than 0".to_string());
    }
}

/// STORAGE VALIDATION
fn validate_storage(storage: &StorageConfig, errors: &mut Vec<String>) {
    if let StorageConfig::File { path } = storage {
        if !Path::new(path).is_absolute() {
            errors.push(format!("storage.path '{}' must be an absolute path", path));
        }
    }
}

fn validate_url(field: &str, url: &str, errors: &mut Vec<String>) {
    let url = url.trim();
    if !(url.starts_with("http://") || url.starts_with("https://")) {
        errors.push(format!("{} '{}' must be an http(s) url", field, url));
    }
}
