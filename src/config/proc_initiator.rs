use crate::config::settings::{LogFormat, LoggingConfig};
use crate::config::types::ServiceConfig;
use crate::utils::constants::DEFAULT_SAFETY_MARGIN_SECS;

pub fn initiate_default_values(mut config: ServiceConfig) -> ServiceConfig {
    if config.settings.logging.is_none() {
        config.settings.logging = Some(LoggingConfig::new("info".to_owned(), LogFormat::Compact));
    }
    if config.settings.safety_margin_seconds.is_none() {
        config.settings.safety_margin_seconds = Some(DEFAULT_SAFETY_MARGIN_SECS);
    }

    // trailing whitespace from env files
    config.issuer.client_id = config.issuer.client_id.trim().to_owned();
    config.issuer.client_secret = config.issuer.client_secret.trim().to_owned();
    config.issuer.token_url = config.issuer.token_url.trim().to_owned();
    config.api.product_url = config.api.product_url.trim().to_owned();
    config.api.location_url = config.api.location_url.trim().to_owned();

    config
}
