pub mod common;
pub mod config_validation;
pub mod expiration_and_cache;
