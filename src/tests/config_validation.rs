#[cfg(test)]
mod tests {

    use std::io::Write;

    use serial_test::serial;

    use crate::config::proc_loader::{expand_env_vars, file_to_config, parse_config};
    use crate::config::settings::LogFormat;
    use crate::config::types::StorageConfig;
    use crate::utils::logging::{resolve_logging_config, LogLevel};

    const VALID_YAML: &str = r#"
settings:
  server:
    host: 127.0.0.1
    port: "8080"
  metrics:
    is_enabled: true
    path: /metrics
issuer:
  token_url: https://api.kroger.com/v1/connect/oauth2/token
  client_id: ${GROCERY_TEST_CLIENT_ID}
  client_secret: ${GROCERY_TEST_CLIENT_SECRET}
api:
  product_url: https://api.kroger.com/v1/products
  location_url: https://api.kroger.com/v1/locations
"#;

    #[tokio::test]
    #[serial]
    async fn credentials_come_from_environment_and_defaults_apply() {
        std::env::set_var("GROCERY_TEST_CLIENT_ID", "id1");
        std::env::set_var("GROCERY_TEST_CLIENT_SECRET", "secret1 ");

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(VALID_YAML.as_bytes()).unwrap();
        let cfg = file_to_config(file.path()).await.unwrap();

        assert_eq!(cfg.issuer.credentials().client_id, "id1");
        assert_eq!(cfg.issuer.client_secret, "secret1");
        assert_eq!(cfg.issuer.scope, "product.compact");
        assert_eq!(cfg.settings.safety_margin_seconds, Some(60));
        assert_eq!(cfg.api.search_limit, 20);
        assert_eq!(cfg.storage, StorageConfig::Memory);
        assert_eq!(cfg.cache_settings().exchange_timeout.as_millis(), 5000);
        assert_eq!(cfg.settings.logging.as_ref().unwrap().format, LogFormat::Compact);
        assert!(!format!("{:?}", cfg.issuer).contains("secret1"));

        std::env::remove_var("GROCERY_TEST_CLIENT_ID");
        std::env::remove_var("GROCERY_TEST_CLIENT_SECRET");
    }

    #[tokio::test]
    #[serial]
    async fn shipped_config_is_valid() {
        std::env::set_var("CLIENT_ID", "id1");
        std::env::set_var("CLIENT_SECRET", "secret1");
        let cfg = file_to_config(std::path::Path::new("grocery-agent.yaml"))
            .await
            .expect("grocery-agent.yaml must exist in repo root for tests");
        assert_eq!(cfg.issuer.client_id, "id1");
        assert!(cfg.settings.metrics.is_enabled);
        std::env::remove_var("CLIENT_ID");
        std::env::remove_var("CLIENT_SECRET");
    }

    #[tokio::test]
    #[serial]
    async fn missing_credentials_fail_validation() {
        std::env::remove_var("GROCERY_TEST_CLIENT_ID");
        std::env::remove_var("GROCERY_TEST_CLIENT_SECRET");

        let expanded = expand_env_vars(VALID_YAML).unwrap();
        let err = parse_config(expanded).await.unwrap_err().to_string();
        assert!(err.contains("issuer.client_id is missing"), "{err}");
        assert!(err.contains("issuer.client_secret is missing"), "{err}");
    }

    #[tokio::test]
    async fn invalid_config_reports_all_errors() {
        let invalid_yaml = r#"
settings:
  safety_margin_seconds: 10
  server:
    host: 127.0.0.1
    port: "http"
  metrics:
    path: "metrics"
  logging:
    level: loud
    format: json
issuer:
  token_url: ftp://issuer
  scope: ""
  timeout_ms: 0
  client_id: id1
  client_secret: secret1
api:
  product_url: https://api/products
  location_url: localhost/locations
  search_limit: 0
storage:
  type: file
  path: relative/products.jsonl
"#;
        let err = parse_config(invalid_yaml.to_owned()).await.unwrap_err().to_string();
        for expected in [
            "total errors: 9",
            "settings.server.port",
            "settings.metrics.path",
            "settings.logging.level",
            "issuer.token_url",
            "issuer.scope",
            "issuer.timeout_ms",
            "api.location_url",
            "api.search_limit",
            "storage.path",
        ] {
            assert!(err.contains(expected), "missing '{expected}' in:\n{err}");
        }
    }

    #[test]
    fn env_placeholders_fall_back_to_defaults() {
        std::env::remove_var("GROCERY_TEST_UNSET_VAR");
        let out = expand_env_vars("a: ${GROCERY_TEST_UNSET_VAR:fallback}\nb: ${GROCERY_TEST_UNSET_VAR}").unwrap();
        assert_eq!(out, "a: fallback\nb: ");
    }

    #[tokio::test]
    #[serial]
    async fn cli_log_level_overrides_config() {
        std::env::set_var("GROCERY_TEST_CLIENT_ID", "id1");
        std::env::set_var("GROCERY_TEST_CLIENT_SECRET", "secret1");
        let yaml = VALID_YAML.replace("settings:\n", "settings:\n  logging:\n    level: WARN\n    format: json\n");
        let cfg = parse_config(expand_env_vars(&yaml).unwrap()).await.unwrap();

        let from_config = resolve_logging_config(&cfg, None);
        assert_eq!(from_config.level, "warn");
        assert_eq!(from_config.format, LogFormat::Json);
        assert_eq!(resolve_logging_config(&cfg, Some(LogLevel::DEBUG)).level, "debug");

        std::env::remove_var("GROCERY_TEST_CLIENT_ID");
        std::env::remove_var("GROCERY_TEST_CLIENT_SECRET");
    }
}
