#[cfg(test)]
mod config_tests {
    use crate::config::{
        default_assets_cdn_url, default_carts_table, default_favorites_table, default_host,
        default_log_level, default_max_request_size, default_port, default_products_table,
        default_region, default_service_name, default_timeout, load_section, Config, ConfigError,
        DatabaseConfig, ObservabilityConfig, ParameterStoreConfig, ServerConfig, StorageBackend,
    };
    use aws_sdk_ssm::Client as SsmClient;
    use std::collections::HashMap;
    use std::time::Duration;

    fn env(pairs: &[(&str, &str)]) -> Option<HashMap<String, String>> {
        Some(
            pairs
                .iter()
                .map(|(key, value)| (key.to_string(), value.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_server_config_defaults() {
        let config: ServerConfig = load_section("server", env(&[])).unwrap();

        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, 8080);
        assert_eq!(config.request_timeout_seconds, 30);
        assert_eq!(config.max_request_size, 1024 * 1024);
        assert_eq!(config.bind_address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_database_config_from_env() {
        let config: DatabaseConfig = load_section(
            "database",
            env(&[
                ("HAVENCART_STORAGE_BACKEND", "memory"),
                ("HAVENCART_PRODUCTS_TABLE_NAME", "TestProducts"),
                ("HAVENCART_REGION", "eu-west-1"),
                ("HAVENCART_ASSETS_CDN_URL", "https://cdn.test.example"),
            ]),
        )
        .unwrap();

        assert_eq!(config.storage_backend, StorageBackend::Memory);
        assert_eq!(config.products_table_name, "TestProducts");
        assert_eq!(config.books_table_name, "HavenCartBooks");
        assert_eq!(config.region, "eu-west-1");
        assert_eq!(config.assets_cdn_url, "https://cdn.test.example");
        assert_eq!(config.assets_cdn_parameter, None);
    }

    #[test]
    fn test_observability_config_from_env() {
        let config: ObservabilityConfig = load_section(
            "observability",
            env(&[
                ("HAVENCART_SERVICE_NAME", "havencart-test"),
                ("HAVENCART_OTLP_ENDPOINT", "http://collector:4317"),
                ("HAVENCART_LOG_LEVEL", "debug"),
                ("HAVENCART_ENABLE_JSON_LOGGING", "true"),
            ]),
        )
        .unwrap();

        assert_eq!(config.service_name, "havencart-test");
        assert_eq!(config.otlp_endpoint.as_deref(), Some("http://collector:4317"));
        assert_eq!(config.log_level, "debug");
        assert!(config.enable_json_logging);
    }

    #[test]
    fn test_unknown_storage_backend_is_rejected() {
        let result = Config::from_source(env(&[("HAVENCART_STORAGE_BACKEND", "mongodb")]));
        assert!(matches!(result, Err(ConfigError::LoadError { .. })));
    }

    #[test]
    fn test_validation_rules() {
        assert!(Config::from_source(env(&[])).is_ok());

        for pairs in [
            vec![("HAVENCART_PORT", "0")],
            vec![("HAVENCART_REQUEST_TIMEOUT_SECONDS", "0")],
            vec![("HAVENCART_LOG_LEVEL", "verbose")],
            vec![
                ("HAVENCART_BOOKS_TABLE_NAME", "Shared"),
                ("HAVENCART_RECIPES_TABLE_NAME", "Shared"),
            ],
        ] {
            assert!(
                matches!(
                    Config::from_source(env(&pairs)),
                    Err(ConfigError::ValidationError { .. })
                ),
                "expected validation error for {:?}",
                pairs
            );
        }
    }

    #[test]
    fn test_needs_aws() {
        let memory = Config::from_source(env(&[("HAVENCART_STORAGE_BACKEND", "memory")])).unwrap();
        assert!(!memory.needs_aws());

        let memory_with_parameter = Config::from_source(env(&[
            ("HAVENCART_STORAGE_BACKEND", "memory"),
            ("HAVENCART_ASSETS_CDN_PARAMETER", "/havencart/cdn-url"),
        ]))
        .unwrap();
        assert!(memory_with_parameter.needs_aws());

        let dynamodb = Config::from_source(env(&[])).unwrap();
        assert!(dynamodb.needs_aws());
    }

    #[test]
    fn test_table_definitions() {
        let config: DatabaseConfig = load_section("database", env(&[])).unwrap();
        let definitions = config.table_definitions();

        assert_eq!(definitions.len(), 7);
        let favorites = definitions
            .iter()
            .find(|d| d.name == default_favorites_table())
            .unwrap();
        assert_eq!(favorites.hash_key, "user_id");
        assert_eq!(favorites.range_key.as_deref(), Some("item_id"));

        let carts = definitions
            .iter()
            .find(|d| d.name == default_carts_table())
            .unwrap();
        assert_eq!(carts.hash_key, "user_id");
        assert_eq!(carts.range_key, None);
    }

    #[tokio::test]
    async fn test_resolve_cdn_without_parameter() {
        let config: DatabaseConfig = load_section(
            "database",
            env(&[("HAVENCART_ASSETS_CDN_URL", "https://cdn.test.example")]),
        )
        .unwrap();

        assert_eq!(
            config.resolve_assets_cdn_url(None).await,
            "https://cdn.test.example"
        );
    }

    #[test]
    fn test_server_config_request_timeout() {
        let config = ServerConfig {
            host: "localhost".to_string(),
            port: 8080,
            request_timeout_seconds: 45,
            max_request_size: 1024,
        };

        assert_eq!(config.request_timeout(), Duration::from_secs(45));
    }

    #[tokio::test]
    async fn test_parameter_store_config_cache() {
        let ssm_config = aws_sdk_ssm::Config::builder()
            .region(aws_sdk_ssm::config::Region::new("us-west-2"))
            .behavior_version(aws_sdk_ssm::config::BehaviorVersion::latest())
            .build();
        let parameter_store =
            ParameterStoreConfig::new(SsmClient::from_conf(ssm_config), Duration::from_secs(60));

        assert_eq!(parameter_store.cache_size().await, 0);
        parameter_store.clear_cache().await;
        assert_eq!(parameter_store.cache_size().await, 0);
    }

    #[test]
    fn test_config_error_display() {
        let error = ConfigError::ParameterNotFound {
            name: "/havencart/cdn-url".to_string(),
        };
        assert_eq!(error.to_string(), "Parameter not found: /havencart/cdn-url");

        let error = ConfigError::ValidationError {
            message: "Invalid configuration".to_string(),
        };
        assert_eq!(error.to_string(), "Validation error: Invalid configuration");
    }

    #[test]
    fn test_default_values() {
        assert_eq!(default_host(), "0.0.0.0");
        assert_eq!(default_port(), 8080);
        assert_eq!(default_timeout(), 30);
        assert_eq!(default_max_request_size(), 1024 * 1024);
        assert_eq!(default_products_table(), "HavenCartProducts");
        assert_eq!(default_carts_table(), "HavenCartCarts");
        assert_eq!(default_region(), "us-west-2");
        assert_eq!(default_assets_cdn_url(), "");
        assert_eq!(default_service_name(), "havencart");
        assert_eq!(default_log_level(), "info");
    }
}
