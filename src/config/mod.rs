use aws_config::BehaviorVersion;
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_sdk_ssm::Client as SsmClient;
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Arc;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::RwLock;
use tracing::{debug, info, warn};

use crate::repositories::TableDefinition;

/// Prefix of every environment variable read by the service
pub const ENV_PREFIX: &str = "HAVENCART";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading error: {message}")]
    LoadError { message: String },

    #[error("Parameter not found: {name}")]
    ParameterNotFound { name: String },

    #[error("AWS SDK error: {source}")]
    AwsSdk {
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Validation error: {message}")]
    ValidationError { message: String },
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_timeout")]
    pub request_timeout_seconds: u64,
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

/// Where documents are kept
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Dynamodb,
    Memory,
}

impl fmt::Display for StorageBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StorageBackend::Dynamodb => write!(f, "dynamodb"),
            StorageBackend::Memory => write!(f, "memory"),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    #[serde(default = "default_storage_backend")]
    pub storage_backend: StorageBackend,
    #[serde(default = "default_products_table")]
    pub products_table_name: String,
    #[serde(default = "default_books_table")]
    pub books_table_name: String,
    #[serde(default = "default_recipes_table")]
    pub recipes_table_name: String,
    #[serde(default = "default_carts_table")]
    pub carts_table_name: String,
    #[serde(default = "default_favorites_table")]
    pub favorites_table_name: String,
    #[serde(default = "default_contacts_table")]
    pub contacts_table_name: String,
    #[serde(default = "default_reviews_table")]
    pub reviews_table_name: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_assets_cdn_url")]
    pub assets_cdn_url: String,
    /// SSM parameter holding the CDN url; overrides `assets_cdn_url` when set
    #[serde(default)]
    pub assets_cdn_parameter: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_service_name")]
    pub service_name: String,
    #[serde(default = "default_service_version")]
    pub service_version: String,
    #[serde(default)]
    pub otlp_endpoint: Option<String>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default = "default_enable_json_logging")]
    pub enable_json_logging: bool,
}

/// Clients for the AWS services the DynamoDB backend talks to
#[derive(Debug, Clone)]
pub struct AwsConfig {
    pub region: String,
    pub dynamodb_client: DynamoDbClient,
    pub parameter_store: Arc<ParameterStoreConfig>,
}

pub struct ParameterStoreConfig {
    ssm_client: SsmClient,
    cache: Arc<RwLock<HashMap<String, (String, Instant)>>>,
    cache_ttl: Duration,
}

impl fmt::Debug for ParameterStoreConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParameterStoreConfig")
            .field("cache_ttl", &self.cache_ttl)
            .field("cache_size", &"<runtime>")
            .finish()
    }
}

/// Deserialize one section from `HAVENCART_*` variables.
/// `source` replaces the process environment, which keeps tests hermetic.
pub(crate) fn load_section<T: DeserializeOwned>(
    section: &str,
    source: Option<HashMap<String, String>>,
) -> Result<T, ConfigError> {
    let settings = config::Config::builder()
        .add_source(
            config::Environment::with_prefix(ENV_PREFIX)
                .try_parsing(true)
                .source(source),
        )
        .build()
        .map_err(|e| ConfigError::LoadError {
            message: format!("Failed to load {} config: {}", section, e),
        })?;

    settings.try_deserialize().map_err(|e| ConfigError::LoadError {
        message: format!("Failed to deserialize {} config: {}", section, e),
    })
}

impl Config {
    pub fn from_environment() -> Result<Self, ConfigError> {
        Self::from_source(None)
    }

    /// Load every section from `source`, or from the process environment when `None`
    pub fn from_source(source: Option<HashMap<String, String>>) -> Result<Self, ConfigError> {
        info!("Loading configuration from environment");

        let config = Config {
            server: load_section("server", source.clone())?,
            database: load_section("database", source.clone())?,
            observability: load_section("observability", source)?,
        };
        config.validate()?;

        debug!("Configuration: {:?}", config);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let invalid = |message: &str| ConfigError::ValidationError {
            message: message.to_string(),
        };

        if self.server.port == 0 {
            return Err(invalid("Server port cannot be 0"));
        }
        if self.server.request_timeout_seconds == 0 {
            return Err(invalid("Request timeout cannot be 0"));
        }
        if self.server.max_request_size == 0 {
            return Err(invalid("Max request size cannot be 0"));
        }

        let tables = self.database.table_names();
        if tables.iter().any(|name| name.trim().is_empty()) {
            return Err(invalid("Table names cannot be empty"));
        }
        if tables.iter().collect::<HashSet<_>>().len() != tables.len() {
            return Err(invalid("Every collection needs its own table"));
        }
        if self.database.region.trim().is_empty() {
            return Err(invalid("Region cannot be empty"));
        }

        let level = self.observability.log_level.to_lowercase();
        if !["trace", "debug", "info", "warn", "error"].contains(&level.as_str()) {
            return Err(ConfigError::ValidationError {
                message: format!("Unknown log level: {}", self.observability.log_level),
            });
        }

        Ok(())
    }

    /// AWS clients are only needed for DynamoDB storage or an SSM-held CDN url
    pub fn needs_aws(&self) -> bool {
        self.database.storage_backend == StorageBackend::Dynamodb
            || self.database.assets_cdn_parameter.is_some()
    }
}

impl ServerConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }

    pub fn bind_address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl DatabaseConfig {
    fn table_names(&self) -> [&String; 7] {
        [
            &self.products_table_name,
            &self.books_table_name,
            &self.recipes_table_name,
            &self.carts_table_name,
            &self.favorites_table_name,
            &self.contacts_table_name,
            &self.reviews_table_name,
        ]
    }

    /// Key layout of every table the DynamoDB backend uses
    pub fn table_definitions(&self) -> Vec<TableDefinition> {
        vec![
            TableDefinition::keyed_by(&self.products_table_name, "id"),
            TableDefinition::keyed_by(&self.books_table_name, "id"),
            TableDefinition::keyed_by(&self.recipes_table_name, "id"),
            TableDefinition::keyed_by(&self.carts_table_name, "user_id"),
            TableDefinition::keyed_by(&self.favorites_table_name, "user_id")
                .with_range_key("item_id"),
            TableDefinition::keyed_by(&self.contacts_table_name, "id"),
            TableDefinition::keyed_by(&self.reviews_table_name, "id"),
        ]
    }

    /// CDN url from Parameter Store when configured, falling back to `assets_cdn_url`
    pub async fn resolve_assets_cdn_url(&self, parameter_store: Option<&ParameterStoreConfig>) -> String {
        match (&self.assets_cdn_parameter, parameter_store) {
            (Some(name), Some(store)) => {
                store
                    .get_parameter_with_default(name, &self.assets_cdn_url)
                    .await
            }
            (Some(name), None) => {
                warn!("No parameter store available to resolve {}", name);
                self.assets_cdn_url.clone()
            }
            (None, _) => self.assets_cdn_url.clone(),
        }
    }
}

impl AwsConfig {
    pub async fn load(region: &str) -> Self {
        let shared_config = aws_config::defaults(BehaviorVersion::latest())
            .region(aws_config::Region::new(region.to_string()))
            .load()
            .await;

        let parameter_store = Arc::new(ParameterStoreConfig::new(
            SsmClient::new(&shared_config),
            Duration::from_secs(5 * 60),
        ));

        Self {
            region: region.to_string(),
            dynamodb_client: DynamoDbClient::new(&shared_config),
            parameter_store,
        }
    }
}

impl ParameterStoreConfig {
    pub fn new(ssm_client: SsmClient, cache_ttl: Duration) -> Self {
        Self {
            ssm_client,
            cache: Arc::new(RwLock::new(HashMap::new())),
            cache_ttl,
        }
    }

    pub async fn get_parameter(&self, name: &str) -> Result<String, ConfigError> {
        {
            let cache = self.cache.read().await;
            if let Some((value, timestamp)) = cache.get(name) {
                if timestamp.elapsed() < self.cache_ttl {
                    debug!("Parameter found in cache: {}", name);
                    return Ok(value.clone());
                }
                debug!("Parameter cache expired: {}", name);
            }
        }

        debug!("Fetching parameter from AWS SSM: {}", name);
        let result = self
            .ssm_client
            .get_parameter()
            .name(name)
            .with_decryption(false)
            .send()
            .await
            .map_err(|e| ConfigError::AwsSdk {
                source: Box::new(e),
            })?;

        let value = result
            .parameter()
            .and_then(|p| p.value())
            .ok_or_else(|| ConfigError::ParameterNotFound {
                name: name.to_string(),
            })?
            .to_string();

        self.cache
            .write()
            .await
            .insert(name.to_string(), (value.clone(), Instant::now()));

        Ok(value)
    }

    pub async fn get_parameter_with_default(&self, name: &str, default: &str) -> String {
        match self.get_parameter(name).await {
            Ok(value) => value,
            Err(e) => {
                warn!("Failed to get parameter {}, using default: {}", name, e);
                default.to_string()
            }
        }
    }

    pub async fn clear_cache(&self) {
        self.cache.write().await.clear();
        info!("Parameter store cache cleared");
    }

    pub async fn cache_size(&self) -> usize {
        self.cache.read().await.len()
    }
}

// Default value functions
pub(crate) fn default_host() -> String {
    "0.0.0.0".to_string()
}

pub(crate) fn default_port() -> u16 {
    8080
}

pub(crate) fn default_timeout() -> u64 {
    30
}

pub(crate) fn default_max_request_size() -> usize {
    1024 * 1024 // 1MB
}

pub(crate) fn default_storage_backend() -> StorageBackend {
    StorageBackend::Dynamodb
}

pub(crate) fn default_products_table() -> String {
    "HavenCartProducts".to_string()
}

pub(crate) fn default_books_table() -> String {
    "HavenCartBooks".to_string()
}

pub(crate) fn default_recipes_table() -> String {
    "HavenCartRecipes".to_string()
}

pub(crate) fn default_carts_table() -> String {
    "HavenCartCarts".to_string()
}

pub(crate) fn default_favorites_table() -> String {
    "HavenCartFavorites".to_string()
}

pub(crate) fn default_contacts_table() -> String {
    "HavenCartContacts".to_string()
}

pub(crate) fn default_reviews_table() -> String {
    "HavenCartReviews".to_string()
}

pub(crate) fn default_region() -> String {
    "us-west-2".to_string()
}

pub(crate) fn default_assets_cdn_url() -> String {
    String::new()
}

pub(crate) fn default_service_name() -> String {
    "havencart".to_string()
}

pub(crate) fn default_service_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

pub(crate) fn default_enable_json_logging() -> bool {
    false
}

#[cfg(test)]
mod tests;
