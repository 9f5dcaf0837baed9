use anyhow::Context;
use std::{net::SocketAddr, sync::Arc};
use tokio::net::TcpListener;
use tracing::{info, warn};

use havencart::{
    config::{AwsConfig, StorageBackend},
    create_app, init_observability,
    observability::{Metrics, ObservabilitySettings},
    shutdown_observability, AppServices, Config,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration first (no subscriber yet)
    let config = Config::from_environment().context("Failed to load configuration")?;

    init_observability(&ObservabilitySettings {
        service_name: &config.observability.service_name,
        service_version: &config.observability.service_version,
        otlp_endpoint: config.observability.otlp_endpoint.as_deref().unwrap_or(""),
        enable_json_logging: config.observability.enable_json_logging,
        log_level: &config.observability.log_level,
    })?;

    info!(
        "Starting {} v{}",
        config.observability.service_name, config.observability.service_version
    );
    info!("Storage backend: {}", config.database.storage_backend);

    let metrics = Arc::new(Metrics::new()?);

    let aws = if config.needs_aws() {
        info!("Region: {}", config.database.region);
        Some(AwsConfig::load(&config.database.region).await)
    } else {
        None
    };

    let assets_cdn_url = config
        .database
        .resolve_assets_cdn_url(aws.as_ref().map(|aws| aws.parameter_store.as_ref()))
        .await;
    if assets_cdn_url.is_empty() {
        warn!("No assets CDN configured, image paths are served as stored");
    }

    let services = match (&config.database.storage_backend, aws) {
        (StorageBackend::Dynamodb, Some(aws)) => {
            info!(
                "DynamoDB tables: products={}, books={}, recipes={}, carts={}, favorites={}, contacts={}, reviews={}",
                config.database.products_table_name,
                config.database.books_table_name,
                config.database.recipes_table_name,
                config.database.carts_table_name,
                config.database.favorites_table_name,
                config.database.contacts_table_name,
                config.database.reviews_table_name
            );
            AppServices::dynamodb(
                Arc::new(aws.dynamodb_client),
                &config.database,
                assets_cdn_url,
            )
        }
        _ => AppServices::in_memory(assets_cdn_url),
    };

    let app = create_app(services, metrics, &config.server);

    let addr: SocketAddr = config
        .server
        .bind_address()
        .parse()
        .with_context(|| format!("Invalid bind address {}", config.server.bind_address()))?;
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;

    info!("Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    shutdown_observability().await;
    info!("Server shutdown complete");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
