use axum::{response::Json, routing::get, Router};
use serde_json::{json, Value};
use tracing::instrument;

use super::metrics_handler;
use crate::app::AppState;

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/health/status", get(health_check))
        .route("/metrics", get(metrics_handler))
}

/// Health check endpoint handler
#[instrument(name = "health_check")]
pub async fn health_check() -> Json<Value> {
    Json(json!({
        "status": "healthy",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339()
    }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_health_check() {
        let Json(body) = health_check().await;
        assert_eq!(body["status"], "healthy");
        assert_eq!(body["service"], "havencart");
        assert!(body["timestamp"].is_string());
    }
}
