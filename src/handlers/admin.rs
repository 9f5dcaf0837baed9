use axum::{
    extract::State,
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use serde::Serialize;
use tracing::{error, info, instrument, warn};

use super::ApiError;
use crate::app::AppState;
use crate::repositories::TableSetupStatus;
use crate::services::StoreStats;

/// Response for seeding operations
#[derive(Debug, Serialize)]
pub struct SeedResponse {
    pub message: String,
    pub products_created: usize,
    pub books_created: usize,
    pub recipes_created: usize,
    pub errors: Vec<String>,
    pub timestamp: String,
}

/// Response for table setup operations
#[derive(Debug, Serialize)]
pub struct SetupTablesResponse {
    pub message: String,
    pub tables_created: Vec<String>,
    pub tables_existing: Vec<String>,
    pub timestamp: String,
}

#[derive(Debug, Serialize)]
pub struct StatsResponse {
    #[serde(flatten)]
    pub stats: StoreStats,
    pub timestamp: String,
}

/// Database management and dashboard endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/admin/setup-tables", post(setup_tables))
        .route("/api/admin/seed", post(seed_database))
        .route("/api/admin/stats", get(store_stats))
}

/// Create every missing table; a no-op on the memory backend
#[instrument(name = "setup_tables", skip(state))]
pub async fn setup_tables(
    State(state): State<AppState>,
) -> Result<Json<SetupTablesResponse>, ApiError> {
    info!("Setting up tables");

    let statuses = state.services.admin.setup_tables().await.map_err(|err| {
        error!("Failed to create tables: {}", err);
        ApiError::from(err)
    })?;

    let mut tables_created = Vec::new();
    let mut tables_existing = Vec::new();
    for (table_name, status) in statuses {
        match status {
            TableSetupStatus::Created => tables_created.push(table_name),
            TableSetupStatus::AlreadyExists => tables_existing.push(table_name),
        }
    }

    info!("Created tables: {:?}", tables_created);
    Ok(Json(SetupTablesResponse {
        message: format!(
            "Created {} tables, {} already existed",
            tables_created.len(),
            tables_existing.len()
        ),
        tables_created,
        tables_existing,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

/// Seed the catalog with sample products, books and recipes
#[instrument(name = "seed_database", skip(state))]
pub async fn seed_database(State(state): State<AppState>) -> Result<Json<SeedResponse>, ApiError> {
    info!("Seeding catalog with sample data");

    let report = state.services.admin.seed().await.map_err(|err| {
        error!("Failed to seed database: {}", err);
        ApiError::new(StatusCode::INTERNAL_SERVER_ERROR, "Failed to seed database")
    })?;

    let message = if report.errors.is_empty() {
        format!("Database seeded with {} entries", report.total_created())
    } else {
        warn!("Seeding completed with {} errors", report.errors.len());
        format!(
            "Database seeded with {} entries, {} errors occurred",
            report.total_created(),
            report.errors.len()
        )
    };

    Ok(Json(SeedResponse {
        message,
        products_created: report.products_created,
        books_created: report.books_created,
        recipes_created: report.recipes_created,
        errors: report.errors,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}

#[instrument(name = "store_stats", skip(state))]
pub async fn store_stats(State(state): State<AppState>) -> Result<Json<StatsResponse>, ApiError> {
    let stats = state.services.admin.stats().await?;

    Ok(Json(StatsResponse {
        stats,
        timestamp: chrono::Utc::now().to_rfc3339(),
    }))
}
