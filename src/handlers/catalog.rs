use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use std::sync::Arc;
use tracing::instrument;

use super::{ApiError, ApiJson, ApiQuery};
use crate::app::AppState;
use crate::models::{Book, CatalogEntry, ListResponse, PageRequest, Product, Recipe};
use crate::services::CatalogService;

/// Label used for catalog metrics, e.g. "product"
fn kind_label<T: CatalogEntry>() -> String {
    T::KIND.to_lowercase()
}

/// Public browsing and admin management for products, books and recipes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/products", get(list_entries::<Product>))
        .route("/api/products/:product_id", get(get_entry::<Product>))
        .route("/api/books", get(list_entries::<Book>))
        .route("/api/books/:book_id", get(get_entry::<Book>))
        .route("/api/recipes", get(list_entries::<Recipe>))
        .route("/api/recipes/:recipe_id", get(get_entry::<Recipe>))
        .route("/api/admin/products", post(create_entry::<Product>))
        .route(
            "/api/admin/products/:id",
            put(update_entry::<Product>).delete(delete_entry::<Product>),
        )
        .route("/api/admin/books", post(create_entry::<Book>))
        .route(
            "/api/admin/books/:id",
            put(update_entry::<Book>).delete(delete_entry::<Book>),
        )
        .route("/api/admin/recipes", post(create_entry::<Recipe>))
        .route(
            "/api/admin/recipes/:id",
            put(update_entry::<Recipe>).delete(delete_entry::<Recipe>),
        )
}

/// List entries matching the query filters, oldest first
#[instrument(name = "list_catalog", skip_all, fields(kind = T::KIND))]
pub async fn list_entries<T>(
    State(service): State<Arc<CatalogService<T>>>,
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<T::Filters>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<ListResponse<T>>, ApiError>
where
    T: CatalogEntry,
    Arc<CatalogService<T>>: FromRef<AppState>,
{
    let response = state
        .tracer
        .trace_catalog_operation(&kind_label::<T>(), "list", service.list(filters, page))
        .await?;

    let cdn = &state.services.assets_cdn_url;
    Ok(Json(response.map(|entry| entry.with_resolved_assets(cdn))))
}

#[instrument(name = "get_catalog_entry", skip_all, fields(kind = T::KIND, id = %id))]
pub async fn get_entry<T>(
    State(service): State<Arc<CatalogService<T>>>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<T>, ApiError>
where
    T: CatalogEntry,
    Arc<CatalogService<T>>: FromRef<AppState>,
{
    let entry = state
        .tracer
        .trace_catalog_operation(&kind_label::<T>(), "get", service.get(&id))
        .await?;

    Ok(Json(entry.with_resolved_assets(&state.services.assets_cdn_url)))
}

#[instrument(name = "create_catalog_entry", skip_all, fields(kind = T::KIND))]
pub async fn create_entry<T>(
    State(service): State<Arc<CatalogService<T>>>,
    State(state): State<AppState>,
    ApiJson(request): ApiJson<T::Create>,
) -> Result<(StatusCode, Json<T>), ApiError>
where
    T: CatalogEntry,
    Arc<CatalogService<T>>: FromRef<AppState>,
{
    let entry = state
        .tracer
        .trace_catalog_operation(&kind_label::<T>(), "create", service.create(request))
        .await?;

    crate::info_with_trace!("Created {} {}", T::KIND, entry.id());
    Ok((
        StatusCode::CREATED,
        Json(entry.with_resolved_assets(&state.services.assets_cdn_url)),
    ))
}

#[instrument(name = "update_catalog_entry", skip_all, fields(kind = T::KIND, id = %id))]
pub async fn update_entry<T>(
    State(service): State<Arc<CatalogService<T>>>,
    State(state): State<AppState>,
    Path(id): Path<String>,
    ApiJson(request): ApiJson<T::Update>,
) -> Result<Json<T>, ApiError>
where
    T: CatalogEntry,
    Arc<CatalogService<T>>: FromRef<AppState>,
{
    let entry = state
        .tracer
        .trace_catalog_operation(&kind_label::<T>(), "update", service.update(&id, request))
        .await?;

    Ok(Json(entry.with_resolved_assets(&state.services.assets_cdn_url)))
}

/// Hard delete. Carts and favorites keep their references.
#[instrument(name = "delete_catalog_entry", skip_all, fields(kind = T::KIND, id = %id))]
pub async fn delete_entry<T>(
    State(service): State<Arc<CatalogService<T>>>,
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
    T: CatalogEntry,
    Arc<CatalogService<T>>: FromRef<AppState>,
{
    state
        .tracer
        .trace_catalog_operation(&kind_label::<T>(), "delete", service.delete(&id))
        .await?;

    crate::info_with_trace!("Deleted {} {}", T::KIND, id);
    Ok(StatusCode::NO_CONTENT)
}
