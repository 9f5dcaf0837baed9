use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{get, post, put},
    Router,
};
use tracing::instrument;

use super::{ApiError, ApiJson};
use crate::app::AppState;
use crate::models::{AddCartItemRequest, CartResponse, UpdateCartItemRequest};

/// Create cart router with all endpoints
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/cart/:user_id", get(get_cart).delete(clear_cart))
        .route("/api/cart/:user_id/items", post(add_cart_item))
        .route(
            "/api/cart/:user_id/items/:item_id",
            put(update_cart_item).delete(remove_cart_item),
        )
}

/// Get a user's cart, empty when none exists
#[instrument(skip(state))]
pub async fn get_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .tracer
        .trace_cart_operation("get", &user_id, state.services.carts.get_cart(&user_id))
        .await?;

    Ok(Json(cart))
}

#[instrument(skip(state, request))]
pub async fn add_cart_item(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<AddCartItemRequest>,
) -> Result<(StatusCode, Json<CartResponse>), ApiError> {
    let cart = state
        .tracer
        .trace_cart_operation(
            "add_item",
            &user_id,
            state.services.carts.add_item(&user_id, request),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(cart)))
}

/// Overwrite the line quantity; zero or less removes the line
#[instrument(skip(state, request))]
pub async fn update_cart_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
    ApiJson(request): ApiJson<UpdateCartItemRequest>,
) -> Result<Json<CartResponse>, ApiError> {
    let cart = state
        .tracer
        .trace_cart_operation(
            "update_item",
            &user_id,
            state.services.carts.update_item(&user_id, &item_id, request),
        )
        .await?;

    Ok(Json(cart))
}

#[instrument(skip(state))]
pub async fn remove_cart_item(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .tracer
        .trace_cart_operation(
            "remove_item",
            &user_id,
            state.services.carts.remove_item(&user_id, &item_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[instrument(skip(state))]
pub async fn clear_cart(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .tracer
        .trace_cart_operation("clear", &user_id, state.services.carts.clear_cart(&user_id))
        .await?;

    Ok(StatusCode::NO_CONTENT)
}
