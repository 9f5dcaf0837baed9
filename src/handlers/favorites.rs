use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::get,
    Router,
};
use tracing::instrument;

use super::{ApiError, ApiJson};
use crate::app::AppState;
use crate::models::{
    AddFavoriteRequest, FavoriteListResponse, FavoriteResponse, FavoriteStatusResponse,
};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/favorites/:user_id",
            get(list_favorites).post(add_favorite),
        )
        .route(
            "/api/favorites/:user_id/:item_id",
            get(favorite_status).delete(remove_favorite),
        )
}

#[instrument(skip(state))]
pub async fn list_favorites(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
) -> Result<Json<FavoriteListResponse>, ApiError> {
    let favorites = state
        .tracer
        .trace_favorite_operation("list", &user_id, state.services.favorites.list(&user_id))
        .await?;

    Ok(Json(favorites))
}

/// 201 for a new favorite, 200 when it already existed
#[instrument(skip(state, request))]
pub async fn add_favorite(
    State(state): State<AppState>,
    Path(user_id): Path<String>,
    ApiJson(request): ApiJson<AddFavoriteRequest>,
) -> Result<(StatusCode, Json<FavoriteResponse>), ApiError> {
    let (favorite, created) = state
        .tracer
        .trace_favorite_operation(
            "add",
            &user_id,
            state.services.favorites.add(&user_id, request),
        )
        .await?;

    let status = if created {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((status, Json(favorite)))
}

#[instrument(skip(state))]
pub async fn favorite_status(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Result<Json<FavoriteStatusResponse>, ApiError> {
    let is_favorite = state
        .tracer
        .trace_favorite_operation(
            "contains",
            &user_id,
            state.services.favorites.is_favorite(&user_id, &item_id),
        )
        .await?;

    Ok(Json(FavoriteStatusResponse {
        user_id,
        item_id,
        is_favorite,
    }))
}

#[instrument(skip(state))]
pub async fn remove_favorite(
    State(state): State<AppState>,
    Path((user_id, item_id)): Path<(String, String)>,
) -> Result<StatusCode, ApiError> {
    state
        .tracer
        .trace_favorite_operation(
            "remove",
            &user_id,
            state.services.favorites.remove(&user_id, &item_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::AppServices;
    use crate::models::CreateProductRequest;
    use crate::observability::Metrics;
    use axum::body::Body;
    use axum::http::Request;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    async fn call(state: &AppState, request: Request<Body>) -> (StatusCode, Value) {
        let response = routes()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
        (status, value)
    }

    fn add_request(item_id: &str) -> Request<Body> {
        Request::builder()
            .method("POST")
            .uri("/api/favorites/user-7")
            .header("content-type", "application/json")
            .body(Body::from(
                json!({"item_id": item_id, "item_type": "product"}).to_string(),
            ))
            .unwrap()
    }

    #[tokio::test]
    async fn test_add_favorite_is_idempotent() {
        let state = AppState::new(
            AppServices::in_memory(String::new()),
            Arc::new(Metrics::new().unwrap()),
        );
        let product = state
            .services
            .products
            .create(CreateProductRequest {
                name: "Linen Apron".to_string(),
                description: "Washed linen apron with deep pockets".to_string(),
                price: dec!(42.00),
                category: "Textiles".to_string(),
                stock: 12,
                images: vec![],
                is_featured: false,
                is_new_arrival: true,
                on_sale: false,
            })
            .await
            .unwrap();

        let (status, first) = call(&state, add_request(&product.id)).await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(first["name"], "Linen Apron");

        let (status, _) = call(&state, add_request(&product.id)).await;
        assert_eq!(status, StatusCode::OK);

        let (status, list) = call(
            &state,
            Request::builder()
                .uri("/api/favorites/user-7")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(list["total_count"], 1);

        let uri = format!("/api/favorites/user-7/{}", product.id);
        let (_, contains) = call(
            &state,
            Request::builder().uri(&uri).body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(contains["is_favorite"], true);

        let (status, _) = call(
            &state,
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, body) = call(
            &state,
            Request::builder()
                .method("DELETE")
                .uri(&uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(body["error"].as_str().unwrap().contains("Favorite not found"));
    }
}
