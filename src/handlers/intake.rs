use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::Json,
    routing::{delete, get, post, put},
    Router,
};
use tracing::instrument;

use super::{ApiError, ApiJson, ApiQuery};
use crate::app::AppState;
use crate::models::{
    Contact, ContactFilters, CreateContactRequest, CreateReviewRequest, ListResponse,
    PageRequest, Review, ReviewFilters, ReviewSummary, UpdateContactStatusRequest,
    UpdateReviewStatusRequest,
};

const CONTACT: &str = "contact";
const REVIEW: &str = "review";

/// Contact form and product reviews, public intake plus admin moderation
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/contact", post(submit_contact))
        .route(
            "/api/products/:product_id/reviews",
            get(list_product_reviews).post(submit_review),
        )
        .route(
            "/api/products/:product_id/reviews/summary",
            get(review_summary),
        )
        .route("/api/admin/contacts", get(list_contacts))
        .route(
            "/api/admin/contacts/:contact_id",
            get(get_contact).delete(delete_contact),
        )
        .route(
            "/api/admin/contacts/:contact_id/status",
            put(update_contact_status),
        )
        .route("/api/admin/reviews", get(list_reviews))
        .route("/api/admin/reviews/:review_id", delete(delete_review))
        .route(
            "/api/admin/reviews/:review_id/status",
            put(update_review_status),
        )
}

// =============================================================================
// CONTACT
// =============================================================================

#[instrument(skip_all)]
pub async fn submit_contact(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateContactRequest>,
) -> Result<(StatusCode, Json<Contact>), ApiError> {
    let contact = state
        .tracer
        .trace_intake_operation(CONTACT, "submit", state.services.contacts.submit(request))
        .await?;

    Ok((StatusCode::CREATED, Json(contact)))
}

#[instrument(skip(state))]
pub async fn list_contacts(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<ContactFilters>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<ListResponse<Contact>>, ApiError> {
    let contacts = state
        .tracer
        .trace_intake_operation(
            CONTACT,
            "list",
            state.services.contacts.list(filters, page),
        )
        .await?;

    Ok(Json(contacts))
}

#[instrument(skip(state))]
pub async fn get_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state
        .tracer
        .trace_intake_operation(CONTACT, "get", state.services.contacts.get(&contact_id))
        .await?;

    Ok(Json(contact))
}

#[instrument(skip(state, request))]
pub async fn update_contact_status(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
    ApiJson(request): ApiJson<UpdateContactStatusRequest>,
) -> Result<Json<Contact>, ApiError> {
    let contact = state
        .tracer
        .trace_intake_operation(
            CONTACT,
            "update_status",
            state
                .services
                .contacts
                .update_status(&contact_id, request.status),
        )
        .await?;

    Ok(Json(contact))
}

#[instrument(skip(state))]
pub async fn delete_contact(
    State(state): State<AppState>,
    Path(contact_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .tracer
        .trace_intake_operation(
            CONTACT,
            "delete",
            state.services.contacts.delete(&contact_id),
        )
        .await?;

    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// REVIEWS
// =============================================================================

/// Reviews start as pending and stay hidden until approved
#[instrument(skip(state, request))]
pub async fn submit_review(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
    ApiJson(request): ApiJson<CreateReviewRequest>,
) -> Result<(StatusCode, Json<Review>), ApiError> {
    let review = state
        .tracer
        .trace_intake_operation(
            REVIEW,
            "submit",
            state.services.reviews.submit(&product_id, request),
        )
        .await?;

    Ok((StatusCode::CREATED, Json(review)))
}

#[instrument(skip(state))]
pub async fn list_product_reviews(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<Vec<Review>>, ApiError> {
    let reviews = state
        .tracer
        .trace_intake_operation(
            REVIEW,
            "list_for_product",
            state.services.reviews.list_for_product(&product_id),
        )
        .await?;

    Ok(Json(reviews))
}

#[instrument(skip(state))]
pub async fn review_summary(
    State(state): State<AppState>,
    Path(product_id): Path<String>,
) -> Result<Json<ReviewSummary>, ApiError> {
    let summary = state
        .tracer
        .trace_intake_operation(
            REVIEW,
            "summary",
            state.services.reviews.summary(&product_id),
        )
        .await?;

    Ok(Json(summary))
}

#[instrument(skip(state))]
pub async fn list_reviews(
    State(state): State<AppState>,
    ApiQuery(filters): ApiQuery<ReviewFilters>,
    ApiQuery(page): ApiQuery<PageRequest>,
) -> Result<Json<ListResponse<Review>>, ApiError> {
    let reviews = state
        .tracer
        .trace_intake_operation(REVIEW, "list", state.services.reviews.list(filters, page))
        .await?;

    Ok(Json(reviews))
}

#[instrument(skip(state, request))]
pub async fn update_review_status(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
    ApiJson(request): ApiJson<UpdateReviewStatusRequest>,
) -> Result<Json<Review>, ApiError> {
    let review = state
        .tracer
        .trace_intake_operation(
            REVIEW,
            "update_status",
            state
                .services
                .reviews
                .update_status(&review_id, request.status),
        )
        .await?;

    Ok(Json(review))
}

#[instrument(skip(state))]
pub async fn delete_review(
    State(state): State<AppState>,
    Path(review_id): Path<String>,
) -> Result<StatusCode, ApiError> {
    state
        .tracer
        .trace_intake_operation(REVIEW, "delete", state.services.reviews.delete(&review_id))
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
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tower::ServiceExt;

    fn test_state() -> AppState {
        AppState::new(
            AppServices::in_memory(String::new()),
            Arc::new(Metrics::new().unwrap()),
        )
    }

    async fn send(state: &AppState, method: &str, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
        let builder = Request::builder().method(method).uri(uri);
        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        let response = routes()
            .with_state(state.clone())
            .oneshot(request)
            .await
            .unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    #[tokio::test]
    async fn test_contact_submission_and_moderation() {
        let state = test_state();

        let (status, contact) = send(
            &state,
            "POST",
            "/api/contact",
            Some(json!({
                "name": "Ada",
                "email": "Ada@Example.com",
                "message": "Do you ship to Norway?"
            })),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(contact["status"], "new");
        assert_eq!(contact["email"], "ada@example.com");
        let id = contact["id"].as_str().unwrap().to_string();

        let (status, updated) = send(
            &state,
            "PUT",
            &format!("/api/admin/contacts/{}/status", id),
            Some(json!({"status": "in_progress"})),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(updated["status"], "in_progress");

        let (_, listed) = send(&state, "GET", "/api/admin/contacts?status=in_progress", None).await;
        assert_eq!(listed["total_count"], 1);

        let (_, listed) = send(&state, "GET", "/api/admin/contacts?status=resolved", None).await;
        assert_eq!(listed["total_count"], 0);

        let (status, _) = send(&state, "DELETE", &format!("/api/admin/contacts/{}", id), None).await;
        assert_eq!(status, StatusCode::NO_CONTENT);

        let (status, _) = send(&state, "GET", &format!("/api/admin/contacts/{}", id), None).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_invalid_email_is_400() {
        let (status, body) = send(
            &test_state(),
            "POST",
            "/api/contact",
            Some(json!({"name": "Ada", "email": "ada@localhost", "message": "Hello there"})),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("email"));
    }

    #[tokio::test]
    async fn test_reviews_hidden_until_approved() {
        let state = test_state();
        let product = state
            .services
            .products
            .create(CreateProductRequest {
                name: "Stoneware Bowl".to_string(),
                description: "Hand-thrown bowl with a speckled glaze".to_string(),
                price: dec!(18.00),
                category: "Tableware".to_string(),
                stock: 30,
                images: vec![],
                is_featured: true,
                is_new_arrival: false,
                on_sale: false,
            })
            .await
            .unwrap();
        let reviews_uri = format!("/api/products/{}/reviews", product.id);

        let mut ids = Vec::new();
        for rating in [5, 4, 1] {
            let (status, review) = send(
                &state,
                "POST",
                &reviews_uri,
                Some(json!({"author_name": "Sam", "rating": rating, "comment": "Lovely glaze"})),
            )
            .await;
            assert_eq!(status, StatusCode::CREATED);
            assert_eq!(review["status"], "pending");
            ids.push(review["id"].as_str().unwrap().to_string());
        }

        let (_, visible) = send(&state, "GET", &reviews_uri, None).await;
        assert_eq!(visible.as_array().unwrap().len(), 0);

        for id in &ids[..2] {
            let (status, _) = send(
                &state,
                "PUT",
                &format!("/api/admin/reviews/{}/status", id),
                Some(json!({"status": "approved"})),
            )
            .await;
            assert_eq!(status, StatusCode::OK);
        }

        let (_, visible) = send(&state, "GET", &reviews_uri, None).await;
        assert_eq!(visible.as_array().unwrap().len(), 2);

        let (_, summary) = send(&state, "GET", &format!("{}/summary", reviews_uri), None).await;
        assert_eq!(summary["review_count"], 2);
        let average: Decimal = summary["average_rating"].as_str().unwrap().parse().unwrap();
        assert_eq!(average, dec!(4.5));

        let (_, pending) = send(&state, "GET", "/api/admin/reviews?status=pending", None).await;
        assert_eq!(pending["total_count"], 1);
    }

    #[tokio::test]
    async fn test_review_for_unknown_product_is_404() {
        let (status, _) = send(
            &test_state(),
            "POST",
            "/api/products/Pmissing1/reviews",
            Some(json!({"author_name": "Sam", "rating": 5, "comment": "Great"})),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }
}
