use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::instrument;

use crate::models::{
    sort_newest_first, validate_document_id, CreateReviewRequest, Document, ListResponse,
    PageRequest, Review, ReviewFilters, ReviewStatus, ReviewSummary, ServiceError,
    ServiceResult, Validate,
};
use crate::repositories::DocumentRepository;

use super::catalog_service::{not_found_or, ProductService};

/// Product reviews: public submission and listing, admin moderation
pub struct ReviewService {
    repository: Arc<dyn DocumentRepository<Review>>,
    products: Arc<ProductService>,
}

impl ReviewService {
    pub fn new(repository: Arc<dyn DocumentRepository<Review>>, products: Arc<ProductService>) -> Self {
        Self {
            repository,
            products,
        }
    }

    /// Store a review with status `pending`. The product must exist.
    #[instrument(skip(self, request), fields(product_id = %product_id, rating = request.rating))]
    pub async fn submit(&self, product_id: &str, request: CreateReviewRequest) -> ServiceResult<Review> {
        request.validate()?;
        self.products.get(product_id).await?;

        let review = self
            .repository
            .create(Review::from_request(product_id.to_string(), request))
            .await?;

        crate::info_with_trace!("Review {} stored as pending", review.id);
        Ok(review)
    }

    /// Approved reviews of a product, newest first
    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn list_for_product(&self, product_id: &str) -> ServiceResult<Vec<Review>> {
        self.products.get(product_id).await?;

        let mut reviews = self.reviews_of(product_id).await?;
        reviews.retain(Review::is_approved);
        sort_newest_first(&mut reviews);
        Ok(reviews)
    }

    #[instrument(skip(self), fields(product_id = %product_id))]
    pub async fn summary(&self, product_id: &str) -> ServiceResult<ReviewSummary> {
        let product = self.products.get(product_id).await?;

        let reviews = self.reviews_of(product_id).await?;
        let summary = ReviewSummary::from_reviews(product.id(), &reviews);

        crate::info_with_trace!(
            "Review summary: {} approved, average {}",
            summary.review_count,
            summary.average_rating
        );
        Ok(summary)
    }

    /// Admin listing across products, newest first
    #[instrument(skip(self), fields(filters = ?filters))]
    pub async fn list(
        &self,
        filters: ReviewFilters,
        page: PageRequest,
    ) -> ServiceResult<ListResponse<Review>> {
        page.validate()?;

        let mut reviews: Vec<Review> = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|review| review.matches_filters(&filters))
            .collect();
        sort_newest_first(&mut reviews);

        Ok(ListResponse::from_page(reviews, &page))
    }

    #[instrument(skip(self), fields(review_id = %id, status = %status))]
    pub async fn update_status(&self, id: &str, status: ReviewStatus) -> ServiceResult<Review> {
        validate_document_id("review_id", id, Review::ID_PREFIX)?;

        let mut review = self
            .repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(Review::KIND, id))?;
        review.set_status(status);

        let updated = self
            .repository
            .update(review)
            .await
            .map_err(|e| not_found_or(e, Review::KIND, id))?;

        crate::info_with_trace!("Review {} set to {}", id, status);
        Ok(updated)
    }

    #[instrument(skip(self), fields(review_id = %id))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        validate_document_id("review_id", id, Review::ID_PREFIX)?;

        self.repository
            .delete(id)
            .await
            .map_err(|e| not_found_or(e, Review::KIND, id))?;

        crate::info_with_trace!("Review {} deleted", id);
        Ok(())
    }

    pub async fn count_by_status(&self) -> ServiceResult<BTreeMap<ReviewStatus, usize>> {
        let mut counts: BTreeMap<ReviewStatus, usize> =
            ReviewStatus::ALL.iter().map(|status| (*status, 0)).collect();
        for review in self.repository.find_all().await? {
            *counts.entry(review.status).or_insert(0) += 1;
        }
        Ok(counts)
    }

    async fn reviews_of(&self, product_id: &str) -> ServiceResult<Vec<Review>> {
        let filters = ReviewFilters {
            status: None,
            product_id: Some(product_id.to_string()),
        };
        Ok(self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|review| review.matches_filters(&filters))
            .collect())
    }
}
