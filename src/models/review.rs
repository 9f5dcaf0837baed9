use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::{generate_id, Document, ReviewStatus};

/// Customer review of a product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Review {
    pub id: String,
    pub product_id: String,
    pub user_id: Option<String>,
    pub author_name: String,
    pub rating: u8,
    pub comment: String,
    pub status: ReviewStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body of `POST /api/products/:product_id/reviews`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateReviewRequest {
    pub user_id: Option<String>,
    pub author_name: String,
    pub rating: u8,
    pub comment: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateReviewStatusRequest {
    pub status: ReviewStatus,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ReviewFilters {
    pub status: Option<ReviewStatus>,
    pub product_id: Option<String>,
}

/// Aggregate over the approved reviews of one product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReviewSummary {
    pub product_id: String,
    pub review_count: usize,
    pub average_rating: Decimal,
    pub rating_distribution: BTreeMap<u8, usize>,
}

impl Review {
    pub fn from_request(product_id: String, request: CreateReviewRequest) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(Self::ID_PREFIX),
            product_id,
            user_id: request.user_id,
            author_name: request.author_name.trim().to_string(),
            rating: request.rating,
            comment: request.comment.trim().to_string(),
            status: ReviewStatus::Pending,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn set_status(&mut self, status: ReviewStatus) {
        self.status = status;
        self.updated_at = Utc::now();
    }

    pub fn is_approved(&self) -> bool {
        self.status == ReviewStatus::Approved
    }

    pub fn matches_filters(&self, filters: &ReviewFilters) -> bool {
        if let Some(status) = filters.status {
            if self.status != status {
                return false;
            }
        }
        if let Some(product_id) = &filters.product_id {
            if &self.product_id != product_id {
                return false;
            }
        }
        true
    }
}

impl Document for Review {
    const KIND: &'static str = "Review";
    const ID_PREFIX: char = 'V';

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl ReviewSummary {
    /// Summarize the approved reviews among `reviews`; anything else is ignored
    pub fn from_reviews<'a>(
        product_id: &str,
        reviews: impl IntoIterator<Item = &'a Review>,
    ) -> Self {
        let mut rating_distribution: BTreeMap<u8, usize> = (1..=5).map(|r| (r, 0)).collect();
        let mut review_count = 0usize;
        let mut rating_sum = 0u64;

        for review in reviews.into_iter().filter(|r| r.is_approved()) {
            review_count += 1;
            rating_sum += u64::from(review.rating);
            *rating_distribution.entry(review.rating).or_insert(0) += 1;
        }

        let average_rating = if review_count == 0 {
            Decimal::ZERO
        } else {
            (Decimal::from(rating_sum) / Decimal::from(review_count as u64)).round_dp(2)
        };

        Self {
            product_id: product_id.to_string(),
            review_count,
            average_rating,
            rating_distribution,
        }
    }
}
