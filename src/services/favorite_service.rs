use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    validate_user_id, AddFavoriteRequest, FavoriteEntry, FavoriteListResponse, FavoriteResponse,
    ServiceError, ServiceResult, Validate,
};
use crate::repositories::FavoriteRepository;

use super::cart_service::UNAVAILABLE_ITEM_NAME;
use super::catalog_service::{CatalogLookup, ItemSummary};

/// Service for managing per-user favorites
pub struct FavoriteService {
    repository: Arc<dyn FavoriteRepository>,
    catalog: CatalogLookup,
}

impl FavoriteService {
    pub fn new(repository: Arc<dyn FavoriteRepository>, catalog: CatalogLookup) -> Self {
        Self {
            repository,
            catalog,
        }
    }

    /// Favorites joined against the catalog, newest first
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn list(&self, user_id: &str) -> ServiceResult<FavoriteListResponse> {
        validate_user_id(user_id)?;

        let mut entries = self.repository.find_by_user(user_id).await?;
        entries.sort_by(|a, b| {
            b.added_at
                .cmp(&a.added_at)
                .then_with(|| a.item_id.cmp(&b.item_id))
        });

        let mut items = Vec::with_capacity(entries.len());
        for entry in entries {
            let summary = self.catalog.summary(entry.item_type, &entry.item_id).await?;
            items.push(favorite_response(entry, summary));
        }

        crate::info_with_trace!("Listed {} favorites", items.len());
        Ok(FavoriteListResponse {
            user_id: user_id.to_string(),
            total_count: items.len(),
            items,
        })
    }

    /// Add a favorite. Returns the entry and whether it was newly created.
    #[instrument(skip(self, request), fields(user_id = %user_id, item_id = %request.item_id))]
    pub async fn add(
        &self,
        user_id: &str,
        request: AddFavoriteRequest,
    ) -> ServiceResult<(FavoriteResponse, bool)> {
        validate_user_id(user_id)?;
        request.validate()?;

        if let Some(existing) = self.repository.find(user_id, &request.item_id).await? {
            info!("Item already favorited");
            let summary = self
                .catalog
                .summary(existing.item_type, &existing.item_id)
                .await?;
            return Ok((favorite_response(existing, summary), false));
        }

        let summary = self
            .catalog
            .require(request.item_type, &request.item_id)
            .await?;

        let entry = self
            .repository
            .save(FavoriteEntry::new(
                user_id.to_string(),
                request.item_id,
                request.item_type,
            ))
            .await?;

        crate::info_with_trace!("Favorite added");
        Ok((favorite_response(entry, Some(summary)), true))
    }

    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id))]
    pub async fn remove(&self, user_id: &str, item_id: &str) -> ServiceResult<()> {
        validate_user_id(user_id)?;

        if !self.repository.delete(user_id, item_id).await? {
            return Err(ServiceError::FavoriteNotFound {
                item_id: item_id.to_string(),
                user_id: user_id.to_string(),
            });
        }

        crate::info_with_trace!("Favorite removed");
        Ok(())
    }

    pub async fn is_favorite(&self, user_id: &str, item_id: &str) -> ServiceResult<bool> {
        validate_user_id(user_id)?;
        Ok(self.repository.find(user_id, item_id).await?.is_some())
    }
}

fn favorite_response(entry: FavoriteEntry, summary: Option<ItemSummary>) -> FavoriteResponse {
    let (name, image, price, is_available) = match summary {
        Some(summary) => (summary.name, summary.image, summary.unit_price, summary.in_stock),
        None => (UNAVAILABLE_ITEM_NAME.to_string(), None, Decimal::ZERO, false),
    };

    FavoriteResponse {
        item_id: entry.item_id,
        item_type: entry.item_type,
        name,
        image,
        price,
        is_available,
        added_at: entry.added_at,
    }
}
