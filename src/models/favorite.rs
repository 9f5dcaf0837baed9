use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ItemType;

/// A (user, item) pair marking an item as favorited
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FavoriteEntry {
    pub user_id: String,
    pub item_id: String,
    pub item_type: ItemType,
    pub added_at: DateTime<Utc>,
}

impl FavoriteEntry {
    pub fn new(user_id: String, item_id: String, item_type: ItemType) -> Self {
        Self {
            user_id,
            item_id,
            item_type,
            added_at: Utc::now(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddFavoriteRequest {
    pub item_id: String,
    pub item_type: ItemType,
}

/// Favorite joined against the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteResponse {
    pub item_id: String,
    pub item_type: ItemType,
    pub name: String,
    pub image: Option<String>,
    pub price: Decimal,
    pub is_available: bool,
    pub added_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteListResponse {
    pub user_id: String,
    pub items: Vec<FavoriteResponse>,
    pub total_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FavoriteStatusResponse {
    pub user_id: String,
    pub item_id: String,
    pub is_favorite: bool,
}
