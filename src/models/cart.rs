use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::ItemType;

/// Shopping cart for a user, one document per user
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Cart {
    pub user_id: String,
    pub items: Vec<CartItem>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Individual line in a shopping cart. Prices are resolved from the catalog at read time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CartItem {
    pub item_id: String,
    pub item_type: ItemType,
    pub quantity: u32,
    pub added_at: DateTime<Utc>,
}

/// Request model for adding an item to cart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AddCartItemRequest {
    pub item_id: String,
    pub item_type: ItemType,
    #[serde(default = "default_quantity")]
    pub quantity: u32,
}

fn default_quantity() -> u32 {
    1
}

/// Request model for overwriting a line quantity. Zero or negative removes the line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateCartItemRequest {
    pub quantity: i64,
}

/// Response model for cart operations
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartResponse {
    pub user_id: String,
    pub items: Vec<CartLineResponse>,
    pub total_items: u32,
    pub total_price: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Cart line joined against the catalog
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CartLineResponse {
    pub item_id: String,
    pub item_type: ItemType,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    pub unit_price: Decimal,
    pub line_total: Decimal,
    pub is_available: bool,
    pub added_at: DateTime<Utc>,
}

/// Outcome of overwriting a line quantity
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuantityUpdate {
    Updated,
    Removed,
    Missing,
}

impl Cart {
    /// Create a new empty cart for a user
    pub fn new(user_id: String) -> Self {
        let now = Utc::now();
        Self {
            user_id,
            items: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Add an item to the cart or increase its quantity if the line already exists.
    /// Returns the resulting line quantity.
    pub fn add_item(&mut self, item_id: String, item_type: ItemType, quantity: u32) -> u32 {
        let resulting = if let Some(existing_item) =
            self.items.iter_mut().find(|item| item.item_id == item_id)
        {
            existing_item.quantity = existing_item.quantity.saturating_add(quantity);
            existing_item.quantity
        } else {
            self.items.push(CartItem::new(item_id, item_type, quantity));
            quantity
        };
        self.updated_at = Utc::now();
        resulting
    }

    /// Overwrite the quantity of a line, deleting it when `new_quantity <= 0`
    pub fn update_item_quantity(&mut self, item_id: &str, new_quantity: i64) -> QuantityUpdate {
        if !self.contains_item(item_id) {
            return QuantityUpdate::Missing;
        }

        if new_quantity <= 0 {
            self.remove_item(item_id);
            return QuantityUpdate::Removed;
        }

        let quantity = u32::try_from(new_quantity).unwrap_or(u32::MAX);
        if let Some(item) = self.items.iter_mut().find(|item| item.item_id == item_id) {
            item.quantity = quantity;
        }
        self.updated_at = Utc::now();
        QuantityUpdate::Updated
    }

    /// Remove an item from the cart
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.item_id != item_id);
        let removed = self.items.len() != original_len;
        if removed {
            self.updated_at = Utc::now();
        }
        removed
    }

    /// Total number of units across all lines
    pub fn total_items(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn get_item(&self, item_id: &str) -> Option<&CartItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    pub fn contains_item(&self, item_id: &str) -> bool {
        self.items.iter().any(|item| item.item_id == item_id)
    }

    pub fn item_quantity(&self, item_id: &str) -> u32 {
        self.get_item(item_id).map(|item| item.quantity).unwrap_or(0)
    }
}

impl CartItem {
    pub fn new(item_id: String, item_type: ItemType, quantity: u32) -> Self {
        Self {
            item_id,
            item_type,
            quantity,
            added_at: Utc::now(),
        }
    }
}
