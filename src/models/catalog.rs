use rust_decimal::Decimal;
use serde::{de::DeserializeOwned, Serialize};
use std::fmt::Debug;

use super::{Document, Validate};

/// A document type served by the public catalog and managed through the admin API
pub trait CatalogEntry: Document + Serialize + Debug {
    type Create: Validate + DeserializeOwned + Debug + Send + 'static;
    type Update: Validate + DeserializeOwned + Debug + Send + 'static;
    type Filters: Default + DeserializeOwned + Debug + Send + Sync + 'static;

    /// Build a new entry with a generated id and fresh timestamps
    fn from_request(request: Self::Create) -> Self;

    /// Overwrite the fields present in the request and refresh `updated_at`
    fn apply_update(&mut self, request: Self::Update);

    fn matches_filters(&self, filters: &Self::Filters) -> bool;

    /// Copy of the entry with stored asset paths resolved against the CDN
    fn with_resolved_assets(&self, assets_cdn_url: &str) -> Self;
}

/// Catalog entries that can be put in a cart or favorited
pub trait Purchasable {
    fn display_name(&self) -> &str;
    fn unit_price(&self) -> Decimal;
    fn primary_image(&self) -> Option<&str>;
    fn in_stock(&self) -> bool;
}

/// Case-insensitive substring match used by the `search` filters
pub(crate) fn contains_ignore_case(haystack: &str, needle_lower: &str) -> bool {
    haystack.to_lowercase().contains(needle_lower)
}

/// Case-insensitive equality used by the `category` filters
pub(crate) fn equals_ignore_case(value: &str, other: &str) -> bool {
    value.to_lowercase() == other.to_lowercase()
}

/// Shared price bounds check for product and book filters
pub(crate) fn within_price_range(
    price: Decimal,
    min_price: Option<Decimal>,
    max_price: Option<Decimal>,
) -> bool {
    if let Some(min_price) = min_price {
        if price < min_price {
            return false;
        }
    }
    if let Some(max_price) = max_price {
        if price > max_price {
            return false;
        }
    }
    true
}
