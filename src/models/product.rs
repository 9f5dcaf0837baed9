use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::{contains_ignore_case, equals_ignore_case, within_price_range};
use super::{generate_id, resolve_asset_url, CatalogEntry, Document, Purchasable};

/// Storefront product
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Product {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: u32,
    pub images: Vec<String>,
    pub is_featured: bool,
    pub is_new_arrival: bool,
    pub on_sale: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request model for creating a new product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateProductRequest {
    pub name: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    #[serde(default)]
    pub images: Vec<String>,
    #[serde(default)]
    pub is_featured: bool,
    #[serde(default)]
    pub is_new_arrival: bool,
    #[serde(default)]
    pub on_sale: bool,
}

/// Request model for updating an existing product
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateProductRequest {
    pub name: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub images: Option<Vec<String>>,
    pub is_featured: Option<bool>,
    pub is_new_arrival: Option<bool>,
    pub on_sale: Option<bool>,
}

/// Filters for querying products
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProductFilters {
    pub category: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub in_stock_only: Option<bool>,
    pub featured: Option<bool>,
}

impl Document for Product {
    const KIND: &'static str = "Product";
    const ID_PREFIX: char = 'P';

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CatalogEntry for Product {
    type Create = CreateProductRequest;
    type Update = UpdateProductRequest;
    type Filters = ProductFilters;

    fn from_request(request: CreateProductRequest) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(Self::ID_PREFIX),
            name: request.name.trim().to_string(),
            description: request.description.trim().to_string(),
            price: request.price,
            category: request.category.trim().to_string(),
            stock: request.stock,
            images: request.images,
            is_featured: request.is_featured,
            is_new_arrival: request.is_new_arrival,
            on_sale: request.on_sale,
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: UpdateProductRequest) {
        if let Some(name) = request.name {
            self.name = name.trim().to_string();
        }
        if let Some(description) = request.description {
            self.description = description.trim().to_string();
        }
        if let Some(price) = request.price {
            self.price = price;
        }
        if let Some(category) = request.category {
            self.category = category.trim().to_string();
        }
        if let Some(stock) = request.stock {
            self.stock = stock;
        }
        if let Some(images) = request.images {
            self.images = images;
        }
        if let Some(is_featured) = request.is_featured {
            self.is_featured = is_featured;
        }
        if let Some(is_new_arrival) = request.is_new_arrival {
            self.is_new_arrival = is_new_arrival;
        }
        if let Some(on_sale) = request.on_sale {
            self.on_sale = on_sale;
        }
        self.updated_at = Utc::now();
    }

    fn matches_filters(&self, filters: &ProductFilters) -> bool {
        if let Some(category) = &filters.category {
            if !equals_ignore_case(&self.category, category.trim()) {
                return false;
            }
        }

        if !within_price_range(self.price, filters.min_price, filters.max_price) {
            return false;
        }

        if let Some(search) = &filters.search {
            let search_lower = search.trim().to_lowercase();
            if !contains_ignore_case(&self.name, &search_lower)
                && !contains_ignore_case(&self.description, &search_lower)
                && !contains_ignore_case(&self.category, &search_lower)
            {
                return false;
            }
        }

        if let Some(true) = filters.in_stock_only {
            if self.stock == 0 {
                return false;
            }
        }

        if let Some(featured) = filters.featured {
            if self.is_featured != featured {
                return false;
            }
        }

        true
    }

    fn with_resolved_assets(&self, assets_cdn_url: &str) -> Self {
        Self {
            images: self
                .images
                .iter()
                .map(|image| resolve_asset_url(assets_cdn_url, image))
                .collect(),
            ..self.clone()
        }
    }
}

impl Purchasable for Product {
    fn display_name(&self) -> &str {
        &self.name
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn primary_image(&self) -> Option<&str> {
        self.images.first().map(String::as_str)
    }

    fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
