use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::catalog::{contains_ignore_case, equals_ignore_case, within_price_range};
use super::{generate_id, resolve_asset_url, CatalogEntry, Document, Purchasable};

/// Book sold alongside the product range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Book {
    pub id: String,
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    pub stock: u32,
    pub cover_image: Option<String>,
    pub pages: Option<u32>,
    pub isbn: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateBookRequest {
    pub title: String,
    pub author: String,
    pub description: String,
    pub price: Decimal,
    pub category: String,
    #[serde(default)]
    pub stock: u32,
    pub cover_image: Option<String>,
    pub pages: Option<u32>,
    pub isbn: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateBookRequest {
    pub title: Option<String>,
    pub author: Option<String>,
    pub description: Option<String>,
    pub price: Option<Decimal>,
    pub category: Option<String>,
    pub stock: Option<u32>,
    pub cover_image: Option<String>,
    pub pages: Option<u32>,
    pub isbn: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct BookFilters {
    pub category: Option<String>,
    pub author: Option<String>,
    pub search: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
}

impl Document for Book {
    const KIND: &'static str = "Book";
    const ID_PREFIX: char = 'B';

    fn id(&self) -> &str {
        &self.id
    }

    fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }
}

impl CatalogEntry for Book {
    type Create = CreateBookRequest;
    type Update = UpdateBookRequest;
    type Filters = BookFilters;

    fn from_request(request: CreateBookRequest) -> Self {
        let now = Utc::now();
        Self {
            id: generate_id(Self::ID_PREFIX),
            title: request.title.trim().to_string(),
            author: request.author.trim().to_string(),
            description: request.description.trim().to_string(),
            price: request.price,
            category: request.category.trim().to_string(),
            stock: request.stock,
            cover_image: request.cover_image,
            pages: request.pages,
            isbn: request.isbn.map(|isbn| isbn.trim().to_string()),
            created_at: now,
            updated_at: now,
        }
    }

    fn apply_update(&mut self, request: UpdateBookRequest) {
        if let Some(title) = request.title {
            self.title = title.trim().to_string();
        }
        if let Some(author) = request.author {
            self.author = author.trim().to_string();
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
        if let Some(cover_image) = request.cover_image {
            self.cover_image = Some(cover_image);
        }
        if let Some(pages) = request.pages {
            self.pages = Some(pages);
        }
        if let Some(isbn) = request.isbn {
            self.isbn = Some(isbn.trim().to_string());
        }
        self.updated_at = Utc::now();
    }

    fn matches_filters(&self, filters: &BookFilters) -> bool {
        if let Some(category) = &filters.category {
            if !equals_ignore_case(&self.category, category.trim()) {
                return false;
            }
        }

        if let Some(author) = &filters.author {
            if !contains_ignore_case(&self.author, &author.trim().to_lowercase()) {
                return false;
            }
        }

        if !within_price_range(self.price, filters.min_price, filters.max_price) {
            return false;
        }

        if let Some(search) = &filters.search {
            let search_lower = search.trim().to_lowercase();
            if !contains_ignore_case(&self.title, &search_lower)
                && !contains_ignore_case(&self.author, &search_lower)
                && !contains_ignore_case(&self.description, &search_lower)
            {
                return false;
            }
        }

        true
    }

    fn with_resolved_assets(&self, assets_cdn_url: &str) -> Self {
        Self {
            cover_image: self
                .cover_image
                .as_deref()
                .map(|image| resolve_asset_url(assets_cdn_url, image)),
            ..self.clone()
        }
    }
}

impl Purchasable for Book {
    fn display_name(&self) -> &str {
        &self.title
    }

    fn unit_price(&self) -> Decimal {
        self.price
    }

    fn primary_image(&self) -> Option<&str> {
        self.cover_image.as_deref()
    }

    fn in_stock(&self) -> bool {
        self.stock > 0
    }
}
