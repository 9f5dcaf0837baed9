use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Largest page a list endpoint will return
pub const MAX_PAGE_SIZE: usize = 100;

/// A record stored in its own collection, addressed by a prefixed string id
pub trait Document: Clone + Send + Sync + 'static {
    /// Human readable collection name, used in errors and metrics
    const KIND: &'static str;
    /// First character of every generated id
    const ID_PREFIX: char;

    fn id(&self) -> &str;
    fn created_at(&self) -> DateTime<Utc>;
}

/// Generate an id made of `prefix` and eight hex characters
pub fn generate_id(prefix: char) -> String {
    format!(
        "{}{}",
        prefix,
        Uuid::new_v4()
            .simple()
            .to_string()
            .get(0..8)
            .unwrap_or("00000000")
    )
}

/// Oldest first, ties broken by id, so slicing is stable between calls
pub fn sort_by_creation<T: Document>(documents: &mut [T]) {
    documents.sort_by(|a, b| {
        a.created_at()
            .cmp(&b.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// Newest first, used for inbox style listings
pub fn sort_newest_first<T: Document>(documents: &mut [T]) {
    documents.sort_by(|a, b| {
        b.created_at()
            .cmp(&a.created_at())
            .then_with(|| a.id().cmp(b.id()))
    });
}

/// Offset/limit slicing requested on list endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageRequest {
    pub offset: Option<usize>,
    pub limit: Option<usize>,
}

impl PageRequest {
    pub fn new(offset: usize, limit: usize) -> Self {
        Self {
            offset: Some(offset),
            limit: Some(limit),
        }
    }

    pub fn offset(&self) -> usize {
        self.offset.unwrap_or(0)
    }

    /// Slice an already ordered list
    pub fn apply<T>(&self, items: Vec<T>) -> Vec<T> {
        let iter = items.into_iter().skip(self.offset());
        match self.limit {
            Some(limit) => iter.take(limit).collect(),
            None => iter.collect(),
        }
    }
}

/// Generic list envelope returned by every listing endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ListResponse<T> {
    pub items: Vec<T>,
    pub total_count: usize,
    pub offset: usize,
    pub limit: Option<usize>,
}

impl<T> ListResponse<T> {
    /// Build a page from the full, filtered and ordered result set
    pub fn from_page(all: Vec<T>, page: &PageRequest) -> Self {
        let total_count = all.len();
        Self {
            items: page.apply(all),
            total_count,
            offset: page.offset(),
            limit: page.limit,
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> ListResponse<U> {
        ListResponse {
            items: self.items.into_iter().map(f).collect(),
            total_count: self.total_count,
            offset: self.offset,
            limit: self.limit,
        }
    }
}

/// Resolve a stored asset path against the CDN base url.
/// Absolute urls and an empty CDN leave the path unchanged.
pub fn resolve_asset_url(assets_cdn_url: &str, path: &str) -> String {
    if path.is_empty()
        || assets_cdn_url.is_empty()
        || path.starts_with("http://")
        || path.starts_with("https://")
    {
        return path.to_string();
    }

    // Handle trailing and leading slashes to avoid double slashes
    format!(
        "{}/{}",
        assets_cdn_url.trim_end_matches('/'),
        path.trim_start_matches('/')
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generate_id() {
        let id = generate_id('P');
        assert_eq!(id.len(), 9);
        assert!(id.starts_with('P'));
        assert!(id[1..].chars().all(|c| c.is_ascii_hexdigit()));
        assert_ne!(generate_id('P'), generate_id('P'));
    }

    #[test]
    fn test_page_request_apply() {
        let items: Vec<u32> = (0..10).collect();

        assert_eq!(PageRequest::default().apply(items.clone()), items);
        assert_eq!(PageRequest::new(2, 3).apply(items.clone()), vec![2, 3, 4]);
        assert_eq!(PageRequest::new(8, 5).apply(items.clone()), vec![8, 9]);
        assert!(PageRequest::new(20, 5).apply(items).is_empty());
    }

    #[test]
    fn test_list_response_from_page() {
        let response = ListResponse::from_page(vec!["a", "b", "c"], &PageRequest::new(1, 1));
        assert_eq!(response.items, vec!["b"]);
        assert_eq!(response.total_count, 3);
        assert_eq!(response.offset, 1);
        assert_eq!(response.limit, Some(1));

        let mapped = response.map(|s| s.to_uppercase());
        assert_eq!(mapped.items, vec!["B".to_string()]);
        assert_eq!(mapped.total_count, 3);
    }

    #[test]
    fn test_resolve_asset_url() {
        let cdn = "https://cdn.havencart.example";

        assert_eq!(
            resolve_asset_url(cdn, "products/skillet.jpg"),
            "https://cdn.havencart.example/products/skillet.jpg"
        );
        assert_eq!(
            resolve_asset_url("https://cdn.havencart.example/", "/products/skillet.jpg"),
            "https://cdn.havencart.example/products/skillet.jpg"
        );
        assert_eq!(
            resolve_asset_url(cdn, "https://images.example.com/a.png"),
            "https://images.example.com/a.png"
        );
        assert_eq!(resolve_asset_url("", "products/skillet.jpg"), "products/skillet.jpg");
        assert_eq!(resolve_asset_url(cdn, ""), "");
    }
}
