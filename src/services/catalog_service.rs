use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{instrument, warn};

use crate::models::{
    resolve_asset_url, sort_by_creation, validate_document_id, Book, CatalogEntry, Document,
    ItemType, ListResponse, PageRequest, Product, Purchasable, Recipe, RepositoryError, ServiceError,
    ServiceResult, Validate,
};
use crate::repositories::DocumentRepository;

/// Service for one catalog collection
pub struct CatalogService<T: CatalogEntry> {
    repository: Arc<dyn DocumentRepository<T>>,
}

pub type ProductService = CatalogService<Product>;
pub type BookService = CatalogService<Book>;
pub type RecipeService = CatalogService<Recipe>;

impl<T: CatalogEntry> CatalogService<T> {
    pub fn new(repository: Arc<dyn DocumentRepository<T>>) -> Self {
        Self { repository }
    }

    /// List entries with filters applied, oldest first, then sliced by `page`
    #[instrument(skip(self), fields(kind = T::KIND, filters = ?filters))]
    pub async fn list(&self, filters: T::Filters, page: PageRequest) -> ServiceResult<ListResponse<T>> {
        page.validate()?;

        let mut entries: Vec<T> = self
            .repository
            .find_all()
            .await?
            .into_iter()
            .filter(|entry| entry.matches_filters(&filters))
            .collect();
        sort_by_creation(&mut entries);

        let response = ListResponse::from_page(entries, &page);
        crate::info_with_trace!(
            "Listed {} of {} {} entries",
            response.items.len(),
            response.total_count,
            T::KIND
        );
        Ok(response)
    }

    /// Get one entry. A malformed id is a validation error, a missing one is not-found.
    #[instrument(skip(self), fields(kind = T::KIND, id = %id))]
    pub async fn get(&self, id: &str) -> ServiceResult<T> {
        validate_document_id("id", id, T::ID_PREFIX)?;

        self.repository
            .find_by_id(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(T::KIND, id))
    }

    /// Lookup that treats a missing or malformed id as absent
    pub async fn find(&self, id: &str) -> ServiceResult<Option<T>> {
        if validate_document_id("id", id, T::ID_PREFIX).is_err() {
            return Ok(None);
        }
        Ok(self.repository.find_by_id(id).await?)
    }

    #[instrument(skip(self, request), fields(kind = T::KIND))]
    pub async fn create(&self, request: T::Create) -> ServiceResult<T> {
        request.validate()?;

        let entry = T::from_request(request);
        let created = self.repository.create(entry).await?;

        crate::info_with_trace!("Created {} {}", T::KIND, created.id());
        Ok(created)
    }

    #[instrument(skip(self, request), fields(kind = T::KIND, id = %id))]
    pub async fn update(&self, id: &str, request: T::Update) -> ServiceResult<T> {
        request.validate()?;

        let mut entry = self.get(id).await?;
        entry.apply_update(request);

        let updated = self
            .repository
            .update(entry)
            .await
            .map_err(|e| not_found_or(e, T::KIND, id))?;

        crate::info_with_trace!("Updated {} {}", T::KIND, id);
        Ok(updated)
    }

    /// Hard delete. Carts and favorites that reference the entry are left alone.
    #[instrument(skip(self), fields(kind = T::KIND, id = %id))]
    pub async fn delete(&self, id: &str) -> ServiceResult<()> {
        validate_document_id("id", id, T::ID_PREFIX)?;

        self.repository
            .delete(id)
            .await
            .map_err(|e| not_found_or(e, T::KIND, id))?;

        crate::info_with_trace!("Deleted {} {}", T::KIND, id);
        Ok(())
    }

    pub async fn count(&self) -> ServiceResult<usize> {
        Ok(self.repository.count().await?)
    }
}

/// Map a repository `NotFound` to the not-found outcome for `kind`
pub(crate) fn not_found_or(err: RepositoryError, kind: &str, id: &str) -> ServiceError {
    match err {
        RepositoryError::NotFound => ServiceError::not_found(kind, id),
        other => other.into(),
    }
}

/// Catalog view of an item referenced from a cart line or a favorite
#[derive(Debug, Clone, PartialEq)]
pub struct ItemSummary {
    pub name: String,
    pub image: Option<String>,
    pub unit_price: Decimal,
    pub in_stock: bool,
}

impl ItemSummary {
    fn from_entry<E: Purchasable>(entry: &E, assets_cdn_url: &str) -> Self {
        Self {
            name: entry.display_name().to_string(),
            image: entry
                .primary_image()
                .map(|path| resolve_asset_url(assets_cdn_url, path)),
            unit_price: entry.unit_price(),
            in_stock: entry.in_stock(),
        }
    }
}

/// Resolves cart and favorite references against the product and book collections
#[derive(Clone)]
pub struct CatalogLookup {
    products: Arc<ProductService>,
    books: Arc<BookService>,
    assets_cdn_url: String,
}

impl CatalogLookup {
    pub fn new(products: Arc<ProductService>, books: Arc<BookService>, assets_cdn_url: String) -> Self {
        Self {
            products,
            books,
            assets_cdn_url,
        }
    }

    /// `None` when the item no longer exists
    pub async fn summary(&self, item_type: ItemType, item_id: &str) -> ServiceResult<Option<ItemSummary>> {
        let summary = match item_type {
            ItemType::Product => self
                .products
                .find(item_id)
                .await?
                .map(|product| ItemSummary::from_entry(&product, &self.assets_cdn_url)),
            ItemType::Book => self
                .books
                .find(item_id)
                .await?
                .map(|book| ItemSummary::from_entry(&book, &self.assets_cdn_url)),
        };

        if summary.is_none() {
            warn!("{} {} is not in the catalog", item_type, item_id);
        }
        Ok(summary)
    }

    /// Like `summary`, but a missing item is a not-found error
    pub async fn require(&self, item_type: ItemType, item_id: &str) -> ServiceResult<ItemSummary> {
        let kind = match item_type {
            ItemType::Product => Product::KIND,
            ItemType::Book => Book::KIND,
        };
        self.summary(item_type, item_id)
            .await?
            .ok_or_else(|| ServiceError::not_found(kind, item_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        CreateProductRequest, Document, ProductFilters, RepositoryError, UpdateProductRequest,
    };
    use crate::repositories::InMemoryDocumentRepository;
    use async_trait::async_trait;
    use mockall::{mock, predicate::*};
    use rust_decimal_macros::dec;

    mock! {
        ProductRepo {}

        #[async_trait]
        impl DocumentRepository<Product> for ProductRepo {
            async fn find_all(&self) -> Result<Vec<Product>, RepositoryError>;
            async fn find_by_id(&self, id: &str) -> Result<Option<Product>, RepositoryError>;
            async fn create(&self, document: Product) -> Result<Product, RepositoryError>;
            async fn update(&self, document: Product) -> Result<Product, RepositoryError>;
            async fn delete(&self, id: &str) -> Result<(), RepositoryError>;
            async fn count(&self) -> Result<usize, RepositoryError>;
        }
    }

    fn product_request(name: &str, price: Decimal, category: &str) -> CreateProductRequest {
        CreateProductRequest {
            name: name.to_string(),
            description: format!("{} for everyday use", name),
            price,
            category: category.to_string(),
            stock: 5,
            images: vec!["products/item.jpg".to_string()],
            is_featured: false,
            is_new_arrival: false,
            on_sale: false,
        }
    }

    fn memory_service() -> ProductService {
        CatalogService::new(Arc::new(InMemoryDocumentRepository::<Product>::new()))
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_request() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo.expect_create().times(0);
        let service = CatalogService::new(Arc::new(mock_repo));

        let result = service
            .create(product_request("Kettle", dec!(0.00), "Kitchen"))
            .await;

        assert!(matches!(result, Err(ServiceError::ValidationError { .. })));
    }

    #[tokio::test]
    async fn test_get_malformed_id_is_validation_error() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo.expect_find_by_id().times(0);
        let service = CatalogService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.get("B1a2b3c4d").await,
            Err(ServiceError::ValidationError { .. })
        ));
        assert!(service.find("not an id").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_get_missing_is_not_found() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_find_by_id()
            .with(eq("P00000000"))
            .times(1)
            .returning(|_| Ok(None));
        let service = CatalogService::new(Arc::new(mock_repo));

        match service.get("P00000000").await {
            Err(ServiceError::ItemNotFound { kind, id }) => {
                assert_eq!(kind, "Product");
                assert_eq!(id, "P00000000");
            }
            other => panic!("Expected ItemNotFound, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_delete_missing_maps_to_not_found() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_delete()
            .times(1)
            .returning(|_| Err(RepositoryError::NotFound));
        let service = CatalogService::new(Arc::new(mock_repo));

        assert!(matches!(
            service.delete("P00000000").await,
            Err(ServiceError::ItemNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_repository_failure_propagates() {
        let mut mock_repo = MockProductRepo::new();
        mock_repo
            .expect_find_all()
            .times(1)
            .returning(|| Err(RepositoryError::ConnectionFailed));
        let service = CatalogService::new(Arc::new(mock_repo));

        assert!(matches!(
            service
                .list(ProductFilters::default(), PageRequest::default())
                .await,
            Err(ServiceError::Repository {
                source: RepositoryError::ConnectionFailed
            })
        ));
    }

    #[tokio::test]
    async fn test_list_filters_orders_and_slices() {
        let service = memory_service();
        for (name, price) in [("Apron", dec!(18.00)), ("Ladle", dec!(9.50)), ("Whisk", dec!(7.25))] {
            service
                .create(product_request(name, price, "Kitchen"))
                .await
                .unwrap();
        }
        service
            .create(product_request("Throw Pillow", dec!(30.00), "Living"))
            .await
            .unwrap();

        let filters = ProductFilters {
            category: Some("kitchen".to_string()),
            ..Default::default()
        };
        let all = service
            .list(filters, PageRequest::default())
            .await
            .unwrap();
        assert_eq!(all.total_count, 3);
        let created: Vec<_> = all.items.iter().map(|p| p.created_at()).collect();
        assert!(created.windows(2).all(|w| w[0] <= w[1]));

        let filters = ProductFilters {
            category: Some("kitchen".to_string()),
            ..Default::default()
        };
        let page = service.list(filters, PageRequest::new(1, 1)).await.unwrap();
        assert_eq!(page.total_count, 3);
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].id, all.items[1].id);

        assert!(matches!(
            service
                .list(ProductFilters::default(), PageRequest::new(0, 0))
                .await,
            Err(ServiceError::ValidationError { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_overwrites_provided_fields() {
        let service = memory_service();
        let created = service
            .create(product_request("Dutch Oven", dec!(89.00), "Kitchen"))
            .await
            .unwrap();

        let updated = service
            .update(
                &created.id,
                UpdateProductRequest {
                    price: Some(dec!(79.00)),
                    ..Default::default()
                },
            )
            .await
            .unwrap();

        assert_eq!(updated.price, dec!(79.00));
        assert_eq!(updated.name, "Dutch Oven");
        assert!(updated.updated_at >= created.updated_at);
        assert_eq!(service.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_lookup_resolves_images_and_missing_items() {
        let products = Arc::new(memory_service());
        let books = Arc::new(CatalogService::new(Arc::new(
            InMemoryDocumentRepository::<Book>::new(),
        )));
        let product = products
            .create(product_request("Linen Towel", dec!(12.00), "Kitchen"))
            .await
            .unwrap();

        let lookup = CatalogLookup::new(
            products,
            books,
            "https://cdn.havencart.example".to_string(),
        );

        let summary = lookup
            .summary(ItemType::Product, &product.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(summary.name, "Linen Towel");
        assert_eq!(summary.unit_price, dec!(12.00));
        assert_eq!(
            summary.image.as_deref(),
            Some("https://cdn.havencart.example/products/item.jpg")
        );

        assert!(lookup
            .summary(ItemType::Book, "B00000000")
            .await
            .unwrap()
            .is_none());
        assert!(matches!(
            lookup.require(ItemType::Book, "B00000000").await,
            Err(ServiceError::ItemNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_require_names_the_missing_kind() {
        let lookup = CatalogLookup::new(
            Arc::new(memory_service()),
            Arc::new(CatalogService::new(Arc::new(
                InMemoryDocumentRepository::<Book>::new(),
            ))),
            String::new(),
        );

        for (item_type, id, expected) in [
            (ItemType::Product, "P00000000", "Product"),
            (ItemType::Book, "B00000000", "Book"),
        ] {
            match lookup.require(item_type, id).await {
                Err(ServiceError::ItemNotFound { kind, id: missing }) => {
                    assert_eq!(kind, expected);
                    assert_eq!(missing, id);
                }
                other => panic!("Expected ItemNotFound, got {:?}", other),
            }
        }
    }
}
