use rust_decimal::Decimal;
use std::sync::Arc;
use tracing::{info, instrument};

use crate::models::{
    validate_user_id, AddCartItemRequest, Cart, CartItem, CartLineResponse, CartResponse,
    QuantityUpdate, ServiceError, ServiceResult, UpdateCartItemRequest, Validate,
    ValidationError, MAX_CART_QUANTITY,
};
use crate::repositories::CartRepository;

use super::catalog_service::{CatalogLookup, ItemSummary};

/// Name shown for lines whose item was removed from the catalog
pub const UNAVAILABLE_ITEM_NAME: &str = "Unavailable item";

/// Service for managing shopping carts
pub struct CartService {
    cart_repository: Arc<dyn CartRepository>,
    catalog: CatalogLookup,
}

impl CartService {
    pub fn new(cart_repository: Arc<dyn CartRepository>, catalog: CatalogLookup) -> Self {
        Self {
            cart_repository,
            catalog,
        }
    }

    /// Get a user's cart. A user without a cart gets an empty one.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn get_cart(&self, user_id: &str) -> ServiceResult<CartResponse> {
        validate_user_id(user_id)?;

        let cart = match self.cart_repository.find_cart(user_id).await? {
            Some(cart) => cart,
            None => {
                info!("Cart not found, returning empty cart");
                Cart::new(user_id.to_string())
            }
        };

        let cart_response = self.cart_to_response(cart).await?;
        crate::info_with_trace!("Cart retrieved with {} lines", cart_response.items.len());
        Ok(cart_response)
    }

    /// Add an item, merging into an existing line. The item must exist; stock is not checked.
    #[instrument(skip(self, request), fields(user_id = %user_id, item_id = %request.item_id, quantity = request.quantity))]
    pub async fn add_item(
        &self,
        user_id: &str,
        request: AddCartItemRequest,
    ) -> ServiceResult<CartResponse> {
        validate_user_id(user_id)?;
        request.validate()?;

        self.catalog
            .require(request.item_type, &request.item_id)
            .await?;

        let mut cart = match self.cart_repository.find_cart(user_id).await? {
            Some(cart) => cart,
            None => Cart::new(user_id.to_string()),
        };

        let merged = cart
            .item_quantity(&request.item_id)
            .saturating_add(request.quantity);
        if merged > MAX_CART_QUANTITY {
            return Err(ValidationError::OutOfRange {
                field: "quantity".to_string(),
                min: "1".to_string(),
                max: MAX_CART_QUANTITY.to_string(),
                value: merged.to_string(),
            }
            .into());
        }

        cart.add_item(request.item_id, request.item_type, request.quantity);
        let saved = self.cart_repository.save_cart(cart).await?;

        crate::info_with_trace!("Item added to cart, line quantity now {}", merged);
        self.cart_to_response(saved).await
    }

    /// Overwrite a line quantity. Zero or below deletes the line; a line not in the cart is not-found.
    #[instrument(skip(self, request), fields(user_id = %user_id, item_id = %item_id, quantity = request.quantity))]
    pub async fn update_item(
        &self,
        user_id: &str,
        item_id: &str,
        request: UpdateCartItemRequest,
    ) -> ServiceResult<CartResponse> {
        validate_user_id(user_id)?;
        request.validate()?;

        let missing = || ServiceError::CartItemNotFound {
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
        };

        let mut cart = self
            .cart_repository
            .find_cart(user_id)
            .await?
            .ok_or_else(missing)?;

        match cart.update_item_quantity(item_id, request.quantity) {
            QuantityUpdate::Missing => return Err(missing()),
            QuantityUpdate::Removed => info!("Quantity {} removes the line", request.quantity),
            QuantityUpdate::Updated => info!("Line quantity overwritten"),
        }

        let saved = self.cart_repository.save_cart(cart).await?;
        self.cart_to_response(saved).await
    }

    #[instrument(skip(self), fields(user_id = %user_id, item_id = %item_id))]
    pub async fn remove_item(&self, user_id: &str, item_id: &str) -> ServiceResult<()> {
        validate_user_id(user_id)?;

        let missing = || ServiceError::CartItemNotFound {
            item_id: item_id.to_string(),
            user_id: user_id.to_string(),
        };

        let mut cart = self
            .cart_repository
            .find_cart(user_id)
            .await?
            .ok_or_else(missing)?;

        if !cart.remove_item(item_id) {
            return Err(missing());
        }

        self.cart_repository.save_cart(cart).await?;
        crate::info_with_trace!("Item removed from cart");
        Ok(())
    }

    /// Empty the cart by dropping its document. Nothing happens when the user has no cart.
    #[instrument(skip(self), fields(user_id = %user_id))]
    pub async fn clear_cart(&self, user_id: &str) -> ServiceResult<()> {
        validate_user_id(user_id)?;

        self.cart_repository.delete_cart(user_id).await?;

        crate::info_with_trace!("Cart cleared");
        Ok(())
    }

    pub async fn count_carts(&self) -> ServiceResult<usize> {
        Ok(self.cart_repository.count_carts().await?)
    }

    /// Join every line against the catalog
    async fn cart_to_response(&self, cart: Cart) -> ServiceResult<CartResponse> {
        let mut items = Vec::with_capacity(cart.items.len());
        for cart_item in &cart.items {
            let summary = self
                .catalog
                .summary(cart_item.item_type, &cart_item.item_id)
                .await?;
            items.push(line_response(cart_item, summary));
        }

        let total_price = items.iter().map(|line| line.line_total).sum::<Decimal>();

        Ok(CartResponse {
            total_items: cart.total_items(),
            total_price,
            user_id: cart.user_id,
            items,
            created_at: cart.created_at,
            updated_at: cart.updated_at,
        })
    }
}

fn line_response(cart_item: &CartItem, summary: Option<ItemSummary>) -> CartLineResponse {
    let (name, image, unit_price, is_available) = match summary {
        Some(summary) => (summary.name, summary.image, summary.unit_price, summary.in_stock),
        None => (UNAVAILABLE_ITEM_NAME.to_string(), None, Decimal::ZERO, false),
    };

    CartLineResponse {
        item_id: cart_item.item_id.clone(),
        item_type: cart_item.item_type,
        name,
        image,
        quantity: cart_item.quantity,
        line_total: unit_price * Decimal::from(cart_item.quantity),
        unit_price,
        is_available,
        added_at: cart_item.added_at,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{
        Book, CreateBookRequest, CreateProductRequest, ItemType, Product, RepositoryError,
    };
    use crate::repositories::InMemoryDocumentRepository;
    use crate::services::{BookService, CatalogService, ProductService};
    use async_trait::async_trait;
    use mockall::{mock, predicate::*};
    use rust_decimal_macros::dec;

    mock! {
        CartRepo {}

        #[async_trait]
        impl CartRepository for CartRepo {
            async fn find_cart(&self, user_id: &str) -> Result<Option<Cart>, RepositoryError>;
            async fn save_cart(&self, cart: Cart) -> Result<Cart, RepositoryError>;
            async fn delete_cart(&self, user_id: &str) -> Result<(), RepositoryError>;
            async fn count_carts(&self) -> Result<usize, RepositoryError>;
        }
    }

    struct Fixture {
        products: Arc<ProductService>,
        books: Arc<BookService>,
    }

    impl Fixture {
        fn new() -> Self {
            Self {
                products: Arc::new(CatalogService::new(Arc::new(
                    InMemoryDocumentRepository::<Product>::new(),
                ))),
                books: Arc::new(CatalogService::new(Arc::new(
                    InMemoryDocumentRepository::<Book>::new(),
                ))),
            }
        }

        fn lookup(&self) -> CatalogLookup {
            CatalogLookup::new(self.products.clone(), self.books.clone(), String::new())
        }

        async fn product(&self, price: Decimal, stock: u32) -> Product {
            self.products
                .create(CreateProductRequest {
                    name: "Enamel Mug".to_string(),
                    description: "Speckled enamel camp mug".to_string(),
                    price,
                    category: "Kitchen".to_string(),
                    stock,
                    images: vec!["products/mug.jpg".to_string()],
                    is_featured: false,
                    is_new_arrival: false,
                    on_sale: false,
                })
                .await
                .unwrap()
        }

        async fn book(&self, price: Decimal) -> Book {
            self.books
                .create(CreateBookRequest {
                    title: "The Quiet Pantry".to_string(),
                    author: "Mara Ellis".to_string(),
                    description: "Preserving and pickling through the seasons".to_string(),
                    price,
                    category: "Cookbooks".to_string(),
                    stock: 3,
                    cover_image: None,
                    pages: None,
                    isbn: None,
                })
                .await
                .unwrap()
        }
    }

    fn add_request(item_id: &str, item_type: ItemType, quantity: u32) -> AddCartItemRequest {
        AddCartItemRequest {
            item_id: item_id.to_string(),
            item_type,
            quantity,
        }
    }

    #[tokio::test]
    async fn test_get_cart_without_cart_is_empty() {
        let fixture = Fixture::new();
        let mut mock_repo = MockCartRepo::new();
        mock_repo
            .expect_find_cart()
            .with(eq("user-1"))
            .times(1)
            .returning(|_| Ok(None));
        mock_repo.expect_save_cart().times(0);

        let service = CartService::new(Arc::new(mock_repo), fixture.lookup());
        let cart = service.get_cart("user-1").await.unwrap();

        assert_eq!(cart.user_id, "user-1");
        assert!(cart.items.is_empty());
        assert_eq!(cart.total_items, 0);
        assert_eq!(cart.total_price, Decimal::ZERO);
    }

    #[tokio::test]
    async fn test_add_unknown_item_is_not_found() {
        let fixture = Fixture::new();
        let mut mock_repo = MockCartRepo::new();
        mock_repo.expect_save_cart().times(0);

        let service = CartService::new(Arc::new(mock_repo), fixture.lookup());
        let result = service
            .add_item("user-1", add_request("P00000000", ItemType::Product, 1))
            .await;

        assert!(matches!(result, Err(ServiceError::ItemNotFound { .. })));
    }

    #[tokio::test]
    async fn test_add_merges_and_ignores_stock() {
        let fixture = Fixture::new();
        let mug = fixture.product(dec!(14.00), 0).await;
        let book = fixture.book(dec!(25.50)).await;
        let service = CartService::new(
            Arc::new(crate::repositories::InMemoryCartRepository::new()),
            fixture.lookup(),
        );

        service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 2))
            .await
            .unwrap();
        service
            .add_item("user-1", add_request(&book.id, ItemType::Book, 1))
            .await
            .unwrap();
        let cart = service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 3))
            .await
            .unwrap();

        assert_eq!(cart.items.len(), 2);
        assert_eq!(cart.items[0].item_id, mug.id);
        assert_eq!(cart.items[0].quantity, 5);
        assert_eq!(cart.items[0].line_total, dec!(70.00));
        assert!(!cart.items[0].is_available);
        assert_eq!(cart.total_items, 6);
        assert_eq!(cart.total_price, dec!(95.50));
    }

    #[tokio::test]
    async fn test_add_rejects_merged_quantity_over_limit() {
        let fixture = Fixture::new();
        let mug = fixture.product(dec!(14.00), 10).await;
        let service = CartService::new(
            Arc::new(crate::repositories::InMemoryCartRepository::new()),
            fixture.lookup(),
        );

        service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 999))
            .await
            .unwrap();
        let result = service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 2))
            .await;

        assert!(matches!(result, Err(ServiceError::ValidationError { .. })));
        assert_eq!(
            service.get_cart("user-1").await.unwrap().items[0].quantity,
            999
        );
    }

    #[tokio::test]
    async fn test_update_overwrites_and_non_positive_removes() {
        let fixture = Fixture::new();
        let mug = fixture.product(dec!(14.00), 10).await;
        let service = CartService::new(
            Arc::new(crate::repositories::InMemoryCartRepository::new()),
            fixture.lookup(),
        );
        service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 2))
            .await
            .unwrap();

        let cart = service
            .update_item("user-1", &mug.id, UpdateCartItemRequest { quantity: 7 })
            .await
            .unwrap();
        assert_eq!(cart.items[0].quantity, 7);

        let cart = service
            .update_item("user-1", &mug.id, UpdateCartItemRequest { quantity: -1 })
            .await
            .unwrap();
        assert!(cart.items.is_empty());

        assert!(matches!(
            service
                .update_item("user-1", &mug.id, UpdateCartItemRequest { quantity: 1 })
                .await,
            Err(ServiceError::CartItemNotFound { .. })
        ));
    }

    #[tokio::test]
    async fn test_update_without_cart_is_not_found() {
        let fixture = Fixture::new();
        let mut mock_repo = MockCartRepo::new();
        mock_repo.expect_find_cart().returning(|_| Ok(None));

        let service = CartService::new(Arc::new(mock_repo), fixture.lookup());
        let result = service
            .update_item("user-1", "P1a2b3c4d", UpdateCartItemRequest { quantity: 0 })
            .await;

        assert!(matches!(result, Err(ServiceError::CartItemNotFound { .. })));
    }

    #[tokio::test]
    async fn test_deleted_item_renders_as_unavailable() {
        let fixture = Fixture::new();
        let mug = fixture.product(dec!(14.00), 10).await;
        let book = fixture.book(dec!(20.00)).await;
        let service = CartService::new(
            Arc::new(crate::repositories::InMemoryCartRepository::new()),
            fixture.lookup(),
        );
        service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 2))
            .await
            .unwrap();
        service
            .add_item("user-1", add_request(&book.id, ItemType::Book, 1))
            .await
            .unwrap();

        fixture.products.delete(&mug.id).await.unwrap();
        let cart = service.get_cart("user-1").await.unwrap();

        assert_eq!(cart.items[0].name, UNAVAILABLE_ITEM_NAME);
        assert_eq!(cart.items[0].unit_price, Decimal::ZERO);
        assert!(!cart.items[0].is_available);
        assert_eq!(cart.total_items, 3);
        assert_eq!(cart.total_price, dec!(20.00));
    }

    #[tokio::test]
    async fn test_remove_and_clear() {
        let fixture = Fixture::new();
        let mug = fixture.product(dec!(14.00), 10).await;
        let service = CartService::new(
            Arc::new(crate::repositories::InMemoryCartRepository::new()),
            fixture.lookup(),
        );

        service.clear_cart("user-1").await.unwrap();
        service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 1))
            .await
            .unwrap();

        service.remove_item("user-1", &mug.id).await.unwrap();
        assert!(matches!(
            service.remove_item("user-1", &mug.id).await,
            Err(ServiceError::CartItemNotFound { .. })
        ));

        service
            .add_item("user-1", add_request(&mug.id, ItemType::Product, 1))
            .await
            .unwrap();
        assert_eq!(service.count_carts().await.unwrap(), 1);
        service.clear_cart("user-1").await.unwrap();
        assert!(service.get_cart("user-1").await.unwrap().items.is_empty());
        assert_eq!(service.count_carts().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_clear_deletes_cart_document() {
        let fixture = Fixture::new();
        let mut mock_repo = MockCartRepo::new();
        mock_repo.expect_find_cart().times(0);
        mock_repo.expect_save_cart().times(0);
        mock_repo
            .expect_delete_cart()
            .with(eq("user-1"))
            .times(1)
            .returning(|_| Ok(()));

        let service = CartService::new(Arc::new(mock_repo), fixture.lookup());
        service.clear_cart("user-1").await.unwrap();
    }

    #[tokio::test]
    async fn test_invalid_user_id_is_rejected() {
        let fixture = Fixture::new();
        let mut mock_repo = MockCartRepo::new();
        mock_repo.expect_find_cart().times(0);

        let service = CartService::new(Arc::new(mock_repo), fixture.lookup());
        assert!(matches!(
            service.get_cart("   ").await,
            Err(ServiceError::ValidationError { .. })
        ));
    }
}
