use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{info, instrument, warn, Instrument};

use crate::models::{Cart, CartItem, ItemType, RepositoryError, RepositoryResult};

use super::dynamodb::{
    dynamodb_span, map_dynamodb_error, number_attr, record_outcome, required_number,
    required_parsed, required_string, required_timestamp, string_attr, timestamp_attr, Item,
};

/// Trait defining the interface for cart data access operations
#[async_trait]
pub trait CartRepository: Send + Sync {
    /// Find a cart by user ID
    async fn find_cart(&self, user_id: &str) -> RepositoryResult<Option<Cart>>;

    /// Save a cart (create or update, last write wins)
    async fn save_cart(&self, cart: Cart) -> RepositoryResult<Cart>;

    async fn delete_cart(&self, user_id: &str) -> RepositoryResult<()>;

    /// Count total number of carts
    async fn count_carts(&self) -> RepositoryResult<usize>;
}

/// DynamoDB implementation of the CartRepository trait
pub struct DynamoDbCartRepository {
    client: Arc<DynamoDbClient>,
    table_name: String,
    region: String,
}

impl DynamoDbCartRepository {
    /// Create a new DynamoDB cart repository
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            region,
        }
    }

    /// Get the table name (for testing)
    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn span(&self, operation: &str) -> tracing::Span {
        dynamodb_span(operation, &self.table_name, &self.region)
    }
}

/// Convert a Cart struct to DynamoDB attribute values
pub fn cart_to_item(cart: &Cart) -> Item {
    let mut item = HashMap::new();

    item.insert("user_id".to_string(), string_attr(&cart.user_id));

    let items: Vec<AttributeValue> = cart
        .items
        .iter()
        .map(|cart_item| {
            let mut item_map = HashMap::new();
            item_map.insert("item_id".to_string(), string_attr(&cart_item.item_id));
            item_map.insert(
                "item_type".to_string(),
                string_attr(cart_item.item_type.to_string()),
            );
            item_map.insert("quantity".to_string(), number_attr(cart_item.quantity));
            item_map.insert("added_at".to_string(), timestamp_attr(&cart_item.added_at));
            AttributeValue::M(item_map)
        })
        .collect();

    item.insert("items".to_string(), AttributeValue::L(items));
    item.insert("created_at".to_string(), timestamp_attr(&cart.created_at));
    item.insert("updated_at".to_string(), timestamp_attr(&cart.updated_at));

    item
}

/// Convert DynamoDB item to Cart struct. Unreadable lines are skipped.
pub fn item_to_cart(item: &Item) -> RepositoryResult<Cart> {
    let user_id = required_string(item, "user_id")?;

    let items = item
        .get("items")
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|item_attr| match item_attr.as_m() {
                    Ok(item_map) => match map_to_cart_item(item_map) {
                        Ok(cart_item) => Some(cart_item),
                        Err(e) => {
                            warn!("Skipping malformed cart line: {}", e);
                            None
                        }
                    },
                    Err(_) => None,
                })
                .collect()
        })
        .unwrap_or_default();

    let created_at = required_timestamp(item, "created_at")?;
    // Legacy carts may lack updated_at
    let updated_at = required_timestamp(item, "updated_at").unwrap_or(created_at);

    Ok(Cart {
        user_id,
        items,
        created_at,
        updated_at,
    })
}

/// Convert DynamoDB map to CartItem
pub fn map_to_cart_item(item_map: &Item) -> RepositoryResult<CartItem> {
    let item_id = required_string(item_map, "item_id")?;
    let item_type: ItemType = required_parsed(item_map, "item_type")?;
    let quantity = required_number(item_map, "quantity")?;
    let added_at = required_timestamp(item_map, "added_at")?;

    Ok(CartItem {
        item_id,
        item_type,
        quantity,
        added_at,
    })
}

#[async_trait]
impl CartRepository for DynamoDbCartRepository {
    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id))]
    async fn find_cart(&self, user_id: &str) -> RepositoryResult<Option<Cart>> {
        info!("Finding cart for user");

        let response = async {
            let result = self
                .client
                .get_item()
                .table_name(&self.table_name)
                .key("user_id", AttributeValue::S(user_id.to_string()))
                .send()
                .await;
            record_outcome(&result);
            result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
        }
        .instrument(self.span("GetItem"))
        .await?;

        match response.item {
            Some(item) => {
                let cart = item_to_cart(&item)?;
                info!("Cart found with {} items", cart.items.len());
                Ok(Some(cart))
            }
            None => {
                info!("Cart not found");
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, cart), fields(table = %self.table_name, user_id = %cart.user_id, item_count = cart.items.len()))]
    async fn save_cart(&self, cart: Cart) -> RepositoryResult<Cart> {
        info!("Saving cart");

        let item = cart_to_item(&cart);

        async {
            let result = self
                .client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(item))
                .send()
                .await;
            record_outcome(&result);
            result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
        }
        .instrument(self.span("PutItem"))
        .await?;

        info!("Cart saved successfully");
        Ok(cart)
    }

    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id))]
    async fn delete_cart(&self, user_id: &str) -> RepositoryResult<()> {
        info!("Deleting cart");

        async {
            self.client
                .delete_item()
                .table_name(&self.table_name)
                .key("user_id", AttributeValue::S(user_id.to_string()))
                .send()
                .await
                .map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
        }
        .instrument(self.span("DeleteItem"))
        .await?;

        info!("Cart deleted successfully");
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn count_carts(&self) -> RepositoryResult<usize> {
        let mut total = 0usize;
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let response = async {
                self.client
                    .scan()
                    .table_name(&self.table_name)
                    .select(Select::Count)
                    .set_exclusive_start_key(exclusive_start_key.take())
                    .send()
                    .await
                    .map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
            }
            .instrument(self.span("Scan"))
            .await?;

            total += usize::try_from(response.count()).map_err(|_| RepositoryError::AwsSdk {
                message: "Negative scan count".to_string(),
            })?;

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        info!("Cart count: {}", total);
        Ok(total)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_test_cart() -> Cart {
        let mut cart = Cart::new("user123".to_string());
        cart.add_item("P1a2b3c4d".to_string(), ItemType::Product, 2);
        cart.add_item("B1a2b3c4d".to_string(), ItemType::Book, 1);
        cart
    }

    fn test_client() -> Arc<DynamoDbClient> {
        let config = aws_sdk_dynamodb::Config::builder()
            .region(aws_sdk_dynamodb::config::Region::new("us-east-1"))
            .behavior_version(aws_sdk_dynamodb::config::BehaviorVersion::latest())
            .build();
        Arc::new(aws_sdk_dynamodb::Client::from_conf(config))
    }

    #[test]
    fn test_cart_to_item_conversion() {
        let cart = create_test_cart();

        let item = cart_to_item(&cart);

        assert!(item.contains_key("user_id"));
        assert!(item.contains_key("created_at"));
        assert!(item.contains_key("updated_at"));

        if let Some(AttributeValue::L(items)) = item.get("items") {
            assert_eq!(items.len(), 2);

            if let AttributeValue::M(first_item) = &items[0] {
                assert_eq!(
                    first_item.get("item_type"),
                    Some(&AttributeValue::S("product".to_string()))
                );
                assert!(first_item.contains_key("item_id"));
                assert!(first_item.contains_key("quantity"));
                assert!(first_item.contains_key("added_at"));
                assert!(!first_item.contains_key("unit_price"));
            } else {
                panic!("Expected map value for cart item");
            }
        } else {
            panic!("Expected list value for items");
        }
    }

    #[test]
    fn test_item_to_cart_conversion() {
        let cart = create_test_cart();

        let converted_cart = item_to_cart(&cart_to_item(&cart)).unwrap();

        assert_eq!(converted_cart.user_id, cart.user_id);
        assert_eq!(converted_cart.items.len(), 2);
        assert_eq!(converted_cart.items[1].item_type, ItemType::Book);
        assert_eq!(converted_cart.items[0].quantity, 2);
        assert_eq!(converted_cart.items[0].item_id, "P1a2b3c4d");
    }

    #[test]
    fn test_item_to_cart_missing_updated_at() {
        let cart = create_test_cart();
        let mut item = cart_to_item(&cart);
        item.remove("updated_at");

        let converted_cart = item_to_cart(&item).unwrap();

        assert_eq!(converted_cart.updated_at, converted_cart.created_at);
    }

    #[test]
    fn test_malformed_cart_line_is_skipped() {
        let cart = create_test_cart();
        let mut item = cart_to_item(&cart);
        if let Some(AttributeValue::L(items)) = item.get_mut("items") {
            let mut broken = HashMap::new();
            broken.insert("quantity".to_string(), AttributeValue::N("3".to_string()));
            items.push(AttributeValue::M(broken));
        }

        let converted_cart = item_to_cart(&item).unwrap();
        assert_eq!(converted_cart.items.len(), 2);
    }

    #[test]
    fn test_invalid_cart_item_handling() {
        let mut invalid_item_map = HashMap::new();
        invalid_item_map.insert("quantity".to_string(), AttributeValue::N("3".to_string()));

        match map_to_cart_item(&invalid_item_map) {
            Err(RepositoryError::MalformedItem { message }) => {
                assert!(message.contains("item_id"));
            }
            other => panic!("Expected MalformedItem error, got {:?}", other),
        }
    }

    #[test]
    fn test_repository_creation() {
        let repo = DynamoDbCartRepository::new(
            test_client(),
            "test-cart-table".to_string(),
            "us-east-1".to_string(),
        );

        assert_eq!(repo.table_name(), "test-cart-table");
    }
}
