use async_trait::async_trait;
use aws_sdk_dynamodb::types::{AttributeValue, ReturnValue};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use std::sync::Arc;
use tracing::{info, instrument, warn, Instrument};

use crate::models::{FavoriteEntry, RepositoryResult};

use super::dynamodb::{
    dynamodb_span, map_dynamodb_error, record_outcome, required_parsed, required_string,
    required_timestamp, string_attr, timestamp_attr, Item,
};

/// Favorites are stored one row per (user, item) pair
#[async_trait]
pub trait FavoriteRepository: Send + Sync {
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<FavoriteEntry>>;

    async fn find(&self, user_id: &str, item_id: &str) -> RepositoryResult<Option<FavoriteEntry>>;

    /// Upsert an entry
    async fn save(&self, entry: FavoriteEntry) -> RepositoryResult<FavoriteEntry>;

    /// Returns whether an entry was removed
    async fn delete(&self, user_id: &str, item_id: &str) -> RepositoryResult<bool>;
}

/// DynamoDB implementation keyed by `user_id` (hash) and `item_id` (range)
pub struct DynamoDbFavoriteRepository {
    client: Arc<DynamoDbClient>,
    table_name: String,
    region: String,
}

impl DynamoDbFavoriteRepository {
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            region,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn span(&self, operation: &str) -> tracing::Span {
        dynamodb_span(operation, &self.table_name, &self.region)
    }

    fn key(user_id: &str, item_id: &str) -> Item {
        Item::from([
            ("user_id".to_string(), string_attr(user_id)),
            ("item_id".to_string(), string_attr(item_id)),
        ])
    }
}

pub fn favorite_to_item(entry: &FavoriteEntry) -> Item {
    let mut item = DynamoDbFavoriteRepository::key(&entry.user_id, &entry.item_id);
    item.insert(
        "item_type".to_string(),
        string_attr(entry.item_type.to_string()),
    );
    item.insert("added_at".to_string(), timestamp_attr(&entry.added_at));
    item
}

pub fn item_to_favorite(item: &Item) -> RepositoryResult<FavoriteEntry> {
    Ok(FavoriteEntry {
        user_id: required_string(item, "user_id")?,
        item_id: required_string(item, "item_id")?,
        item_type: required_parsed(item, "item_type")?,
        added_at: required_timestamp(item, "added_at")?,
    })
}

#[async_trait]
impl FavoriteRepository for DynamoDbFavoriteRepository {
    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id))]
    async fn find_by_user(&self, user_id: &str) -> RepositoryResult<Vec<FavoriteEntry>> {
        let mut entries = Vec::new();
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let response = async {
                let result = self
                    .client
                    .query()
                    .table_name(&self.table_name)
                    .key_condition_expression("user_id = :user_id")
                    .expression_attribute_values(
                        ":user_id",
                        AttributeValue::S(user_id.to_string()),
                    )
                    .set_exclusive_start_key(exclusive_start_key.take())
                    .send()
                    .await;
                record_outcome(&result);
                result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
            }
            .instrument(self.span("Query"))
            .await?;

            for item in response.items.unwrap_or_default() {
                match item_to_favorite(&item) {
                    Ok(entry) => entries.push(entry),
                    Err(e) => warn!("Failed to parse favorite: {}", e),
                }
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        info!("Found {} favorites", entries.len());
        Ok(entries)
    }

    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id, item_id = %item_id))]
    async fn find(&self, user_id: &str, item_id: &str) -> RepositoryResult<Option<FavoriteEntry>> {
        let response = async {
            let result = self
                .client
                .get_item()
                .table_name(&self.table_name)
                .set_key(Some(Self::key(user_id, item_id)))
                .send()
                .await;
            record_outcome(&result);
            result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
        }
        .instrument(self.span("GetItem"))
        .await?;

        response.item.as_ref().map(item_to_favorite).transpose()
    }

    #[instrument(skip(self, entry), fields(table = %self.table_name, user_id = %entry.user_id, item_id = %entry.item_id))]
    async fn save(&self, entry: FavoriteEntry) -> RepositoryResult<FavoriteEntry> {
        async {
            let result = self
                .client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(favorite_to_item(&entry)))
                .send()
                .await;
            record_outcome(&result);
            result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
        }
        .instrument(self.span("PutItem"))
        .await?;

        info!("Favorite saved");
        Ok(entry)
    }

    #[instrument(skip(self), fields(table = %self.table_name, user_id = %user_id, item_id = %item_id))]
    async fn delete(&self, user_id: &str, item_id: &str) -> RepositoryResult<bool> {
        let response = async {
            let result = self
                .client
                .delete_item()
                .table_name(&self.table_name)
                .set_key(Some(Self::key(user_id, item_id)))
                .return_values(ReturnValue::AllOld)
                .send()
                .await;
            record_outcome(&result);
            result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
        }
        .instrument(self.span("DeleteItem"))
        .await?;

        let removed = response
            .attributes
            .map(|attributes| !attributes.is_empty())
            .unwrap_or(false);
        info!("Favorite removed: {}", removed);
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ItemType;

    #[test]
    fn test_favorite_item_conversion() {
        let entry = FavoriteEntry::new(
            "user-1".to_string(),
            "B1a2b3c4d".to_string(),
            ItemType::Book,
        );

        let item = favorite_to_item(&entry);
        assert_eq!(item.get("item_type"), Some(&string_attr("book")));

        let converted = item_to_favorite(&item).unwrap();
        assert_eq!(converted.user_id, "user-1");
        assert_eq!(converted.item_id, "B1a2b3c4d");
        assert_eq!(converted.item_type, ItemType::Book);
    }

    #[test]
    fn test_favorite_missing_type_is_malformed() {
        let mut item = favorite_to_item(&FavoriteEntry::new(
            "user-1".to_string(),
            "P1a2b3c4d".to_string(),
            ItemType::Product,
        ));
        item.remove("item_type");

        assert!(item_to_favorite(&item).is_err());
    }
}
