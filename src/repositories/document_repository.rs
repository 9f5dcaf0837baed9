use async_trait::async_trait;
use aws_sdk_dynamodb::operation::put_item::{PutItemError, PutItemOutput};
use aws_sdk_dynamodb::types::{AttributeValue, Select};
use aws_sdk_dynamodb::Client as DynamoDbClient;
use aws_smithy_runtime_api::client::result::SdkError;
use aws_smithy_runtime_api::http::Response;
use std::marker::PhantomData;
use std::sync::Arc;
use tracing::{info, instrument, warn, Instrument};

use crate::models::{Document, RepositoryError, RepositoryResult};

use super::dynamodb::{
    dynamodb_span, map_conditional_error, map_dynamodb_error, record_outcome, Item,
};
use super::records::DynamoRecord;

/// Data access for one document collection
#[async_trait]
pub trait DocumentRepository<T: Document>: Send + Sync {
    /// Every document in the collection, in no particular order
    async fn find_all(&self) -> RepositoryResult<Vec<T>>;

    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<T>>;

    /// Insert a new document; an existing id is a constraint violation
    async fn create(&self, document: T) -> RepositoryResult<T>;

    /// Replace an existing document; a missing id is `NotFound`
    async fn update(&self, document: T) -> RepositoryResult<T>;

    /// Hard delete; a missing id is `NotFound`
    async fn delete(&self, id: &str) -> RepositoryResult<()>;

    async fn count(&self) -> RepositoryResult<usize>;
}

/// DynamoDB implementation of DocumentRepository, one table per collection keyed by `id`
pub struct DynamoDbDocumentRepository<T> {
    client: Arc<DynamoDbClient>,
    table_name: String,
    region: String,
    _document: PhantomData<fn() -> T>,
}

impl<T: DynamoRecord> DynamoDbDocumentRepository<T> {
    pub fn new(client: Arc<DynamoDbClient>, table_name: String, region: String) -> Self {
        Self {
            client,
            table_name,
            region,
            _document: PhantomData,
        }
    }

    pub fn table_name(&self) -> &str {
        &self.table_name
    }

    fn span(&self, operation: &str) -> tracing::Span {
        dynamodb_span(operation, &self.table_name, &self.region)
    }

    fn key(id: &str) -> Item {
        Item::from([("id".to_string(), AttributeValue::S(id.to_string()))])
    }

    async fn put(&self, document: &T, condition: &str) -> PutResult {
        async {
            let result = self
                .client
                .put_item()
                .table_name(&self.table_name)
                .set_item(Some(document.to_item()))
                .condition_expression(condition)
                .send()
                .await;
            record_outcome(&result);
            result
        }
        .instrument(self.span("PutItem"))
        .await
    }
}

type PutResult = Result<PutItemOutput, SdkError<PutItemError, Response>>;

#[async_trait]
impl<T: DynamoRecord> DocumentRepository<T> for DynamoDbDocumentRepository<T> {
    #[instrument(skip(self), fields(table = %self.table_name, kind = T::KIND))]
    async fn find_all(&self) -> RepositoryResult<Vec<T>> {
        info!("Scanning collection");

        let mut documents = Vec::new();
        let mut exclusive_start_key: Option<Item> = None;

        loop {
            let response = async {
                let result = self
                    .client
                    .scan()
                    .table_name(&self.table_name)
                    .select(Select::AllAttributes)
                    .set_exclusive_start_key(exclusive_start_key.take())
                    .send()
                    .await;
                record_outcome(&result);
                result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
            }
            .instrument(self.span("Scan"))
            .await?;

            for item in response.items.unwrap_or_default() {
                match T::from_item(&item) {
                    Ok(document) => documents.push(document),
                    Err(e) => {
                        warn!("Failed to parse {} item: {}", T::KIND, e);
                        continue;
                    }
                }
            }

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        info!("Found {} documents", documents.len());
        Ok(documents)
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn find_by_id(&self, id: &str) -> RepositoryResult<Option<T>> {
        let response = async {
            let result = self
                .client
                .get_item()
                .table_name(&self.table_name)
                .set_key(Some(Self::key(id)))
                .send()
                .await;
            record_outcome(&result);
            result.map_err(|e| map_dynamodb_error(e.into(), &self.table_name))
        }
        .instrument(self.span("GetItem"))
        .await?;

        match response.item {
            Some(item) => Ok(Some(T::from_item(&item)?)),
            None => {
                info!("{} not found", T::KIND);
                Ok(None)
            }
        }
    }

    #[instrument(skip(self, document), fields(table = %self.table_name, id = %document.id()))]
    async fn create(&self, document: T) -> RepositoryResult<T> {
        self.put(&document, "attribute_not_exists(id)")
            .await
            .map_err(|e| match map_dynamodb_error(e.into(), &self.table_name) {
                RepositoryError::ConstraintViolation { .. } => RepositoryError::ConstraintViolation {
                    message: format!("{} {} already exists", T::KIND, document.id()),
                },
                other => other,
            })?;
        info!("{} created", T::KIND);
        Ok(document)
    }

    #[instrument(skip(self, document), fields(table = %self.table_name, id = %document.id()))]
    async fn update(&self, document: T) -> RepositoryResult<T> {
        self.put(&document, "attribute_exists(id)")
            .await
            .map_err(|e| map_conditional_error(e, &self.table_name))?;
        info!("{} updated", T::KIND);
        Ok(document)
    }

    #[instrument(skip(self), fields(table = %self.table_name, id = %id))]
    async fn delete(&self, id: &str) -> RepositoryResult<()> {
        async {
            let result = self
                .client
                .delete_item()
                .table_name(&self.table_name)
                .set_key(Some(Self::key(id)))
                .condition_expression("attribute_exists(id)")
                .send()
                .await;
            record_outcome(&result);
            result.map_err(|e| map_conditional_error(e, &self.table_name))
        }
        .instrument(self.span("DeleteItem"))
        .await?;

        info!("{} deleted", T::KIND);
        Ok(())
    }

    #[instrument(skip(self), fields(table = %self.table_name))]
    async fn count(&self) -> RepositoryResult<usize> {
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

            total += response.count().max(0) as usize;

            match response.last_evaluated_key {
                Some(key) if !key.is_empty() => exclusive_start_key = Some(key),
                _ => break,
            }
        }

        info!("{} count: {}", T::KIND, total);
        Ok(total)
    }
}
