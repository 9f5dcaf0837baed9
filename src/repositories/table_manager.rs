use aws_sdk_dynamodb::types::{
    AttributeDefinition, BillingMode, KeySchemaElement, KeyType, ScalarAttributeType, TableStatus,
};
use aws_sdk_dynamodb::{Client as DynamoDbClient, Error as DynamoDbError};
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tracing::{error, info, instrument, warn};

use crate::models::{RepositoryError, RepositoryResult};

use super::dynamodb::map_dynamodb_error;

/// Key layout of a table. Every key attribute is a string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDefinition {
    pub name: String,
    pub hash_key: String,
    pub range_key: Option<String>,
}

impl TableDefinition {
    /// Table keyed by a single hash key
    pub fn keyed_by(name: impl Into<String>, hash_key: &str) -> Self {
        Self {
            name: name.into(),
            hash_key: hash_key.to_string(),
            range_key: None,
        }
    }

    pub fn with_range_key(mut self, range_key: &str) -> Self {
        self.range_key = Some(range_key.to_string());
        self
    }
}

/// Outcome of ensuring a single table exists
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TableSetupStatus {
    Created,
    AlreadyExists,
}

/// Manages DynamoDB table creation and configuration
#[derive(Clone)]
pub struct TableManager {
    client: Arc<DynamoDbClient>,
    poll_interval: Duration,
    max_attempts: u32,
}

impl TableManager {
    /// Create a new table manager
    pub fn new(client: Arc<DynamoDbClient>) -> Self {
        Self {
            client,
            // 5 minutes with 10-second intervals
            poll_interval: Duration::from_secs(10),
            max_attempts: 30,
        }
    }

    /// Create the table if missing and wait for it to become active
    #[instrument(skip(self, definition), fields(table_name = %definition.name))]
    pub async fn create_table(
        &self,
        definition: &TableDefinition,
    ) -> RepositoryResult<TableSetupStatus> {
        if self.table_exists(&definition.name).await? {
            info!("Table {} already exists", definition.name);
            return Ok(TableSetupStatus::AlreadyExists);
        }

        let mut keys = vec![(definition.hash_key.as_str(), KeyType::Hash)];
        if let Some(range_key) = &definition.range_key {
            keys.push((range_key.as_str(), KeyType::Range));
        }

        let mut attribute_definitions = Vec::with_capacity(keys.len());
        let mut key_schema = Vec::with_capacity(keys.len());
        for (attribute_name, key_type) in keys {
            attribute_definitions.push(
                AttributeDefinition::builder()
                    .attribute_name(attribute_name)
                    .attribute_type(ScalarAttributeType::S)
                    .build()
                    .map_err(|e| RepositoryError::AwsSdk {
                        message: format!("Failed to build attribute definition: {}", e),
                    })?,
            );
            key_schema.push(
                KeySchemaElement::builder()
                    .attribute_name(attribute_name)
                    .key_type(key_type)
                    .build()
                    .map_err(|e| RepositoryError::AwsSdk {
                        message: format!("Failed to build key schema: {}", e),
                    })?,
            );
        }

        self.client
            .create_table()
            .table_name(&definition.name)
            .set_attribute_definitions(Some(attribute_definitions))
            .set_key_schema(Some(key_schema))
            .billing_mode(BillingMode::PayPerRequest)
            .send()
            .await
            .map_err(|e| map_dynamodb_error(e.into(), &definition.name))?;

        info!("Table creation initiated, waiting for table to become active");
        self.wait_for_table_active(&definition.name).await?;
        info!("Table {} created successfully", definition.name);

        Ok(TableSetupStatus::Created)
    }

    /// Check if a table exists
    #[instrument(skip(self), fields(table_name = %table_name))]
    pub async fn table_exists(&self, table_name: &str) -> RepositoryResult<bool> {
        match self.client.describe_table().table_name(table_name).send().await {
            Ok(_) => Ok(true),
            Err(e) => match DynamoDbError::from(e) {
                DynamoDbError::ResourceNotFoundException(_) => {
                    info!("Table {} does not exist", table_name);
                    Ok(false)
                }
                other => {
                    error!("Error checking table existence: {}", other);
                    Err(RepositoryError::ConnectionFailed)
                }
            },
        }
    }

    /// Wait for a table to become active
    #[instrument(skip(self), fields(table_name = %table_name))]
    async fn wait_for_table_active(&self, table_name: &str) -> RepositoryResult<()> {
        let mut attempts = 0;

        loop {
            let response = self
                .client
                .describe_table()
                .table_name(table_name)
                .send()
                .await
                .map_err(|e| map_dynamodb_error(e.into(), table_name))?;

            match response.table.and_then(|table| table.table_status) {
                Some(TableStatus::Active) => {
                    info!("Table {} is now active", table_name);
                    return Ok(());
                }
                Some(status) => info!("Table {} status: {:?}, waiting...", table_name, status),
                None => warn!("Table {} status unknown, waiting...", table_name),
            }

            attempts += 1;
            if attempts >= self.max_attempts {
                error!("Timeout waiting for table {} to become active", table_name);
                return Err(RepositoryError::Timeout);
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    /// Create every table concurrently. Returns the status of each table in input order.
    #[instrument(skip(self, definitions), fields(table_count = definitions.len()))]
    pub async fn create_all_tables(
        &self,
        definitions: &[TableDefinition],
    ) -> RepositoryResult<Vec<(String, TableSetupStatus)>> {
        info!("Creating all tables");

        let mut tasks = JoinSet::new();
        for (index, definition) in definitions.iter().cloned().enumerate() {
            let manager = self.clone();
            tasks.spawn(async move {
                let status = manager.create_table(&definition).await;
                (index, definition.name, status)
            });
        }

        let mut results = Vec::with_capacity(definitions.len());
        while let Some(joined) = tasks.join_next().await {
            let (index, name, status) = joined.map_err(|e| RepositoryError::AwsSdk {
                message: format!("Table setup task failed: {}", e),
            })?;
            results.push((index, name, status?));
        }
        results.sort_by_key(|(index, _, _)| *index);

        info!("All tables ready");
        Ok(results
            .into_iter()
            .map(|(_, name, status)| (name, status))
            .collect())
    }
}
