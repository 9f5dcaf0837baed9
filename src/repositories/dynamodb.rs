//! Helpers shared by the DynamoDB repositories: X-Ray friendly spans, error
//! mapping and attribute conversions.

use aws_sdk_dynamodb::operation::RequestId;
use aws_sdk_dynamodb::types::AttributeValue;
use aws_sdk_dynamodb::Error as DynamoDbError;
use aws_smithy_runtime_api::client::result::SdkError;
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::fmt::Display;
use std::str::FromStr;
use tracing::error;

use crate::models::{RepositoryError, RepositoryResult};

/// A DynamoDB item as returned by the SDK
pub type Item = HashMap<String, AttributeValue>;

/// Create a DynamoDB subsegment span with proper X-Ray attributes
pub(crate) fn dynamodb_span(operation: &str, table_name: &str, region: &str) -> tracing::Span {
    tracing::info_span!(
        "DynamoDB",
        // AWS X-Ray specific attributes
        "aws.service" = "DynamoDB",
        "aws.operation" = operation,
        "aws.region" = %region,
        "aws.dynamodb.table_name" = %table_name,
        "aws.request_id" = tracing::field::Empty,
        "aws.agent" = "rust-aws-sdk",

        // Resource identification for X-Ray
        "aws.remote.service" = "AWS::DynamoDB",
        "aws.remote.operation" = operation,
        "aws.remote.resource.type" = "AWS::DynamoDB::Table",
        "aws.remote.resource.identifier" = %table_name,
        "remote.resource.cfn.primary.identifier" = %table_name,

        "table_name" = %table_name,
        "resource_names" = format!("[{}]", table_name),
        "endpoint" = format!("https://dynamodb.{}.amazonaws.com", region),

        // OpenTelemetry semantic conventions
        "otel.kind" = "client",
        "otel.name" = format!("DynamoDB.{}", operation),

        "rpc.system" = "aws-api",
        "rpc.service" = "AmazonDynamoDBv2",
        "rpc.method" = operation,

        "http.method" = "POST",
        "http.status_code" = tracing::field::Empty,

        "db.system" = "dynamodb",
        "db.name" = %table_name,
        "db.operation" = operation,

        "component" = "aws-sdk-dynamodb",
    )
}

/// Record the response status and request id on the current DynamoDB span
pub(crate) fn record_outcome<O: RequestId, E: Display>(result: &Result<O, E>) {
    match result {
        Ok(output) => {
            tracing::Span::current().record("http.status_code", 200);
            if let Some(request_id) = output.request_id() {
                tracing::Span::current().record("aws.request_id", request_id);
            }
        }
        Err(e) => {
            tracing::Span::current().record("http.status_code", 400);
            error!("DynamoDB request failed: {}", e);
        }
    }
}

/// Convert a DynamoDB error to a RepositoryError
pub(crate) fn map_dynamodb_error(error: DynamoDbError, table_name: &str) -> RepositoryError {
    error!("DynamoDB error: {:?}", error);

    match error {
        DynamoDbError::ResourceNotFoundException(_) => RepositoryError::TableNotFound {
            table_name: table_name.to_string(),
        },
        DynamoDbError::ConditionalCheckFailedException(e) => {
            RepositoryError::ConstraintViolation {
                message: e.to_string(),
            }
        }
        DynamoDbError::ProvisionedThroughputExceededException(_)
        | DynamoDbError::RequestLimitExceeded(_) => RepositoryError::RateLimitExceeded,
        other => RepositoryError::AwsSdk {
            message: other.to_string(),
        },
    }
}

/// Map an SDK error, treating a failed `attribute_exists` condition as a missing item
pub(crate) fn map_conditional_error<E, R>(
    error: SdkError<E, R>,
    table_name: &str,
) -> RepositoryError
where
    DynamoDbError: From<SdkError<E, R>>,
{
    match DynamoDbError::from(error) {
        DynamoDbError::ConditionalCheckFailedException(_) => RepositoryError::NotFound,
        other => map_dynamodb_error(other, table_name),
    }
}

fn malformed(key: &str, reason: &str) -> RepositoryError {
    RepositoryError::MalformedItem {
        message: format!("{} {}", reason, key),
    }
}

pub(crate) fn string_attr(value: impl Into<String>) -> AttributeValue {
    AttributeValue::S(value.into())
}

pub(crate) fn number_attr(value: impl ToString) -> AttributeValue {
    AttributeValue::N(value.to_string())
}

pub(crate) fn timestamp_attr(value: &DateTime<Utc>) -> AttributeValue {
    AttributeValue::S(value.to_rfc3339())
}

/// Ordered string lists are stored as `L` so they keep order and may be empty
pub(crate) fn string_list_attr(values: &[String]) -> AttributeValue {
    AttributeValue::L(values.iter().cloned().map(AttributeValue::S).collect())
}

pub(crate) fn required_string(item: &Item, key: &str) -> RepositoryResult<String> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .cloned()
        .ok_or_else(|| malformed(key, "Missing"))
}

pub(crate) fn optional_string(item: &Item, key: &str) -> Option<String> {
    item.get(key).and_then(|v| v.as_s().ok()).cloned()
}

pub(crate) fn required_number<T: FromStr>(item: &Item, key: &str) -> RepositoryResult<T> {
    optional_number(item, key)?.ok_or_else(|| malformed(key, "Missing"))
}

/// Absent is `None`, present but unparsable is an error
pub(crate) fn optional_number<T: FromStr>(item: &Item, key: &str) -> RepositoryResult<Option<T>> {
    match item.get(key) {
        None | Some(AttributeValue::Null(_)) => Ok(None),
        Some(value) => value
            .as_n()
            .ok()
            .and_then(|n| n.parse().ok())
            .map(Some)
            .ok_or_else(|| malformed(key, "Invalid number in")),
    }
}

pub(crate) fn bool_or_false(item: &Item, key: &str) -> bool {
    item.get(key)
        .and_then(|v| v.as_bool().ok())
        .copied()
        .unwrap_or(false)
}

pub(crate) fn string_list(item: &Item, key: &str) -> Vec<String> {
    item.get(key)
        .and_then(|v| v.as_l().ok())
        .map(|list| {
            list.iter()
                .filter_map(|v| v.as_s().ok().cloned())
                .collect()
        })
        .unwrap_or_default()
}

pub(crate) fn required_timestamp(item: &Item, key: &str) -> RepositoryResult<DateTime<Utc>> {
    item.get(key)
        .and_then(|v| v.as_s().ok())
        .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
        .map(|dt| dt.with_timezone(&Utc))
        .ok_or_else(|| malformed(key, "Invalid"))
}

/// Parse a string attribute through `FromStr`, used for the enum fields
pub(crate) fn required_parsed<T: FromStr>(item: &Item, key: &str) -> RepositoryResult<T> {
    required_string(item, key)?
        .parse()
        .map_err(|_| malformed(key, "Invalid value for"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::ContactStatus;

    fn sample_item() -> Item {
        let now = Utc::now();
        let mut item = Item::new();
        item.insert("name".to_string(), string_attr("Oak Board"));
        item.insert("stock".to_string(), number_attr(7));
        item.insert("on_sale".to_string(), AttributeValue::Bool(true));
        item.insert(
            "images".to_string(),
            string_list_attr(&["b.jpg".to_string(), "a.jpg".to_string()]),
        );
        item.insert("created_at".to_string(), timestamp_attr(&now));
        item.insert("status".to_string(), string_attr("in_progress"));
        item.insert("pages".to_string(), AttributeValue::S("many".to_string()));
        item
    }

    #[test]
    fn test_attribute_readers() {
        let item = sample_item();

        assert_eq!(required_string(&item, "name").unwrap(), "Oak Board");
        assert_eq!(required_number::<u32>(&item, "stock").unwrap(), 7);
        assert!(bool_or_false(&item, "on_sale"));
        assert!(!bool_or_false(&item, "is_featured"));
        assert_eq!(string_list(&item, "images"), vec!["b.jpg", "a.jpg"]);
        assert!(string_list(&item, "missing").is_empty());
        assert!(required_timestamp(&item, "created_at").is_ok());
        assert_eq!(
            required_parsed::<ContactStatus>(&item, "status").unwrap(),
            ContactStatus::InProgress
        );
        assert_eq!(optional_number::<u32>(&item, "absent").unwrap(), None);
    }

    #[test]
    fn test_malformed_attributes() {
        let item = sample_item();

        match required_string(&item, "description") {
            Err(RepositoryError::MalformedItem { message }) => {
                assert!(message.contains("description"))
            }
            other => panic!("Expected MalformedItem, got {:?}", other),
        }
        assert!(optional_number::<u32>(&item, "pages").is_err());
        assert!(required_parsed::<ContactStatus>(&item, "name").is_err());
    }
}
