use thiserror::Error;

/// Service-level errors that can occur in business logic
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("{kind} not found: {id}")]
    ItemNotFound { kind: String, id: String },

    #[error("Cart item not found: item_id={item_id}, user_id={user_id}")]
    CartItemNotFound { item_id: String, user_id: String },

    #[error("Favorite not found: item_id={item_id}, user_id={user_id}")]
    FavoriteNotFound { item_id: String, user_id: String },

    #[error("Validation error: {message}")]
    ValidationError { message: String },

    #[error("Repository error: {source}")]
    Repository {
        #[from]
        source: RepositoryError,
    },

    #[error("Configuration error: {message}")]
    Configuration { message: String },
}

impl ServiceError {
    pub fn not_found(kind: &str, id: &str) -> Self {
        ServiceError::ItemNotFound {
            kind: kind.to_string(),
            id: id.to_string(),
        }
    }
}

/// Repository-level errors for data access operations
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Database connection failed")]
    ConnectionFailed,

    #[error("Item not found")]
    NotFound,

    #[error("Constraint violation: {message}")]
    ConstraintViolation { message: String },

    #[error("Malformed item: {message}")]
    MalformedItem { message: String },

    #[error("AWS SDK error: {message}")]
    AwsSdk { message: String },

    #[error("DynamoDB table not found: {table_name}. Ensure the table exists and IAM permissions are correct.")]
    TableNotFound { table_name: String },

    #[error("Timeout occurred during operation")]
    Timeout,

    #[error("Rate limit exceeded")]
    RateLimitExceeded,
}

/// Validation errors for input data
#[derive(Debug, Error)]
pub enum ValidationError {
    #[error("Required field missing: {field}")]
    RequiredField { field: String },

    #[error("Invalid field value: {field}={value}, reason={reason}")]
    InvalidValue {
        field: String,
        value: String,
        reason: String,
    },

    #[error("Field too long: {field}, max_length={max_length}, actual_length={actual_length}")]
    TooLong {
        field: String,
        max_length: usize,
        actual_length: usize,
    },

    #[error("Field too short: {field}, min_length={min_length}, actual_length={actual_length}")]
    TooShort {
        field: String,
        min_length: usize,
        actual_length: usize,
    },

    #[error("Invalid format: {field}, expected={expected}")]
    InvalidFormat { field: String, expected: String },

    #[error("Value out of range: {field}, min={min}, max={max}, value={value}")]
    OutOfRange {
        field: String,
        min: String,
        max: String,
        value: String,
    },
}

impl From<ValidationError> for ServiceError {
    fn from(err: ValidationError) -> Self {
        ServiceError::ValidationError {
            message: err.to_string(),
        }
    }
}

/// Result type alias for service operations
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Result type alias for repository operations
pub type RepositoryResult<T> = Result<T, RepositoryError>;

/// Result type alias for validation operations
pub type ValidationResult<T> = Result<T, ValidationError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let error = ServiceError::not_found("Product", "P1a2b3c4d");
        assert_eq!(error.to_string(), "Product not found: P1a2b3c4d");

        let error = ServiceError::CartItemNotFound {
            item_id: "B00000001".to_string(),
            user_id: "user-1".to_string(),
        };
        assert_eq!(
            error.to_string(),
            "Cart item not found: item_id=B00000001, user_id=user-1"
        );

        let validation_error = ValidationError::RequiredField {
            field: "email".to_string(),
        };
        assert_eq!(validation_error.to_string(), "Required field missing: email");
    }

    #[test]
    fn test_error_conversion() {
        let validation_error = ValidationError::OutOfRange {
            field: "rating".to_string(),
            min: "1".to_string(),
            max: "5".to_string(),
            value: "9".to_string(),
        };

        let service_error: ServiceError = validation_error.into();
        match service_error {
            ServiceError::ValidationError { message } => {
                assert!(message.contains("Value out of range: rating"));
            }
            _ => panic!("Expected ValidationError conversion"),
        }
    }

    #[test]
    fn test_repository_error_conversion() {
        let service_error: ServiceError = RepositoryError::TableNotFound {
            table_name: "HavenCartProducts".to_string(),
        }
        .into();

        match service_error {
            ServiceError::Repository { source } => {
                assert!(source.to_string().contains("HavenCartProducts"));
            }
            _ => panic!("Expected Repository error"),
        }
    }
}
