pub mod admin;
pub mod cart;
pub mod catalog;
pub mod errors;
pub mod favorites;
pub mod health;
pub mod intake;
pub mod metrics;
pub mod middleware;

pub use errors::{error_response, route_not_found, ApiError, ApiJson, ApiQuery};
pub use health::health_check;
pub use metrics::metrics_handler;
pub use middleware::{request_validation_middleware, security_headers_middleware, RequestLimits};
