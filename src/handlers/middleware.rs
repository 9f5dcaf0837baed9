use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue, Method, StatusCode},
    middleware::Next,
    response::Response,
};
use tracing::warn;

use super::error_response;

/// Limits enforced before a request reaches a handler
#[derive(Debug, Clone, Copy)]
pub struct RequestLimits {
    pub max_request_size: usize,
}

/// Rejects oversized bodies and bodies that are not JSON
pub async fn request_validation_middleware(
    State(limits): State<RequestLimits>,
    request: Request,
    next: Next,
) -> Response {
    if let Err(response) = validate_request_size(request.headers(), limits.max_request_size) {
        return response;
    }
    if let Err(response) = validate_content_type(request.method(), request.headers()) {
        return response;
    }

    next.run(request).await
}

fn declared_length(headers: &HeaderMap) -> Option<u64> {
    headers
        .get(header::CONTENT_LENGTH)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.parse::<u64>().ok())
}

/// A body is present when it has a non-zero length or is chunked
fn has_body(headers: &HeaderMap) -> bool {
    match declared_length(headers) {
        Some(length) => length > 0,
        None => headers.contains_key(header::TRANSFER_ENCODING),
    }
}

fn validate_content_type(method: &Method, headers: &HeaderMap) -> Result<(), Response> {
    let expects_body = method == Method::POST || method == Method::PUT || method == Method::PATCH;
    if !expects_body || !has_body(headers) {
        return Ok(());
    }

    match headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
    {
        Some(content_type) if content_type.starts_with("application/json") => Ok(()),
        Some(content_type) => {
            warn!("Invalid content type: {}", content_type);
            Err(error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type must be application/json",
            ))
        }
        None => {
            warn!("Missing content type header");
            Err(error_response(
                StatusCode::UNSUPPORTED_MEDIA_TYPE,
                "Content-Type header is required for requests with a body",
            ))
        }
    }
}

fn validate_request_size(headers: &HeaderMap, max_request_size: usize) -> Result<(), Response> {
    match declared_length(headers) {
        Some(length) if length > max_request_size as u64 => {
            warn!("Request too large: {} bytes", length);
            Err(error_response(
                StatusCode::PAYLOAD_TOO_LARGE,
                &format!(
                    "Request size {} bytes exceeds maximum of {} bytes",
                    length, max_request_size
                ),
            ))
        }
        _ => Ok(()),
    }
}

/// Error responses produced by the router or tower layers carry no body,
/// e.g. 405 on a known path or 408 from the timeout layer.
fn is_bare_error(response: &Response) -> bool {
    let status = response.status();
    (status.is_client_error() || status.is_server_error())
        && !response.headers().contains_key(header::CONTENT_TYPE)
}

fn with_error_body(response: Response) -> Response {
    let status = response.status();
    let mut replacement = error_response(
        status,
        status.canonical_reason().unwrap_or("Request failed"),
    );

    for (name, value) in response.headers() {
        if name != header::CONTENT_LENGTH && !replacement.headers().contains_key(name) {
            replacement.headers_mut().insert(name.clone(), value.clone());
        }
    }

    replacement
}

/// Security headers middleware; also gives bare error responses the JSON error body
pub async fn security_headers_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    if is_bare_error(&response) {
        response = with_error_body(response);
    }
    let headers = response.headers_mut();

    headers.insert(
        "X-Content-Type-Options",
        HeaderValue::from_static("nosniff"),
    );
    headers.insert("X-Frame-Options", HeaderValue::from_static("DENY"));
    headers.insert(
        "Referrer-Policy",
        HeaderValue::from_static("strict-origin-when-cross-origin"),
    );
    headers.insert(
        "Content-Security-Policy",
        HeaderValue::from_static("default-src 'self'"),
    );

    response
}
