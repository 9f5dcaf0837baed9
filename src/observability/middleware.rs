use axum::{
    extract::{MatchedPath, Request},
    middleware::Next,
    response::Response,
};
use opentelemetry::trace::TraceContextExt;
use std::future::Future;
use std::{fmt::Display, sync::Arc, time::Instant};
use tracing::{error, info, instrument, warn, Instrument};
use tracing_opentelemetry::OpenTelemetrySpanExt;

use super::tracing::get_current_trace_id;
use super::Metrics;

/// Span and metrics for every request
pub async fn observability_middleware(
    metrics: Arc<Metrics>,
    request: Request,
    next: Next,
) -> Response {
    let start_time = Instant::now();
    let method = request.method().to_string();
    let uri = request.uri().to_string();

    let user_agent = request
        .headers()
        .get("user-agent")
        .and_then(|value| value.to_str().ok())
        .unwrap_or("unknown")
        .to_string();

    // First hop of X-Forwarded-For, then X-Real-IP
    let client_ip = request
        .headers()
        .get("x-forwarded-for")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.split(',').next())
        .or_else(|| {
            request
                .headers()
                .get("x-real-ip")
                .and_then(|value| value.to_str().ok())
        })
        .unwrap_or("unknown")
        .trim()
        .to_string();

    // Route template keeps metric cardinality bounded
    let endpoint = request
        .extensions()
        .get::<MatchedPath>()
        .map(|matched_path| matched_path.as_str().to_string())
        .unwrap_or_else(|| "unmatched".to_string());

    let span_name = format!("{} {}", method, endpoint);
    let span = tracing::info_span!(
        target: "havencart::http",
        "{}", span_name,
        otel.name = %span_name,
        otel.kind = "server",
        http.method = %method,
        http.route = %endpoint,
        http.url = %uri,
        http.user_agent = %user_agent,
        client.address = %client_ip,
        http.response.status_code = tracing::field::Empty,
        http.response_time_ms = tracing::field::Empty,
    );

    async {
        metrics.increment_in_flight(&method, &endpoint);
        let trace_id = get_current_trace_id().unwrap_or_default();

        info!(trace_id = %trace_id, method = %method, path = %endpoint, client_ip = %client_ip, "Processing request");

        let response = next.run(request).await;

        let duration = start_time.elapsed();
        let duration_ms = duration.as_millis();
        let status_code = response.status().as_u16();

        let current_span = tracing::Span::current();
        current_span.record("http.response.status_code", status_code);
        current_span.record("http.response_time_ms", duration_ms);
        let otel_status = if status_code >= 500 {
            opentelemetry::trace::Status::error("HTTP server error")
        } else {
            opentelemetry::trace::Status::Ok
        };
        current_span.context().span().set_status(otel_status);

        metrics.record_http_request(&method, &endpoint, status_code, duration.as_secs_f64());
        metrics.decrement_in_flight(&method, &endpoint);

        if status_code >= 500 {
            error!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request failed"
            );
        } else if status_code >= 400 {
            warn!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request rejected"
            );
        } else {
            info!(
                trace_id = %trace_id,
                method = %method,
                path = %endpoint,
                status_code = status_code,
                duration_ms = duration_ms,
                "Request completed"
            );
        }

        response
    }
    .instrument(span)
    .await
}

/// Wraps service calls with a span, a business counter and an outcome log line
#[derive(Clone)]
pub struct BusinessTracingMiddleware {
    metrics: Arc<Metrics>,
}

impl BusinessTracingMiddleware {
    pub fn new(metrics: Arc<Metrics>) -> Self {
        Self { metrics }
    }

    async fn observe<F, T, E>(future: F, record: impl FnOnce(bool)) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        let start_time = Instant::now();
        let result = future.await;
        let duration_ms = start_time.elapsed().as_millis();

        match &result {
            Ok(_) => info!(duration_ms = duration_ms, "Operation completed"),
            Err(error) => warn!(error = %error, duration_ms = duration_ms, "Operation failed"),
        }
        record(result.is_ok());
        result
    }

    #[instrument(skip_all, fields(kind = %kind, operation = %operation))]
    pub async fn trace_catalog_operation<F, T, E>(
        &self,
        kind: &str,
        operation: &str,
        future: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        Self::observe(future, |success| {
            self.metrics
                .record_catalog_operation(kind, operation, success)
        })
        .await
    }

    #[instrument(skip_all, fields(operation = %operation, user_id = %user_id))]
    pub async fn trace_cart_operation<F, T, E>(
        &self,
        operation: &str,
        user_id: &str,
        future: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        Self::observe(future, |success| {
            self.metrics.record_cart_operation(operation, success)
        })
        .await
    }

    #[instrument(skip_all, fields(operation = %operation, user_id = %user_id))]
    pub async fn trace_favorite_operation<F, T, E>(
        &self,
        operation: &str,
        user_id: &str,
        future: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        Self::observe(future, |success| {
            self.metrics.record_favorite_operation(operation, success)
        })
        .await
    }

    /// Contact and review intake, including admin moderation
    #[instrument(skip_all, fields(kind = %kind, operation = %operation))]
    pub async fn trace_intake_operation<F, T, E>(
        &self,
        kind: &str,
        operation: &str,
        future: F,
    ) -> Result<T, E>
    where
        F: Future<Output = Result<T, E>>,
        E: Display,
    {
        Self::observe(future, |success| {
            self.metrics
                .record_intake_operation(kind, operation, success)
        })
        .await
    }
}
