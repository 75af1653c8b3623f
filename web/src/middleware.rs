//! Correlation-id middleware.
//!
//! Each request gets an id, taken from the `X-Correlation-ID` header when
//! the caller sends a usable one and generated otherwise. The id is recorded
//! on an `http_request` span around the handler, so every log line emitted
//! while serving the request carries it, and is echoed on the response.
//!
//! # Example
//!
//! ```ignore
//! use axum::Router;
//! use studentdesk_web::correlation_id_layer;
//!
//! let app = Router::new()
//!     .route("/api/tickets", get(list_tickets))
//!     .layer(correlation_id_layer());
//! ```

use axum::{extract::Request, http::HeaderValue, response::Response};
use std::task::{Context, Poll};
use tower::{Layer, Service};
use tracing::Instrument;
use uuid::Uuid;

/// Header name for correlation ID.
pub const CORRELATION_ID_HEADER: &str = "X-Correlation-ID";

/// Longest caller-supplied id that is accepted.
const MAX_CORRELATION_ID_LEN: usize = 128;

/// Caller-supplied id from `value`, if it is short, non-empty and made of
/// visible ASCII.
fn accept_correlation_id(value: Option<&HeaderValue>) -> Option<String> {
    let raw = value?.to_str().ok()?.trim();
    let usable = !raw.is_empty()
        && raw.len() <= MAX_CORRELATION_ID_LEN
        && raw.bytes().all(|b| b.is_ascii_graphic());
    usable.then(|| raw.to_string())
}

/// Create a layer that adds correlation ID tracking to all requests.
#[must_use]
pub const fn correlation_id_layer() -> CorrelationIdLayer {
    CorrelationIdLayer
}

/// Layer for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdLayer;

impl<S> Layer<S> for CorrelationIdLayer {
    type Service = CorrelationIdMiddleware<S>;

    fn layer(&self, inner: S) -> Self::Service {
        CorrelationIdMiddleware { inner }
    }
}

/// Middleware service for correlation ID tracking.
#[derive(Clone, Debug)]
pub struct CorrelationIdMiddleware<S> {
    inner: S,
}

impl<S> Service<Request> for CorrelationIdMiddleware<S>
where
    S: Service<Request, Response = Response> + Send + 'static,
    S::Future: Send + 'static,
{
    type Response = S::Response;
    type Error = S::Error;
    type Future = std::pin::Pin<
        Box<dyn std::future::Future<Output = Result<Self::Response, Self::Error>> + Send>,
    >;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, req: Request) -> Self::Future {
        let correlation_id = accept_correlation_id(req.headers().get(CORRELATION_ID_HEADER))
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        let span = tracing::info_span!(
            "http_request",
            correlation_id = %correlation_id,
            method = %req.method(),
            path = %req.uri().path(),
        );

        let fut = self.inner.call(req);

        Box::pin(async move {
            let mut response = fut.instrument(span).await?;

            if let Ok(header_value) = HeaderValue::from_str(&correlation_id) {
                response
                    .headers_mut()
                    .insert(CORRELATION_ID_HEADER, header_value);
            }

            Ok(response)
        })
    }
}
