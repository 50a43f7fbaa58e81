use crate::{
    core::{Handler, Request, Response},
    error::WebError,
    middleware::Middleware,
};
use async_trait::async_trait;
use std::sync::Arc;
use tracing::{Instrument, info};

/// Tracing middleware that creates a span for each request with request_id context
///
/// Everything logged further down the chain carries the span's fields.
/// Install it after `RequestIdMiddleware` so the id is known.
#[derive(Clone)]
pub struct TracingMiddleware;

impl TracingMiddleware {
    pub fn new() -> Self {
        Self
    }
}

impl Default for TracingMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Middleware for TracingMiddleware {
    async fn handle(&self, req: Request, next: Arc<dyn Handler>) -> Result<Response, WebError> {
        let span = tracing::info_span!(
            "request",
            request_id = req.request_id().unwrap_or(""),
            method = req.method().as_str(),
            path = req.path(),
            status = tracing::field::Empty,
            latency_ms = tracing::field::Empty,
        );
        let span_for_record = span.clone();

        async move {
            info!("Request started");
            let start_time = std::time::Instant::now();

            let res = match next.handle(req).await {
                Ok(res) => res,
                Err(e) => e.into_response(),
            };

            span_for_record.record("status", res.status.as_u16());
            span_for_record.record("latency_ms", start_time.elapsed().as_millis() as u64);
            info!("Request completed");

            Ok(res)
        }
        .instrument(span)
        .await
    }
}
