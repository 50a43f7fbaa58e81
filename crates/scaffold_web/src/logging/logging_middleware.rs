use crate::{
    core::{Handler, Request, Response},
    error::WebError,
    logging::Logger,
    middleware::Middleware,
};
use async_trait::async_trait;
use std::sync::Arc;

/// Logs every request's full header set before handing it on, then the
/// outcome once the response is ready.
pub struct LoggingMiddleware {
    logger: Arc<dyn Logger>,
}

impl LoggingMiddleware {
    pub fn new<L: Logger + 'static>(logger: L) -> Self {
        Self {
            logger: Arc::new(logger),
        }
    }
}

#[async_trait]
impl Middleware for LoggingMiddleware {
    async fn handle(&self, req: Request, next: Arc<dyn Handler>) -> Result<Response, WebError> {
        let start_time = std::time::Instant::now();
        let method = req.method().clone();
        let path = req.path().to_string();
        let request_id = req.request_id().unwrap_or("").to_string();

        self.logger
            .request_received(&request_id, method.as_str(), &path, &req.headers_json());

        let res = match next.handle(req).await {
            Ok(res) => res,
            Err(e) => e.into_response(),
        };

        self.logger.request_completed(
            &request_id,
            method.as_str(),
            &path,
            res.status.as_u16(),
            start_time.elapsed().as_millis(),
        );

        Ok(res)
    }
}
