use crate::{
    core::{Handler, Request, RequestId, Response},
    error::WebError,
    middleware::Middleware,
};
use http::HeaderValue;
use std::sync::Arc;

/// Attach a request id to every request and echo it on the response.
///
/// An incoming `x-request-id` is reused; otherwise one is generated. The id
/// lives in the request scope, so the headers a handler sees are exactly the
/// ones the client sent.
#[derive(Clone)]
pub struct RequestIdMiddleware {
    header: &'static str,
}

impl RequestIdMiddleware {
    pub fn new() -> Self {
        Self {
            header: "x-request-id",
        }
    }
}

impl Default for RequestIdMiddleware {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait::async_trait]
impl Middleware for RequestIdMiddleware {
    async fn handle(&self, mut req: Request, next: Arc<dyn Handler>) -> Result<Response, WebError> {
        let request_id = req
            .headers()
            .get(self.header)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string())
            .unwrap_or_else(crate::utils::request_id::generate);

        req.set_request_share_data(Arc::new(RequestId::new(request_id.clone())));

        let mut res = match next.handle(req).await {
            Ok(res) => res,
            Err(e) => e.into_response(),
        };

        if !res.headers.contains_key(self.header)
            && let Ok(value) = HeaderValue::from_str(&request_id)
        {
            res.headers.insert(self.header, value);
        }
        Ok(res)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Method;
    use http::StatusCode;

    struct SeeHeaders;

    #[async_trait::async_trait]
    impl Handler for SeeHeaders {
        async fn handle(&self, req: Request) -> Result<Response, WebError> {
            let id = req.request_id().unwrap_or_default().to_string();
            Ok(Response::text(StatusCode::OK, id)
                .header("x-seen-headers", req.headers().len().to_string()))
        }
    }

    #[tokio::test]
    async fn generated_id_is_scoped_not_injected() {
        let res = RequestIdMiddleware::new()
            .handle(Request::new(Method::GET, "/"), Arc::new(SeeHeaders))
            .await
            .unwrap();

        assert_eq!(res.headers["x-seen-headers"], "0");
        let echoed = res.headers["x-request-id"].to_str().unwrap().to_string();
        assert!(!echoed.is_empty());
        assert_eq!(res.body.collect().await.as_ref(), echoed.as_bytes());
    }

    #[tokio::test]
    async fn incoming_id_is_reused() {
        let req = Request::new(Method::GET, "/").header("x-request-id", "abc-123");
        let res = RequestIdMiddleware::new()
            .handle(req, Arc::new(SeeHeaders))
            .await
            .unwrap();

        assert_eq!(res.headers["x-request-id"], "abc-123");
        assert_eq!(res.headers["x-seen-headers"], "1");
    }

    #[tokio::test]
    async fn error_responses_carry_the_id() {
        struct Fails;

        #[async_trait::async_trait]
        impl Handler for Fails {
            async fn handle(&self, _req: Request) -> Result<Response, WebError> {
                Err(crate::error::not_found("Not found"))
            }
        }

        let req = Request::new(Method::GET, "/").header("x-request-id", "r-1");
        let res = RequestIdMiddleware::new()
            .handle(req, Arc::new(Fails))
            .await
            .unwrap();
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        assert_eq!(res.headers["x-request-id"], "r-1");
    }
}
