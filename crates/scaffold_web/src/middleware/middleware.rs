use async_trait::async_trait;
use std::sync::Arc;

use crate::core::{Handler, Request, Response};
use crate::error::WebError;

/// Middleware trait for processing requests
///
/// A middleware receives the request and the rest of the chain as `next`. It
/// may inspect or change the request (including its request-scoped data)
/// before calling `next`, and the response after.
#[async_trait]
pub trait Middleware: Send + Sync + 'static {
    /// Process the request, optionally calling the next handler
    async fn handle(&self, req: Request, next: Arc<dyn Handler>) -> Result<Response, WebError>;
}

/// Wrapper that implements Handler for middleware composition
struct MiddlewareHandler {
    middleware: Arc<dyn Middleware>,
    next: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for MiddlewareHandler {
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        self.middleware.handle(req, Arc::clone(&self.next)).await
    }
}

/// Compose multiple middlewares around a final handler
///
/// The first middleware in the slice ends up outermost: it sees the request
/// first and the response last.
pub fn compose(middlewares: &[Arc<dyn Middleware>], final_handler: Arc<dyn Handler>) -> Arc<dyn Handler> {
    middlewares
        .iter()
        .rev()
        .fold(final_handler, |next, middleware| {
            Arc::new(MiddlewareHandler {
                middleware: Arc::clone(middleware),
                next,
            }) as Arc<dyn Handler>
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Method;
    use http::StatusCode;
    use std::sync::Mutex;

    struct Record {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl Middleware for Record {
        async fn handle(&self, req: Request, next: Arc<dyn Handler>) -> Result<Response, WebError> {
            self.log.lock().unwrap().push(format!("{}:before", self.name));
            let res = next.handle(req).await;
            self.log.lock().unwrap().push(format!("{}:after", self.name));
            res
        }
    }

    struct Ok200;

    #[async_trait]
    impl Handler for Ok200 {
        async fn handle(&self, _req: Request) -> Result<Response, WebError> {
            Ok(Response::text(StatusCode::OK, "ok"))
        }
    }

    #[tokio::test]
    async fn first_middleware_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain: Vec<Arc<dyn Middleware>> = vec![
            Arc::new(Record { name: "a", log: log.clone() }),
            Arc::new(Record { name: "b", log: log.clone() }),
        ];

        let entry = compose(&chain, Arc::new(Ok200));
        let res = entry.handle(Request::new(Method::GET, "/")).await.unwrap();
        assert_eq!(res.status, StatusCode::OK);

        assert_eq!(
            *log.lock().unwrap(),
            vec!["a:before", "b:before", "b:after", "a:after"]
        );
    }

    #[tokio::test]
    async fn empty_chain_is_the_handler() {
        let entry = compose(&[], Arc::new(Ok200));
        let res = entry.handle(Request::new(Method::GET, "/")).await.unwrap();
        assert_eq!(res.status, StatusCode::OK);
    }
}
