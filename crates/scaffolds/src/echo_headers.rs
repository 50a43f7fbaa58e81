//! `GET /` answers with the request's own headers.

use std::sync::Arc;

use async_trait::async_trait;
use scaffold_web::{
    App, Handler, PanicRecoveryMiddleware, Request, Response, Router, StatusCode,
    TracingMiddleware, WebError,
};
use serde::Serialize;
use serde_json::Value;

pub const DEFAULT_PORT: u16 = 8081;

pub struct EchoHeadersHandler;

impl EchoHeadersHandler {
    pub fn new() -> Arc<Self> {
        Arc::new(Self)
    }
}

#[async_trait]
impl Handler for EchoHeadersHandler {
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        Ok(Response::json(StatusCode::OK, Value::Object(req.headers_json())))
    }
}

#[derive(Serialize)]
struct Health {
    status: &'static str,
}

/// `/` and `/healthz`, shared with the swagger scaffold.
pub fn router() -> Router {
    let mut router = Router::new();
    router.get("/", EchoHeadersHandler::new());
    router.get_fn("/healthz", |_req| {
        Ok(Response::json(StatusCode::OK, Health { status: "healthy" }))
    });
    router
}

pub fn app() -> App {
    let mut app = App::new(router());
    app.use_middleware(TracingMiddleware::new());
    app.use_middleware(PanicRecoveryMiddleware::new());
    app
}
