pub mod config;
pub mod core;
pub mod docs;
pub mod error;
pub mod function;
pub mod logging;
pub mod middleware;
pub mod server;
pub mod utils;

// Re-export commonly used types at the crate root
pub use config::{ConfigError, ServerConfig};
pub use crate::core::*;
pub use docs::ApiDocs;
pub use error::{ResponseError, WebError};
pub use http::StatusCode;
pub use logging::*;
pub use middleware::*;
pub use server::serve;

use async_trait::async_trait;
use http::Response as HttpResponse;
use pingora::protocols::http::ServerSession;
use pingora_core::apps::HttpServerApp;
use std::collections::HashMap;
use std::sync::Arc;

/// Request bodies larger than this are refused with 413 unless the app
/// raises the limit.
pub const DEFAULT_MAX_BODY_SIZE: usize = 1024 * 1024;

/// The main application: holds router, middleware and the root path.
pub struct App {
    router: Router,
    pub(crate) middlewares: Vec<Arc<dyn Middleware>>,
    root_path: RootPath,
    max_body_size: usize,
}

/// Default 404 handler
struct NotFoundHandler;

#[async_trait]
impl Handler for NotFoundHandler {
    async fn handle(&self, _req: Request) -> Result<Response, WebError> {
        Err(error::not_found("Not found"))
    }
}

impl App {
    /// Single constructor: requires a Router; middlewares are added later.
    ///
    /// A request-id middleware is always installed first, so it is outermost.
    pub fn new(router: Router) -> Self {
        let mut s = Self {
            router,
            middlewares: Vec::new(),
            root_path: RootPath::default(),
            max_body_size: DEFAULT_MAX_BODY_SIZE,
        };
        s.use_middleware(RequestIdMiddleware::default());
        s
    }

    /// Append a middleware. Earlier middleware wraps later middleware.
    pub fn use_middleware<M: Middleware + 'static>(&mut self, middleware: M) {
        self.middlewares.push(Arc::new(middleware));
    }

    /// Root path every request starts with before any middleware rewrites it.
    pub fn set_root_path<S: AsRef<str>>(&mut self, root_path: S) {
        self.root_path = RootPath::new(root_path);
    }

    /// Largest request body, in bytes, read from a connection.
    pub fn set_max_body_size(&mut self, limit: usize) {
        self.max_body_size = limit;
    }

    /// Turn the app into a Pingora listening service.
    pub fn to_service(self, name: &str) -> pingora::services::listening::Service<App> {
        pingora::services::listening::Service::new(name.to_string(), self)
    }

    /// Handle a request end-to-end through middlewares and the router.
    pub async fn handle(&self, req: Request) -> Response {
        if req.body().len() > self.max_body_size {
            let mut res = self.payload_too_large();
            self.finalize_response_headers(&mut res);
            return res;
        }

        let found = self.router.find(req.method(), req.path());
        let (handler, params): (Arc<dyn Handler>, HashMap<String, String>) = match found {
            Some(found) => found,
            None => {
                if let Some(mut res) = self.method_mismatch(&req) {
                    self.finalize_response_headers(&mut res);
                    return res;
                }
                let h: Arc<dyn Handler> = Arc::new(NotFoundHandler);
                (h, HashMap::new())
            }
        };

        let mut req = req.with_params(params);
        req.set_root_path(self.root_path.clone());

        // Compose middlewares (onion model) around the route handler
        let entry = compose(&self.middlewares, handler);
        let mut response = entry
            .handle(req)
            .await
            .unwrap_or_else(WebError::into_response);

        self.finalize_response_headers(&mut response);
        response
    }

    /// 204 for an unrouted OPTIONS, 405 when the path exists under other
    /// methods; `None` when the path is unknown altogether.
    fn method_mismatch(&self, req: &Request) -> Option<Response> {
        let mut allowed = self.router.allowed_methods(req.path());
        if *req.method() == Method::OPTIONS {
            allowed.push("OPTIONS".to_string());
            allowed.sort();
            allowed.dedup();
            return Some(Response::empty(StatusCode::NO_CONTENT).header(http::header::ALLOW, allowed.join(", ")));
        }
        if allowed.is_empty() {
            return None;
        }
        Some(
            Response::json(
                StatusCode::METHOD_NOT_ALLOWED,
                serde_json::json!({ "error": "Method not allowed" }),
            )
            .header(http::header::ALLOW, allowed.join(", ")),
        )
    }

    fn payload_too_large(&self) -> Response {
        Response::json(
            StatusCode::PAYLOAD_TOO_LARGE,
            serde_json::json!({ "error": "Payload too large" }),
        )
    }

    /// True when the declared content-length alone exceeds the body limit.
    fn declared_body_too_large(&self, headers: &http::HeaderMap) -> bool {
        headers
            .get(http::header::CONTENT_LENGTH)
            .and_then(|v| v.to_str().ok())
            .and_then(|s| s.trim().parse::<u64>().ok())
            .is_some_and(|len| len > self.max_body_size as u64)
    }

    /// Automatically set content-length or transfer-encoding headers based on response body
    fn finalize_response_headers(&self, response: &mut Response) {
        if response.headers.contains_key(http::header::CONTENT_LENGTH)
            || response.headers.contains_key(http::header::TRANSFER_ENCODING)
        {
            return;
        }

        match &response.body {
            Body::Bytes(bytes) => {
                response.set_header(http::header::CONTENT_LENGTH, bytes.len().to_string());
            }
            Body::Stream(_) => {
                response.set_header(
                    http::header::TRANSFER_ENCODING,
                    http::HeaderValue::from_static("chunked"),
                );
            }
        }
    }
}

use futures::StreamExt;
use pingora::server::ShutdownWatch;
use pingora_core::apps::{HttpPersistentSettings, HttpServerOptions, ReusedHttpStream};
use pingora_http::ResponseHeader;

#[async_trait]
impl HttpServerApp for App {
    async fn process_new_http(
        self: &Arc<Self>,
        mut session: ServerSession,
        shutdown: &ShutdownWatch,
    ) -> Option<ReusedHttpStream> {
        // Read request header
        if !(session.read_request().await.ok()?) {
            return None;
        }
        if *shutdown.borrow() {
            session.set_keepalive(None);
        } else {
            session.set_keepalive(Some(60));
        }

        // Copy method, target and every header value as received, duplicates included
        let reqh = session.req_header();
        let is_head = reqh.method == Method::HEAD;
        let mut inner = http::Request::new(bytes::Bytes::new());
        *inner.method_mut() = reqh.method.clone();
        *inner.uri_mut() = reqh.uri.clone();
        *inner.headers_mut() = reqh.headers.clone();
        let mut req = Request::from_http(inner);

        // Read request body only when hinted by headers (content-length > 0 or transfer-encoding present)
        let mut too_large = false;
        if !is_head {
            let has_te = req.headers().contains_key(http::header::TRANSFER_ENCODING);
            let has_len = req
                .headers()
                .get(http::header::CONTENT_LENGTH)
                .and_then(|v| v.to_str().ok())
                .and_then(|s| s.parse::<u64>().ok())
                .unwrap_or(0)
                > 0;
            too_large = self.declared_body_too_large(req.headers());
            if (has_te || has_len) && !too_large {
                let mut body = bytes::BytesMut::new();
                loop {
                    match session.read_request_body().await {
                        Ok(Some(chunk)) => {
                            if body.len() + chunk.len() > self.max_body_size {
                                too_large = true;
                                break;
                            }
                            body.extend_from_slice(&chunk);
                        }
                        Ok(None) => break,
                        Err(e) => {
                            tracing::warn!(error = %e, "failed to read request body");
                            return None;
                        }
                    }
                }
                req = req.with_body(body.freeze());
            }
        }

        let res = if too_large {
            // The rest of the body is left unread, so the connection cannot be reused
            session.set_keepalive(None);
            tracing::debug!(limit = self.max_body_size, "request body over limit");
            let mut res = self.payload_too_large();
            self.finalize_response_headers(&mut res);
            res
        } else {
            self.handle(req).await
        };

        // Build and write response header
        let mut builder = HttpResponse::builder().status(res.status);
        for (k, v) in res.headers.iter() {
            builder = builder.header(k, v);
        }
        let parts = match builder.body(()) {
            Ok(built) => built.into_parts().0,
            Err(e) => {
                tracing::error!(error = %e, "failed to build response header");
                return None;
            }
        };
        let resp_header: ResponseHeader = parts.into();
        if session
            .write_response_header(Box::new(resp_header))
            .await
            .is_err()
        {
            return None;
        }

        // Write body with streaming support; for HEAD, do not send a body
        if !is_head {
            match res.body {
                Body::Bytes(bytes) => {
                    let _ = session.write_response_body(bytes, true).await;
                }
                Body::Stream(mut s) => {
                    while let Some(chunk) = s.next().await {
                        if session.write_response_body(chunk, false).await.is_err() {
                            break;
                        }
                    }
                    let _ = session.write_response_body(bytes::Bytes::new(), true).await;
                }
            }
        }

        let persistent_settings = HttpPersistentSettings::for_session(&session);
        match session.finish().await {
            Ok(c) => c.map(|s| ReusedHttpStream::new(s, Some(persistent_settings))),
            Err(_) => None,
        }
    }

    fn h2_options(&self) -> Option<pingora::protocols::http::v2::server::H2Options> {
        None
    }
    fn server_options(&self) -> Option<&HttpServerOptions> {
        None
    }
}
