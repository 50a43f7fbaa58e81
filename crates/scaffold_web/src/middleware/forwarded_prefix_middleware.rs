use crate::{
    core::{Handler, Request, Response, RootPath},
    error::WebError,
    middleware::Middleware,
};
use std::sync::Arc;

/// Header a reverse proxy sets to the path prefix it stripped before forwarding.
pub const X_FORWARDED_PREFIX: &str = "x-forwarded-prefix";

/// Rewrite the request's root path from `x-forwarded-prefix`.
///
/// Only link generation (`Request::url_for`, docs, redirects) sees the new
/// root path. Routing has already happened on the unprefixed path, and the
/// override is dropped with the request.
#[derive(Clone, Default)]
pub struct ForwardedPrefix;

impl ForwardedPrefix {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait::async_trait]
impl Middleware for ForwardedPrefix {
    async fn handle(&self, mut req: Request, next: Arc<dyn Handler>) -> Result<Response, WebError> {
        let prefix = req
            .headers()
            .get(X_FORWARDED_PREFIX)
            .and_then(|v| v.to_str().ok())
            .filter(|s| !s.is_empty())
            .map(RootPath::new);

        if let Some(root_path) = prefix {
            tracing::debug!(root_path = root_path.as_str(), "root path taken from forwarded prefix");
            req.set_root_path(root_path);
        }

        next.handle(req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Method;
    use http::StatusCode;

    struct ShowRoot;

    #[async_trait::async_trait]
    impl Handler for ShowRoot {
        async fn handle(&self, req: Request) -> Result<Response, WebError> {
            Ok(Response::text(StatusCode::OK, req.url_for("/docs")))
        }
    }

    async fn docs_link(req: Request) -> String {
        let res = ForwardedPrefix::new()
            .handle(req, Arc::new(ShowRoot))
            .await
            .unwrap();
        String::from_utf8(res.body.collect().await.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn prefix_header_sets_root_path() {
        let req = Request::new(Method::GET, "/").header(X_FORWARDED_PREFIX, "/api/v1");
        assert_eq!(docs_link(req).await, "/api/v1/docs");
    }

    #[tokio::test]
    async fn missing_or_empty_prefix_leaves_root_path() {
        assert_eq!(docs_link(Request::new(Method::GET, "/")).await, "/docs");

        let req = Request::new(Method::GET, "/").header(X_FORWARDED_PREFIX, "");
        assert_eq!(docs_link(req).await, "/docs");
    }

    #[tokio::test]
    async fn prefix_overrides_configured_root_path() {
        let mut req = Request::new(Method::GET, "/").header(X_FORWARDED_PREFIX, "/edge/");
        req.set_root_path(RootPath::new("/configured"));
        assert_eq!(docs_link(req).await, "/edge/docs");
    }
}
