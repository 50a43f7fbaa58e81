//! Header echo behind a reverse proxy, with generated docs that follow the
//! proxy's path prefix.

use scaffold_web::{ApiDocs, App, ForwardedPrefix, PanicRecoveryMiddleware, TracingMiddleware};

use crate::echo_headers;

pub const DEFAULT_PORT: u16 = echo_headers::DEFAULT_PORT;
pub const TITLE: &str = "example";

pub fn app(root_path: Option<&str>) -> App {
    let mut router = echo_headers::router();
    ApiDocs::new(TITLE)
        .version(env!("CARGO_PKG_VERSION"))
        .mount(&mut router);

    let mut app = App::new(router);
    if let Some(root_path) = root_path {
        app.set_root_path(root_path);
    }
    app.use_middleware(ForwardedPrefix::new());
    app.use_middleware(TracingMiddleware::new());
    app.use_middleware(PanicRecoveryMiddleware::new());
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_web::docs::{DOCS_PATH, OPENAPI_PATH};
    use scaffold_web::middleware::forwarded_prefix_middleware::X_FORWARDED_PREFIX;
    use scaffold_web::{Method, Request, Response, StatusCode};
    use serde_json::{Value, json};

    async fn body_string(res: Response) -> String {
        String::from_utf8(res.body.collect().await.to_vec()).unwrap()
    }

    #[tokio::test]
    async fn docs_links_follow_forwarded_prefix() {
        let req = Request::new(Method::GET, DOCS_PATH).header(X_FORWARDED_PREFIX, "/api/v1");
        let res = app(None).handle(req).await;
        assert_eq!(res.status, StatusCode::OK);
        assert!(body_string(res).await.contains("url: '/api/v1/openapi.json'"));
    }

    #[tokio::test]
    async fn docs_links_unprefixed_without_header() {
        let res = app(None).handle(Request::new(Method::GET, DOCS_PATH)).await;
        assert!(body_string(res).await.contains("url: '/openapi.json'"));

        let req = Request::new(Method::GET, DOCS_PATH).header(X_FORWARDED_PREFIX, "");
        let res = app(None).handle(req).await;
        assert!(body_string(res).await.contains("url: '/openapi.json'"));
    }

    #[tokio::test]
    async fn openapi_servers_carry_prefix() {
        let req = Request::new(Method::GET, OPENAPI_PATH).header(X_FORWARDED_PREFIX, "/api/v1");
        let doc: Value = serde_json::from_str(&body_string(app(None).handle(req).await).await).unwrap();
        assert_eq!(doc["servers"], json!([{"url": "/api/v1"}]));
        assert_eq!(doc["info"]["title"], TITLE);
        assert!(doc["paths"]["/"]["get"].is_object());
    }

    #[tokio::test]
    async fn prefix_does_not_change_routing() {
        let req = Request::new(Method::GET, "/").header(X_FORWARDED_PREFIX, "/api/v1");
        let res = app(None).handle(req).await;
        assert_eq!(res.status, StatusCode::OK);
        let body: Value = serde_json::from_str(&body_string(res).await).unwrap();
        assert_eq!(body, json!({"x-forwarded-prefix": "/api/v1"}));
    }

    #[tokio::test]
    async fn configured_root_path_is_the_fallback() {
        let res = app(Some("/svc")).handle(Request::new(Method::GET, DOCS_PATH)).await;
        assert!(body_string(res).await.contains("url: '/svc/openapi.json'"));

        let req = Request::new(Method::GET, DOCS_PATH).header(X_FORWARDED_PREFIX, "/edge");
        let res = app(Some("/svc")).handle(req).await;
        assert!(body_string(res).await.contains("url: '/edge/openapi.json'"));
    }
}
