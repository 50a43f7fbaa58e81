//! Generated API documentation.
//!
//! `ApiDocs::mount` snapshots the routes registered so far and adds
//! `GET /openapi.json` and `GET /docs`. Every link in the output goes through
//! the request's root path, so the pages stay correct behind a reverse proxy
//! that strips a prefix (see `ForwardedPrefix`).

use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;
use serde_json::{Map, Value, json};

use crate::core::{Handler, Request, Response, Router, router::Route};
use crate::error::WebError;

pub const OPENAPI_PATH: &str = "/openapi.json";
pub const DOCS_PATH: &str = "/docs";

#[derive(Debug, Clone)]
pub struct ApiDocs {
    title: String,
    version: String,
}

impl ApiDocs {
    pub fn new<T: Into<String>>(title: T) -> Self {
        Self {
            title: title.into(),
            version: "0.1.0".to_string(),
        }
    }

    pub fn version<V: Into<String>>(mut self, version: V) -> Self {
        self.version = version.into();
        self
    }

    /// Register the documentation routes. Routes added afterwards are not listed.
    pub fn mount(self, router: &mut Router) {
        let docs = Arc::new(DocsState {
            info: self,
            routes: router.routes().to_vec(),
        });
        router.get(OPENAPI_PATH, Arc::new(OpenApiHandler(Arc::clone(&docs))));
        router.get(DOCS_PATH, Arc::new(DocsPageHandler(docs)));
    }
}

struct DocsState {
    info: ApiDocs,
    routes: Vec<Route>,
}

impl DocsState {
    fn openapi(&self, root_path: &str) -> Value {
        let mut paths = Map::new();
        for route in &self.routes {
            let item = paths
                .entry(route.path.clone())
                .or_insert_with(|| Value::Object(Map::new()));
            if let Value::Object(ops) = item {
                ops.insert(
                    route.method.as_str().to_lowercase(),
                    json!({
                        "operationId": operation_id(route),
                        "responses": {
                            "200": { "description": "Successful Response" }
                        }
                    }),
                );
            }
        }

        let mut doc = json!({
            "openapi": "3.1.0",
            "info": {
                "title": self.info.title,
                "version": self.info.version,
            },
            "paths": paths,
        });
        if !root_path.is_empty() {
            doc["servers"] = json!([{ "url": root_path }]);
        }
        doc
    }

    fn page(&self, openapi_url: &str) -> String {
        let title = html_escape(&self.info.title);
        let url = html_escape(openapi_url);
        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<title>{title} - Swagger UI</title>
<link type="text/css" rel="stylesheet" href="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui.css">
</head>
<body>
<div id="swagger-ui"></div>
<script src="https://cdn.jsdelivr.net/npm/swagger-ui-dist@5/swagger-ui-bundle.js"></script>
<script>
const ui = SwaggerUIBundle({{
    url: '{url}',
    dom_id: '#swagger-ui',
    layout: 'BaseLayout',
    deepLinking: true,
}})
</script>
</body>
</html>
"#
        )
    }
}

fn operation_id(route: &Route) -> String {
    let path: String = route
        .path
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() { c } else { '_' })
        .collect();
    format!("{}{}", route.method.as_str().to_lowercase(), path.trim_end_matches('_'))
}

fn html_escape(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&#x27;")
}

struct OpenApiHandler(Arc<DocsState>);

#[async_trait]
impl Handler for OpenApiHandler {
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        Ok(Response::json(StatusCode::OK, self.0.openapi(req.root_path())))
    }
}

struct DocsPageHandler(Arc<DocsState>);

#[async_trait]
impl Handler for DocsPageHandler {
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        Ok(Response::html(StatusCode::OK, self.0.page(&req.url_for(OPENAPI_PATH))))
    }
}
