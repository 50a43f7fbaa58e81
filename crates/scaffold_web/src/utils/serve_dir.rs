use std::path::{Component, Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use http::StatusCode;

use crate::core::{Handler, Request, Response, Router};
use crate::error::{WebError, not_found};

const INDEX_FILE: &str = "index.html";

/// Serve static files from a directory.
///
/// Usage:
///   ServeDir::new(".").mount(&mut router);
///
/// The request path is percent-decoded and reduced to its normal components,
/// so `..` and absolute segments never leave the root.
pub struct ServeDir {
    root: PathBuf,
}

impl ServeDir {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        Self { root: root.into() }
    }

    /// Route `GET /` and `GET /{*path}` to this directory.
    pub fn mount(self, router: &mut Router) {
        let handler: Arc<dyn Handler> = Arc::new(self);
        router.get("/", Arc::clone(&handler));
        router.get("/{*path}", handler);
    }

    fn sanitize(rel: &str) -> PathBuf {
        let mut out = PathBuf::new();
        for comp in Path::new(rel).components() {
            if let Component::Normal(s) = comp {
                out.push(s)
            }
        }
        out
    }
}

fn percent_decode(s: &str) -> String {
    let bytes = s.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%'
            && let Some(hex) = s.get(i + 1..i + 3)
            && hex.bytes().all(|b| b.is_ascii_hexdigit())
            && let Ok(byte) = u8::from_str_radix(hex, 16)
        {
            out.push(byte);
            i += 3;
            continue;
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

#[async_trait]
impl Handler for ServeDir {
    async fn handle(&self, req: Request) -> Result<Response, WebError> {
        let rel = percent_decode(req.param("path").unwrap_or(""));
        let full = self.root.join(Self::sanitize(&rel));

        let meta = tokio::fs::metadata(&full).await?;

        if meta.is_dir() {
            // Relative links inside an index page only resolve against a trailing slash
            if !req.path().ends_with('/') {
                let mut location = req.url_for(&format!("{}/", req.path()));
                if let Some(query) = req.inner.uri().query() {
                    location.push('?');
                    location.push_str(query);
                }
                return Ok(Response::redirect(StatusCode::MOVED_PERMANENTLY, &location));
            }
            let index = full.join(INDEX_FILE);
            return match tokio::fs::metadata(&index).await {
                Ok(m) if m.is_file() => Ok(Response::stream_file(StatusCode::OK, &index, Some(m.len()))),
                _ => Err(not_found("Not Found")),
            };
        }

        if meta.is_file() {
            Ok(Response::stream_file(StatusCode::OK, &full, Some(meta.len())))
        } else {
            Err(not_found("Not Found"))
        }
    }
}
