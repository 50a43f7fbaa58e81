//! Static file server that logs each request's headers before serving it.

use std::path::PathBuf;

use scaffold_web::utils::ServeDir;
use scaffold_web::{
    App, Logger, LoggingMiddleware, PanicRecoveryMiddleware, Router, TracingLogger,
    TracingMiddleware,
};

pub const DEFAULT_PORT: u16 = 8080;

/// Serve `root` with the default tracing-backed request logger.
pub fn app(root: PathBuf) -> App {
    app_with_logger(root, TracingLogger::new())
}

pub fn app_with_logger<L: Logger + 'static>(root: PathBuf, logger: L) -> App {
    let mut router = Router::new();
    ServeDir::new(root).mount(&mut router);

    let mut app = App::new(router);
    app.use_middleware(TracingMiddleware::new());
    app.use_middleware(LoggingMiddleware::new(logger));
    app.use_middleware(PanicRecoveryMiddleware::new());
    app
}

#[cfg(test)]
mod tests {
    use super::*;
    use scaffold_web::{Level, Method, Request, StatusCode};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct Captured(Arc<Mutex<Vec<String>>>);

    impl Logger for Captured {
        fn log(&self, _level: Level, msg: &str, _request_id: &str) {
            self.0.lock().unwrap().push(msg.to_string());
        }
    }

    fn site() -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "scaffolds_static_{}",
            scaffold_web::utils::request_id::generate()
        ));
        std::fs::create_dir_all(dir.join("css")).unwrap();
        std::fs::write(dir.join("index.html"), b"<html>home</html>").unwrap();
        std::fs::write(dir.join("css/site.css"), b"body { margin: 0 }").unwrap();
        std::fs::write(dir.join("blob.bin"), [0u8, 159, 146, 150, 255]).unwrap();
        dir
    }

    #[tokio::test]
    async fn existing_files_are_served_byte_for_byte() {
        let dir = site();
        let app = app(dir.clone());

        let res = app.handle(Request::new(Method::GET, "/blob.bin")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.headers["content-type"], "application/octet-stream");
        assert_eq!(res.body.collect().await.as_ref(), &[0u8, 159, 146, 150, 255]);

        let res = app.handle(Request::new(Method::GET, "/css/site.css")).await;
        assert_eq!(res.headers["content-type"], "text/css");
        assert_eq!(res.body.collect().await.as_ref(), b"body { margin: 0 }");

        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn root_serves_index() {
        let dir = site();
        let res = app(dir.clone()).handle(Request::new(Method::GET, "/")).await;
        assert_eq!(res.status, StatusCode::OK);
        assert_eq!(res.body.collect().await.as_ref(), b"<html>home</html>");
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn missing_file_is_not_found() {
        let dir = site();
        let res = app(dir.clone()).handle(Request::new(Method::GET, "/missing.txt")).await;
        assert_eq!(res.status, StatusCode::NOT_FOUND);
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn directory_without_slash_redirects() {
        let dir = site();
        let res = app(dir.clone()).handle(Request::new(Method::GET, "/css")).await;
        assert_eq!(res.status, StatusCode::MOVED_PERMANENTLY);
        assert_eq!(res.headers["location"], "/css/");
        std::fs::remove_dir_all(dir).ok();
    }

    #[tokio::test]
    async fn headers_are_logged_before_the_file_is_served() {
        let dir = site();
        let captured = Captured::default();
        let app = app_with_logger(dir.clone(), captured.clone());

        let req = Request::new(Method::GET, "/css/site.css")
            .header("user-agent", "test-agent")
            .header("referer", "http://localhost:8080/");
        let res = app.handle(req).await;
        assert_eq!(res.status, StatusCode::OK);

        let entries = captured.0.lock().unwrap();
        assert_eq!(entries.len(), 2);
        assert!(entries[0].starts_with("GET /css/site.css headers="));
        assert!(entries[0].contains(r#""user-agent":"test-agent""#));
        assert!(entries[0].contains(r#""referer":"http://localhost:8080/""#));
        assert!(entries[1].contains("-> 200"));

        std::fs::remove_dir_all(dir).ok();
    }
}
