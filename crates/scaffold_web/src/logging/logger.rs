use serde_json::{Map, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

/// Sink for request logs.
///
/// Only `log` is required. The request hooks format a line and pass it to
/// `log`; loggers that understand structured fields override them.
pub trait Logger: Send + Sync {
    fn log(&self, level: Level, message: &str, request_id: &str);

    /// A request arrived, before any handler has seen it.
    fn request_received(&self, request_id: &str, method: &str, path: &str, headers: &Map<String, Value>) {
        let headers = serde_json::to_string(headers).unwrap_or_default();
        self.log(
            Level::Info,
            &format!("{} {} headers={}", method, path, headers),
            request_id,
        );
    }

    /// The response for a request is ready.
    fn request_completed(&self, request_id: &str, method: &str, path: &str, status: u16, elapsed_ms: u128) {
        self.log(
            Level::Info,
            &format!("{} {} -> {} in {}ms", method, path, status, elapsed_ms),
            request_id,
        );
    }
}
