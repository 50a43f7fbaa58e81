use serde_json::{Map, Value};
use tracing::{debug, error, info, trace, warn};

use crate::logging::{Level, Logger};

/// Logger backed by `tracing`. Request hooks are emitted as events with
/// `request_id`, `method`, `path` and either `headers` or `status`/`latency_ms`
/// as fields, so a JSON or filtering subscriber can pick them apart.
#[derive(Debug, Clone, Default)]
pub struct TracingLogger;

impl TracingLogger {
    pub fn new() -> Self {
        Self
    }
}

impl Logger for TracingLogger {
    fn log(&self, level: Level, msg: &str, request_id: &str) {
        match level {
            Level::Error => error!(request_id, "{}", msg),
            Level::Warn => warn!(request_id, "{}", msg),
            Level::Info => info!(request_id, "{}", msg),
            Level::Debug => debug!(request_id, "{}", msg),
            Level::Trace => trace!(request_id, "{}", msg),
        }
    }

    fn request_received(&self, request_id: &str, method: &str, path: &str, headers: &Map<String, Value>) {
        let headers = serde_json::to_string(headers).unwrap_or_default();
        info!(request_id, method, path, headers = %headers, "request received");
    }

    fn request_completed(&self, request_id: &str, method: &str, path: &str, status: u16, elapsed_ms: u128) {
        info!(
            request_id,
            method,
            path,
            status,
            latency_ms = elapsed_ms as u64,
            "request completed"
        );
    }
}
