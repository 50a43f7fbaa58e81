pub mod logger;
pub mod logging_middleware;
pub mod tracing_logger;

pub use logger::{Level, Logger};
pub use logging_middleware::LoggingMiddleware;
pub use tracing_logger::TracingLogger;
