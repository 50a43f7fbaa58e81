#![allow(clippy::module_inception)]
pub mod forwarded_prefix_middleware;
pub mod middleware;
pub mod panic_recovery_middleware;
pub mod request_id_middleware;
pub mod tracing_middleware;

pub use forwarded_prefix_middleware::ForwardedPrefix;
pub use middleware::{Middleware, compose};
pub use panic_recovery_middleware::PanicRecoveryMiddleware;
pub use request_id_middleware::RequestIdMiddleware;
pub use tracing_middleware::TracingMiddleware;
