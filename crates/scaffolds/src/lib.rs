//! Starter services built on `scaffold_web`.
//!
//! Each module builds one self-contained `App`; `main.rs` picks one and hands
//! it to `scaffold_web::serve`.

pub mod echo_function;
pub mod echo_headers;
pub mod static_files;
pub mod swagger;
pub mod telemetry;
