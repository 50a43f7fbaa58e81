pub mod request_id;
pub mod serve_dir;

pub use serve_dir::ServeDir;
