pub mod request;
pub mod response;
pub mod router;
pub mod scope;

pub use http::Method; // Use standard HTTP Method
pub use request::Request;
pub use response::{Body, Response};
pub use router::{Handler, Router};
pub use scope::{RequestId, RootPath};
