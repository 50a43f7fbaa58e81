use crate::core::Response;
use http::StatusCode;

/// Trait for converting errors into HTTP responses
///
/// Each error decides its own status code and, optionally, its own body.
pub trait ResponseError: std::error::Error + Send + Sync {
    /// Return the HTTP status code for this error.
    ///
    /// The default implementation returns 500 Internal Server Error.
    fn status_code(&self) -> StatusCode {
        StatusCode::INTERNAL_SERVER_ERROR
    }

    /// Generate an HTTP response for this error.
    ///
    /// The default implementation creates a `{"error": "<message>"}` JSON response.
    fn error_response(&self) -> Response {
        let error_body = serde_json::json!({
            "error": self.to_string()
        });

        Response::json(self.status_code(), &error_body)
    }
}
