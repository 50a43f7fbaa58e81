use super::ResponseError;
use crate::core::Response;

/// Error type returned by handlers and middleware.
///
/// This type wraps any ResponseError. Request-specific context (like
/// request-id) is added by middleware, not stored here.
#[derive(Debug)]
pub struct WebError {
    inner: Box<dyn ResponseError>,
}

impl WebError {
    /// Create a new WebError from any ResponseError
    pub fn new<T: ResponseError + 'static>(err: T) -> Self {
        Self {
            inner: Box::new(err),
        }
    }

    /// Get a reference to the underlying ResponseError
    pub fn as_response_error(&self) -> &dyn ResponseError {
        &*self.inner
    }

    /// Convert this error into an HTTP response
    pub fn into_response(self) -> Response {
        let status_code = self.inner.status_code();
        if status_code.is_server_error() {
            tracing::error!(status_code = %status_code, error = %self.inner, "request failed");
        } else {
            tracing::debug!(status_code = %status_code, error = %self.inner, "request rejected");
        }

        self.inner.error_response()
    }
}

impl std::fmt::Display for WebError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.inner)
    }
}

impl std::error::Error for WebError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

impl From<std::io::Error> for WebError {
    fn from(err: std::io::Error) -> Self {
        Self::new(err)
    }
}

impl From<serde_json::Error> for WebError {
    fn from(err: serde_json::Error) -> Self {
        Self::new(err)
    }
}

impl From<crate::error::SimpleError> for WebError {
    fn from(err: crate::error::SimpleError) -> Self {
        Self::new(err)
    }
}

impl From<crate::function::FunctionError> for WebError {
    fn from(err: crate::function::FunctionError) -> Self {
        Self::new(err)
    }
}
