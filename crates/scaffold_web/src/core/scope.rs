//! Values stored in a request's scope by the framework and its middleware.

/// Base URL path the application is mounted under, as seen by clients.
///
/// Stored without a trailing slash; the empty string means the app is served
/// from `/`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootPath(String);

impl RootPath {
    pub fn new<S: AsRef<str>>(path: S) -> Self {
        Self(path.as_ref().trim_end_matches('/').to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Prefix an app-relative path with this root path.
    pub fn join(&self, path: &str) -> String {
        if path.starts_with('/') || path.is_empty() {
            format!("{}{}", self.0, path)
        } else {
            format!("{}/{}", self.0, path)
        }
    }
}

/// Identifier attached to a request by `RequestIdMiddleware`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestId(String);

impl RequestId {
    pub fn new<S: Into<String>>(id: S) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}
