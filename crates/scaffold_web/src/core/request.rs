use std::any::{Any, TypeId};
use std::collections::HashMap;
use std::sync::Arc;

use crate::core::scope::{RequestId, RootPath};
use bytes::Bytes;
use http::{HeaderMap, HeaderValue, Method};
use serde_json::{Map, Value};

#[derive(Debug)]
pub struct Request {
    pub inner: http::Request<Bytes>,
    pub params: HashMap<String, String>,
    pub extensions: HashMap<TypeId, Arc<dyn Any + Send + Sync>>, // request-level data
}

impl Request {
    /// Build a request by hand, mostly for tests and internal dispatch.
    ///
    /// # Panics
    ///
    /// Panics if `path` is not a valid request target.
    pub fn new<M: Into<Method>, S: AsRef<str>>(method: M, path: S) -> Self {
        let inner = http::Request::builder()
            .method(method.into())
            .uri(path.as_ref())
            .body(Bytes::new())
            .expect("Failed to build request");
        Self::from_http(inner)
    }

    pub fn from_http(inner: http::Request<Bytes>) -> Self {
        Self {
            inner,
            params: HashMap::new(),
            extensions: HashMap::new(),
        }
    }

    /// Set a header, replacing any previous value under the same name.
    pub fn header<K, V>(mut self, k: K, v: V) -> Self
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if let (Ok(key), Ok(value)) = (k.try_into(), v.try_into()) {
            self.inner.headers_mut().insert(key, value);
        }
        self
    }

    /// Add a header value, keeping values already present under the same name.
    pub fn append_header<K, V>(mut self, k: K, v: V) -> Self
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if let (Ok(key), Ok(value)) = (k.try_into(), v.try_into()) {
            self.inner.headers_mut().append(key, value);
        }
        self
    }

    pub fn with_body<B: Into<Bytes>>(mut self, body: B) -> Self {
        *self.inner.body_mut() = body.into();
        self
    }

    // Convenience accessors for the inner http::Request
    pub fn method(&self) -> &Method {
        self.inner.method()
    }

    pub fn path(&self) -> &str {
        self.inner.uri().path()
    }

    pub fn headers(&self) -> &HeaderMap<HeaderValue> {
        self.inner.headers()
    }

    /// Render the received headers as a JSON object.
    ///
    /// Names are lower-case as stored by `http`. A name that arrived more than
    /// once maps to all of its values joined with `", "` in arrival order.
    pub fn headers_json(&self) -> Map<String, Value> {
        headers_to_json(self.headers())
    }

    pub fn body(&self) -> &Bytes {
        self.inner.body()
    }

    pub fn with_params(mut self, params: HashMap<String, String>) -> Self {
        self.params = params;
        self
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(|s| s.as_str())
    }

    // --- Request-level shared data (extensions) ---
    pub fn set_request_share_data<T: Send + Sync + 'static>(
        &mut self,
        value: Arc<T>,
    ) -> Option<Arc<T>> {
        let prev = self
            .extensions
            .insert(TypeId::of::<T>(), value as Arc<dyn Any + Send + Sync>);
        prev.and_then(|prev_any| prev_any.downcast::<T>().ok())
    }

    pub fn get_request_share_data<T: Send + Sync + 'static>(&self) -> Option<Arc<T>> {
        let stored = self.extensions.get(&TypeId::of::<T>())?;
        Arc::clone(stored).downcast::<T>().ok()
    }

    fn request_share_ref<T: Send + Sync + 'static>(&self) -> Option<&T> {
        self.extensions
            .get(&TypeId::of::<T>())
            .and_then(|stored| stored.downcast_ref::<T>())
    }

    // --- Request scope: root path and request id ---

    /// The base path this request believes the app is mounted under. Empty
    /// when the app is served from `/`.
    pub fn root_path(&self) -> &str {
        self.request_share_ref::<RootPath>()
            .map(RootPath::as_str)
            .unwrap_or("")
    }

    pub fn set_root_path(&mut self, root_path: RootPath) {
        self.set_request_share_data(Arc::new(root_path));
    }

    /// Build an externally visible URL path for an app-relative `path`.
    pub fn url_for(&self, path: &str) -> String {
        self.request_share_ref::<RootPath>()
            .map(|root| root.join(path))
            .unwrap_or_else(|| path.to_string())
    }

    pub fn request_id(&self) -> Option<&str> {
        self.request_share_ref::<RequestId>().map(RequestId::as_str)
    }
}

pub fn headers_to_json(headers: &HeaderMap<HeaderValue>) -> Map<String, Value> {
    let mut out = Map::new();
    for name in headers.keys() {
        let joined = headers
            .get_all(name)
            .iter()
            .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
            .collect::<Vec<_>>()
            .join(", ");
        out.insert(name.as_str().to_string(), Value::String(joined));
    }
    out
}
