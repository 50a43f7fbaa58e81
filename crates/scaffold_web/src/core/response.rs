use bytes::Bytes;
use futures::stream::BoxStream;
use http::{HeaderMap, HeaderValue, StatusCode};
use tokio::io::AsyncReadExt;

const FILE_CHUNK_SIZE: usize = 64 * 1024;

pub struct Response {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: Body,
}

impl Response {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Body::Bytes(Bytes::new()),
        }
    }

    pub fn text<B: Into<String>>(status: StatusCode, body: B) -> Self {
        let mut res = Self::new(status);
        res.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        );
        res.body = Body::Bytes(Bytes::from(body.into().into_bytes()));
        res
    }

    /// Construct an empty response with given status. Does not set content-type.
    pub fn empty(status: StatusCode) -> Self {
        Self::new(status)
    }

    /// Construct an HTML response with UTF-8 charset.
    pub fn html<B: Into<String>>(status: StatusCode, body: B) -> Self {
        let mut res = Self::new(status);
        res.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("text/html; charset=utf-8"),
        );
        res.body = Body::Bytes(Bytes::from(body.into().into_bytes()));
        res
    }

    /// Construct a JSON response from any serializable value.
    pub fn json(status: StatusCode, value: impl serde::Serialize) -> Self {
        let mut res = Self::new(status);
        res.headers.insert(
            http::header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );

        match serde_json::to_vec(&value) {
            Ok(bytes) => res.body = Body::Bytes(Bytes::from(bytes)),
            Err(e) => {
                tracing::error!(error = %e, "failed to serialize JSON response body");
                res.status = StatusCode::INTERNAL_SERVER_ERROR;
            }
        }
        res
    }

    /// Redirect to `location`, which should already carry the root path.
    pub fn redirect(status: StatusCode, location: &str) -> Self {
        let mut res = Self::new(status);
        res.set_header(http::header::LOCATION, location);
        res
    }

    /// Construct a streaming file response. Will not buffer the entire file in memory.
    ///
    /// `len` becomes the content-length when known.
    pub fn stream_file<P: AsRef<std::path::Path>>(status: StatusCode, path: P, len: Option<u64>) -> Self {
        let ct = mime_guess::from_path(path.as_ref()).first_or_octet_stream();
        let pathbuf = path.as_ref().to_path_buf();
        let stream = futures::stream::unfold(
            Some((None::<tokio::fs::File>, pathbuf)),
            |state| async move {
                let (opt_file, path) = state?;
                // Open file lazily on first pull
                let mut file = match opt_file {
                    Some(f) => f,
                    None => match tokio::fs::File::open(&path).await {
                        Ok(f) => f,
                        Err(e) => {
                            tracing::warn!(path = %path.display(), error = %e, "open failed mid-response");
                            return None;
                        }
                    },
                };
                let mut buf = vec![0u8; FILE_CHUNK_SIZE];
                match file.read(&mut buf).await {
                    Ok(0) => None,
                    Ok(n) => {
                        buf.truncate(n);
                        Some((Bytes::from(buf), Some((Some(file), path))))
                    }
                    Err(_) => None,
                }
            },
        );

        let mut res = Self::stream(status, Box::pin(stream));
        res.set_header(http::header::CONTENT_TYPE, ct.as_ref());
        if let Some(len) = len {
            res.set_header(http::header::CONTENT_LENGTH, len.to_string());
        }
        res
    }

    /// Construct a streaming response from a boxed stream of Bytes chunks
    pub fn stream(status: StatusCode, stream: BoxStream<'static, Bytes>) -> Self {
        let mut res = Self::new(status);
        res.body = Body::Stream(stream);
        res
    }

    pub fn set_header<K, V>(&mut self, k: K, v: V)
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
    {
        if let (Ok(key), Ok(value)) = (k.try_into(), v.try_into()) {
            self.headers.insert(key, value);
        }
    }

    pub fn header<K, V>(mut self, k: K, v: V) -> Self
    where
        K: TryInto<http::HeaderName>,
        V: TryInto<HeaderValue>,
    {
        self.set_header(k, v);
        self
    }
}

pub enum Body {
    Bytes(Bytes),
    Stream(BoxStream<'static, Bytes>),
}

impl Body {
    /// Drain the body into memory.
    pub async fn collect(self) -> Bytes {
        use futures::StreamExt;
        match self {
            Body::Bytes(b) => b,
            Body::Stream(s) => {
                let chunks: Vec<Bytes> = s.collect().await;
                Bytes::from(chunks.concat())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn json_builds_response() {
        let v = json!({"a": 1, "b": "x"});
        let res = Response::json(StatusCode::OK, &v);
        assert_eq!(res.status.as_u16(), 200);
        assert_eq!(
            res.headers
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("application/json")
        );
        match res.body {
            Body::Bytes(b) => assert_eq!(b.as_ref(), serde_json::to_vec(&v).unwrap().as_slice()),
            _ => panic!("expected bytes body"),
        }
    }

    #[test]
    fn html_and_empty() {
        let res = Response::html(StatusCode::OK, "<h1>ok</h1>");
        assert_eq!(res.status.as_u16(), 200);
        assert_eq!(
            res.headers
                .get(http::header::CONTENT_TYPE)
                .and_then(|v| v.to_str().ok()),
            Some("text/html; charset=utf-8")
        );
        // content-length is set by App::handle, not here
        assert!(!res.headers.contains_key(http::header::CONTENT_LENGTH));

        let res = Response::empty(StatusCode::NO_CONTENT);
        assert_eq!(res.status.as_u16(), 204);
        assert!(!res.headers.contains_key(http::header::CONTENT_TYPE));
    }

    #[test]
    fn redirect_sets_location() {
        let res = Response::redirect(StatusCode::MOVED_PERMANENTLY, "/api/assets/");
        assert_eq!(res.status.as_u16(), 301);
        assert_eq!(res.headers[http::header::LOCATION], "/api/assets/");
    }

    #[test]
    fn manual_headers_not_overridden() {
        let mut res = Response::text(StatusCode::OK, "hello");
        res.set_header("content-length", "999");
        assert_eq!(
            res.headers.get(http::header::CONTENT_LENGTH).unwrap(),
            &HeaderValue::from_static("999")
        );
    }

    #[tokio::test]
    async fn stream_body_collects_in_order() {
        use futures::StreamExt;
        let stream = futures::stream::iter(vec![
            Bytes::from_static(b"chunk1"),
            Bytes::from_static(b"chunk2"),
        ]);
        let res = Response::stream(StatusCode::OK, stream.boxed());
        assert!(!res.headers.contains_key(http::header::TRANSFER_ENCODING));
        assert_eq!(res.body.collect().await.as_ref(), b"chunk1chunk2");
    }
}
