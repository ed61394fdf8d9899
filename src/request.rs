//! Incoming HTTP request view.

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, Method, Uri, Version};

/// The request half of a [`Context`](crate::Context).
///
/// Wraps the raw request head plus the fully buffered body. Middleware
/// usually reaches these through the delegation methods on `Context`;
/// the view exists for code that wants the request as one value.
#[derive(Debug)]
pub struct Request {
    parts: Parts,
    body: Bytes,
}

impl Request {
    pub(crate) fn new(parts: Parts, body: Bytes) -> Self {
        Self { parts, body }
    }

    pub fn method(&self) -> &Method {
        &self.parts.method
    }

    pub fn uri(&self) -> &Uri {
        &self.parts.uri
    }

    pub fn path(&self) -> &str {
        self.parts.uri.path()
    }

    pub fn version(&self) -> Version {
        self.parts.version
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.parts.headers
    }

    /// Single-header lookup. Returns `None` for absent headers and for
    /// values that are not valid UTF-8.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.parts.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The buffered request body. Empty slice when the client sent none.
    pub fn body(&self) -> &[u8] {
        &self.body
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Request {
        let (parts, ()) = http::Request::builder()
            .method(Method::POST)
            .uri("http://example.test/users?active=1")
            .header("content-type", "application/json")
            .body(())
            .unwrap()
            .into_parts();
        Request::new(parts, Bytes::from_static(b"{\"name\":\"alice\"}"))
    }

    #[test]
    fn accessors() {
        let req = sample();
        assert_eq!(req.method(), Method::POST);
        assert_eq!(req.path(), "/users");
        assert_eq!(req.header("content-type"), Some("application/json"));
        assert_eq!(req.header("x-missing"), None);
        assert_eq!(req.body(), b"{\"name\":\"alice\"}");
    }
}
