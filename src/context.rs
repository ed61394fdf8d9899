//! Per-request context and the shared defaults it is derived from.
//!
//! One [`Context`] exists per request. It owns the [`Request`] and
//! [`Response`] views outright, so two in-flight requests can never observe
//! each other's state, and nothing here needs a lock.

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderMap, HeaderName, HeaderValue, Method, StatusCode};

use crate::body::Body;
use crate::error::Error;
use crate::request::Request;
use crate::response::Response;

/// Shared per-application response defaults.
///
/// The blueprint every request's [`Response`] starts from: status `404`
/// (the safety net when no middleware answers) plus any headers registered
/// with [`App::default_header`](crate::App::default_header). Values are
/// **copied** into each fresh context — read-only after startup, so request
/// processing can never mutate them.
#[derive(Clone)]
pub struct Defaults {
    status: StatusCode,
    headers: HeaderMap,
}

impl Defaults {
    pub fn new() -> Self {
        Self {
            status: StatusCode::NOT_FOUND,
            headers: HeaderMap::new(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub(crate) fn push_header(&mut self, name: HeaderName, value: HeaderValue) {
        self.headers.insert(name, value);
    }
}

impl Default for Defaults {
    fn default() -> Self {
        Self::new()
    }
}

/// The per-request state threaded through every middleware.
///
/// Owns the request and response views; the accessors below delegate to
/// whichever side holds the data, so most middleware never names the views
/// at all:
///
/// ```rust
/// use kawa::{Context, Error, Next};
///
/// async fn hello(mut ctx: Context, _next: Next) -> Result<Context, Error> {
///     if ctx.path() == "/hello" {
///         ctx.set_body("<h1>hello</h1>");
///     }
///     Ok(ctx)
/// }
/// ```
#[derive(Debug)]
pub struct Context {
    request: Request,
    response: Response,
}

impl Context {
    /// Builds a fresh context: request view over the raw head + buffered
    /// body, response view copied from `defaults`.
    ///
    /// Public so middleware can be exercised in tests without a socket.
    pub fn new(defaults: &Defaults, parts: Parts, body: Bytes) -> Self {
        Self {
            request: Request::new(parts, body),
            response: Response::new(defaults),
        }
    }

    pub fn request(&self) -> &Request {
        &self.request
    }

    pub fn response(&self) -> &Response {
        &self.response
    }

    pub fn response_mut(&mut self) -> &mut Response {
        &mut self.response
    }

    pub(crate) fn into_response(self) -> Response {
        self.response
    }

    // ── Request delegation ────────────────────────────────────────────────

    pub fn method(&self) -> &Method {
        self.request.method()
    }

    pub fn path(&self) -> &str {
        self.request.path()
    }

    pub fn header(&self, name: &str) -> Option<&str> {
        self.request.header(name)
    }

    /// The buffered request body.
    pub fn request_body(&self) -> &[u8] {
        self.request.body()
    }

    // ── Response delegation ───────────────────────────────────────────────

    pub fn status(&self) -> StatusCode {
        self.response.status()
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.response.set_status(status);
    }

    /// The response body as set so far. [`Body::Empty`] until a middleware
    /// answers.
    pub fn body(&self) -> &Body {
        self.response.body()
    }

    /// Sets the response body; status becomes `200` as a side effect.
    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.response.set_body(body);
    }

    /// Serializes `value` as a JSON body; status becomes `200`.
    pub fn set_json(&mut self, value: impl serde::Serialize) -> Result<(), Error> {
        self.response.set_body(serde_json::to_value(value)?);
        Ok(())
    }

    /// Sets one response header, replacing any previous value.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        self.response.set_header(name, value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fresh() -> Context {
        let (parts, ()) = http::Request::builder()
            .uri("/widgets")
            .header("x-request-id", "r-1")
            .body(())
            .unwrap()
            .into_parts();
        Context::new(&Defaults::new(), parts, Bytes::new())
    }

    #[test]
    fn starts_at_not_found_with_empty_body() {
        let ctx = fresh();
        assert_eq!(ctx.status(), StatusCode::NOT_FOUND);
        assert!(matches!(ctx.body(), Body::Empty));
    }

    #[test]
    fn set_body_forces_status_200() {
        let mut ctx = fresh();
        ctx.set_body("hi");
        assert_eq!(ctx.status(), StatusCode::OK);

        // An explicit status set afterwards still wins.
        ctx.set_status(StatusCode::CREATED);
        ctx.set_body("again");
        assert_eq!(ctx.status(), StatusCode::OK);
    }

    #[test]
    fn set_json_stores_a_structured_body() {
        let mut ctx = fresh();
        ctx.set_json(json!({"id": 7})).unwrap();
        assert_eq!(ctx.status(), StatusCode::OK);
        assert!(matches!(ctx.body(), Body::Json(_)));
    }

    #[test]
    fn request_delegation() {
        let ctx = fresh();
        assert_eq!(ctx.method(), Method::GET);
        assert_eq!(ctx.path(), "/widgets");
        assert_eq!(ctx.header("x-request-id"), Some("r-1"));
        assert!(ctx.request_body().is_empty());
    }

    #[test]
    fn default_headers_are_copied_not_shared() {
        let mut defaults = Defaults::new();
        defaults.push_header(
            HeaderName::from_static("server"),
            HeaderValue::from_static("kawa"),
        );

        let (parts, ()) = http::Request::builder().body(()).unwrap().into_parts();
        let mut ctx = Context::new(&defaults, parts, Bytes::new());
        ctx.set_header("server", "other").unwrap();

        assert_eq!(defaults.headers()["server"], "kawa");
        assert_eq!(ctx.response().headers()["server"], "other");
    }
}
