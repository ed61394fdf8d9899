//! Outgoing HTTP response view and serialization.
//!
//! Middleware mutates this view through the [`Context`](crate::Context);
//! once the pipeline settles, [`Response::into_http`] performs the single
//! write of the request's lifecycle, dispatching on the body variant.

use bytes::Bytes;
use http::header::CONTENT_TYPE;
use http::{HeaderMap, HeaderName, HeaderValue, StatusCode};

use crate::body::{full, Body, Outgoing};
use crate::context::Defaults;
use crate::error::Error;

/// The response half of a [`Context`](crate::Context).
///
/// Starts out as a copy of the application's [`Defaults`]: status `404`,
/// default headers, no body. Everything middleware does to the response
/// happens on this per-request copy — the shared defaults are never touched.
#[derive(Debug)]
pub struct Response {
    status: StatusCode,
    headers: HeaderMap,
    body: Body,
}

impl Response {
    pub(crate) fn new(defaults: &Defaults) -> Self {
        Self {
            status: defaults.status(),
            headers: defaults.headers().clone(),
            body: Body::Empty,
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn set_status(&mut self, status: StatusCode) {
        self.status = status;
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Sets one response header, replacing any previous value.
    ///
    /// An invalid name or value is a middleware fault — bubble it up with `?`.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let name: HeaderName = name.parse().map_err(Error::handler)?;
        let value: HeaderValue = value.parse().map_err(Error::handler)?;
        self.headers.insert(name, value);
        Ok(())
    }

    pub fn body(&self) -> &Body {
        &self.body
    }

    /// Sets the response body and, as a side effect, the status to `200`.
    ///
    /// The side effect is unconditional: a body means the request was
    /// answered. Call [`set_status`](Response::set_status) afterwards to
    /// override it.
    pub fn set_body(&mut self, body: impl Into<Body>) {
        self.status = StatusCode::OK;
        self.body = body.into();
    }

    /// Serializes the final response state into a hyper response.
    ///
    /// Exactly one write per request. Exhaustive over [`Body`]:
    ///
    /// - `Json` → serde_json text, JSON content-type;
    /// - `Stream` → piped through, headers untouched;
    /// - `Text` / `Bytes` → emitted as-is, HTML content-type;
    /// - `Empty` → literal `Not found`, status left at whatever the
    ///   pipeline (or the `404` default) says.
    ///
    /// The only failure mode is JSON encoding, surfaced as a handler fault
    /// so the dispatcher answers it like any other middleware error.
    pub fn into_http(self) -> Result<http::Response<Outgoing>, Error> {
        let mut headers = self.headers;
        if let Some(content_type) = self.body.content_type() {
            headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
        }

        let outgoing = match self.body {
            Body::Json(value) => full(Bytes::from(serde_json::to_vec(&value)?)),
            Body::Stream(stream) => stream,
            Body::Text(text) => full(Bytes::from(text)),
            Body::Bytes(bytes) => full(bytes),
            Body::Empty => full(Bytes::from_static(b"Not found")),
        };

        let mut response = http::Response::new(outgoing);
        *response.status_mut() = self.status;
        *response.headers_mut() = headers;
        Ok(response)
    }
}

/// The fixed answer for a failed pipeline: `500` / `server error`.
///
/// Deliberately carries nothing from the faulted context — no partial body,
/// no headers middleware may have staged before the fault.
pub(crate) fn failure() -> http::Response<Outgoing> {
    let mut response = http::Response::new(full(Bytes::from_static(b"server error")));
    *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
    response
}
