//! Application: the middleware registry and per-request driver.

use std::sync::Arc;

use bytes::Bytes;
use http::request::Parts;
use http::{HeaderName, HeaderValue};
use tracing::error;

use crate::body::Outgoing;
use crate::context::{Context, Defaults};
use crate::error::Error;
use crate::middleware::{compose, Middleware, Stack};
use crate::response;
use crate::server::Server;

type ErrorHook = Box<dyn Fn(&Error) + Send + Sync + 'static>;

/// The application: an ordered middleware list plus shared response
/// defaults and an error hook.
///
/// Build it once at startup; every registration method consumes and returns
/// `self` so the setup chains naturally. After [`listen`](App::listen) (or
/// [`Server::serve`]) the app is shared read-only across all connection
/// tasks — registration during request processing is not a thing.
///
/// ```rust,no_run
/// use kawa::{App, Context, Error, Next};
///
/// #[tokio::main]
/// async fn main() {
///     App::new()
///         .wrap(hello)
///         .listen("0.0.0.0:3000")
///         .await
///         .unwrap();
/// }
///
/// async fn hello(mut ctx: Context, _next: Next) -> Result<Context, Error> {
///     ctx.set_body("<h1>hello</h1>");
///     Ok(ctx)
/// }
/// ```
pub struct App {
    stack: Stack,
    defaults: Defaults,
    error_hook: Option<ErrorHook>,
}

impl App {
    pub fn new() -> Self {
        Self {
            stack: Vec::new().into(),
            defaults: Defaults::new(),
            error_hook: None,
        }
    }

    /// Appends one middleware. Execution order is registration order.
    pub fn wrap(mut self, middleware: impl Middleware) -> Self {
        let mut list = self.stack.to_vec();
        list.push(Arc::new(middleware));
        self.stack = list.into();
        self
    }

    /// Installs the error hook, called exactly once per failed request with
    /// the middleware fault. Without a hook, faults are reported through
    /// `tracing::error!`. The client-facing `500` response is fixed either
    /// way — the hook observes, it does not recover.
    pub fn on_error(mut self, hook: impl Fn(&Error) + Send + Sync + 'static) -> Self {
        self.error_hook = Some(Box::new(hook));
        self
    }

    /// Adds a header every response starts out with. Middleware may replace
    /// it per request; the shared default itself never changes after setup.
    ///
    /// # Panics
    ///
    /// Panics on an invalid header name or value — registration happens at
    /// startup, where failing loudly beats limping on.
    pub fn default_header(mut self, name: &str, value: &str) -> Self {
        let name: HeaderName = name.parse().expect("invalid default header name");
        let value: HeaderValue = value.parse().expect("invalid default header value");
        self.defaults.push_header(name, value);
        self
    }

    /// Runs the middleware pipeline over `ctx` and returns the settled
    /// context, skipping HTTP serialization.
    ///
    /// This is the pipeline alone — the natural entry point for testing
    /// middleware without a socket.
    pub async fn run(&self, ctx: Context) -> Result<Context, Error> {
        compose(Arc::clone(&self.stack), ctx).await
    }

    /// Handles one request end-to-end: builds the context (status defaulted
    /// to `404`), runs the pipeline, serializes exactly one response.
    ///
    /// A pipeline fault is reported through the error hook and answered
    /// with the fixed `500` / `server error` response. hyper never sees an
    /// error from this path.
    pub async fn respond(&self, parts: Parts, body: Bytes) -> http::Response<Outgoing> {
        let ctx = Context::new(&self.defaults, parts, body);
        let result = self
            .run(ctx)
            .await
            .and_then(|ctx| ctx.into_response().into_http());
        match result {
            Ok(response) => response,
            Err(err) => {
                self.report(&err);
                response::failure()
            }
        }
    }

    /// Binds `addr` and serves this app until graceful shutdown.
    ///
    /// Shorthand for `Server::bind(addr).serve(app)`.
    pub async fn listen(self, addr: &str) -> Result<(), Error> {
        Server::bind(addr).serve(self).await
    }

    pub(crate) fn report(&self, err: &Error) {
        match &self.error_hook {
            Some(hook) => hook(err),
            None => error!("request failed: {err}"),
        }
    }
}

impl Default for App {
    fn default() -> Self {
        Self::new()
    }
}
