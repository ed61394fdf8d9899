//! # kawa
//!
//! A minimal Koa-style middleware framework for Rust.
//! An ordered list of async functions, one context per request, one
//! response per request. Nothing more.
//!
//! ## The model
//!
//! There is no router, no extractor zoo, no trait soup. An application is a
//! list of middleware. Each middleware gets the per-request [`Context`] and
//! a [`Next`] continuation; it can answer the request, enrich the context,
//! or hand off downstream and post-process on the way back up:
//!
//! ```text
//! request ─▶ m0 ─▶ m1 ─▶ m2 ─▶ (end)
//! response ◀─ m0 ◀─ m1 ◀─ m2 ◀──┘
//! ```
//!
//! Whatever body the pipeline leaves on the context decides the response:
//! a JSON value, text or bytes, a byte stream, or nothing — which yields
//! the default `404` / `Not found`. A middleware fault yields a fixed
//! `500` / `server error` and fires the app's error hook. That is the whole
//! contract.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use kawa::{App, Context, Error, Next};
//!
//! #[tokio::main]
//! async fn main() {
//!     App::new()
//!         .wrap(access_log)
//!         .wrap(hello)
//!         .on_error(|err| eprintln!("request failed: {err}"))
//!         .listen("0.0.0.0:3000")
//!         .await
//!         .unwrap();
//! }
//!
//! async fn access_log(ctx: Context, next: Next) -> Result<Context, Error> {
//!     let path = ctx.path().to_owned();
//!     let ctx = next.run(ctx).await?;
//!     println!("{path} -> {}", ctx.status());
//!     Ok(ctx)
//! }
//!
//! async fn hello(mut ctx: Context, _next: Next) -> Result<Context, Error> {
//!     ctx.set_json(serde_json::json!({ "hello": "world" }))?;
//!     Ok(ctx)
//! }
//! ```

mod app;
mod body;
mod context;
mod error;
mod middleware;
mod request;
mod response;
mod server;

pub use app::App;
pub use body::{Body, BodyError, Outgoing};
pub use context::{Context, Defaults};
pub use error::Error;
pub use middleware::{BoxFuture, Middleware, Next};
pub use request::Request;
pub use response::Response;
pub use server::Server;

// Re-exported so applications don't need a direct `http` dependency for the
// common cases.
pub use http::{Method, StatusCode};
