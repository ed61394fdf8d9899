//! Minimal kawa example — an access log, a JSON endpoint, and the default
//! 404 fallthrough.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/
//!   curl http://localhost:3000/time
//!   curl http://localhost:3000/nope          # nobody answers -> 404 Not found
//!   curl http://localhost:3000/fail          # middleware fault -> 500 server error

use std::time::Instant;

use kawa::{App, Context, Error, Next};
use serde::Serialize;

#[derive(Serialize)]
struct Uptime {
    seconds: u64,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt::init();

    let started = Instant::now();

    App::new()
        .default_header("server", "kawa")
        .on_error(|err| tracing::warn!("pipeline fault: {err}"))
        .wrap(access_log)
        .wrap(move |mut ctx: Context, next: Next| async move {
            match ctx.path() {
                "/" => {
                    ctx.set_body("<h1>hello from kawa</h1>");
                    Ok(ctx)
                }
                "/time" => {
                    ctx.set_json(Uptime { seconds: started.elapsed().as_secs() })?;
                    Ok(ctx)
                }
                "/fail" => Err(Error::handler("deliberate failure")),
                // Nobody downstream either: falls through to 404 Not found.
                _ => next.run(ctx).await,
            }
        })
        .listen("0.0.0.0:3000")
        .await
        .expect("server error");
}

// Logs method, path, final status, and latency on the upward pass.
async fn access_log(ctx: Context, next: Next) -> Result<Context, Error> {
    let method = ctx.method().clone();
    let path = ctx.path().to_owned();
    let start = Instant::now();

    let ctx = next.run(ctx).await?;

    tracing::info!(
        %method,
        path,
        status = ctx.status().as_u16(),
        elapsed_ms = start.elapsed().as_millis() as u64,
        "request"
    );
    Ok(ctx)
}
