//! Middleware trait, type erasure, and pipeline composition.
//!
//! # The onion
//!
//! Registered middleware form a pipeline. Each one receives the [`Context`]
//! and a [`Next`] continuation; calling `next.run(ctx)` hands the context to
//! the rest of the chain and gives it back once the chain settles:
//!
//! ```text
//! m0 pre ─▶ m1 pre ─▶ m2 pre ─▶ (end of list)
//! m0 post ◀─ m1 post ◀─ m2 post ◀──────┘
//! ```
//!
//! Downward order is registration order; post-`next` work unwinds in strict
//! reverse. A middleware that never calls `next` short-circuits everything
//! after it. `Next` is consumed by value, so the chain cannot be resumed
//! twice.
//!
//! # How async middleware is stored
//!
//! The app holds middleware of *different* concrete types in one list, so
//! each is erased behind `Arc<dyn Middleware>` and its future behind
//! [`BoxFuture`]. The per-step runtime cost is one `Arc` clone and one
//! vtable call — noise next to network I/O.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use crate::context::Context;
use crate::error::Error;

/// A heap-allocated, type-erased future resolving to the pipeline outcome.
///
/// `Pin<Box<…>>` because the runtime polls futures in place; `Send` so tokio
/// may move the task across worker threads. The box also breaks the type
/// recursion between a middleware's future and the continuation it awaits.
pub type BoxFuture = Pin<Box<dyn Future<Output = Result<Context, Error>> + Send + 'static>>;

/// The frozen middleware list shared by every in-flight request.
pub(crate) type Stack = Arc<[Arc<dyn Middleware>]>;

/// One step of the request pipeline.
///
/// You rarely implement this yourself: any `async fn` (or closure returning
/// a `Send` future) with the signature
///
/// ```text
/// async fn name(ctx: Context, next: Next) -> Result<Context, Error>
/// ```
///
/// satisfies it through the blanket impl below. A middleware may do work
/// before `next.run`, after it, both, or skip `next` entirely to
/// short-circuit. Returning `Err` aborts the chain and yields the fixed
/// `500` response.
pub trait Middleware: Send + Sync + 'static {
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture;
}

impl<F, Fut> Middleware for F
where
    F: Fn(Context, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Context, Error>> + Send + 'static,
{
    fn handle(&self, ctx: Context, next: Next) -> BoxFuture {
        Box::pin(self(ctx, next))
    }
}

/// The continuation handed to each middleware.
///
/// Holds the frozen middleware list plus the index of the next step — the
/// "rest of the pipeline" as a value. Consumed by [`run`](Next::run), so a
/// single middleware invocation can resume the chain at most once.
pub struct Next {
    stack: Stack,
    index: usize,
}

impl Next {
    pub(crate) fn new(stack: Stack) -> Self {
        Self { stack, index: 0 }
    }

    /// Runs the remainder of the pipeline over `ctx`.
    ///
    /// Past the end of the list this resolves immediately with the context
    /// unchanged — which is also the whole story for an empty pipeline.
    /// Errors from any downstream middleware propagate out unchanged.
    pub async fn run(self, ctx: Context) -> Result<Context, Error> {
        match self.stack.get(self.index) {
            None => Ok(ctx),
            Some(middleware) => {
                let middleware = Arc::clone(middleware);
                let next = Next {
                    stack: self.stack,
                    index: self.index + 1,
                };
                middleware.handle(ctx, next).await
            }
        }
    }
}

/// Composes the whole list into one invocation, starting at index 0.
pub(crate) async fn compose(stack: Stack, ctx: Context) -> Result<Context, Error> {
    Next::new(stack).run(ctx).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::body::Body;
    use crate::context::Defaults;
    use bytes::Bytes;
    use http::StatusCode;
    use std::sync::Mutex;

    fn ctx() -> Context {
        let (parts, ()) = http::Request::builder().body(()).unwrap().into_parts();
        Context::new(&Defaults::new(), parts, Bytes::new())
    }

    fn stack(list: Vec<Arc<dyn Middleware>>) -> Stack {
        list.into()
    }

    fn recorder(log: &Arc<Mutex<Vec<String>>>, name: &'static str) -> Arc<dyn Middleware> {
        let log = Arc::clone(log);
        Arc::new(move |ctx: Context, next: Next| {
            let log = Arc::clone(&log);
            async move {
                log.lock().unwrap().push(format!("{name}:down"));
                let ctx = next.run(ctx).await?;
                log.lock().unwrap().push(format!("{name}:up"));
                Ok(ctx)
            }
        })
    }

    #[tokio::test]
    async fn executes_in_onion_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let stack = stack(vec![
            recorder(&log, "a"),
            recorder(&log, "b"),
            recorder(&log, "c"),
        ]);

        compose(stack, ctx()).await.unwrap();

        assert_eq!(
            *log.lock().unwrap(),
            ["a:down", "b:down", "c:down", "c:up", "b:up", "a:up"]
        );
    }

    #[tokio::test]
    async fn skipping_next_short_circuits_downstream() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let short: Arc<dyn Middleware> = Arc::new(|mut ctx: Context, _next: Next| async move {
            ctx.set_body("early");
            Ok(ctx)
        });
        let stack = stack(vec![recorder(&log, "a"), short, recorder(&log, "never")]);

        let ctx = compose(stack, ctx()).await.unwrap();

        assert_eq!(*log.lock().unwrap(), ["a:down", "a:up"]);
        assert_eq!(ctx.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn empty_stack_resolves_without_touching_the_context() {
        let ctx = compose(stack(Vec::new()), ctx()).await.unwrap();
        assert_eq!(ctx.status(), StatusCode::NOT_FOUND);
        assert!(matches!(ctx.body(), Body::Empty));
    }

    #[tokio::test]
    async fn errors_propagate_unchanged() {
        let faulty: Arc<dyn Middleware> =
            Arc::new(|_ctx: Context, _next: Next| async move { Err(Error::handler("boom")) });
        let err = compose(stack(vec![faulty]), ctx()).await.unwrap_err();
        assert!(matches!(err, Error::Handler(_)));
    }

    #[tokio::test]
    async fn post_next_work_sees_downstream_mutations() {
        let tail: Arc<dyn Middleware> = Arc::new(|mut ctx: Context, _next: Next| async move {
            ctx.set_body("answered");
            Ok(ctx)
        });
        let head: Arc<dyn Middleware> = Arc::new(|ctx: Context, next: Next| async move {
            let mut ctx = next.run(ctx).await?;
            assert_eq!(ctx.status(), StatusCode::OK);
            ctx.set_header("x-seen", "yes")?;
            Ok(ctx)
        });

        let ctx = compose(stack(vec![head, tail]), ctx()).await.unwrap();
        assert_eq!(ctx.response().headers()["x-seen"], "yes");
    }
}
