//! Middleware and chain building.
//!
//! Middleware intercepts requests and responses and is the right place for
//! cross-cutting concerns: tracing, request-id injection, authentication
//! header checks. A middleware is any async function of the shape
//!
//! ```text
//! async fn name(req: Request, cx: Context, services: Services, next: Next) -> impl IntoHandlerResult
//! ```
//!
//! It can pass the request on (`next.run(req, cx, services).await`), rewrite
//! the result on the way back, or answer on its own without calling `next` at
//! all. [`Next::run`] consumes `next`, so the rest of the chain runs at most
//! once.
//!
//! # Ordering
//!
//! For a stack `[A, B]` around handler `H`:
//!
//! ```text
//! A ──▶ B ──▶ H
//!             │
//! A ◀── B ◀───┘
//! ```
//!
//! `A` sees the request first and the response last.
//!
//! # Faults
//!
//! The chain catches nothing. An `Err` (or a panic) from any layer travels
//! back through the outer layers exactly as it was raised. Layers that want to
//! react to it see it as the `Err` of `next.run`.
//!
//! Built-in middleware:
//! - [`trace()`]: per-request log line with method, path, status, latency

use std::future::Future;
use std::sync::Arc;

use crate::context::{Context, Services};
use crate::handler::{BoxFuture, BoxedHandler, ErasedHandler, HandlerResult, IntoHandlerResult};
use crate::request::Request;

mod trace;

pub use trace::trace;

/// The dispatch interface behind every [`BoxedMiddleware`].
#[doc(hidden)]
pub trait ErasedMiddleware {
    fn call(&self, req: Request, cx: Context, services: Services, next: Next) -> BoxFuture;
}

/// A type-erased middleware shared across concurrent requests.
pub type BoxedMiddleware = Arc<dyn ErasedMiddleware + Send + Sync + 'static>;

/// Implemented for every valid middleware function. Sealed, like
/// [`Handler`](crate::Handler).
pub trait Middleware: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_middleware(self) -> BoxedMiddleware;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, Context, Services, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
}

impl<F, Fut, R> Middleware for F
where
    F: Fn(Request, Context, Services, Next) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
    fn into_boxed_middleware(self) -> BoxedMiddleware {
        Arc::new(FnMiddleware(self))
    }
}

struct FnMiddleware<F>(F);

impl<F, Fut, R> ErasedMiddleware for FnMiddleware<F>
where
    F: Fn(Request, Context, Services, Next) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
    fn call(&self, req: Request, cx: Context, services: Services, next: Next) -> BoxFuture {
        let fut = (self.0)(req, cx, services, next);
        Box::pin(async move { fut.await.into_handler_result() })
    }
}

// ── Next ──────────────────────────────────────────────────────────────────────

/// The remainder of the chain, handed to each middleware.
pub struct Next {
    inner: BoxedHandler,
}

impl Next {
    /// Runs the rest of the chain: the next middleware, or the handler.
    pub async fn run(self, req: Request, cx: Context, services: Services) -> HandlerResult {
        self.inner.call(req, cx, services).await
    }
}

// ── Stack ─────────────────────────────────────────────────────────────────────

/// An ordered middleware list. The first entry pushed is the outermost.
///
/// ```rust
/// use switchyard::middleware::{self, Next, Stack};
/// use switchyard::{Context, Request, Response, Services, StatusCode};
///
/// async fn require_token(req: Request, cx: Context, services: Services, next: Next)
///     -> switchyard::HandlerResult
/// {
///     if req.header("authorization").is_none() {
///         return Ok(Response::status(StatusCode::UNAUTHORIZED));
///     }
///     next.run(req, cx, services).await
/// }
///
/// let stack = Stack::new().push(middleware::trace).push(require_token);
/// assert_eq!(stack.len(), 2);
/// ```
#[derive(Clone, Default)]
pub struct Stack {
    layers: Vec<BoxedMiddleware>,
}

impl Stack {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(mut self, middleware: impl Middleware) -> Self {
        self.layers.push(middleware.into_boxed_middleware());
        self
    }

    pub fn len(&self) -> usize {
        self.layers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }

    pub(crate) fn into_shared(self) -> Arc<[BoxedMiddleware]> {
        Arc::from(self.layers)
    }
}

// ── Chain building ────────────────────────────────────────────────────────────

/// Wraps `handler` in `middleware`, first entry outermost.
///
/// The fold runs right to left: the last middleware wraps the handler, the
/// one before it wraps that, and so on. An empty list returns `handler`
/// itself.
pub fn build_chain(middleware: &[BoxedMiddleware], handler: BoxedHandler) -> BoxedHandler {
    middleware.iter().rev().fold(handler, |next, layer| -> BoxedHandler {
        Arc::new(Layer { middleware: Arc::clone(layer), next })
    })
}

/// One middleware bound to the rest of its chain.
struct Layer {
    middleware: BoxedMiddleware,
    next: BoxedHandler,
}

impl ErasedHandler for Layer {
    fn call(&self, req: Request, cx: Context, services: Services) -> BoxFuture {
        let next = Next { inner: Arc::clone(&self.next) };
        self.middleware.call(req, cx, services, next)
    }
}
