//! Handler trait and type erasure.
//!
//! # How async handlers are stored
//!
//! The route table holds handlers of *different* types in a single
//! `Vec<RouteEntry>`. Rust collections can only hold one concrete type, so
//! handlers hide behind a trait object (`dyn ErasedHandler`) and are stored
//! uniformly.
//!
//! ```text
//! async fn show(req, cx, services) -> Response { … }   ← user writes this
//!        ↓ router.on(Method::GET, "/users/:id", show)
//! show.into_boxed_handler()                          ← Handler blanket impl
//!        ↓
//! Arc::new(FnHandler(show))                          ← heap-allocated wrapper
//!        ↓  stored as BoxedHandler = Arc<dyn ErasedHandler>
//! handler.call(req, cx, services) at request time    ← one vtable dispatch
//!        ↓
//! Box::pin(async { show(..).await.into_handler_result() })
//! ```
//!
//! A chain built by [`build_chain`](crate::middleware::build_chain) is itself
//! a `BoxedHandler`, so the dispatcher calls a bare handler and a fully
//! wrapped one the same way.

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use http::StatusCode;

use crate::context::{Context, Services};
use crate::error::BoxError;
use crate::request::Request;
use crate::response::{IntoResponse, Response};

/// What every handler and middleware ultimately produces.
///
/// `Err` is a fault. The chain never inspects it; the dispatcher maps it to a
/// `500`.
pub type HandlerResult = Result<Response, BoxError>;

/// A heap-allocated, type-erased future resolving to a [`HandlerResult`].
///
/// `Send + 'static` lets the server move it across worker threads.
pub type BoxFuture = Pin<Box<dyn Future<Output = HandlerResult> + Send + 'static>>;

/// The dispatch interface behind every [`BoxedHandler`].
pub trait ErasedHandler {
    fn call(&self, req: Request, cx: Context, services: Services) -> BoxFuture;
}

/// A type-erased handler shared across concurrent requests.
pub type BoxedHandler = Arc<dyn ErasedHandler + Send + Sync + 'static>;

// ── Public Handler trait ──────────────────────────────────────────────────────

/// Implemented for every valid route handler.
///
/// You never implement this yourself. It is satisfied by any `async fn` (or
/// closure returning a future) of the shape:
///
/// ```text
/// async fn name(req: Request, cx: Context, services: Services) -> impl IntoHandlerResult
/// ```
///
/// The trait is sealed so the blanket impl below is the only one.
pub trait Handler: private::Sealed + Send + Sync + 'static {
    #[doc(hidden)]
    fn into_boxed_handler(self) -> BoxedHandler;
}

mod private {
    pub trait Sealed {}
}

impl<F, Fut, R> private::Sealed for F
where
    F: Fn(Request, Context, Services) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
}

impl<F, Fut, R> Handler for F
where
    F: Fn(Request, Context, Services) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
    fn into_boxed_handler(self) -> BoxedHandler {
        Arc::new(FnHandler(self))
    }
}

/// Newtype bridging a concrete handler `F` into the trait-object world.
struct FnHandler<F>(F);

impl<F, Fut, R> ErasedHandler for FnHandler<F>
where
    F: Fn(Request, Context, Services) -> Fut + Send + Sync,
    Fut: Future<Output = R> + Send + 'static,
    R: IntoHandlerResult,
{
    fn call(&self, req: Request, cx: Context, services: Services) -> BoxFuture {
        let fut = (self.0)(req, cx, services);
        Box::pin(async move { fut.await.into_handler_result() })
    }
}

// ── IntoHandlerResult ─────────────────────────────────────────────────────────

/// Conversion of a handler's return value into a [`HandlerResult`].
///
/// Infallible handlers return a response-like value directly. Fallible ones
/// return `Result<R, E>`; the error is boxed and handed to the caller as is.
/// Custom [`IntoResponse`] types are returned as `Ok(value)`.
pub trait IntoHandlerResult: Send + 'static {
    fn into_handler_result(self) -> HandlerResult;
}

impl IntoHandlerResult for Response {
    fn into_handler_result(self) -> HandlerResult { Ok(self) }
}

impl IntoHandlerResult for StatusCode {
    fn into_handler_result(self) -> HandlerResult { Ok(self.into_response()) }
}

impl IntoHandlerResult for String {
    fn into_handler_result(self) -> HandlerResult { Ok(self.into_response()) }
}

impl IntoHandlerResult for &'static str {
    fn into_handler_result(self) -> HandlerResult { Ok(self.into_response()) }
}

impl<R, E> IntoHandlerResult for Result<R, E>
where
    R: IntoResponse + Send + 'static,
    E: Into<BoxError> + Send + 'static,
{
    fn into_handler_result(self) -> HandlerResult {
        self.map(IntoResponse::into_response).map_err(Into::into)
    }
}
