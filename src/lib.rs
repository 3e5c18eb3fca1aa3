//! # switchyard
//!
//! Request-to-handler dispatch for Rust services: a small route-pattern
//! language, deterministic first-match routing, and middleware chains.
//! Nothing more.
//!
//! ## The contract
//!
//! - **Patterns** compile once, at registration. A malformed pattern is a
//!   [`CompileError`] before the first request arrives, never during one.
//! - **Routing** is first-registered-wins. The table is scanned in the order
//!   routes were added; the first entry whose method and pattern match is
//!   the answer. No hidden specificity ranking.
//! - **Parameters** come back in the order they appear in the path.
//! - **Middleware** wraps the handler like an onion: the first layer sees the
//!   request first and the response last. The chain catches nothing.
//!
//! ## Pattern syntax
//!
//! ```text
//!  Syntax              Matches                      Captures
//!  /users              /users                       nothing
//!  /users/:id          /users/42, /users/42.json    id = "42" (format "json")
//!  /static/*file       /static/app.js               file = "app" (format "js")
//!  /files/**path       /files/a/b/c.txt             path = "a/b/c.txt"
//!  /products.{json,xml} /products.json              nothing (format "json")
//! ```
//!
//! ## Quick start
//!
//! ```rust
//! use switchyard::middleware::{self, Stack};
//! use switchyard::{Context, Method, Request, Response, Router, Services};
//!
//! let app = Router::new()
//!     .on(Method::GET, "/users/:id", show_user)
//!     .route(Method::GET, "/files/**path", show_file, Stack::new().push(middleware::trace));
//!
//! let matched = app.lookup(&Method::GET, "/users/7").unwrap();
//! assert_eq!(matched.params().get("id"), Some("7"));
//! assert!(app.lookup(&Method::DELETE, "/users/7").is_none());
//!
//! async fn show_user(req: Request, _cx: Context, _services: Services) -> Response {
//!     let id = req.param("id").unwrap_or("unknown");
//!     Response::json(format!(r#"{{"id":"{id}"}}"#).into_bytes())
//! }
//!
//! async fn show_file(req: Request, _cx: Context, _services: Services) -> String {
//!     format!("file {}", req.param("path").unwrap_or_default())
//! }
//! ```
//!
//! Serving over the network is left to hyper; see [`Dispatcher`].

mod context;
mod dispatch;
mod error;
mod handler;
mod matcher;
mod params;
mod pattern;
mod request;
mod response;
mod router;

pub mod middleware;

pub use context::{Context, Services};
pub use dispatch::Dispatcher;
pub use error::{BoxError, CompileError, CompileErrorKind};
pub use handler::{BoxFuture, BoxedHandler, ErasedHandler, Handler, HandlerResult, IntoHandlerResult};
pub use http::{Method, StatusCode};
pub use middleware::{build_chain, Middleware, Next, Stack};
pub use params::{split_format, Param, Params};
pub use pattern::{CompiledPattern, ExtensionBase, PathSegment};
pub use request::{Body, Request};
pub use response::{ContentType, IntoResponse, Response, ResponseBuilder};
pub use router::{RouteEntry, RouteMatch, Router};
