//! Route table and first-match lookup.
//!
//! Routes are kept in registration order and scanned linearly. The first
//! entry whose method and pattern both match wins, whatever its specificity:
//! register `/users/new` before `/users/:id` if both should be reachable.
//!
//! The table is built once at startup. [`Router`] is then shared read-only,
//! typically through the [`Dispatcher`](crate::Dispatcher), so lookups need no
//! locking.

use std::fmt;
use std::sync::Arc;

use http::Method;
use tracing::{debug, warn};

use crate::error::CompileError;
use crate::handler::{BoxedHandler, Handler};
use crate::matcher::{match_pattern, split_path};
use crate::middleware::{build_chain, BoxedMiddleware, Stack};
use crate::params::Params;
use crate::pattern::CompiledPattern;

/// One registered route. Immutable once in the table.
pub struct RouteEntry {
    method: Method,
    pattern: CompiledPattern,
    handler: BoxedHandler,
    middleware: Arc<[BoxedMiddleware]>,
    streaming: bool,
}

impl RouteEntry {
    pub fn method(&self) -> &Method { &self.method }
    pub fn pattern(&self) -> &CompiledPattern { &self.pattern }
    pub fn middleware_len(&self) -> usize { self.middleware.len() }
    pub fn is_streaming(&self) -> bool { self.streaming }
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("method", &self.method)
            .field("pattern", &self.pattern.as_str())
            .field("middleware", &self.middleware.len())
            .field("streaming", &self.streaming)
            .finish()
    }
}

/// The application router.
///
/// Each registration call returns `self` so registrations chain naturally:
///
/// ```rust
/// # use switchyard::{Context, Method, Request, Response, Router, Services};
/// # async fn show(_: Request, _: Context, _: Services) -> Response { Response::text("") }
/// # async fn create(_: Request, _: Context, _: Services) -> Response { Response::text("") }
/// let router = Router::new()
///     .on(Method::GET,  "/users/:id", show)
///     .on(Method::POST, "/users",     create);
///
/// let matched = router.lookup(&Method::GET, "/users/42.json").unwrap();
/// assert_eq!(matched.params().get("id"), Some("42"));
/// assert_eq!(matched.format(), Some("json"));
/// ```
#[derive(Debug, Default)]
pub struct Router {
    routes: Vec<RouteEntry>,
}

impl Router {
    pub fn new() -> Self {
        Self { routes: Vec::new() }
    }

    /// Registers a handler with no middleware.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is malformed. Use [`try_route`](Router::try_route)
    /// to handle the error instead.
    pub fn on(self, method: Method, pattern: &str, handler: impl Handler) -> Self {
        self.route(method, pattern, handler, Stack::new())
    }

    /// Registers a handler wrapped in `middleware`.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is malformed.
    pub fn route(self, method: Method, pattern: &str, handler: impl Handler, middleware: Stack) -> Self {
        self.try_route(method, pattern, handler, middleware)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    /// Registers a handler wrapped in `middleware`, or reports why `pattern`
    /// does not compile.
    pub fn try_route(
        self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
        middleware: Stack,
    ) -> Result<Self, CompileError> {
        self.add(method, pattern, handler, middleware, false)
    }

    /// Like [`route`](Router::route), but the dispatcher hands the request
    /// body over unread so the handler can stream it.
    ///
    /// # Panics
    ///
    /// Panics if `pattern` is malformed.
    pub fn streaming_route(
        self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
        middleware: Stack,
    ) -> Self {
        self.try_streaming_route(method, pattern, handler, middleware)
            .unwrap_or_else(|e| panic!("{e}"))
    }

    pub fn try_streaming_route(
        self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
        middleware: Stack,
    ) -> Result<Self, CompileError> {
        self.add(method, pattern, handler, middleware, true)
    }

    fn add(
        mut self,
        method: Method,
        pattern: &str,
        handler: impl Handler,
        middleware: Stack,
        streaming: bool,
    ) -> Result<Self, CompileError> {
        let pattern = CompiledPattern::compile(pattern)?;

        if let Some(earlier) = self.routes.iter().find(|r| r.method == method && r.pattern == pattern) {
            warn!(
                %method,
                pattern = pattern.as_str(),
                shadowed_by = earlier.pattern.as_str(),
                "route is shadowed by an earlier registration and will never match"
            );
        }
        debug!(%method, pattern = pattern.as_str(), middleware = middleware.len(), streaming, "route registered");

        self.routes.push(RouteEntry {
            method,
            pattern,
            handler: handler.into_boxed_handler(),
            middleware: middleware.into_shared(),
            streaming,
        });
        Ok(self)
    }

    /// Finds the first route registered for `method` whose pattern matches
    /// `path`. `None` means nothing matched; it is never an error.
    pub fn lookup(&self, method: &Method, path: &str) -> Option<RouteMatch> {
        let segments = split_path(path);

        self.routes
            .iter()
            .filter(|route| route.method == *method)
            .find_map(|route| {
                let captures = match_pattern(&route.pattern, &segments)?;
                Some(RouteMatch {
                    pattern: route.pattern.shared_source(),
                    handler: Arc::clone(&route.handler),
                    middleware: Arc::clone(&route.middleware),
                    streaming: route.streaming,
                    params: captures.params,
                    format: captures.format,
                })
            })
    }

    /// Methods with at least one route matching `path`, in registration
    /// order. Used to tell "wrong method" apart from "no such path".
    pub fn allowed_methods(&self, path: &str) -> Vec<Method> {
        let segments = split_path(path);
        let mut allowed: Vec<Method> = Vec::new();

        for route in &self.routes {
            if !allowed.contains(&route.method) && match_pattern(&route.pattern, &segments).is_some() {
                allowed.push(route.method.clone());
            }
        }
        allowed
    }

    /// Registered routes, in registration order.
    pub fn routes(&self) -> &[RouteEntry] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// A successful lookup: the route's handler, its middleware and what the
/// path captured.
///
/// Owns everything it holds, so it can outlive the borrow of the router for
/// the duration of the request.
pub struct RouteMatch {
    pattern: Arc<str>,
    handler: BoxedHandler,
    middleware: Arc<[BoxedMiddleware]>,
    streaming: bool,
    params: Params,
    format: Option<String>,
}

impl RouteMatch {
    /// The pattern string the route was registered with.
    pub fn pattern(&self) -> &str { &self.pattern }
    pub fn handler(&self) -> &BoxedHandler { &self.handler }
    pub fn middleware(&self) -> &[BoxedMiddleware] { &self.middleware }
    pub fn is_streaming(&self) -> bool { self.streaming }

    /// Captured parameters, left to right as they appear in the path.
    pub fn params(&self) -> &Params { &self.params }

    /// The right-most format in the path: the extension matched by an
    /// extension union, or a parameter's extension.
    pub fn format(&self) -> Option<&str> { self.format.as_deref() }

    /// The route's middleware wrapped around its handler.
    pub fn chain(&self) -> BoxedHandler {
        build_chain(&self.middleware, Arc::clone(&self.handler))
    }

    /// Splits off the captures, leaving the chain.
    pub fn into_parts(self) -> (BoxedHandler, Params, Option<String>) {
        let chain = self.chain();
        (chain, self.params, self.format)
    }
}

impl fmt::Debug for RouteMatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteMatch")
            .field("pattern", &self.pattern)
            .field("middleware", &self.middleware.len())
            .field("streaming", &self.streaming)
            .field("params", &self.params)
            .field("format", &self.format)
            .finish()
    }
}
