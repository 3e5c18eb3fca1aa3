//! Incoming request type.

use std::fmt;

use bytes::Bytes;
use http::{HeaderMap, Method};
use http_body_util::combinators::UnsyncBoxBody;

use crate::error::BoxError;
use crate::params::Params;

/// A request body.
///
/// Ordinary routes receive the body fully read. Routes registered with
/// [`Router::streaming_route`](crate::Router::streaming_route) receive it
/// untouched and read it themselves.
pub enum Body {
    Buffered(Bytes),
    Streaming(UnsyncBoxBody<Bytes, BoxError>),
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buffered(bytes) => f.debug_tuple("Buffered").field(&bytes.len()).finish(),
            Self::Streaming(_) => f.write_str("Streaming"),
        }
    }
}

impl Default for Body {
    fn default() -> Self {
        Self::Buffered(Bytes::new())
    }
}

/// An incoming request, as seen by middleware and handlers.
#[derive(Debug)]
pub struct Request {
    method: Method,
    path: String,
    headers: HeaderMap,
    body: Body,
    params: Params,
    format: Option<String>,
}

impl Request {
    /// A bodiless request, mainly for tests and custom adapters.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
            body: Body::default(),
            params: Params::new(),
            format: None,
        }
    }

    pub(crate) fn from_parts(parts: http::request::Parts, body: Body) -> Self {
        Self {
            method: parts.method,
            path: parts.uri.path().to_owned(),
            headers: parts.headers,
            body,
            params: Params::new(),
            format: None,
        }
    }

    /// Attaches what the router captured.
    pub fn with_route(mut self, params: Params, format: Option<String>) -> Self {
        self.params = params;
        self.format = format;
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = Body::Buffered(body.into());
        self
    }

    pub fn method(&self) -> &Method { &self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &HeaderMap { &self.headers }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { &mut self.headers }
    pub fn params(&self) -> &Params { &self.params }

    /// Header lookup. Names are case-insensitive; non-UTF-8 values are
    /// treated as absent.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The buffered body. Empty for streaming routes.
    pub fn body(&self) -> &[u8] {
        match &self.body {
            Body::Buffered(bytes) => &bytes[..],
            Body::Streaming(_) => &[],
        }
    }

    /// Takes the body out, leaving an empty buffered one behind.
    pub fn take_body(&mut self) -> Body {
        std::mem::take(&mut self.body)
    }

    pub fn is_streaming(&self) -> bool {
        matches!(self.body, Body::Streaming(_))
    }

    /// Returns a path parameter's value, extension stripped.
    ///
    /// For a route `/users/:id`, `req.param("id")` on `/users/42.json` returns `Some("42")`.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// The format the path asked for: the right-most extension found in it,
    /// either through an extension union or a parameter.
    pub fn format(&self) -> Option<&str> {
        self.format.as_deref()
    }
}
