//! Request dispatch: the glue between a hyper server and the router.
//!
//! [`Dispatcher::dispatch`] is the per-request hot path. It routes one
//! request, runs the matched chain and produces one response. Every failure
//! is answered here, so hyper never sees an error:
//!
//! | Outcome                                | Response |
//! |---|---|
//! | no route for the path                  | `404` |
//! | path exists, but not for this method   | `405` + `allow` |
//! | request body could not be read         | `400` |
//! | handler or middleware returned `Err`   | `500` |
//!
//! Accepting connections, TLS and shutdown are the server's business. Plug
//! the dispatcher into hyper with `service_fn`:
//!
//! ```rust,ignore
//! let dispatcher = Dispatcher::new(router);
//! let svc = hyper::service::service_fn(move |req| {
//!     let dispatcher = dispatcher.clone();
//!     async move { dispatcher.dispatch(req).await }
//! });
//! ```

use std::convert::Infallible;
use std::sync::Arc;

use bytes::Bytes;
use http::StatusCode;
use http_body_util::{BodyExt, Full};
use tracing::{debug, error, warn};

use crate::context::{Context, Services};
use crate::error::BoxError;
use crate::request::{Body, Request};
use crate::response::Response;
use crate::router::Router;

/// A frozen router plus the services every request gets.
///
/// Cloning is cheap; clone one into every connection task.
#[derive(Clone)]
pub struct Dispatcher {
    router: Arc<Router>,
    services: Services,
}

impl Dispatcher {
    /// Freezes `router`. No routes can be added after this point.
    pub fn new(router: Router) -> Self {
        Self { router: Arc::new(router), services: Services::new() }
    }

    pub fn with_services(mut self, services: Services) -> Self {
        self.services = services;
        self
    }

    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Routes one request and produces one response.
    pub async fn dispatch<B>(
        &self,
        req: http::Request<B>,
    ) -> Result<http::Response<Full<Bytes>>, Infallible>
    where
        B: hyper::body::Body<Data = Bytes> + Send + 'static,
        B::Error: Into<BoxError>,
    {
        let (parts, body) = req.into_parts();

        let Some(matched) = self.router.lookup(&parts.method, parts.uri.path()) else {
            return Ok(self.unmatched(&parts.method, parts.uri.path()).into_http());
        };

        let body = if matched.is_streaming() {
            Body::Streaming(body.map_err(Into::<BoxError>::into).boxed_unsync())
        } else {
            match body.collect().await {
                Ok(collected) => Body::Buffered(collected.to_bytes()),
                Err(e) => {
                    let e: BoxError = e.into();
                    warn!(method = %parts.method, path = parts.uri.path(), error = %e, "failed to read request body");
                    return Ok(Response::status(StatusCode::BAD_REQUEST).into_http());
                }
            }
        };

        let pattern = matched.pattern().to_owned();
        let (chain, params, format) = matched.into_parts();
        let req = Request::from_parts(parts, body).with_route(params, format);

        let response = match chain.call(req, Context::new(), self.services.clone()).await {
            Ok(response) => response,
            Err(e) => {
                error!(%pattern, error = %e, "handler failed");
                Response::status(StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        Ok(response.into_http())
    }

    fn unmatched(&self, method: &http::Method, path: &str) -> Response {
        let allowed = self.router.allowed_methods(path);
        if allowed.is_empty() {
            debug!(%method, path, "no route matched");
            return Response::status(StatusCode::NOT_FOUND);
        }

        let allow = allowed.iter().map(http::Method::as_str).collect::<Vec<_>>().join(", ");
        debug!(%method, path, %allow, "method not allowed");
        Response::builder()
            .status(StatusCode::METHOD_NOT_ALLOWED)
            .header("allow", &allow)
            .no_body()
    }
}
