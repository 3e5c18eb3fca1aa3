use std::time::Instant;

use tracing::{info, warn};

use crate::context::{Context, Services};
use crate::handler::HandlerResult;
use crate::middleware::Next;
use crate::request::Request;

/// Logs one line per request: method, path, status and latency.
///
/// Faults are logged at `warn` and passed on unchanged. Put it first in a
/// [`Stack`](super::Stack) so the latency covers every other layer.
pub async fn trace(req: Request, cx: Context, services: Services, next: Next) -> HandlerResult {
    let method = req.method().clone();
    let path = req.path().to_owned();
    let started = Instant::now();

    let result = next.run(req, cx, services).await;
    let latency_ms = started.elapsed().as_secs_f64() * 1000.0;

    match &result {
        Ok(res) => info!(
            %method,
            %path,
            status = res.status_code().as_u16(),
            latency_ms,
            "request completed"
        ),
        Err(e) => warn!(%method, %path, error = %e, latency_ms, "request failed"),
    }
    result
}
