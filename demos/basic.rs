//! Minimal switchyard demo: a few JSON endpoints behind hyper.
//!
//! Run with:
//!   RUST_LOG=info cargo run --example basic
//!
//! Try:
//!   curl http://localhost:3000/users/42
//!   curl http://localhost:3000/users/42.json
//!   curl http://localhost:3000/reports.csv
//!   curl http://localhost:3000/files/docs/readme.txt
//!   curl -X POST http://localhost:3000/users -d '{"name":"alice"}'
//!   curl -X DELETE http://localhost:3000/users/42        # 401 without a token
//!   curl -X PATCH http://localhost:3000/users/42         # 405, allow: GET, DELETE

use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tracing::{error, info};

use switchyard::middleware::{self, Stack};
use switchyard::{
    ContentType, Context, Dispatcher, HandlerResult, Method, Next, Request, Response, Router,
    Services, StatusCode,
};

#[tokio::main]
async fn main() -> std::io::Result<()> {
    tracing_subscriber::fmt::init();

    let traced = Stack::new().push(middleware::trace);
    let guarded = traced.clone().push(require_token);

    let router = Router::new()
        .route(Method::GET,    "/users/:id",           get_user,    traced.clone())
        .route(Method::POST,   "/users",               create_user, traced.clone())
        .route(Method::DELETE, "/users/:id",           delete_user, guarded)
        .route(Method::GET,    "/reports.{csv,json}",  report,      traced.clone())
        .route(Method::GET,    "/files/**path",        show_file,   traced);

    let dispatcher = Dispatcher::new(router);
    let listener = TcpListener::bind("127.0.0.1:3000").await?;
    info!(addr = "127.0.0.1:3000", "switchyard demo listening");

    loop {
        let (stream, peer) = listener.accept().await?;
        let dispatcher = dispatcher.clone();

        tokio::spawn(async move {
            let svc = service_fn(move |req| {
                let dispatcher = dispatcher.clone();
                async move { dispatcher.dispatch(req).await }
            });

            if let Err(e) = ConnBuilder::new(TokioExecutor::new())
                .serve_connection(TokioIo::new(stream), svc)
                .await
            {
                error!(%peer, "connection error: {e}");
            }
        });
    }
}

// GET /users/:id  (and /users/:id.json)
async fn get_user(req: Request, _cx: Context, _services: Services) -> Response {
    let id = req.param("id").unwrap_or("unknown");
    match req.format() {
        Some("json") => Response::json(format!(r#"{{"id":"{id}","name":"alice"}}"#).into_bytes()),
        _ => Response::text(format!("user {id}: alice")),
    }
}

// POST /users
async fn create_user(req: Request, _cx: Context, _services: Services) -> Response {
    if req.body().is_empty() {
        return Response::status(StatusCode::BAD_REQUEST);
    }
    Response::builder()
        .status(StatusCode::CREATED)
        .header("location", "/users/99")
        .json(br#"{"id":"99","name":"new_user"}"#.to_vec())
}

// DELETE /users/:id → 204 No Content
async fn delete_user(_req: Request, _cx: Context, _services: Services) -> StatusCode {
    StatusCode::NO_CONTENT
}

// GET /reports.csv | /reports.json
async fn report(req: Request, _cx: Context, _services: Services) -> Response {
    let format = req.format().unwrap_or("json");
    let body = match format {
        "csv" => b"id,total\n1,10\n".to_vec(),
        _ => br#"[{"id":1,"total":10}]"#.to_vec(),
    };
    let content_type = ContentType::from_format(format).unwrap_or(ContentType::OctetStream);
    Response::builder().bytes(content_type, body)
}

// GET /files/**path
async fn show_file(req: Request, _cx: Context, _services: Services) -> String {
    format!("would serve {}", req.param("path").unwrap_or_default())
}

async fn require_token(req: Request, cx: Context, services: Services, next: Next) -> HandlerResult {
    if req.header("authorization").is_none() {
        return Ok(Response::status(StatusCode::UNAUTHORIZED));
    }
    next.run(req, cx, services).await
}
