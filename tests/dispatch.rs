use bytes::Bytes;
use http_body_util::{BodyExt, Full};
use switchyard::{
    Body, BoxError, Context, Dispatcher, Method, Request, Response, Router, Services, Stack, StatusCode,
};

async fn show_user(req: Request, _cx: Context, _services: Services) -> Response {
    let id = req.param("id").unwrap_or("?");
    let format = req.format().unwrap_or("html");
    Response::text(format!("user {id} as {format}"))
}

async fn echo(req: Request, _cx: Context, _services: Services) -> Response {
    Response::text(String::from_utf8_lossy(req.body()).into_owned())
}

async fn broken(_req: Request, _cx: Context, _services: Services) -> Result<Response, BoxError> {
    Err("database unavailable".into())
}

async fn upload(mut req: Request, _cx: Context, _services: Services) -> Result<Response, BoxError> {
    match req.take_body() {
        Body::Streaming(body) => {
            let bytes = body.collect().await?.to_bytes();
            Ok(Response::text(format!("streamed {} bytes", bytes.len())))
        }
        Body::Buffered(_) => Ok(Response::status(StatusCode::BAD_REQUEST)),
    }
}

fn app() -> Dispatcher {
    let router = Router::new()
        .on(Method::GET, "/users/:id", show_user)
        .on(Method::DELETE, "/users/:id", show_user)
        .on(Method::POST, "/echo", echo)
        .on(Method::GET, "/broken", broken)
        .streaming_route(Method::PUT, "/upload/:name", upload, Stack::new());
    Dispatcher::new(router)
}

fn request(method: Method, uri: &str, body: &'static str) -> http::Request<Full<Bytes>> {
    http::Request::builder()
        .method(method)
        .uri(uri)
        .body(Full::new(Bytes::from_static(body.as_bytes())))
        .unwrap()
}

async fn send(app: &Dispatcher, req: http::Request<Full<Bytes>>) -> (StatusCode, http::HeaderMap, String) {
    let res = app.dispatch(req).await.unwrap();
    let status = res.status();
    let headers = res.headers().clone();
    let body = res.into_body().collect().await.unwrap().to_bytes();
    (status, headers, String::from_utf8(body.to_vec()).unwrap())
}

#[tokio::test]
async fn routes_to_the_handler_with_params_and_format() {
    let (status, _, body) = send(&app(), request(Method::GET, "/users/42.json?verbose=1", "")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "user 42 as json");
}

#[tokio::test]
async fn buffers_ordinary_bodies() {
    let (status, _, body) = send(&app(), request(Method::POST, "/echo", "ping")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "ping");
}

#[tokio::test]
async fn streaming_routes_receive_the_raw_body() {
    let (status, _, body) = send(&app(), request(Method::PUT, "/upload/a.bin", "0123456789")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, "streamed 10 bytes");
}

#[tokio::test]
async fn unknown_path_is_not_found() {
    let (status, headers, body) = send(&app(), request(Method::GET, "/nowhere", "")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert!(headers.get("allow").is_none());
    assert!(body.is_empty());
}

#[tokio::test]
async fn wrong_method_is_method_not_allowed() {
    let (status, headers, _) = send(&app(), request(Method::PATCH, "/users/1", "")).await;
    assert_eq!(status, StatusCode::METHOD_NOT_ALLOWED);
    assert_eq!(headers["allow"], "GET, DELETE");
}

#[tokio::test]
async fn handler_faults_become_internal_errors() {
    let (status, _, _) = send(&app(), request(Method::GET, "/broken", "")).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn services_reach_handlers() {
    #[derive(Clone)]
    struct Version(&'static str);

    async fn version(_req: Request, _cx: Context, services: Services) -> String {
        services.get::<Version>().map_or("unknown", |v| v.0).to_owned()
    }

    let app = Dispatcher::new(Router::new().on(Method::GET, "/version", version))
        .with_services(Services::new().with(Version("1.2.3")));

    let (_, _, body) = send(&app, request(Method::GET, "/version", "")).await;
    assert_eq!(body, "1.2.3");
}

#[tokio::test]
async fn dispatcher_is_shareable_across_tasks() {
    let app = app();
    let mut tasks = tokio::task::JoinSet::new();

    for i in 0..16 {
        let app = app.clone();
        tasks.spawn(async move {
            let uri = format!("/users/{i}");
            let res = app.dispatch(request(Method::GET, &uri, "")).await.unwrap();
            (i, res.into_body().collect().await.unwrap().to_bytes())
        });
    }

    while let Some(joined) = tasks.join_next().await {
        let (i, body) = joined.unwrap();
        assert_eq!(body, format!("user {i} as html"));
    }
}
