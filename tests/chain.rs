use std::io;
use std::sync::{Arc, Mutex};

use switchyard::{
    build_chain, BoxError, Context, ErasedHandler, HandlerResult, Handler, Method, Middleware, Next,
    Request, Response, Router, Services, Stack, StatusCode,
};

type Log = Arc<Mutex<Vec<&'static str>>>;

fn recorder(log: &Log, pre: &'static str, post: &'static str) -> impl Middleware {
    let log = Arc::clone(log);
    move |req: Request, cx: Context, services: Services, next: Next| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push(pre);
            let result = next.run(req, cx, services).await;
            log.lock().unwrap().push(post);
            result
        }
    }
}

fn recording_handler(log: &Log) -> impl Handler {
    let log = Arc::clone(log);
    move |_req: Request, _cx: Context, _services: Services| {
        let log = Arc::clone(&log);
        async move {
            log.lock().unwrap().push("H");
            Response::text("handled")
        }
    }
}

async fn call(stack: Stack, handler: impl Handler, req: Request) -> HandlerResult {
    let router = Router::new().route(req.method().clone(), req.path(), handler, stack);
    let matched = router.lookup(req.method(), req.path()).expect("route registered above");
    matched.chain().call(req, Context::new(), Services::new()).await
}

fn get(path: &str) -> Request {
    Request::new(Method::GET, path)
}

#[tokio::test]
async fn first_middleware_is_outermost() {
    let log = Log::default();
    let stack = Stack::new()
        .push(recorder(&log, "A-pre", "A-post"))
        .push(recorder(&log, "B-pre", "B-post"));

    let res = call(stack, recording_handler(&log), get("/onion")).await.unwrap();

    assert_eq!(res.body(), b"handled");
    assert_eq!(*log.lock().unwrap(), ["A-pre", "B-pre", "H", "B-post", "A-post"]);
}

#[tokio::test]
async fn empty_stack_is_the_bare_handler() {
    let log = Log::default();
    let res = call(Stack::new(), recording_handler(&log), get("/bare")).await.unwrap();
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(*log.lock().unwrap(), ["H"]);
}

#[tokio::test]
async fn short_circuit_skips_the_rest() {
    let log = Log::default();

    async fn deny(req: Request, cx: Context, services: Services, next: Next) -> HandlerResult {
        if req.header("authorization").is_none() {
            return Ok(Response::status(StatusCode::UNAUTHORIZED));
        }
        next.run(req, cx, services).await
    }

    let stack = Stack::new()
        .push(recorder(&log, "A-pre", "A-post"))
        .push(deny)
        .push(recorder(&log, "C-pre", "C-post"));

    let res = call(stack.clone(), recording_handler(&log), get("/private")).await.unwrap();
    assert_eq!(res.status_code(), StatusCode::UNAUTHORIZED);
    assert_eq!(*log.lock().unwrap(), ["A-pre", "A-post"]);

    log.lock().unwrap().clear();
    let mut req = get("/private");
    req.headers_mut().insert("authorization", "Bearer t".parse().unwrap());
    let res = call(stack, recording_handler(&log), req).await.unwrap();
    assert_eq!(res.status_code(), StatusCode::OK);
    assert_eq!(*log.lock().unwrap(), ["A-pre", "C-pre", "H", "C-post", "A-post"]);
}

#[tokio::test]
async fn middleware_can_post_process() {
    async fn stamp(req: Request, cx: Context, services: Services, next: Next) -> HandlerResult {
        let mut res = next.run(req, cx, services).await?;
        res.set_header("x-served-by", "switchyard");
        Ok(res)
    }

    let res = call(Stack::new().push(stamp), |_: Request, _: Context, _: Services| async { "ok" }, get("/p"))
        .await
        .unwrap();
    assert_eq!(res.header("x-served-by"), Some("switchyard"));
    assert_eq!(res.body(), b"ok");
}

#[tokio::test]
async fn faults_propagate_unmodified() {
    let log = Log::default();

    async fn fail(_: Request, _: Context, _: Services) -> Result<Response, io::Error> {
        Err(io::Error::new(io::ErrorKind::PermissionDenied, "disk says no"))
    }

    let stack = Stack::new()
        .push(recorder(&log, "A-pre", "A-post"))
        .push(switchyard::middleware::trace);

    let err: BoxError = call(stack, fail, get("/boom")).await.unwrap_err();
    let io_err = err.downcast_ref::<io::Error>().expect("original error type survives");
    assert_eq!(io_err.kind(), io::ErrorKind::PermissionDenied);
    assert_eq!(io_err.to_string(), "disk says no");
    assert_eq!(*log.lock().unwrap(), ["A-pre", "A-post"]);
}

#[tokio::test]
async fn middleware_faults_propagate_too() {
    async fn explode(_: Request, _: Context, _: Services, _: Next) -> Result<Response, BoxError> {
        Err("middleware refused".into())
    }

    let log = Log::default();
    let stack = Stack::new().push(explode);
    let err = call(stack, recording_handler(&log), get("/m")).await.unwrap_err();
    assert_eq!(err.to_string(), "middleware refused");
    assert!(log.lock().unwrap().is_empty());
}

#[tokio::test]
async fn context_and_services_flow_through() {
    #[derive(Clone)]
    struct User(&'static str);
    #[derive(Clone)]
    struct Greeting(&'static str);

    async fn authenticate(req: Request, mut cx: Context, services: Services, next: Next) -> HandlerResult {
        cx.insert(User("ada"));
        next.run(req, cx, services).await
    }

    async fn greet(_req: Request, cx: Context, services: Services) -> String {
        let greeting = services.get::<Greeting>().map_or("hi", |g| g.0);
        let user = cx.get::<User>().map_or("stranger", |u| u.0);
        format!("{greeting}, {user}")
    }

    let chain = build_chain(
        &[authenticate.into_boxed_middleware()],
        greet.into_boxed_handler(),
    );
    let res = chain
        .call(get("/"), Context::new(), Services::new().with(Greeting("hello")))
        .await
        .unwrap();
    assert_eq!(res.body(), b"hello, ada");
}

#[tokio::test]
async fn chains_are_reusable_across_requests() {
    let log = Log::default();
    let chain = build_chain(
        &[recorder(&log, "A-pre", "A-post").into_boxed_middleware()],
        recording_handler(&log).into_boxed_handler(),
    );

    for _ in 0..3 {
        chain.call(get("/"), Context::new(), Services::new()).await.unwrap();
    }
    assert_eq!(log.lock().unwrap().len(), 9);
}
