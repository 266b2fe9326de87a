//! Shared helpers: a counting backend stub and a proxy bound to a random port.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{DefaultBodyLimit, Request};
use axum::http::{HeaderMap, HeaderValue, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tower::util::MapRequestLayer;

use bounce::config::model::RouteSpec;
use bounce::proxy::routing::RouteTable;
use bounce::server::{self, AppState};

pub struct Backend {
    pub addr: SocketAddr,
    hits: Arc<AtomicUsize>,
}

impl Backend {
    pub fn hits(&self) -> usize {
        self.hits.load(Ordering::SeqCst)
    }

    pub fn route(&self, method: &str, path: &str) -> RouteSpec {
        RouteSpec::new(method, path, "127.0.0.1", self.addr.port())
    }
}

async fn ok_json() -> Response {
    let mut response = Json(serde_json::json!({"something": "something"})).into_response();
    response
        .headers_mut()
        .append("x-multi", HeaderValue::from_static("one"));
    response
        .headers_mut()
        .append("x-multi", HeaderValue::from_static("two"));
    response
}

async fn slow() -> &'static str {
    tokio::time::sleep(Duration::from_millis(2000)).await;
    "late"
}

async fn error() -> StatusCode {
    StatusCode::INTERNAL_SERVER_ERROR
}

async fn query(uri: Uri) -> String {
    uri.to_string()
}

fn values(headers: &HeaderMap, name: &str) -> Vec<String> {
    headers
        .get_all(name)
        .iter()
        .map(|v| String::from_utf8_lossy(v.as_bytes()).into_owned())
        .collect()
}

async fn echo_headers(headers: HeaderMap) -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "something": values(&headers, "something"),
        "x-dup": values(&headers, "x-dup"),
        "host": values(&headers, "host"),
        "x-forwarded-for": values(&headers, "x-forwarded-for"),
    }))
}

async fn echo_body(body: Bytes) -> (StatusCode, [(&'static str, String); 1], Bytes) {
    (
        StatusCode::CREATED,
        [("x-body-len", body.len().to_string())],
        body,
    )
}

/// Backend stub on `127.0.0.1:0`. Every request it receives bumps `hits`;
/// paths without a handler answer 404.
pub async fn start_backend() -> Backend {
    let hits = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&hits);

    let router = Router::new()
        .route("/test", get(ok_json))
        .route("/slow", get(slow))
        .route("/error", get(error))
        .route("/query", get(query))
        .route("/headers", get(echo_headers))
        .route("/echo", post(echo_body))
        .layer(DefaultBodyLimit::disable())
        .layer(MapRequestLayer::new(move |req: Request| {
            counter.fetch_add(1, Ordering::SeqCst);
            req
        }));

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });

    Backend { addr, hits }
}

/// Raw TCP backend: reads the request, writes `reply` as-is, then keeps
/// the connection open for `hold` before dropping it.
pub async fn start_raw_backend(reply: &'static [u8], hold: Duration) -> SocketAddr {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        loop {
            let Ok((mut stream, _)) = listener.accept().await else {
                return;
            };
            tokio::spawn(async move {
                let mut buf = [0u8; 4096];
                let _ = stream.read(&mut buf).await;
                let _ = stream.write_all(reply).await;
                let _ = stream.flush().await;
                tokio::time::sleep(hold).await;
            });
        }
    });
    addr
}

/// A port with nothing listening on it.
pub async fn closed_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    listener.local_addr().unwrap().port()
}

pub async fn start_proxy(routes: Vec<RouteSpec>) -> (SocketAddr, oneshot::Sender<()>) {
    start_proxy_with_limit(routes, 1_048_576).await
}

pub async fn start_proxy_with_limit(
    routes: Vec<RouteSpec>,
    max_body: usize,
) -> (SocketAddr, oneshot::Sender<()>) {
    let table = RouteTable::build(routes).unwrap();
    let state = Arc::new(AppState::new(table).unwrap());
    let router = server::build_router(state, max_body);

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        server::serve(listener, router, async {
            let _ = shutdown_rx.await;
        })
        .await
        .unwrap();
    });

    (addr, shutdown_tx)
}
