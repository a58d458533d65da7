use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::body::Body;
use axum::extract::Query;
use axum::http::{Request, StatusCode};
use axum::response::Response;
use axum::routing::get as route_get;
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;

use teleport_api::config::ServerConfig;
use teleport_api::router::build_app_router;
use teleport_api::state::AppState;

/// Query strings received by the fake teleport.io, in arrival order.
pub type Recorded = Arc<Mutex<Vec<HashMap<String, String>>>>;

pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF";

/// Build a test `ServerConfig` pointing both teleport.io hosts at `upstream`.
pub fn test_config(upstream: &str) -> ServerConfig {
    ServerConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        feed_id: "testfeed".to_string(),
        teleport_api_url: upstream.to_string(),
        teleport_video_url: upstream.to_string(),
        ..ServerConfig::default()
    }
}

/// Build the full application router with all middleware layers.
pub fn build_test_app(upstream: &str) -> Router {
    build_test_app_with(test_config(upstream))
}

/// Like [`build_test_app`], with a caller-tuned configuration.
pub fn build_test_app_with(config: ServerConfig) -> Router {
    let teleport = config.teleport_client().connect().unwrap();
    let state = AppState {
        config: Arc::new(config.clone()),
        teleport: Arc::new(teleport),
    };
    build_app_router(state, &config).unwrap()
}

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// Fake teleport.io route that records query parameters and answers
/// with a fixed status and body.
pub fn upstream_route(path: &str, status: StatusCode, body: Vec<u8>) -> (Router, Recorded) {
    let recorded = Recorded::default();
    let sink = Arc::clone(&recorded);

    let router = Router::new().route(
        path,
        route_get(move |Query(params): Query<HashMap<String, String>>| {
            let sink = Arc::clone(&sink);
            let body = body.clone();
            async move {
                sink.lock().unwrap().push(params);
                (status, body)
            }
        }),
    );

    (router, recorded)
}

/// Fake teleport.io route that waits `delay` before answering 200 with `body`.
pub fn slow_upstream_route(path: &str, delay: Duration, body: Vec<u8>) -> Router {
    Router::new().route(
        path,
        route_get(move || {
            let body = body.clone();
            async move {
                tokio::time::sleep(delay).await;
                (StatusCode::OK, body)
            }
        }),
    )
}

/// Fake `frame-get` that answers 200 with [`JPEG_BYTES`].
pub async fn jpeg_upstream() -> (String, Recorded) {
    let (router, recorded) = upstream_route("/api/v2/frame-get", StatusCode::OK, JPEG_BYTES.to_vec());
    (spawn_upstream(router).await, recorded)
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Send a GET request through the router.
pub async fn get(app: Router, uri: &str) -> Response {
    let request = Request::builder()
        .uri(uri)
        .body(Body::empty())
        .unwrap();
    app.oneshot(request).await.unwrap()
}

/// Collect a response body into bytes.
pub async fn body_bytes(response: Response) -> Vec<u8> {
    response
        .into_body()
        .collect()
        .await
        .unwrap()
        .to_bytes()
        .to_vec()
}

/// Collect a response body and parse it as JSON.
pub async fn body_json(response: Response) -> serde_json::Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}

/// The most recent query the fake upstream received.
pub fn last_request(recorded: &Recorded) -> HashMap<String, String> {
    recorded
        .lock()
        .unwrap()
        .last()
        .cloned()
        .expect("upstream received no request")
}
