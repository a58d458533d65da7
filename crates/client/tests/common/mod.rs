use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::Query;
use axum::http::StatusCode;
use axum::routing::get;
use axum::Router;

use teleport_client::{TeleportClient, TeleportConnection};

/// Query strings received by a fake endpoint, in arrival order.
pub type Recorded = Arc<Mutex<Vec<HashMap<String, String>>>>;

/// JPEG SOI/APP0 marker followed by a JFIF tag.
pub const JPEG_BYTES: &[u8] = b"\xff\xd8\xff\xe0\x00\x10JFIF";

/// Serve `router` on an ephemeral localhost port and return its base URL.
pub async fn spawn_upstream(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, router).await.unwrap();
    });
    format!("http://{addr}")
}

/// A single GET route that records its query parameters and always
/// answers with `status` and `body`.
pub fn recording_route(path: &str, status: StatusCode, body: Vec<u8>) -> (Router, Recorded) {
    let recorded = Recorded::default();
    let sink = Arc::clone(&recorded);

    let router = Router::new().route(
        path,
        get(move |Query(params): Query<HashMap<String, String>>| {
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

/// A route that waits before answering, for timeout tests.
pub fn slow_route(path: &str, delay: Duration) -> Router {
    Router::new().route(
        path,
        get(move || async move {
            tokio::time::sleep(delay).await;
            (StatusCode::OK, JPEG_BYTES.to_vec())
        }),
    )
}

/// A base URL nothing is listening on.
pub async fn closed_port_url() -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    drop(listener);
    format!("http://{addr}")
}

/// Connect a client whose image and video hosts are both `url`.
pub fn connect(url: &str) -> TeleportConnection {
    TeleportClient::new()
        .with_api_url(url)
        .with_video_url(url)
        .connect()
        .unwrap()
}

/// The single recorded query, panicking if there were zero or several.
pub fn only_request(recorded: &Recorded) -> HashMap<String, String> {
    let requests = recorded.lock().unwrap();
    assert_eq!(requests.len(), 1, "expected exactly one upstream request");
    requests[0].clone()
}
