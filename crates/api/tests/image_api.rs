//! Integration tests for the `/image` routes against a fake teleport.io.

mod common;

use std::time::Duration;

use axum::http::StatusCode;
use chrono::Utc;
use teleport_api::config::ServerConfig;
use common::{body_bytes, body_json, get, jpeg_upstream, last_request, JPEG_BYTES};
use teleport_core::time::parse_wire_timestamp;

// ---------------------------------------------------------------------------
// GET /image/current
// ---------------------------------------------------------------------------

#[tokio::test]
async fn current_image_returns_jpeg() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/current").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    assert_eq!(body_bytes(response).await, JPEG_BYTES);

    let query = last_request(&recorded);
    assert_eq!(query["feedid"], "testfeed");
    assert_eq!(query["sizecode"], "x768");
    assert!(!query.contains_key("frametime"));
}

#[tokio::test]
async fn current_image_small_size() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/current?size=small").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(last_request(&recorded)["sizecode"], "x480");
}

#[tokio::test]
async fn unknown_size_returns_400() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/current?size=medium").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "BAD_REQUEST");
    assert!(recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn current_image_unknown_feed_returns_502() {
    let (router, _) = common::upstream_route("/api/v2/frame-get", StatusCode::NOT_FOUND, Vec::new());
    let upstream = common::spawn_upstream(router).await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/current").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_ERROR");
}

#[tokio::test]
async fn upstream_server_error_returns_502() {
    let (router, _) = common::upstream_route(
        "/api/v2/frame-get",
        StatusCode::INTERNAL_SERVER_ERROR,
        b"boom".to_vec(),
    );
    let upstream = common::spawn_upstream(router).await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/current").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
    let json = body_json(response).await;
    assert_eq!(json["code"], "UPSTREAM_ERROR");
    assert!(!json.to_string().contains("boom"));
}

#[tokio::test]
async fn slow_upstream_returns_504() {
    let router = common::slow_upstream_route(
        "/api/v2/frame-get",
        Duration::from_secs(3),
        JPEG_BYTES.to_vec(),
    );
    let upstream = common::spawn_upstream(router).await;
    let app = common::build_test_app_with(ServerConfig {
        request_timeout_secs: 2,
        teleport_timeout_secs: 1,
        ..common::test_config(&upstream)
    });

    let response = get(app, "/image/at?hour=8&date=2025-06-15").await;

    assert_eq!(response.status(), StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body_json(response).await["code"], "UPSTREAM_TIMEOUT");
}

#[tokio::test]
async fn unreachable_upstream_returns_502() {
    let app = common::build_test_app(&common::closed_port_url().await);

    let response = get(app, "/image/current").await;

    assert_eq!(response.status(), StatusCode::BAD_GATEWAY);
}

// ---------------------------------------------------------------------------
// GET /image/at
// ---------------------------------------------------------------------------

#[tokio::test]
async fn image_at_with_date_converts_local_time_to_utc() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    // Zurich is UTC+2 in June.
    let response = get(app, "/image/at?hour=8&date=2025-06-15").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(response.headers()["content-type"], "image/jpeg");
    let query = last_request(&recorded);
    assert_eq!(query["frametime"], "2025-06-15T06:00:00Z");
    assert_eq!(query["sizecode"], "x768");
}

#[tokio::test]
async fn image_at_winter_minute_and_size() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    // Zurich is UTC+1 in January.
    let response = get(app, "/image/at?hour=8&minute=30&date=2025-01-15&size=small").await;

    assert_eq!(response.status(), StatusCode::OK);
    let query = last_request(&recorded);
    assert_eq!(query["frametime"], "2025-01-15T07:30:00Z");
    assert_eq!(query["sizecode"], "x480");
}

#[tokio::test]
async fn image_at_without_date_never_asks_for_the_future() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/at?hour=23&minute=59").await;

    assert_eq!(response.status(), StatusCode::OK);
    let frametime = parse_wire_timestamp(&last_request(&recorded)["frametime"]).unwrap();
    assert!(frametime <= Utc::now());
    assert!(Utc::now() - frametime < chrono::Duration::days(1));
}

#[tokio::test]
async fn image_at_bad_date_returns_400() {
    let (upstream, _) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/at?hour=8&date=15-06-2025").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert_eq!(json["code"], "VALIDATION_ERROR");
    assert_eq!(json["error"], "Invalid date format. Use YYYY-MM-DD");
}

#[tokio::test]
async fn image_at_out_of_range_hour_returns_400() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/at?hour=24").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(recorded.lock().unwrap().is_empty());
}

#[tokio::test]
async fn image_at_missing_hour_returns_400() {
    let (upstream, _) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/at?minute=15").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(body_json(response).await["code"], "BAD_REQUEST");
}

#[tokio::test]
async fn image_at_missing_frame_returns_404() {
    let (router, _) = common::upstream_route("/api/v2/frame-get", StatusCode::NOT_FOUND, Vec::new());
    let upstream = common::spawn_upstream(router).await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/at?hour=8&date=2025-06-15").await;

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert_eq!(json["code"], "FRAME_NOT_AVAILABLE");
    assert!(json["error"].as_str().unwrap().contains("testfeed"));
}

// ---------------------------------------------------------------------------
// Shortcuts
// ---------------------------------------------------------------------------

#[tokio::test]
async fn morning_shortcut_requests_8am_local() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/8am?date=2025-06-15").await;

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(last_request(&recorded)["frametime"], "2025-06-15T06:00:00Z");
}

#[tokio::test]
async fn noon_shortcut_requests_12pm_local() {
    let (upstream, recorded) = jpeg_upstream().await;
    let app = common::build_test_app(&upstream);

    let response = get(app, "/image/noon?date=2025-12-01&size=small").await;

    assert_eq!(response.status(), StatusCode::OK);
    let query = last_request(&recorded);
    assert_eq!(query["frametime"], "2025-12-01T11:00:00Z");
    assert_eq!(query["sizecode"], "x480");
}
