use super::*;

use std::{collections::HashMap, sync::Arc};

use axum::{
    extract::{Query, State},
    http::{HeaderMap, StatusCode},
    routing::get,
    Json, Router,
};
use serde_json::json;
use shared::error::FetchErrorKind;
use tokio::{net::TcpListener, sync::Mutex};

use crate::{ordering::OrderingKey, request::build_request};

#[derive(Debug, Clone)]
struct ReceivedRequest {
    params: HashMap<String, String>,
    cookie: Option<String>,
}

#[derive(Clone, Default)]
struct ServerState {
    received: Arc<Mutex<Vec<ReceivedRequest>>>,
}

async fn list_courses(
    State(state): State<ServerState>,
    Query(params): Query<HashMap<String, String>>,
    headers: HeaderMap,
) -> Json<serde_json::Value> {
    let cookie = headers
        .get("cookie")
        .and_then(|value| value.to_str().ok())
        .map(str::to_string);
    state
        .received
        .lock()
        .await
        .push(ReceivedRequest { params, cookie });

    Json(json!({
        "count": 2,
        "next": null,
        "previous": null,
        "results": [
            {
                "id": 1,
                "course_id": "course-v1:edX+DemoX+Demo_Course",
                "course_name": "Demonstration Course",
                "course_code": "DemoX",
                "org": "edX",
                "start_date": "2021-01-01T00:00:00Z",
                "end_date": null,
                "self_paced": false,
                "staff": [],
                "metrics": {
                    "date_for": "2021-02-01",
                    "enrollment_count": 130,
                    "num_learners_completed": 12
                }
            },
            {
                "id": 2,
                "course_id": "course-v1:edX+Intro+2020",
                "course_name": "Intro",
                "start_date": null,
                "self_paced": true,
                "metrics": null
            }
        ]
    }))
}

async fn missing_count() -> Json<serde_json::Value> {
    Json(json!({ "results": [] }))
}

async fn not_json() -> &'static str {
    "<html>login required</html>"
}

async fn server_error() -> (StatusCode, &'static str) {
    (StatusCode::INTERNAL_SERVER_ERROR, "boom")
}

async fn slow() -> Json<serde_json::Value> {
    tokio::time::sleep(Duration::from_millis(500)).await;
    Json(json!({ "results": [], "count": 0 }))
}

async fn bind(app: Router) -> String {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{addr}")
}

async fn spawn_listing_server() -> (String, ServerState) {
    std::env::set_var("NO_PROXY", "127.0.0.1,localhost");
    let state = ServerState::default();
    let app = Router::new()
        .route("/api/courses/", get(list_courses))
        .route("/missing-count/", get(missing_count))
        .route("/not-json/", get(not_json))
        .route("/error/", get(server_error))
        .route("/slow/", get(slow))
        .with_state(state.clone());
    (bind(app).await, state)
}

fn request_for(server_url: &str, path: &str, search: &str) -> RequestDescriptor {
    let base = Url::parse(&format!("{server_url}{path}")).expect("url");
    build_request(&base, search, &OrderingKey::default(), 20, 0)
}

fn source_for(server_url: &str, cookie: Option<&str>, timeout: Duration) -> HttpCourseSource {
    let base = Url::parse(&format!("{server_url}/api/courses/")).expect("url");
    HttpCourseSource::new(&base, cookie.map(str::to_string), timeout).expect("source")
}

#[tokio::test]
async fn fetches_and_decodes_a_page() {
    let (server_url, state) = spawn_listing_server().await;
    let source = source_for(&server_url, None, Duration::from_secs(5));

    let page = source
        .fetch_page(&request_for(&server_url, "/api/courses/", "demo course"))
        .await
        .expect("page");

    assert_eq!(page.count, 2);
    assert_eq!(page.results.len(), 2);
    assert_eq!(page.results[0].enrollment_count(), 130);
    assert_eq!(page.results[1].completion_count(), 0);

    let received = state.received.lock().await;
    let params = &received[0].params;
    assert_eq!(params.get("search").map(String::as_str), Some("demo course"));
    assert_eq!(params.get("ordering").map(String::as_str), Some("display_name"));
    assert_eq!(params.get("limit").map(String::as_str), Some("20"));
    assert_eq!(params.get("offset").map(String::as_str), Some("0"));
}

#[tokio::test]
async fn sends_session_cookie_to_the_configured_origin() {
    let (server_url, state) = spawn_listing_server().await;
    let source = source_for(&server_url, Some("sessionid=abc123"), Duration::from_secs(5));

    source
        .fetch_page(&request_for(&server_url, "/api/courses/", ""))
        .await
        .expect("page");

    let received = state.received.lock().await;
    assert_eq!(received[0].cookie.as_deref(), Some("sessionid=abc123"));
}

#[tokio::test]
async fn withholds_session_cookie_from_other_origins() {
    let (configured_url, _) = spawn_listing_server().await;
    let (other_url, other_state) = spawn_listing_server().await;
    let source = source_for(&configured_url, Some("sessionid=abc123"), Duration::from_secs(5));

    source
        .fetch_page(&request_for(&other_url, "/api/courses/", ""))
        .await
        .expect("page");

    let received = other_state.received.lock().await;
    assert_eq!(received.len(), 1);
    assert!(received[0].cookie.is_none());
}

#[tokio::test]
async fn body_without_count_is_malformed() {
    let (server_url, _) = spawn_listing_server().await;
    let source = source_for(&server_url, None, Duration::from_secs(5));

    let err = source
        .fetch_page(&request_for(&server_url, "/missing-count/", ""))
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
    assert!(!err.is_retryable());
}

#[tokio::test]
async fn non_json_body_is_malformed() {
    let (server_url, _) = spawn_listing_server().await;
    let source = source_for(&server_url, None, Duration::from_secs(5));

    let err = source
        .fetch_page(&request_for(&server_url, "/not-json/", ""))
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), FetchErrorKind::MalformedResponse);
}

#[tokio::test]
async fn error_status_is_reported_with_code() {
    let (server_url, _) = spawn_listing_server().await;
    let source = source_for(&server_url, None, Duration::from_secs(5));

    let err = source
        .fetch_page(&request_for(&server_url, "/error/", ""))
        .await
        .expect_err("must fail");

    match err {
        FetchError::Status { status, body } => {
            assert_eq!(status, 500);
            assert_eq!(body, "boom");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_endpoint_times_out() {
    let (server_url, _) = spawn_listing_server().await;
    let source = source_for(&server_url, None, Duration::from_millis(100));

    let err = source
        .fetch_page(&request_for(&server_url, "/slow/", ""))
        .await
        .expect_err("must time out");

    assert_eq!(err.kind(), FetchErrorKind::Timeout);
    assert!(err.is_retryable());
}

#[tokio::test]
async fn unreachable_endpoint_is_a_transport_failure() {
    let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);
    let server_url = format!("http://{addr}");
    let source = source_for(&server_url, None, Duration::from_secs(5));

    let err = source
        .fetch_page(&request_for(&server_url, "/api/courses/", ""))
        .await
        .expect_err("must fail");

    assert_eq!(err.kind(), FetchErrorKind::Transport);
}
