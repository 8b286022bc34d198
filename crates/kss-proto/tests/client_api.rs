//! Client ↔ device API contract tests against a local stub server.
//!
//! The stub speaks just enough of the KSS HTTP surface to exercise every
//! client operation, including the failure paths the probes must fold into
//! their sentinels.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::Json;
use axum::routing::{get, post};
use axum::Router;
use serde::Deserialize;

use kss_proto::client::KssClient;
use kss_proto::prefs::{EventTypeConfig, Preferences};
use kss_proto::status::UNREAD_FAILED;

#[derive(Clone, Default)]
struct StubState {
    saved_prefs: Arc<Mutex<Option<Preferences>>>,
    push_tokens: Arc<Mutex<Vec<String>>>,
}

#[derive(Deserialize)]
struct PageQuery {
    page: u32,
    limit: u32,
}

#[derive(Deserialize)]
struct ImageQuery {
    #[serde(rename = "imageId")]
    image_id: i64,
}

#[derive(Deserialize)]
struct PushBody {
    token: String,
}

fn stub_prefs() -> Preferences {
    Preferences {
        input_threshold: 3,
        output_threshold: 6,
        events_config: vec![EventTypeConfig {
            event_name: "fire".into(),
            important: true,
            precision_threshold: 90,
        }],
    }
}

fn stub_router(state: StubState) -> Router {
    Router::new()
        .route("/api/kss/health", get(|| async { StatusCode::OK }))
        .route("/api/kss/events/unread", get(|| async { "7" }))
        .route(
            "/api/kss/events/latest",
            get(|Query(q): Query<PageQuery>| async move {
                // Page 1 carries one fire event with an image; everything
                // beyond is empty, like a device with a short history.
                if q.page == 1 {
                    Json(serde_json::json!([{
                        "id": 1,
                        "date": "2024-01-01",
                        "important": true,
                        "avgConfidence": 0.92,
                        "objects": [{"name": "fire", "count": 1, "avgConfidence": 0.92}],
                        "imageId": 11,
                    }]))
                } else {
                    let _ = q.limit;
                    Json(serde_json::json!([]))
                }
            }),
        )
        .route(
            "/api/kss/events/image",
            get(|Query(q): Query<ImageQuery>| async move {
                (StatusCode::OK, format!("jpeg-bytes-{}", q.image_id).into_bytes())
            }),
        )
        .route(
            "/api/kss/preferences",
            get(|State(s): State<StubState>| async move {
                let saved = s.saved_prefs.lock().unwrap().clone();
                Json(saved.unwrap_or_else(stub_prefs))
            })
            .post(
                |State(s): State<StubState>, Json(p): Json<Preferences>| async move {
                    *s.saved_prefs.lock().unwrap() = Some(p);
                    StatusCode::OK
                },
            ),
        )
        .route(
            "/api/kss/preferences/pushToken",
            post(|State(s): State<StubState>, Json(b): Json<PushBody>| async move {
                s.push_tokens.lock().unwrap().push(b.token);
                StatusCode::OK
            }),
        )
        .with_state(state)
}

/// A device that answers every route with a server error.
fn broken_router() -> Router {
    Router::new().fallback(|| async { StatusCode::INTERNAL_SERVER_ERROR })
}

async fn spawn(app: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind stub server");
    let addr = listener.local_addr().expect("stub server addr");
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
    format!("http://{}", addr)
}

fn client(base: &str) -> KssClient {
    KssClient::new(base, Duration::from_millis(500)).expect("build client")
}

#[tokio::test]
async fn health_probe_maps_status_to_connectivity() {
    let healthy = spawn(stub_router(StubState::default())).await;
    assert!(client(&healthy).check_health().await);

    let broken = spawn(broken_router()).await;
    assert!(!client(&broken).check_health().await);

    // Nothing listening at all — transport failure is also "not connected".
    let gone = client("http://127.0.0.1:1");
    assert!(!gone.check_health().await);
}

#[tokio::test]
async fn unread_probe_parses_and_folds_failures() {
    let base = spawn(stub_router(StubState::default())).await;
    assert_eq!(client(&base).unread_count().await, 7);

    let malformed =
        spawn(Router::new().route("/api/kss/events/unread", get(|| async { "banana" }))).await;
    assert_eq!(client(&malformed).unread_count().await, UNREAD_FAILED);

    let broken = spawn(broken_router()).await;
    assert_eq!(client(&broken).unread_count().await, UNREAD_FAILED);
}

#[tokio::test]
async fn list_events_decodes_and_computes_image_urls() {
    let base = spawn(stub_router(StubState::default())).await;
    let c = client(&base);

    let events = c.list_events(1, 10).await.expect("page 1");
    assert_eq!(events.len(), 1);
    assert!(events[0].important);
    assert_eq!(events[0].objects[0].name, "fire");
    assert_eq!(
        events[0].image_url.as_deref(),
        Some(format!("{}/api/kss/events/image?imageId=11", base).as_str())
    );

    // Out-of-range page is an empty page, not an error.
    let empty = c.list_events(99, 10).await.expect("page 99");
    assert!(empty.is_empty());

    // A broken device is an error, not an empty page.
    let broken = spawn(broken_router()).await;
    assert!(client(&broken).list_events(1, 10).await.is_err());
}

#[tokio::test]
async fn fetch_image_returns_body_bytes() {
    let base = spawn(stub_router(StubState::default())).await;
    let bytes = client(&base).fetch_image(11).await.expect("image bytes");
    assert_eq!(bytes, b"jpeg-bytes-11");
}

#[tokio::test]
async fn preferences_round_trip() {
    let state = StubState::default();
    let base = spawn(stub_router(state.clone())).await;
    let c = client(&base);

    let initial = c.get_preferences().await.expect("initial prefs");
    assert_eq!(initial.input_threshold, 3);
    assert_eq!(initial.events_config[0].event_name, "fire");

    let mut edited = initial.clone();
    edited.set_input_threshold(5);
    assert!(edited.update_event_config("fire", 80, false));
    c.save_preferences(&edited).await.expect("save prefs");

    let reloaded = c.get_preferences().await.expect("reload prefs");
    assert_eq!(reloaded, edited);

    let broken = spawn(broken_router()).await;
    assert!(client(&broken).get_preferences().await.is_err());
    assert!(client(&broken).save_preferences(&edited).await.is_err());
}

#[tokio::test]
async fn push_token_is_forwarded() {
    let state = StubState::default();
    let base = spawn(stub_router(state.clone())).await;
    client(&base)
        .register_push_token("expo-token-abc")
        .await
        .expect("register token");
    assert_eq!(
        state.push_tokens.lock().unwrap().as_slice(),
        ["expo-token-abc".to_string()]
    );
}
