//! Relay transports against mocked provider endpoints, plus the
//! journal-before-relay guarantee and the admin gate on dashboard routes.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;
use wiremock::matchers::{body_partial_json, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

use givegate::config::{Config, RelayProvider};
use givegate::models::event::EventKind;
use givegate::notification::emailjs::EmailJsRelay;
use givegate::notification::formsubmit::FormSubmitRelay;
use givegate::notification::EventRelay;
use givegate::AppState;

fn base_config() -> Config {
    Config {
        port: 0,
        admin_key: "test-admin-key".into(),
        journal_path: std::env::temp_dir()
            .join(format!("givegate-test-{}.json", uuid::Uuid::new_v4()))
            .to_string_lossy()
            .into_owned(),
        journal_capacity: 100,
        stripe_secret_key: "sk_test_123".into(),
        stripe_api_base: "http://localhost:1".into(),
        currency: "usd".into(),
        success_url: "http://localhost:3000/thank-you".into(),
        cancel_url: "http://localhost:3000/".into(),
        relay_provider: RelayProvider::None,
        emailjs_api_base: String::new(),
        emailjs_service_id: String::new(),
        emailjs_template_id: String::new(),
        emailjs_public_key: String::new(),
        formsubmit_api_base: String::new(),
        formsubmit_form_id: String::new(),
    }
}

// ── Transport wire shapes ────────────────────────────────────

#[tokio::test]
async fn emailjs_relay_posts_provider_identifiers_and_params() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/v1.0/email/send"))
        .and(body_partial_json(serde_json::json!({
            "service_id": "service_abc",
            "template_id": "template_xyz",
            "user_id": "pk_123",
            "template_params": { "title": "New booking" },
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let relay = EmailJsRelay::new(
        server.uri(),
        "service_abc".into(),
        "template_xyz".into(),
        "pk_123".into(),
    );
    let delivered = relay
        .relay(
            EventKind::Booking,
            &serde_json::json!({ "title": "New booking" }),
        )
        .await;
    assert!(delivered);
}

#[tokio::test]
async fn formsubmit_relay_posts_flat_payload_to_form_endpoint() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ajax/form_42"))
        .and(body_partial_json(serde_json::json!({
            "donor": "A. Visitor",
            "_subject": "New donation received",
        })))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;

    let relay = FormSubmitRelay::new(server.uri(), "form_42".into());
    let delivered = relay
        .relay(
            EventKind::Donation,
            &serde_json::json!({ "donor": "A. Visitor" }),
        )
        .await;
    assert!(delivered);
}

#[tokio::test]
async fn relay_success_is_derived_solely_from_http_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ajax/form_42"))
        .respond_with(ResponseTemplate::new(500))
        // No retry: exactly one attempt per relay call.
        .expect(1)
        .mount(&server)
        .await;

    let relay = FormSubmitRelay::new(server.uri(), "form_42".into());
    let delivered = relay.relay(EventKind::Order, &serde_json::json!({})).await;
    assert!(!delivered);
}

// ── Journal-before-relay ─────────────────────────────────────

#[tokio::test]
async fn event_is_journaled_even_when_relay_fails() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/ajax/form_42"))
        .respond_with(ResponseTemplate::new(503))
        .mount(&server)
        .await;

    let mut cfg = base_config();
    cfg.relay_provider = RelayProvider::FormSubmit;
    cfg.formsubmit_api_base = server.uri();
    cfg.formsubmit_form_id = "form_42".into();
    let state = Arc::new(AppState::from_config(cfg));

    let resp = givegate::api::router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/events")
                .header("content-type", "application/json")
                .body(Body::from(
                    serde_json::json!({
                        "kind": "enrollment",
                        "title": "New enrollment",
                        "message": "Course enrollment from a visitor",
                        "data": { "course": "Introductory" },
                    })
                    .to_string(),
                ))
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::CREATED);

    // Let the fire-and-forget relay task run (and fail).
    tokio::time::sleep(std::time::Duration::from_millis(200)).await;

    let events = state.journal.list().await;
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].kind.as_str(), "enrollment");
    assert_eq!(events[0].data["course"], "Introductory");
    assert_eq!(server.received_requests().await.unwrap().len(), 1);
}

// ── Admin gate ───────────────────────────────────────────────

async fn get_admin(state: Arc<AppState>, uri: &str, key: Option<&str>) -> StatusCode {
    let mut builder = Request::builder().method("GET").uri(uri);
    if let Some(k) = key {
        builder = builder.header("x-admin-key", k);
    }
    givegate::api::router(state)
        .oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
        .status()
}

#[tokio::test]
async fn dashboard_routes_require_the_admin_key() {
    let state = Arc::new(AppState::from_config(base_config()));

    assert_eq!(
        get_admin(state.clone(), "/admin/events", None).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        get_admin(state.clone(), "/admin/events", Some("wrong")).await,
        StatusCode::UNAUTHORIZED
    );
    assert_eq!(
        get_admin(state.clone(), "/admin/events", Some("test-admin-key")).await,
        StatusCode::OK
    );
    assert_eq!(
        get_admin(state, "/admin/events/unread", Some("test-admin-key")).await,
        StatusCode::OK
    );
}

#[tokio::test]
async fn mark_read_endpoints_flip_the_flag() {
    let state = Arc::new(AppState::from_config(base_config()));
    state
        .journal
        .record(givegate::models::event::EventRecord::new(
            EventKind::Booking,
            "New booking",
            "test",
            serde_json::json!({}),
        ))
        .await;
    let id = state.journal.list().await[0].id;

    let resp = givegate::api::router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri(format!("/admin/events/{}/read", id))
                .header("x-admin-key", "test-admin-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.journal.unread_count().await, 0);

    // read-all on an all-read journal is a no-op.
    let resp = givegate::api::router(state.clone())
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/admin/events/read-all")
                .header("x-admin-key", "test-admin-key")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(state.journal.unread_count().await, 0);
}
