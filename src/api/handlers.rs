use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use serde_json::json;

use crate::errors::AppError;
use crate::models::checkout::{CheckoutRequest, DonationRequest, LineItem, SessionResponse};
use crate::models::event::{EventKind, EventRecord};
use crate::payments::stripe::SessionParams;
use crate::AppState;

// ── Request DTOs ─────────────────────────────────────────────

#[derive(Deserialize)]
pub struct RecordEventRequest {
    pub kind: EventKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub data: serde_json::Value,
}

// ── Event intake ─────────────────────────────────────────────

/// POST /api/v1/events — record a site event and relay a copy.
///
/// The journal write happens before the relay attempt; the relay is
/// fire-and-forget and its outcome never reaches the caller.
pub async fn record_event(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RecordEventRequest>,
) -> (StatusCode, Json<EventRecord>) {
    let record = EventRecord::new(payload.kind, payload.title, payload.message, payload.data);
    state.journal.record(record.clone()).await;
    spawn_relay(&state, record.kind, relay_payload(&record));
    (StatusCode::CREATED, Json(record))
}

// ── Checkout / donation session initiators ──────────────────

/// POST /api/v1/checkout — create a hosted checkout session for a cart.
pub async fn create_checkout(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<CheckoutRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate()?;

    let total = payload.total();
    let session = state
        .stripe
        .create_session(SessionParams {
            line_items: payload.items.clone(),
            currency: state.config.currency.clone(),
            success_url: state.config.success_url.clone(),
            cancel_url: state.config.cancel_url.clone(),
            customer_email: payload.customer_email.clone(),
            metadata: payload.metadata.clone(),
        })
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    let record = EventRecord::new(
        EventKind::Order,
        "New order",
        format!(
            "Order of {} item(s) totaling {}",
            payload.items.len(),
            format_amount(total, &state.config.currency),
        ),
        json!({
            "items": payload.items,
            "total": total,
            "customer_email": payload.customer_email,
            "metadata": payload.metadata,
            "session_id": session.id,
        }),
    );
    state.journal.record(record.clone()).await;
    spawn_relay(&state, EventKind::Order, relay_payload(&record));

    Ok(Json(SessionResponse {
        session_id: session.id,
        url: session.url,
    }))
}

/// POST /api/v1/donations — create a hosted checkout session for a donation.
pub async fn create_donation(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<DonationRequest>,
) -> Result<Json<SessionResponse>, AppError> {
    payload.validate()?;

    let session = state
        .stripe
        .create_session(SessionParams {
            line_items: vec![LineItem {
                name: "Donation".to_string(),
                unit_amount: payload.amount,
                quantity: 1,
            }],
            currency: state.config.currency.clone(),
            success_url: state.config.success_url.clone(),
            cancel_url: state.config.cancel_url.clone(),
            customer_email: payload.donor_email.clone(),
            metadata: payload.metadata.clone(),
        })
        .await
        .map_err(|e| AppError::Payment(e.to_string()))?;

    let record = EventRecord::new(
        EventKind::Donation,
        "New donation",
        format!(
            "{} donation",
            format_amount(payload.amount, &state.config.currency)
        ),
        json!({
            "amount": payload.amount,
            "donor_email": payload.donor_email,
            "metadata": payload.metadata,
            "session_id": session.id,
        }),
    );
    state.journal.record(record.clone()).await;
    spawn_relay(&state, EventKind::Donation, relay_payload(&record));

    Ok(Json(SessionResponse {
        session_id: session.id,
        url: session.url,
    }))
}

// ── Dashboard handlers ───────────────────────────────────────

/// GET /api/v1/admin/events — full journal snapshot, newest-first.
pub async fn list_events(State(state): State<Arc<AppState>>) -> Json<Vec<EventRecord>> {
    Json(state.journal.list().await)
}

/// GET /api/v1/admin/events/unread — count unread.
pub async fn count_unread_events(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let count = state.journal.unread_count().await;
    Json(json!({ "count": count }))
}

/// POST /api/v1/admin/events/:id/read — mark one event as read.
pub async fn mark_event_read(
    State(state): State<Arc<AppState>>,
    Path(id_str): Path<String>,
) -> Result<Json<serde_json::Value>, StatusCode> {
    let id: i64 = id_str.parse().map_err(|_| StatusCode::BAD_REQUEST)?;
    let updated = state.journal.mark_read(id).await;
    Ok(Json(json!({ "updated": updated })))
}

/// POST /api/v1/admin/events/read-all — mark every event as read.
pub async fn mark_all_events_read(State(state): State<Arc<AppState>>) -> Json<serde_json::Value> {
    let updated = state.journal.mark_all_read().await;
    Json(json!({ "updated": updated }))
}

// ── Helpers ──────────────────────────────────────────────────

/// Flat key/value summary handed to the relay transport.
fn relay_payload(record: &EventRecord) -> serde_json::Value {
    json!({
        "event": record.kind,
        "title": record.title,
        "message": record.message,
        "details": record.data.to_string(),
        "received_at": record.created_at.to_rfc3339(),
    })
}

fn spawn_relay(state: &Arc<AppState>, kind: EventKind, payload: serde_json::Value) {
    let relay = state.relay.clone();
    tokio::spawn(async move {
        if !relay.relay(kind, &payload).await {
            tracing::warn!(kind = %kind, "event relay failed, journal entry is the only trace");
        }
    });
}

fn format_amount(minor_units: i64, currency: &str) -> String {
    format!(
        "{}.{:02} {}",
        minor_units / 100,
        minor_units % 100,
        currency.to_uppercase()
    )
}
