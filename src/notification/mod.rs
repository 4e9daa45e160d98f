//! Best-effort email relay for new site events.
//!
//! Two provider integrations exist with incompatible request shapes; the
//! active transport is chosen once by configuration. Delivery is at-most-once
//! with no retry and no queue — the event journal is the only durable trace
//! of an event if the relay silently fails, so callers persist to the journal
//! before (or independently of) relaying.

pub mod emailjs;
pub mod formsubmit;

use std::sync::Arc;

use async_trait::async_trait;

use crate::config::{Config, RelayProvider};
use crate::models::event::EventKind;

/// Fire-and-forget delivery of an event summary to an external email relay.
#[async_trait]
pub trait EventRelay: Send + Sync {
    /// Posts `payload` once. Returns a success flag derived solely from the
    /// HTTP status; network failure and remote rejection are not
    /// distinguished.
    async fn relay(&self, kind: EventKind, payload: &serde_json::Value) -> bool;
}

/// Used when no relay provider is configured; events stay journal-only.
pub struct NoopRelay;

#[async_trait]
impl EventRelay for NoopRelay {
    async fn relay(&self, kind: EventKind, _payload: &serde_json::Value) -> bool {
        tracing::debug!(kind = %kind, "no relay provider configured, skipping notification");
        false
    }
}

/// Builds the configured transport.
pub fn from_config(cfg: &Config) -> Arc<dyn EventRelay> {
    match cfg.relay_provider {
        RelayProvider::EmailJs => Arc::new(emailjs::EmailJsRelay::new(
            cfg.emailjs_api_base.clone(),
            cfg.emailjs_service_id.clone(),
            cfg.emailjs_template_id.clone(),
            cfg.emailjs_public_key.clone(),
        )),
        RelayProvider::FormSubmit => Arc::new(formsubmit::FormSubmitRelay::new(
            cfg.formsubmit_api_base.clone(),
            cfg.formsubmit_form_id.clone(),
        )),
        RelayProvider::None => Arc::new(NoopRelay),
    }
}

/// Shared outbound client: short timeout, identified user agent.
pub(crate) fn http_client() -> reqwest::Client {
    reqwest::Client::builder()
        .timeout(std::time::Duration::from_secs(10))
        .user_agent("Givegate-Relay/1.0")
        .build()
        .expect("failed to build relay HTTP client")
}
