use async_trait::async_trait;
use tracing::{debug, warn};

use super::EventRelay;
use crate::models::event::EventKind;

/// FormSubmit-shaped transport: the endpoint is keyed by a single form
/// identifier and the event fields are posted flat, with a subject line
/// derived from the event kind.
pub struct FormSubmitRelay {
    client: reqwest::Client,
    api_base: String,
    form_id: String,
}

impl FormSubmitRelay {
    pub fn new(api_base: String, form_id: String) -> Self {
        Self {
            client: super::http_client(),
            api_base,
            form_id,
        }
    }

    fn build_body(kind: EventKind, payload: &serde_json::Value) -> serde_json::Value {
        let mut body = match payload {
            serde_json::Value::Object(map) => serde_json::Value::Object(map.clone()),
            other => serde_json::json!({ "payload": other }),
        };
        body["_subject"] = serde_json::Value::String(format!("New {} received", kind));
        body["_template"] = serde_json::Value::String("table".to_string());
        body
    }
}

#[async_trait]
impl EventRelay for FormSubmitRelay {
    async fn relay(&self, kind: EventKind, payload: &serde_json::Value) -> bool {
        let url = format!("{}/ajax/{}", self.api_base, self.form_id);
        let body = Self::build_body(kind, payload);

        match self.client.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(kind = %kind, status = %resp.status(), "formsubmit relay delivered");
                true
            }
            Ok(resp) => {
                warn!(kind = %kind, status = %resp.status(), "formsubmit relay rejected");
                false
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "formsubmit relay request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn body_is_flat_with_subject() {
        let payload = serde_json::json!({ "donor": "A. Visitor", "amount": 2500 });
        let body = FormSubmitRelay::build_body(EventKind::Donation, &payload);
        assert_eq!(body["donor"], "A. Visitor");
        assert_eq!(body["amount"], 2500);
        assert_eq!(body["_subject"], "New donation received");
    }

    #[test]
    fn non_object_payload_is_wrapped() {
        let body = FormSubmitRelay::build_body(EventKind::Order, &serde_json::json!("bare"));
        assert_eq!(body["payload"], "bare");
        assert_eq!(body["_subject"], "New order received");
    }
}
