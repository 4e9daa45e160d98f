use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, warn};

use super::EventRelay;
use crate::models::event::EventKind;

/// EmailJS-shaped transport: the request is keyed by service, template, and
/// public-key identifiers, with the event fields as template parameters.
pub struct EmailJsRelay {
    client: reqwest::Client,
    api_base: String,
    service_id: String,
    template_id: String,
    public_key: String,
}

#[derive(Serialize)]
struct SendRequest<'a> {
    service_id: &'a str,
    template_id: &'a str,
    user_id: &'a str,
    template_params: &'a serde_json::Value,
}

impl EmailJsRelay {
    pub fn new(
        api_base: String,
        service_id: String,
        template_id: String,
        public_key: String,
    ) -> Self {
        Self {
            client: super::http_client(),
            api_base,
            service_id,
            template_id,
            public_key,
        }
    }
}

#[async_trait]
impl EventRelay for EmailJsRelay {
    async fn relay(&self, kind: EventKind, payload: &serde_json::Value) -> bool {
        let url = format!("{}/api/v1.0/email/send", self.api_base);
        let body = SendRequest {
            service_id: &self.service_id,
            template_id: &self.template_id,
            user_id: &self.public_key,
            template_params: payload,
        };

        match self.client.post(&url).json(&body).send().await {
            Ok(resp) if resp.status().is_success() => {
                debug!(kind = %kind, status = %resp.status(), "emailjs relay delivered");
                true
            }
            Ok(resp) => {
                warn!(kind = %kind, status = %resp.status(), "emailjs relay rejected");
                false
            }
            Err(e) => {
                warn!(kind = %kind, error = %e, "emailjs relay request failed");
                false
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_body_carries_provider_identifiers() {
        let params = serde_json::json!({ "name": "A. Visitor" });
        let body = SendRequest {
            service_id: "service_abc",
            template_id: "template_xyz",
            user_id: "pk_123",
            template_params: &params,
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["service_id"], "service_abc");
        assert_eq!(json["template_id"], "template_xyz");
        assert_eq!(json["user_id"], "pk_123");
        assert_eq!(json["template_params"]["name"], "A. Visitor");
    }
}
