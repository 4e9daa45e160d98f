use std::collections::HashMap;
use std::time::Duration;

use anyhow::Context;
use serde::Deserialize;

use crate::models::checkout::LineItem;

/// Thin client for the payment platform's hosted Checkout Sessions API.
///
/// All financial logic lives on the platform side; this client only creates
/// sessions and passes the returned id + redirect URL through verbatim. One
/// outbound call per request, no retry.
#[derive(Clone)]
pub struct StripeClient {
    client: reqwest::Client,
    api_base: String,
    secret_key: String,
}

/// Everything needed for one session-creation call.
pub struct SessionParams {
    pub line_items: Vec<LineItem>,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,
    pub customer_email: Option<String>,
    pub metadata: HashMap<String, String>,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutSession {
    pub id: String,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct ApiError {
    error: ApiErrorBody,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    message: Option<String>,
}

impl StripeClient {
    pub fn new(api_base: impl Into<String>, secret_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::builder()
                .timeout(Duration::from_secs(10))
                .user_agent("Givegate-Checkout/1.0")
                .build()
                .expect("failed to build payment HTTP client"),
            api_base: api_base.into(),
            secret_key: secret_key.into(),
        }
    }

    /// Creates one hosted checkout session. The caller has already validated
    /// the line items.
    pub async fn create_session(&self, params: SessionParams) -> anyhow::Result<CheckoutSession> {
        let url = format!("{}/v1/checkout/sessions", self.api_base);
        let form = encode_session_form(&params);

        let resp = self
            .client
            .post(&url)
            .basic_auth(&self.secret_key, None::<&str>)
            .form(&form)
            .send()
            .await
            .context("checkout session request failed")?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&body)
                .ok()
                .and_then(|e| e.error.message)
                .unwrap_or(body);
            anyhow::bail!("payment platform returned {}: {}", status, detail);
        }

        resp.json::<CheckoutSession>()
            .await
            .context("checkout session response was not the expected shape")
    }
}

/// The platform expects `application/x-www-form-urlencoded` with indexed
/// bracket keys for nested fields.
fn encode_session_form(params: &SessionParams) -> Vec<(String, String)> {
    let mut form = vec![
        ("mode".to_string(), "payment".to_string()),
        ("success_url".to_string(), params.success_url.clone()),
        ("cancel_url".to_string(), params.cancel_url.clone()),
    ];

    if let Some(email) = &params.customer_email {
        form.push(("customer_email".to_string(), email.clone()));
    }

    for (i, item) in params.line_items.iter().enumerate() {
        form.push((
            format!("line_items[{}][price_data][currency]", i),
            params.currency.clone(),
        ));
        form.push((
            format!("line_items[{}][price_data][product_data][name]", i),
            item.name.clone(),
        ));
        form.push((
            format!("line_items[{}][price_data][unit_amount]", i),
            item.unit_amount.to_string(),
        ));
        form.push((format!("line_items[{}][quantity]", i), item.quantity.to_string()));
    }

    for (key, value) in &params.metadata {
        form.push((format!("metadata[{}]", key), value.clone()));
    }

    form
}
