use crate::store::journal;

/// Which email-relay transport is active. Exactly one; there is no fallback
/// chain between providers. Accepted spellings are defined solely by
/// [`parse_relay_provider`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RelayProvider {
    EmailJs,
    FormSubmit,
    None,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub port: u16,
    /// Shared secret for the operator dashboard API.
    pub admin_key: String,
    /// Where the event journal JSON document lives.
    pub journal_path: String,
    pub journal_capacity: usize,

    pub stripe_secret_key: String,
    pub stripe_api_base: String,
    pub currency: String,
    pub success_url: String,
    pub cancel_url: String,

    pub relay_provider: RelayProvider,
    pub emailjs_api_base: String,
    pub emailjs_service_id: String,
    pub emailjs_template_id: String,
    pub emailjs_public_key: String,
    pub formsubmit_api_base: String,
    pub formsubmit_form_id: String,
}

pub fn load() -> anyhow::Result<Config> {
    dotenvy::dotenv().ok();

    let admin_key =
        std::env::var("GIVEGATE_ADMIN_KEY").unwrap_or_else(|_| "CHANGE_ME_ADMIN_KEY".into());

    if admin_key == "CHANGE_ME_ADMIN_KEY" {
        let env_mode = std::env::var("GIVEGATE_ENV")
            .or_else(|_| std::env::var("RUST_ENV"))
            .unwrap_or_default();
        if env_mode == "production" {
            anyhow::bail!(
                "GIVEGATE_ADMIN_KEY is still the insecure placeholder. \
                 Set a proper secret before running in production."
            );
        }
        eprintln!("⚠️  GIVEGATE_ADMIN_KEY is not set — using insecure placeholder. Set a real secret for production.");
    }

    let relay_provider =
        parse_relay_provider(&std::env::var("GIVEGATE_RELAY_PROVIDER").unwrap_or_default())?;

    Ok(Config {
        port: std::env::var("GIVEGATE_PORT")
            .unwrap_or_else(|_| "8080".into())
            .parse()
            .unwrap_or(8080),
        admin_key,
        journal_path: std::env::var("GIVEGATE_JOURNAL_PATH")
            .unwrap_or_else(|_| "data/events.json".into()),
        journal_capacity: std::env::var("GIVEGATE_JOURNAL_CAPACITY")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(journal::DEFAULT_CAPACITY),
        stripe_secret_key: std::env::var("STRIPE_SECRET_KEY").unwrap_or_default(),
        stripe_api_base: std::env::var("STRIPE_API_BASE")
            .unwrap_or_else(|_| "https://api.stripe.com".into()),
        currency: std::env::var("GIVEGATE_CURRENCY").unwrap_or_else(|_| "usd".into()),
        success_url: std::env::var("GIVEGATE_SUCCESS_URL").unwrap_or_else(|_| {
            "http://localhost:3000/thank-you?session_id={CHECKOUT_SESSION_ID}".into()
        }),
        cancel_url: std::env::var("GIVEGATE_CANCEL_URL")
            .unwrap_or_else(|_| "http://localhost:3000/".into()),
        relay_provider,
        emailjs_api_base: std::env::var("EMAILJS_API_BASE")
            .unwrap_or_else(|_| "https://api.emailjs.com".into()),
        emailjs_service_id: std::env::var("EMAILJS_SERVICE_ID").unwrap_or_default(),
        emailjs_template_id: std::env::var("EMAILJS_TEMPLATE_ID").unwrap_or_default(),
        emailjs_public_key: std::env::var("EMAILJS_PUBLIC_KEY").unwrap_or_default(),
        formsubmit_api_base: std::env::var("FORMSUBMIT_API_BASE")
            .unwrap_or_else(|_| "https://formsubmit.co".into()),
        formsubmit_form_id: std::env::var("FORMSUBMIT_FORM_ID").unwrap_or_default(),
    })
}

fn parse_relay_provider(raw: &str) -> anyhow::Result<RelayProvider> {
    match raw.to_lowercase().as_str() {
        "emailjs" => Ok(RelayProvider::EmailJs),
        "formsubmit" => Ok(RelayProvider::FormSubmit),
        "" | "none" => Ok(RelayProvider::None),
        other => anyhow::bail!(
            "GIVEGATE_RELAY_PROVIDER must be 'emailjs', 'formsubmit', or unset (got '{}')",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn relay_provider_accepts_known_spellings() {
        assert_eq!(
            parse_relay_provider("emailjs").unwrap(),
            RelayProvider::EmailJs
        );
        assert_eq!(
            parse_relay_provider("FormSubmit").unwrap(),
            RelayProvider::FormSubmit
        );
        assert_eq!(parse_relay_provider("").unwrap(), RelayProvider::None);
        assert_eq!(parse_relay_provider("none").unwrap(), RelayProvider::None);
    }

    #[test]
    fn relay_provider_rejects_unknown_spellings() {
        assert!(parse_relay_provider("smtp").is_err());
    }
}

