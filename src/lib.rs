//! Givegate — donation & event gateway for a nonprofit site.
//!
//! Three concerns: hosted checkout session initiation, a bounded journal of
//! site events for the operator dashboard, and best-effort email relay of
//! each event. Exposed as a library so integration tests in `tests/` can
//! exercise the router and clients directly.

pub mod api;
pub mod cli;
pub mod config;
pub mod errors;
pub mod models;
pub mod notification;
pub mod payments;
pub mod store;

use std::sync::Arc;

use config::Config;
use notification::EventRelay;
use payments::stripe::StripeClient;
use store::journal::EventJournal;

/// Shared application state passed to handlers and middleware.
pub struct AppState {
    pub journal: EventJournal,
    pub stripe: StripeClient,
    pub relay: Arc<dyn EventRelay>,
    pub config: Config,
}

impl AppState {
    pub fn from_config(config: Config) -> Self {
        Self {
            journal: EventJournal::open(&config.journal_path, config.journal_capacity),
            stripe: StripeClient::new(
                config.stripe_api_base.clone(),
                config.stripe_secret_key.clone(),
            ),
            relay: notification::from_config(&config),
            config,
        }
    }
}
