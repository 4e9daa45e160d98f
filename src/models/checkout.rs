use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::errors::AppError;

/// One purchasable item in a checkout request. `unit_amount` is in the
/// currency's minor units (cents).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LineItem {
    pub name: String,
    pub unit_amount: i64,
    pub quantity: u32,
}

#[derive(Debug, Deserialize)]
pub struct CheckoutRequest {
    pub items: Vec<LineItem>,
    pub customer_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl CheckoutRequest {
    /// Rejects empty carts, non-positive prices/quantities, and carts whose
    /// total does not fit in `i64`, before any outbound call is made.
    pub fn validate(&self) -> Result<(), AppError> {
        if self.items.is_empty() {
            return Err(AppError::EmptyCart);
        }
        let mut total: i64 = 0;
        for item in &self.items {
            if item.quantity == 0 {
                return Err(AppError::InvalidLineItem {
                    reason: format!("item '{}' has zero quantity", item.name),
                });
            }
            if item.unit_amount <= 0 {
                return Err(AppError::InvalidLineItem {
                    reason: format!("item '{}' has a non-positive price", item.name),
                });
            }
            total = item
                .unit_amount
                .checked_mul(i64::from(item.quantity))
                .and_then(|line| total.checked_add(line))
                .ok_or_else(|| AppError::InvalidLineItem {
                    reason: format!("item '{}' overflows the cart total", item.name),
                })?;
        }
        Ok(())
    }

    /// Cart total in minor units. Callers validate first, so the sum fits.
    pub fn total(&self) -> i64 {
        self.items
            .iter()
            .map(|i| i.unit_amount.saturating_mul(i64::from(i.quantity)))
            .fold(0, i64::saturating_add)
    }
}

#[derive(Debug, Deserialize)]
pub struct DonationRequest {
    /// Donation amount in minor units.
    pub amount: i64,
    pub donor_email: Option<String>,
    #[serde(default)]
    pub metadata: HashMap<String, String>,
}

impl DonationRequest {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.amount <= 0 {
            return Err(AppError::InvalidAmount);
        }
        Ok(())
    }
}

/// Session id + hosted redirect URL, passed through from the platform verbatim.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: String,
    pub url: String,
}
