//! Payment-intent creation against the processor's REST API.
//!
//! The processor stays an opaque collaborator: we post an amount and get an
//! opaque client secret back, nothing else of its surface is modelled.

use rust_decimal::Decimal;
use rust_decimal::prelude::ToPrimitive;
use serde::Deserialize;

use crate::config;
use crate::error::Result;

const INTENTS_PATH: &str = "/v1/payment_intents";

/// Convert a price in major currency units into minor units (×100).
///
/// `None` means the intent must not be created: absent price, non-positive
/// price, or a scaled amount below one minor unit.
pub fn minor_units(price: Option<Decimal>) -> Option<i64> {
    let price = price?;
    if price <= Decimal::ZERO {
        return None;
    }

    let amount = (price * Decimal::ONE_HUNDRED).trunc().to_i64()?;
    (amount >= 1).then_some(amount)
}

#[derive(Debug, Deserialize)]
struct Intent {
    client_secret: String,
}

/// Thin client over the processor payment-intent endpoint.
#[derive(Clone)]
pub struct PaymentClient {
    http: reqwest::Client,
    secret_key: String,
    api_base: String,
}

impl std::fmt::Debug for PaymentClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // The secret key stays out of logs.
        f.debug_struct("PaymentClient")
            .field("api_base", &self.api_base)
            .finish_non_exhaustive()
    }
}

impl PaymentClient {
    /// Create a new [`PaymentClient`].
    pub fn new(config: &config::Payment) -> Self {
        Self {
            http: reqwest::Client::new(),
            secret_key: config.secret_key.clone(),
            api_base: config.api_base.clone(),
        }
    }

    /// Create a payment intent and return its client secret verbatim.
    pub async fn create_intent(&self, amount: i64, currency: &str) -> Result<String> {
        let response = self
            .http
            .post(format!("{}{INTENTS_PATH}", self.api_base))
            .bearer_auth(&self.secret_key)
            .form(&[
                ("amount", amount.to_string()),
                ("currency", currency.to_owned()),
                ("payment_method_types[]", "card".to_owned()),
            ])
            .send()
            .await?
            .error_for_status()?;

        let intent: Intent = response.json().await?;
        Ok(intent.client_secret)
    }
}
