//! Payment-intent creation against the Stripe gateway

use serde_json::Value;

use crate::{
    config::PaymentsConfig,
    error::{AppError, AppResult},
};

const PAYMENT_INTENTS_URL: &str = "https://api.stripe.com/v1/payment_intents";

#[derive(Clone)]
pub struct PaymentsService {
    client: reqwest::Client,
    config: PaymentsConfig,
}

impl PaymentsService {
    pub fn new(config: PaymentsConfig) -> Self {
        Self {
            client: reqwest::Client::new(),
            config,
        }
    }

    /// Convert a price into the gateway's minor currency unit.
    pub fn amount_from_price(price: f64) -> i64 {
        (price * 100.0).round() as i64
    }

    /// Create a payment intent and return its client secret.
    pub async fn create_payment_intent(&self, amount: i64) -> AppResult<String> {
        let params = [
            ("amount", amount.to_string()),
            ("currency", self.config.currency.clone()),
            ("payment_method_types[]", "card".to_string()),
        ];

        let response = self
            .client
            .post(PAYMENT_INTENTS_URL)
            .bearer_auth(&self.config.stripe_secret_key)
            .form(&params)
            .send()
            .await
            .map_err(|e| AppError::Payment(format!("gateway unreachable: {e}")))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Payment(format!("invalid gateway response: {e}")))?;

        if !status.is_success() {
            let message = body["error"]["message"]
                .as_str()
                .unwrap_or("payment intent creation failed");
            return Err(AppError::Payment(message.to_string()));
        }

        body["client_secret"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::Payment("gateway response missing client_secret".to_string()))
    }
}
