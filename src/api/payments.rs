//! Payment-intent endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{error::AppResult, services::payments::PaymentsService};

#[derive(Deserialize, ToSchema)]
pub struct PaymentIntentRequest {
    /// Price in major currency units; converted to the gateway's minor unit.
    pub price: f64,
}

#[derive(Serialize, ToSchema)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
}

/// Create a payment intent and return its client secret
#[utoipa::path(
    post,
    path = "/create-payment-intent",
    tag = "payments",
    request_body = PaymentIntentRequest,
    responses(
        (status = 200, description = "Client secret for the created intent", body = PaymentIntentResponse),
        (status = 502, description = "Payment gateway failure")
    )
)]
pub async fn create_payment_intent(
    State(state): State<crate::AppState>,
    Json(request): Json<PaymentIntentRequest>,
) -> AppResult<Json<PaymentIntentResponse>> {
    let amount = PaymentsService::amount_from_price(request.price);
    let client_secret = state.services.payments.create_payment_intent(amount).await?;
    Ok(Json(PaymentIntentResponse { client_secret }))
}
