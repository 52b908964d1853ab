//! Token issuance endpoint

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use utoipa::ToSchema;

use crate::error::AppResult;

/// Identity claim supplied by the client
#[derive(Deserialize, ToSchema)]
pub struct TokenRequest {
    /// Email identifying the user
    pub email: String,
    /// Any extra claim fields ride along opaquely
    #[serde(flatten)]
    #[schema(value_type = Object)]
    pub extra: Map<String, Value>,
}

#[derive(Serialize, ToSchema)]
pub struct TokenResponse {
    pub token: String,
}

/// Issue a bearer token for the supplied identity claim
#[utoipa::path(
    post,
    path = "/jwt",
    tag = "auth",
    request_body = TokenRequest,
    responses(
        (status = 200, description = "Token issued", body = TokenResponse)
    )
)]
pub async fn issue_token(
    State(state): State<crate::AppState>,
    Json(request): Json<TokenRequest>,
) -> AppResult<Json<TokenResponse>> {
    let token = state
        .services
        .auth
        .issue_token(&request.email, request.extra)?;
    Ok(Json(TokenResponse { token }))
}
