//! Bearer token issuance and verification

use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::{
    config::AuthConfig,
    error::{AppError, AppResult},
};

/// Identity claim carried by issued tokens. Anything the client supplies
/// beyond the email rides along opaquely.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentityClaims {
    pub sub: String,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Clone)]
pub struct AuthService {
    config: AuthConfig,
}

impl AuthService {
    pub fn new(config: AuthConfig) -> Self {
        Self { config }
    }

    /// Issue a token for the supplied identity claim.
    pub fn issue_token(&self, email: &str, extra: Map<String, Value>) -> AppResult<String> {
        let now = Utc::now();
        let claims = IdentityClaims {
            sub: email.to_string(),
            extra,
            iat: now.timestamp(),
            exp: (now + Duration::hours(self.config.jwt_expiration_hours as i64)).timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.config.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("token encoding failed: {e}")))
    }

    /// Verify a bearer token and return its decoded claims.
    pub fn verify_token(&self, token: &str) -> AppResult<IdentityClaims> {
        decode::<IdentityClaims>(
            token,
            &DecodingKey::from_secret(self.config.jwt_secret.as_bytes()),
            &Validation::default(),
        )
        .map(|data| data.claims)
        .map_err(|e| AppError::Authentication(e.to_string()))
    }
}
