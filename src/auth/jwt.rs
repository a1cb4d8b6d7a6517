use chrono::{Duration, Utc};
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use secrecy::{ExposeSecret, Secret};
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;

use super::models::TokenClaims;

// Token expiration constant
pub const TOKEN_EXPIRY_HOURS: i64 = 3;

/// Create a signed access token for a user
pub fn create_token(user_id: Uuid, jwt_secret: &Secret<String>) -> Result<String, AppError> {
    let now = Utc::now();
    let expires_at = now + Duration::hours(TOKEN_EXPIRY_HOURS);

    let claims = TokenClaims {
        sub: user_id,
        iat: now.timestamp() as usize,
        exp: expires_at.timestamp() as usize,
    };

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
    )
    .map_err(|e| AppError::internal(format!("Failed to create token: {e}")))
}

/// Decode and validate an access token
pub fn decode_token(token: &str, jwt_secret: &Secret<String>) -> Result<TokenClaims, AppError> {
    decode::<TokenClaims>(
        token,
        &DecodingKey::from_secret(jwt_secret.expose_secret().as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| {
        debug!("Rejected token: {e}");
        AppError::Authentication
    })
}

/// Strip the `Bearer ` scheme from an Authorization value
pub fn extract_token(authorization: &str) -> &str {
    let value = authorization.trim();
    value.strip_prefix("Bearer ").unwrap_or(value)
}
