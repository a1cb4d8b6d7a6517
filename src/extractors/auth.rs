use actix_web::{dev::Payload, http::header, FromRequest, HttpRequest};
use futures::future::{err, ok, Ready};
use serde_json::Value;

use crate::auth::extract_token;
use crate::errors::AppError;

/// Raw bearer credential supplied with a request. It is only decoded when a
/// resolver asks for the caller's identity, so anonymous operations never
/// pay for (or fail on) token verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BearerToken(pub String);

impl BearerToken {
    fn from_authorization(value: &str) -> Option<Self> {
        let token = extract_token(value);
        if token.is_empty() {
            None
        } else {
            Some(BearerToken(token.to_string()))
        }
    }

    /// Reads the credential from a WebSocket `connection_init` payload
    pub fn from_connection_payload(payload: &Value) -> Option<Self> {
        ["Authorization", "authorization"]
            .iter()
            .find_map(|key| payload.get(*key).and_then(Value::as_str))
            .and_then(Self::from_authorization)
    }
}

impl FromRequest for BearerToken {
    type Error = AppError;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        match req
            .headers()
            .get(header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .and_then(BearerToken::from_authorization)
        {
            Some(token) => ok(token),
            None => err(AppError::Authentication),
        }
    }
}
