//! Caller identification shared by every authenticated operation.
//!
//! Tokens are never revoked, so a valid signature only proves the account
//! existed when the token was issued. [`authenticate`] therefore always
//! follows token verification with an existence check.

use secrecy::Secret;
use tracing::debug;
use uuid::Uuid;

use crate::errors::AppError;
use crate::extractors::BearerToken;
use crate::store::Store;

use super::jwt::decode_token;

/// Resolve the caller's user id from the request credential.
/// Without a credential this fails when `required`, otherwise yields `None`.
pub fn identify(
    credential: Option<&BearerToken>,
    jwt_secret: &Secret<String>,
    required: bool,
) -> Result<Option<Uuid>, AppError> {
    match credential {
        Some(BearerToken(token)) => decode_token(token, jwt_secret).map(|claims| Some(claims.sub)),
        None if required => Err(AppError::Authentication),
        None => Ok(None),
    }
}

/// Fails with `AccountNotFound` when the user has been deleted
pub async fn ensure_account_exists(store: &dyn Store, user_id: Uuid) -> Result<(), AppError> {
    if store.user_exists(user_id).await? {
        Ok(())
    } else {
        debug!(%user_id, "Token refers to a deleted account");
        Err(AppError::AccountNotFound)
    }
}

/// Identity check for operations that require a logged-in, existing account
pub async fn authenticate(
    store: &dyn Store,
    jwt_secret: &Secret<String>,
    credential: Option<&BearerToken>,
) -> Result<Uuid, AppError> {
    let user_id = identify(credential, jwt_secret, true)?.ok_or(AppError::Authentication)?;
    ensure_account_exists(store, user_id).await?;
    Ok(user_id)
}
