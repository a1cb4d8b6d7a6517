use secrecy::Secret;
use tracing::{debug, info};
use uuid::Uuid;

use crate::errors::AppError;
use crate::sanitize;
use crate::store::{NewUser, Store, StoreError, UserChanges};

use super::jwt::create_token;
use super::models::{AuthPayload, SignUpInput, UpdateUserInput, User};
use super::password::{hash_password, verify_password};

/// Account operations. Callers of the authenticated methods must have run
/// the guard first; `user_id` is trusted to name an existing account.
pub struct AuthService;

impl AuthService {
    /// Register a new user and return a token for it
    pub async fn sign_up(
        store: &dyn Store,
        jwt_secret: &Secret<String>,
        input: SignUpInput,
    ) -> Result<AuthPayload, AppError> {
        let email = sanitize::email(&input.email)?;

        if store.email_in_use(&email, None).await? {
            debug!("Sign-up rejected, email already registered");
            return Err(AppError::EmailInUse);
        }

        let name = sanitize::name(&input.name)?;
        let password_hash = hash_password(&input.password)?;

        let user = store
            .create_user(NewUser {
                name,
                email,
                password_hash,
            })
            .await?;

        let token = create_token(user.id, jwt_secret)?;
        info!(user_id = %user.id, "User signed up");

        Ok(AuthPayload { token, user })
    }

    /// Authenticate a user by email and password
    pub async fn sign_in(
        store: &dyn Store,
        jwt_secret: &Secret<String>,
        email: &str,
        password: &str,
    ) -> Result<AuthPayload, AppError> {
        let user = store
            .find_user_by_email(email.trim())
            .await?
            .ok_or(AppError::AccountNotFound)?;

        if !verify_password(password, &user.password_hash)? {
            debug!(user_id = %user.id, "Sign-in rejected, wrong password");
            return Err(AppError::InvalidCredentials);
        }

        let token = create_token(user.id, jwt_secret)?;
        Ok(AuthPayload { token, user })
    }

    pub async fn me(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
        store
            .find_user_by_id(user_id)
            .await?
            .ok_or(AppError::AccountNotFound)
    }

    pub async fn update_user(
        store: &dyn Store,
        user_id: Uuid,
        input: UpdateUserInput,
    ) -> Result<User, AppError> {
        let mut changes = UserChanges::default();

        if let Some(email) = input.email {
            let email = sanitize::email(&email)?;
            if store.email_in_use(&email, Some(user_id)).await? {
                return Err(AppError::EmailInUse);
            }
            changes.email = Some(email);
        }

        if let Some(password) = input.password {
            changes.password_hash = Some(hash_password(&password)?);
        }

        if let Some(name) = input.name {
            changes.name = Some(sanitize::name(&name)?);
        }

        store
            .update_user(user_id, changes)
            .await
            .map_err(|e| match e {
                StoreError::NotFound => AppError::AccountNotFound,
                other => other.into(),
            })
    }

    /// Delete the account and, through the store, every expense it owns
    pub async fn delete_user(store: &dyn Store, user_id: Uuid) -> Result<User, AppError> {
        let user = store.delete_user(user_id).await.map_err(|e| match e {
            StoreError::NotFound => AppError::AccountNotFound,
            other => other.into(),
        })?;

        info!(%user_id, "User deleted");
        Ok(user)
    }
}
