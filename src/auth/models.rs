use async_graphql::{InputObject, SimpleObject};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

// ============================================================================
// User Models
// ============================================================================

/// Account record. `id`, `password` and `expenses` are resolved in
/// `graphql::types`; the hash itself is never part of the schema.
#[derive(Debug, Clone, FromRow, SimpleObject)]
#[graphql(complex)]
pub struct User {
    #[graphql(skip)]
    pub id: Uuid,
    pub name: String,
    pub email: String,
    #[graphql(skip)]
    pub password_hash: String,
    pub created_at: DateTime<Utc>,
}

/// Arguments of `signUp`
#[derive(Debug, InputObject)]
#[graphql(name = "SignupUserInput")]
pub struct SignUpInput {
    pub name: String,
    pub email: String,
    pub password: String,
}

/// Arguments of `updateUser`; absent fields are left unchanged
#[derive(Debug, Default, InputObject)]
#[graphql(name = "UpdateUserInput")]
pub struct UpdateUserInput {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Returned by `signUp` and `signIn`
#[derive(Debug, SimpleObject)]
pub struct AuthPayload {
    pub token: String,
    pub user: User,
}

// ============================================================================
// Token Models
// ============================================================================

/// JWT access token claims
#[derive(Debug, Serialize, Deserialize)]
pub struct TokenClaims {
    pub sub: Uuid,  // User ID
    pub iat: usize, // Issued at
    pub exp: usize, // Expiration
}
